//! Worker configuration

use rankings_common::RankingsConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Recompute worker configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Scheduler settings
    pub scheduler: SchedulerConfig,
}

impl WorkerConfig {
    /// Build the worker configuration from the `rankings` settings section
    pub fn from_settings(settings: &RankingsConfig) -> Self {
        Self {
            scheduler: SchedulerConfig {
                tick_interval: settings.recompute_interval_seconds,
                run_on_start: settings.run_on_start,
                ..SchedulerConfig::default()
            },
        }
    }
}

/// Scheduler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Whether the scheduler is enabled
    pub enabled: bool,

    /// Seconds between recompute cycles
    pub tick_interval: u64,

    /// Run a cycle immediately instead of waiting for the first interval
    pub run_on_start: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tick_interval: 3600, // 1 hour
            run_on_start: false,
        }
    }
}

impl SchedulerConfig {
    /// Interval between cycles, never shorter than one second
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.tick_interval.max(1))
    }
}
