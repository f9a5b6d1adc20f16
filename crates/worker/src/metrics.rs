//! Worker metrics and monitoring

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;

/// Counters for recompute cycles
#[derive(Clone)]
pub struct WorkerMetrics {
    inner: Arc<RwLock<MetricsInner>>,
}

#[derive(Default)]
struct MetricsInner {
    /// Completed cycles
    cycles_completed: u64,
    /// Leaderboards attempted
    units_processed: u64,
    units_succeeded: u64,
    units_failed: u64,
    /// Medal tallies that failed
    medal_failures: u64,
    /// Cycle durations, most recent last
    durations: Vec<Duration>,
    last_cycle_at: Option<DateTime<Utc>>,
}

impl WorkerMetrics {
    /// Create new metrics
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MetricsInner::default())),
        }
    }

    pub fn record_unit_succeeded(&self) {
        let mut inner = self.inner.write();
        inner.units_processed += 1;
        inner.units_succeeded += 1;
    }

    pub fn record_unit_failed(&self) {
        let mut inner = self.inner.write();
        inner.units_processed += 1;
        inner.units_failed += 1;
    }

    pub fn record_medal_failure(&self) {
        self.inner.write().medal_failures += 1;
    }

    /// Record a finished cycle
    pub fn record_cycle(&self, duration: Duration, finished_at: DateTime<Utc>) {
        let mut inner = self.inner.write();
        inner.cycles_completed += 1;
        inner.last_cycle_at = Some(finished_at);
        inner.durations.push(duration);

        // Keep only the last 100 cycles
        if inner.durations.len() > 100 {
            inner.durations.drain(0..50);
        }
    }

    /// Get completed cycles
    pub fn cycles_completed(&self) -> u64 {
        self.inner.read().cycles_completed
    }

    /// Get units processed
    pub fn units_processed(&self) -> u64 {
        self.inner.read().units_processed
    }

    /// Get units failed
    pub fn units_failed(&self) -> u64 {
        self.inner.read().units_failed
    }

    /// Get success rate (0.0 - 1.0)
    pub fn success_rate(&self) -> f64 {
        let inner = self.inner.read();
        if inner.units_processed == 0 {
            0.0
        } else {
            inner.units_succeeded as f64 / inner.units_processed as f64
        }
    }

    /// Get average cycle duration
    pub fn average_duration(&self) -> Option<Duration> {
        let inner = self.inner.read();
        if inner.durations.is_empty() {
            return None;
        }

        let total: Duration = inner.durations.iter().sum();
        Some(total / inner.durations.len() as u32)
    }

    /// Duration of the most recent cycle
    pub fn last_duration(&self) -> Option<Duration> {
        self.inner.read().durations.last().copied()
    }

    /// Get metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        let inner = self.inner.read();
        MetricsSnapshot {
            cycles_completed: inner.cycles_completed,
            units_processed: inner.units_processed,
            units_succeeded: inner.units_succeeded,
            units_failed: inner.units_failed,
            medal_failures: inner.medal_failures,
            success_rate: if inner.units_processed == 0 {
                0.0
            } else {
                inner.units_succeeded as f64 / inner.units_processed as f64
            },
            last_duration: inner.durations.last().copied(),
            last_cycle_at: inner.last_cycle_at,
        }
    }
}

impl Default for WorkerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub cycles_completed: u64,
    pub units_processed: u64,
    pub units_succeeded: u64,
    pub units_failed: u64,
    pub medal_failures: u64,
    pub success_rate: f64,
    pub last_duration: Option<Duration>,
    pub last_cycle_at: Option<DateTime<Utc>>,
}

impl MetricsSnapshot {
    /// Format metrics for display
    pub fn format(&self) -> String {
        format!(
            r#"Worker Metrics:
  Cycles Completed: {}
  Units Processed: {}
  Units Succeeded: {}
  Units Failed: {}
  Medal Failures: {}
  Success Rate: {:.2}%
  Last Cycle Duration: {}
  Last Cycle At: {}"#,
            self.cycles_completed,
            self.units_processed,
            self.units_succeeded,
            self.units_failed,
            self.medal_failures,
            self.success_rate * 100.0,
            format_duration(self.last_duration),
            self.last_cycle_at
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| "N/A".to_string()),
        )
    }
}

fn format_duration(duration: Option<Duration>) -> String {
    match duration {
        Some(d) => format!("{:.2}ms", d.as_secs_f64() * 1000.0),
        None => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_counters() {
        let metrics = WorkerMetrics::new();

        assert_eq!(metrics.units_processed(), 0);

        metrics.record_unit_succeeded();
        metrics.record_unit_failed();

        assert_eq!(metrics.units_processed(), 2);
        assert_eq!(metrics.units_failed(), 1);
        assert_eq!(metrics.success_rate(), 0.5);
    }

    #[test]
    fn test_cycle_durations() {
        let metrics = WorkerMetrics::new();

        metrics.record_cycle(Duration::from_millis(100), Utc::now());
        metrics.record_cycle(Duration::from_millis(300), Utc::now());

        assert_eq!(metrics.cycles_completed(), 2);
        assert_eq!(metrics.average_duration(), Some(Duration::from_millis(200)));
        assert_eq!(metrics.last_duration(), Some(Duration::from_millis(300)));
    }

    #[test]
    fn test_snapshot_format() {
        let metrics = WorkerMetrics::new();
        metrics.record_medal_failure();

        let text = metrics.snapshot().format();

        assert!(text.contains("Medal Failures: 1"));
        assert!(text.contains("Last Cycle Duration: N/A"));
    }
}
