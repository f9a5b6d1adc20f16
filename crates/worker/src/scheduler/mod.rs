//! Recompute scheduler
//!
//! Every tick rebuilds the category registry, plans the cycle's jobs and runs
//! them one after another. Cycles never overlap: ticks missed while a cycle
//! runs are skipped.

use crate::config::SchedulerConfig;
use crate::job::Job;
use crate::metrics::WorkerMetrics;
use crate::workers::JobHandler;
use anyhow::{Context, Result};
use chrono::Utc;
use rankings_application::{Registry, RegistryBuilder};
use rankings_domain::{
    CategoryId, RankingCategory, RankingSubCategory, RecomputeUnit, SubCategoryId,
};
use std::collections::HashSet;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, instrument, warn};

/// Whether a registered subcategory is rebuilt this cycle.
///
/// `all` is computed by the primary game, except for categories stored per
/// game. Periodic subcategories only follow the current period.
pub fn should_recompute(
    category: &RankingCategory,
    sub_category: &RankingSubCategory,
    is_primary: bool,
    current_period: Option<i32>,
) -> bool {
    let sub_category_id = &sub_category.sub_category_id;
    if sub_category_id.is_all() {
        return is_primary || category.separate_by_game;
    }
    if category.periodic {
        return current_period.is_some() && sub_category_id.period_ordinal() == current_period;
    }
    true
}

/// Jobs for one cycle: each game's leaderboards followed by its medal tally.
///
/// A (category, subcategory) shared by several games is rebuilt once. This
/// covers minigame ids hosted by more than one game, whose leaderboard does
/// not depend on the game that rebuilds it.
pub fn plan_cycle(registry: &Registry, current_period: Option<i32>) -> Vec<Job> {
    let mut seen: HashSet<(CategoryId, SubCategoryId)> = HashSet::new();
    let mut jobs = Vec::new();

    for game_registry in registry.games() {
        let game = &game_registry.game;
        let is_primary = registry.catalog().is_primary(game);

        for category in &game_registry.categories {
            let category_id = category.category_id();
            for sub_category in &category.sub_categories {
                if !should_recompute(category, sub_category, is_primary, current_period) {
                    continue;
                }
                if !seen.insert((category_id.clone(), sub_category.sub_category_id.clone())) {
                    continue;
                }
                jobs.push(Job::Recompute(RecomputeUnit::for_registered(
                    game,
                    category,
                    sub_category,
                )));
            }
        }

        jobs.push(Job::TallyMedals {
            game: game.clone(),
            current_period,
        });
    }

    jobs
}

/// Outcome of one cycle
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleReport {
    pub current_period: Option<i32>,
    pub units_succeeded: usize,
    pub units_failed: usize,
    pub medal_failures: usize,
    pub duration: Duration,
}

/// Recompute scheduler
pub struct Scheduler {
    config: SchedulerConfig,
    builder: RegistryBuilder,
    handler: JobHandler,
    metrics: WorkerMetrics,
    registry: Option<Registry>,
}

impl Scheduler {
    /// Create a new scheduler
    pub fn new(
        config: SchedulerConfig,
        builder: RegistryBuilder,
        handler: JobHandler,
        metrics: WorkerMetrics,
    ) -> Self {
        Self {
            config,
            builder,
            handler,
            metrics,
            registry: None,
        }
    }

    /// Registry used by the most recent cycle
    pub fn registry(&self) -> Option<&Registry> {
        self.registry.as_ref()
    }

    /// Rediscover and persist the category registry
    pub async fn refresh_registry(&mut self) -> &Registry {
        let registry = self.builder.build().await;
        registry
            .persist(self.handler.engine().store().as_ref())
            .await;
        self.registry.insert(registry)
    }

    /// Run one full cycle.
    ///
    /// Unit and medal failures are logged and counted; only a failure to
    /// determine the current period aborts the cycle.
    #[instrument(skip(self))]
    pub async fn run_cycle(&mut self) -> Result<CycleReport> {
        let started = Instant::now();

        let current_period = self
            .handler
            .engine()
            .current_period_ordinal()
            .await
            .context("Failed to determine current event period")?;

        let jobs = plan_cycle(self.refresh_registry().await, current_period);
        info!(
            jobs = jobs.len(),
            current_period = ?current_period,
            "Starting recompute cycle"
        );

        let mut report = CycleReport {
            current_period,
            ..CycleReport::default()
        };

        for job in &jobs {
            let result = self.handler.handle(job).await;
            match (job, result) {
                (Job::Recompute(_), Ok(())) => {
                    report.units_succeeded += 1;
                    self.metrics.record_unit_succeeded();
                }
                (Job::Recompute(unit), Err(e)) => {
                    report.units_failed += 1;
                    self.metrics.record_unit_failed();
                    error!(
                        game = %unit.game,
                        category_id = %unit.category_id,
                        sub_category_id = %unit.sub_category_id,
                        error = format!("{:#}", e),
                        "Failed to recompute rankings"
                    );
                }
                (Job::TallyMedals { .. }, Ok(())) => {}
                (Job::TallyMedals { game, .. }, Err(e)) => {
                    report.medal_failures += 1;
                    self.metrics.record_medal_failure();
                    error!(game = %game, error = format!("{:#}", e), "Failed to update medals");
                }
            }
        }

        report.duration = started.elapsed();
        self.metrics.record_cycle(report.duration, Utc::now());

        info!(
            succeeded = report.units_succeeded,
            failed = report.units_failed,
            medal_failures = report.medal_failures,
            duration_ms = report.duration.as_millis() as u64,
            "Recompute cycle finished"
        );
        Ok(report)
    }

    /// Start the scheduler
    pub fn start(mut self, shutdown: mpsc::Receiver<()>) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.run(shutdown).await;
        })
    }

    /// Run the scheduler loop until a shutdown signal arrives.
    ///
    /// A signal received mid-cycle is handled once the cycle completes.
    async fn run(&mut self, mut shutdown: mpsc::Receiver<()>) {
        if !self.config.enabled {
            info!("Scheduler is disabled");
            return;
        }

        info!(
            tick_interval = self.config.tick_interval,
            run_on_start = self.config.run_on_start,
            "Starting scheduler"
        );

        let mut interval = tokio::time::interval(self.config.interval());
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        if !self.config.run_on_start {
            // The first tick completes immediately
            interval.tick().await;
        }

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = self.run_cycle().await {
                        warn!(error = format!("{:#}", e), "Recompute cycle skipped");
                    }
                }
                _ = shutdown.recv() => {
                    info!("Scheduler stopping");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rankings_application::GameRegistry;
    use rankings_domain::{CategoryKind, GameCatalog, GameId};

    fn catalog() -> GameCatalog {
        GameCatalog::new(
            vec![GameId::from("2kki"), GameId::from("yume")],
            GameId::from("2kki"),
            vec![GameId::from("2kki")],
        )
        .unwrap()
    }

    fn periodic(kind: CategoryKind, owner: Option<&str>, subs: &[&str]) -> RankingCategory {
        let mut category = match owner {
            Some(game) => RankingCategory::owned_by(kind, GameId::from(game)),
            None => RankingCategory::shared(kind),
        };
        for sub in subs {
            category.push(RankingSubCategory::new(*sub, owner.map(GameId::from)));
        }
        category
    }

    fn game(name: &str) -> GameRegistry {
        let mut bp = RankingCategory::shared(CategoryKind::Bp);
        bp.push(RankingSubCategory::new(SubCategoryId::all(), None));
        bp.push(RankingSubCategory::new(name, Some(GameId::from(name))));
        GameRegistry {
            game: GameId::from(name),
            categories: vec![
                bp,
                periodic(CategoryKind::Exp, None, &["all", "1", "2"]),
                periodic(CategoryKind::FreeEventLocationCount, Some(name), &["all", "1", "2"]),
            ],
        }
    }

    fn labels(jobs: &[Job]) -> Vec<String> {
        jobs.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_plan_cycle_skips_non_current_periods_and_foreign_all() {
        let registry = Registry::new(catalog(), vec![game("2kki"), game("yume")]);

        let jobs = plan_cycle(&registry, Some(2));

        assert_eq!(
            labels(&jobs),
            vec![
                "recompute 2kki/bp/all",
                "recompute 2kki/bp/2kki",
                "recompute 2kki/exp/all",
                "recompute 2kki/exp/2",
                "recompute 2kki/freeEventLocationCount_2kki/all",
                "recompute 2kki/freeEventLocationCount_2kki/2",
                "tally medals 2kki",
                "recompute yume/bp/yume",
                "recompute yume/freeEventLocationCount_yume/all",
                "recompute yume/freeEventLocationCount_yume/2",
                "tally medals yume",
            ]
        );
    }

    #[test]
    fn test_plan_cycle_without_current_period_keeps_only_all() {
        let registry = Registry::new(catalog(), vec![game("2kki")]);

        let jobs = plan_cycle(&registry, None);

        assert!(jobs.iter().all(|job| match job {
            Job::Recompute(unit) => !unit.periodic || unit.sub_category_id.is_all(),
            Job::TallyMedals { current_period, .. } => current_period.is_none(),
        }));
        assert_eq!(jobs.iter().filter(|j| j.is_recompute()).count(), 4);
    }

    #[test]
    fn test_medal_tally_follows_game_units() {
        let registry = Registry::new(catalog(), vec![game("2kki"), game("yume")]);

        let jobs = plan_cycle(&registry, Some(1));

        let tally = jobs
            .iter()
            .position(|j| matches!(j, Job::TallyMedals { game, .. } if game.as_str() == "2kki"))
            .unwrap();
        assert!(jobs[..tally].iter().all(|j| j.game().as_str() == "2kki"));
    }

    #[test]
    fn test_shared_minigame_is_rebuilt_once() {
        let with_minigame = |name: &str| {
            let mut registry = game(name);
            registry
                .categories
                .push(periodic(CategoryKind::Minigame, Some(name), &["rby"]));
            registry
        };
        let registry = Registry::new(catalog(), vec![with_minigame("2kki"), with_minigame("yume")]);

        let jobs = plan_cycle(&registry, None);

        let minigame_jobs: Vec<_> = labels(&jobs)
            .into_iter()
            .filter(|label| label.contains("/minigame/"))
            .collect();
        assert_eq!(minigame_jobs, vec!["recompute 2kki/minigame/rby"]);
        assert_eq!(
            jobs.iter()
                .filter(|j| matches!(j, Job::TallyMedals { .. }))
                .count(),
            2
        );
    }
}
