//! Tests for full recompute cycles against the in-memory ports

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use rankings_application::{
    AggregationQuery, FixedClock, RankingEngine, RankingStore, RegistryBuilder, ScoreSource,
};
use rankings_testing::{
    small_catalog, EventPeriodBuilder, InMemoryRankingStore, InMemoryScoreSource, ScoreBuilder,
};
use rankings_worker::{RecomputeService, SchedulerConfig, WorkerConfig};

struct Harness {
    source: Arc<InMemoryScoreSource>,
    store: Arc<InMemoryRankingStore>,
    service: RecomputeService,
}

fn harness() -> Harness {
    let source = Arc::new(InMemoryScoreSource::new());
    let store = Arc::new(InMemoryRankingStore::new());
    // Inside the default test period (2024-01-01, 30 days)
    let clock = FixedClock(Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap());
    source.set_periods("2kki", vec![EventPeriodBuilder::new(1).build()]);

    let engine = RankingEngine::new(
        source.clone() as Arc<dyn ScoreSource>,
        store.clone() as Arc<dyn RankingStore>,
        Arc::new(clock),
    );
    let builder = RegistryBuilder::new(source.clone() as Arc<dyn ScoreSource>, small_catalog());
    let config = WorkerConfig {
        scheduler: SchedulerConfig {
            tick_interval: 60,
            ..Default::default()
        },
    };

    Harness {
        source,
        store,
        service: RecomputeService::new(config, engine, builder),
    }
}

#[tokio::test]
async fn test_cycle_rebuilds_leaderboards_and_medals() {
    // Arrange
    let mut h = harness();
    h.source.set_scores(
        AggregationQuery::BadgeCount { game: None },
        vec![
            ScoreBuilder::new("alice").int(12).at(3).build(),
            ScoreBuilder::new("bob").int(7).at(1).build(),
        ],
    );
    h.source.set_scores(
        AggregationQuery::Exp { period: Some(1) },
        vec![ScoreBuilder::new("bob").int(400).at(2).build()],
    );

    // Act
    let report = h.service.run_once().await.unwrap();

    // Assert
    assert_eq!(report.current_period, Some(1));
    assert_eq!(report.units_failed, 0);
    assert_eq!(report.medal_failures, 0);
    assert_eq!(h.store.entries("badgeCount", "all").len(), 2);
    assert_eq!(h.store.entries("exp", "1").len(), 1);

    let bob = h.store.medals("2kki", "bob").unwrap();
    assert_eq!(bob.diamond, 1);
    assert_eq!(bob.gold, 1);
    assert_eq!(h.service.metrics().cycles_completed(), 1);
}

#[tokio::test]
async fn test_failed_unit_does_not_stop_cycle() {
    // Arrange
    let mut h = harness();
    h.source.fail_query(AggregationQuery::BadgePoints { game: None });
    h.source.set_scores(
        AggregationQuery::BadgeCount { game: None },
        vec![ScoreBuilder::new("alice").int(3).build()],
    );

    // Act
    let report = h.service.run_once().await.unwrap();

    // Assert
    assert_eq!(report.units_failed, 1);
    assert!(report.units_succeeded > 0);
    assert_eq!(h.store.entries("badgeCount", "all").len(), 1);
    assert_eq!(h.service.metrics().units_failed(), 1);
}

#[tokio::test]
async fn test_cycle_persists_registry() {
    // Arrange
    let mut h = harness();

    // Act
    h.service.run_once().await.unwrap();

    // Assert
    let categories = h.store.categories();
    assert!(categories.iter().any(|c| c.category_id.as_str() == "exp"));
    assert!(categories
        .iter()
        .any(|c| c.category_id.as_str() == "freeEventLocationCount_2kki"));
    assert!(h
        .store
        .sub_categories()
        .iter()
        .any(|s| s.category_id.as_str() == "bp" && s.sub_category_id.as_str() == "flow"));
}

#[tokio::test]
async fn test_store_outage_marks_every_unit_failed() {
    // Arrange
    let mut h = harness();
    h.store.set_unavailable(true);

    // Act
    let report = h.service.run_once().await.unwrap();

    // Assert
    assert_eq!(report.units_succeeded, 0);
    assert!(report.units_failed > 0);
    assert_eq!(report.medal_failures, small_catalog().games().len());
    assert!(h.store.medals("2kki", "alice").is_none());
}

#[tokio::test(start_paused = true)]
async fn test_service_stops_on_shutdown_signal() {
    // Arrange
    let h = harness();
    let shutdown = h.service.shutdown_handle();
    let metrics = h.service.metrics().clone();
    let task = tokio::spawn(h.service.start());

    // Act
    shutdown.send(()).await.unwrap();
    task.await.unwrap().unwrap();

    // Assert: no cycle ran before the first interval elapsed
    assert_eq!(metrics.cycles_completed(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_signal_after_stop_is_rejected() {
    // Arrange
    let h = harness();
    let shutdown = h.service.shutdown_handle();
    let task = tokio::spawn(h.service.start());
    shutdown.send(()).await.unwrap();
    task.await.unwrap().unwrap();

    // Act
    let late = shutdown.send(()).await;

    // Assert
    assert!(late.is_err());
}
