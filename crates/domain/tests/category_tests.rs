//! Tests for category metadata
//!
//! Tests CategoryKind properties and the storage ids of registered categories.

use rankings_domain::{
    CategoryKind, GameId, RankingCategory, RankingSubCategory, SortDirection, ValueKind,
};

// ============================================================================
// CategoryKind Tests
// ============================================================================

#[test]
fn test_periodic_kinds() {
    let periodic: Vec<_> = CategoryKind::all()
        .iter()
        .filter(|k| k.is_periodic())
        .map(|k| k.as_str())
        .collect();

    assert_eq!(
        periodic,
        vec![
            "exp",
            "eventLocationCount",
            "freeEventLocationCount",
            "eventLocationCompletion",
            "eventVmCount",
        ]
    );
}

#[test]
fn test_only_time_trial_ranks_ascending() {
    for kind in CategoryKind::all() {
        let expected = if *kind == CategoryKind::TimeTrial {
            SortDirection::Ascending
        } else {
            SortDirection::Descending
        };
        assert_eq!(kind.sort_direction(), expected, "{kind}");
    }
}

#[test]
fn test_only_completion_is_float() {
    let floats: Vec<_> = CategoryKind::all()
        .iter()
        .filter(|k| k.value_kind() == ValueKind::Float)
        .collect();
    assert_eq!(floats, vec![&CategoryKind::EventLocationCompletion]);
}

// ============================================================================
// RankingCategory Tests
// ============================================================================

#[test]
fn test_shared_category_has_no_game() {
    let category = RankingCategory::shared(CategoryKind::Exp);
    assert!(category.game.is_none());
    assert!(category.periodic);
    assert!(!category.separate_by_game);
    assert_eq!(category.category_id().as_str(), "exp");
}

#[test]
fn test_registered_category_serializes_for_readers() {
    let mut category = RankingCategory::owned_by(CategoryKind::TimeTrial, GameId::from("2kki"));
    category.push(RankingSubCategory::new("143", Some(GameId::from("2kki"))));

    let json = serde_json::to_value(&category).unwrap();
    assert_eq!(json["kind"], "timeTrial");
    assert_eq!(json["game"], "2kki");
    assert_eq!(json["subCategories"][0]["subCategoryId"], "143");
}
