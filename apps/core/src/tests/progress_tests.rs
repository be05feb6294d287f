//! Progress Tracker Tests
//!
//! Additivity, clamping, the celebration signal and persistence fallbacks.

use crate::error::AppError;
use crate::models::Money;
use crate::progress::ProgressTracker;
use crate::store::{KeyValueStore, MemoryStore, RAISED_AMOUNT_KEY};
use std::sync::Arc;

fn dollars(d: u64) -> Money {
    Money::from_dollars(d)
}

async fn tracker_on(store: Arc<dyn KeyValueStore>, goal: u64, raised: u64) -> ProgressTracker {
    ProgressTracker::load(dollars(goal), dollars(raised), store)
        .await
        .expect("tracker loads")
}

#[tokio::test]
async fn test_goal_crossing_scenario() {
    let mut tracker = tracker_on(Arc::new(MemoryStore::new()), 50_000, 49_000).await;

    let update = tracker.record_contribution(dollars(1_000)).await.unwrap();
    assert_eq!(update.state.raised, dollars(50_000));
    assert_eq!(update.state.remaining, Money::ZERO);
    assert_eq!(update.state.percentage, 100.0);
    assert!(update.goal_reached);

    let update = tracker.record_contribution(dollars(1)).await.unwrap();
    assert!(!update.goal_reached, "celebration must not fire twice");
}

#[tokio::test]
async fn test_one_cent_short_is_not_the_goal() {
    // Large enough that the float percentage rounds up to 100.
    let goal = Money::from_cents(100_000_000_000_000_000);
    let mut tracker = ProgressTracker::load(goal, Money::ZERO, Arc::new(MemoryStore::new()))
        .await
        .unwrap();

    let update = tracker.set_total(goal.saturating_sub(Money::from_cents(1))).await;
    assert!(!update.goal_reached);
    assert_eq!(update.state.remaining, Money::from_cents(1));

    let update = tracker.record_contribution(Money::from_cents(1)).await.unwrap();
    assert!(update.goal_reached);
    assert_eq!(update.state.remaining, Money::ZERO);
}

#[tokio::test]
async fn test_contributions_are_additive() {
    let mut tracker = tracker_on(Arc::new(MemoryStore::new()), 50_000, 0).await;
    let start = tracker.state().raised;

    let pairs = [(25, 75), (1, 1), (100, 4_900), (12_345, 0)];
    let mut expected = start;
    for (a, b) in pairs {
        tracker.record_contribution(dollars(a)).await.ok();
        tracker.record_contribution(dollars(b)).await.ok();
        expected = expected.saturating_add(dollars(a)).saturating_add(dollars(b));
        assert_eq!(tracker.state().raised, expected);
    }
}

#[tokio::test]
async fn test_fractional_contributions_keep_cents() {
    let mut tracker = tracker_on(Arc::new(MemoryStore::new()), 100, 0).await;
    tracker.record_contribution(Money::from_cents(1_050)).await.unwrap();
    tracker.record_contribution(Money::from_cents(2_025)).await.unwrap();
    assert_eq!(tracker.state().raised, Money::from_cents(3_075));
    assert_eq!(tracker.state().remaining, Money::from_cents(6_925));
}

#[tokio::test]
async fn test_percentage_is_clamped() {
    let mut tracker = tracker_on(Arc::new(MemoryStore::new()), 1_000, 0).await;
    for raised in [0, 1, 500, 999, 1_000, 1_001, 250_000] {
        let update = tracker.set_total(dollars(raised)).await;
        assert!(
            (0.0..=100.0).contains(&update.state.percentage),
            "raised {} gave {}",
            raised,
            update.state.percentage
        );
    }
    assert_eq!(tracker.state().percentage, 100.0);
}

#[tokio::test]
async fn test_reset_then_state_is_zero() {
    let mut tracker = tracker_on(Arc::new(MemoryStore::new()), 50_000, 30_000).await;
    let state = tracker.reset().await;
    assert_eq!(state.raised, Money::ZERO);
    assert_eq!(state.percentage, 0.0);
    assert_eq!(tracker.state(), state);
}

#[tokio::test]
async fn test_celebration_once_per_crossing() {
    let mut tracker = tracker_on(Arc::new(MemoryStore::new()), 100, 0).await;

    assert!(!tracker.record_contribution(dollars(60)).await.unwrap().goal_reached);
    assert!(tracker.record_contribution(dollars(40)).await.unwrap().goal_reached);
    assert!(!tracker.record_contribution(dollars(10)).await.unwrap().goal_reached);

    tracker.reset().await;
    assert!(tracker.record_contribution(dollars(100)).await.unwrap().goal_reached);
    assert!(!tracker.record_contribution(dollars(100)).await.unwrap().goal_reached);
}

#[tokio::test]
async fn test_set_total_below_goal_rearms_celebration() {
    let mut tracker = tracker_on(Arc::new(MemoryStore::new()), 100, 0).await;

    assert!(tracker.set_total(dollars(150)).await.goal_reached);
    assert!(!tracker.set_total(dollars(120)).await.goal_reached);
    assert!(!tracker.set_total(dollars(50)).await.goal_reached);
    assert!(tracker.record_contribution(dollars(50)).await.unwrap().goal_reached);
}

#[tokio::test]
async fn test_loaded_at_goal_counts_as_celebrated() {
    let mut tracker = tracker_on(Arc::new(MemoryStore::new()), 100, 100).await;
    assert!(!tracker.record_contribution(dollars(5)).await.unwrap().goal_reached);
}

#[tokio::test]
async fn test_total_survives_reload() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());

    let mut first = tracker_on(store.clone(), 50_000, 0).await;
    first.record_contribution(Money::from_cents(2_550)).await.unwrap();
    assert_eq!(
        store.get(RAISED_AMOUNT_KEY).await.unwrap().as_deref(),
        Some("25.50")
    );

    // The stored total takes precedence over the starting amount.
    let second = tracker_on(store, 50_000, 10_000).await;
    assert_eq!(second.state().raised, Money::from_cents(2_550));
}

#[tokio::test]
async fn test_unreadable_total_loads_as_zero() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    store.set(RAISED_AMOUNT_KEY, "lots of money").await.unwrap();

    let tracker = tracker_on(store, 50_000, 7_000).await;
    assert_eq!(tracker.state().raised, Money::ZERO);
    assert!(!tracker.is_degraded());
}

#[tokio::test]
async fn test_unavailable_store_degrades_to_memory() {
    let mut tracker = tracker_on(Arc::new(MemoryStore::unavailable()), 50_000, 1_000).await;
    assert!(tracker.is_degraded());
    assert_eq!(tracker.state().raised, dollars(1_000));

    let update = tracker.record_contribution(dollars(500)).await.unwrap();
    assert_eq!(update.state.raised, dollars(1_500));
}

#[tokio::test]
async fn test_outage_mid_session_keeps_counting() {
    let store = Arc::new(MemoryStore::new());
    let mut tracker = tracker_on(store.clone(), 50_000, 0).await;

    tracker.record_contribution(dollars(10)).await.unwrap();
    store.set_available(false);
    tracker.record_contribution(dollars(20)).await.unwrap();
    assert!(tracker.is_degraded());
    assert_eq!(tracker.state().raised, dollars(30));

    // Memory-only for the rest of the session, even once the store is back.
    store.set_available(true);
    tracker.record_contribution(dollars(5)).await.unwrap();
    assert_eq!(store.get(RAISED_AMOUNT_KEY).await.unwrap().as_deref(), Some("10.00"));
}

#[tokio::test]
async fn test_invalid_contribution_leaves_state_unchanged() {
    let mut tracker = tracker_on(Arc::new(MemoryStore::new()), 100, 40).await;
    let before = tracker.state();

    for text in ["0", "-3", "abc", "", "0.00"] {
        let result = match Money::parse_contribution(text) {
            Ok(amount) => tracker.record_contribution(amount).await.map(|_| ()),
            Err(e) => Err(e),
        };
        assert!(matches!(result, Err(AppError::InvalidAmount(_))), "{}", text);
    }
    assert_eq!(tracker.state(), before);
}
