//! Transcript Store Tests
//!
//! Day scoping, write-through persistence and the memory-only fallback.

use crate::assistant::TranscriptStore;
use crate::clock::{Clock, FixedClock};
use crate::models::{ConversationEntry, Sender};
use crate::store::{KeyValueStore, MemoryStore, CHAT_DATE_KEY, CHAT_HISTORY_KEY};
use chrono::{Duration, Local, NaiveDate, TimeZone};
use std::sync::Arc;

fn clock_at(hour: u32, minute: u32) -> Arc<FixedClock> {
    let now = Local
        .with_ymd_and_hms(2024, 10, 14, hour, minute, 0)
        .single()
        .expect("unambiguous local time");
    Arc::new(FixedClock::new(now))
}

fn exchange(clock: &FixedClock, question: &str, answer: &str) -> [ConversationEntry; 2] {
    [
        ConversationEntry::user(question, clock.now()),
        ConversationEntry::assistant(answer, clock.now()),
    ]
}

#[tokio::test]
async fn test_same_day_reads_back_same_entries() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let clock = clock_at(10, 0);

    let mut transcript = TranscriptStore::open(store.clone(), clock.clone()).await;
    for entry in exchange(&clock, "How do I vote?", "Register at vote.utah.gov") {
        transcript.append(entry).await;
    }
    let written = transcript.entries().to_vec();

    clock.advance(Duration::hours(3));
    let reopened = TranscriptStore::open(store.clone(), clock.clone()).await;
    assert_eq!(reopened.entries(), written.as_slice());
    assert_eq!(
        store.get(CHAT_DATE_KEY).await.unwrap().as_deref(),
        Some("2024-10-14")
    );
}

#[tokio::test]
async fn test_next_day_reads_back_empty() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let clock = clock_at(10, 0);

    let mut transcript = TranscriptStore::open(store.clone(), clock.clone()).await;
    for entry in exchange(&clock, "Tell me about Yussuf", "Imam Yussuf Abdi is...") {
        transcript.append(entry).await;
    }

    clock.advance(Duration::days(1));
    let reopened = TranscriptStore::open(store.clone(), clock.clone()).await;
    assert!(reopened.entries().is_empty());
    assert_eq!(reopened.day(), NaiveDate::from_ymd_opt(2024, 10, 15).unwrap());

    // The stale snapshot is removed, not just hidden.
    assert_eq!(store.get(CHAT_HISTORY_KEY).await.unwrap(), None);
    assert_eq!(
        store.get(CHAT_DATE_KEY).await.unwrap().as_deref(),
        Some("2024-10-15")
    );
}

#[tokio::test]
async fn test_reload_after_midnight_clears_in_memory_entries() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let clock = clock_at(22, 0);

    let mut transcript = TranscriptStore::open(store, clock.clone()).await;
    transcript
        .append(ConversationEntry::user("Spanish?", clock.now()))
        .await;

    clock.advance(Duration::hours(4));
    assert!(transcript.reload().await.is_empty());
}

#[tokio::test]
async fn test_append_across_midnight_starts_fresh() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let clock = clock_at(23, 59);

    let mut transcript = TranscriptStore::open(store.clone(), clock.clone()).await;
    transcript
        .append(ConversationEntry::user("late question", clock.now()))
        .await;

    clock.advance(Duration::minutes(2));
    transcript
        .append(ConversationEntry::user("early question", clock.now()))
        .await;

    assert_eq!(transcript.entries().len(), 1);
    assert_eq!(transcript.entries()[0].text, "early question");

    let reopened = TranscriptStore::open(store, clock.clone()).await;
    assert_eq!(reopened.entries().len(), 1);
}

#[tokio::test]
async fn test_every_append_is_written_through() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let clock = clock_at(9, 30);
    let mut transcript = TranscriptStore::open(store.clone(), clock.clone()).await;

    for n in 1..=3 {
        transcript
            .append(ConversationEntry::user(format!("message {}", n), clock.now()))
            .await;
        let raw = store.get(CHAT_HISTORY_KEY).await.unwrap().unwrap();
        let saved: Vec<ConversationEntry> = serde_json::from_str(&raw).unwrap();
        assert_eq!(saved.len(), n);
        assert_eq!(saved.last().map(|e| e.sender), Some(Sender::User));
    }
}

#[tokio::test]
async fn test_unreadable_snapshot_starts_fresh() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let clock = clock_at(12, 0);
    store.set(CHAT_DATE_KEY, "2024-10-14").await.unwrap();
    store.set(CHAT_HISTORY_KEY, "{not json").await.unwrap();

    let transcript = TranscriptStore::open(store.clone(), clock).await;
    assert!(transcript.entries().is_empty());
    assert!(!transcript.is_degraded());
    assert_eq!(store.get(CHAT_HISTORY_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn test_unavailable_store_keeps_chat_in_memory() {
    let store = Arc::new(MemoryStore::unavailable());
    let clock = clock_at(12, 0);

    let mut transcript = TranscriptStore::open(store, clock.clone()).await;
    assert!(transcript.is_degraded());

    for entry in exchange(&clock, "Arabic?", "Yes, we have Arabic materials.") {
        transcript.append(entry).await;
    }
    assert_eq!(transcript.entries().len(), 2);
}

#[tokio::test]
async fn test_outage_mid_session_stays_memory_only() {
    let store = Arc::new(MemoryStore::new());
    let clock = clock_at(12, 0);
    let mut transcript = TranscriptStore::open(store.clone(), clock.clone()).await;

    transcript.append(ConversationEntry::user("one", clock.now())).await;
    store.set_available(false);
    transcript.append(ConversationEntry::user("two", clock.now())).await;
    assert!(transcript.is_degraded());

    store.set_available(true);
    transcript.append(ConversationEntry::user("three", clock.now())).await;
    assert_eq!(transcript.entries().len(), 3);

    let raw = store.get(CHAT_HISTORY_KEY).await.unwrap().unwrap();
    let saved: Vec<ConversationEntry> = serde_json::from_str(&raw).unwrap();
    assert_eq!(saved.len(), 1);
}
