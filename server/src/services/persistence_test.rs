use std::sync::Arc;

use time::OffsetDateTime;
use time::macros::datetime;
use uuid::Uuid;

use super::*;
use crate::records::{MessageRecord, RsvpRecord};
use crate::services::file_store::FileRecordStore;
use crate::services::memory_store::MemoryStore;
use crate::state::test_helpers::{FailingStore, HangingStore, gateway, temp_store_path, unreachable_pg_store};

fn amal() -> SubmissionRecord {
    SubmissionRecord::Rsvp(RsvpRecord {
        id: Uuid::new_v4(),
        name: "Amal".into(),
        favorite_song: "Perfect".into(),
        is_attending: true,
        message_image_ref: None,
        created_at: OffsetDateTime::now_utc(),
    })
}

fn rsvp_at(name: &str, at: OffsetDateTime) -> SubmissionRecord {
    SubmissionRecord::Rsvp(RsvpRecord {
        id: Uuid::new_v4(),
        name: name.into(),
        favorite_song: String::new(),
        is_attending: true,
        message_image_ref: None,
        created_at: at,
    })
}

// =============================================================================
// Tier
// =============================================================================

#[test]
fn tier_serializes_as_short_names() {
    assert_eq!(serde_json::to_value(Tier::PrimaryStore).unwrap(), "primary");
    assert_eq!(serde_json::to_value(Tier::FallbackStore).unwrap(), "fallback");
    assert_eq!(Tier::None.as_str(), "none");
}

#[test]
fn weakest_tier_wins() {
    assert_eq!(Tier::PrimaryStore.weakest(Tier::PrimaryStore), Tier::PrimaryStore);
    assert_eq!(Tier::PrimaryStore.weakest(Tier::FallbackStore), Tier::FallbackStore);
    assert_eq!(Tier::FallbackStore.weakest(Tier::None), Tier::None);
}

// =============================================================================
// persist
// =============================================================================

#[tokio::test]
async fn healthy_primary_takes_the_write() {
    let primary = Arc::new(MemoryStore::new());
    let fallback = Arc::new(MemoryStore::new());
    let gw = gateway(Some(primary.clone()), fallback.clone());

    let result = gw.persist(&amal()).await;
    assert_eq!(result, PersistenceResult { succeeded: true, tier: Tier::PrimaryStore, error: None });
    assert_eq!(primary.list().await.unwrap().total(), 1);
    assert_eq!(fallback.list().await.unwrap().total(), 0);
}

#[tokio::test]
async fn failing_primary_falls_back_and_record_is_retrievable() {
    let primary = Arc::new(FailingStore::default());
    let fallback = Arc::new(MemoryStore::new());
    let gw = gateway(Some(primary.clone()), fallback.clone());

    let record = amal();
    let result = gw.persist(&record).await;
    assert!(result.succeeded);
    assert_eq!(result.tier, Tier::FallbackStore);
    assert_eq!(primary.attempts(), 1);

    let listed = gw.list_all().await.unwrap();
    assert_eq!(listed.rsvps.len(), 1);
    assert_eq!(listed.rsvps[0].id, record.id());
}

#[tokio::test]
async fn both_tiers_failing_reports_failure_without_partial_record() {
    let primary = Arc::new(FailingStore::default());
    let fallback = Arc::new(FailingStore::default());
    let gw = gateway(Some(primary.clone()), fallback.clone());

    let result = gw.persist(&amal()).await;
    assert!(!result.succeeded);
    assert_eq!(result.tier, Tier::None);
    assert_eq!(result.error.as_deref(), Some("store unavailable: connection refused"));
    assert_eq!(primary.attempts(), 1);
    assert_eq!(fallback.attempts(), 1);
}

#[tokio::test]
async fn no_primary_goes_straight_to_fallback() {
    let fallback = Arc::new(MemoryStore::new());
    let gw = gateway(None, fallback.clone());
    assert!(!gw.has_primary());
    assert_eq!(gw.persist(&amal()).await.tier, Tier::FallbackStore);
}

#[tokio::test]
async fn hanging_primary_times_out_into_fallback() {
    let fallback = Arc::new(MemoryStore::new());
    let gw = gateway(Some(Arc::new(HangingStore)), fallback.clone());

    let result = gw.persist(&amal()).await;
    assert_eq!(result.tier, Tier::FallbackStore);
    assert_eq!(fallback.list().await.unwrap().total(), 1);
}

#[tokio::test]
async fn unreachable_postgres_lands_amal_in_fallback_file() {
    let fallback = Arc::new(FileRecordStore::new(temp_store_path("amal")));
    let gw = PersistenceGateway::new(Some(unreachable_pg_store()), fallback.clone(), Duration::from_secs(5));

    let result = gw.persist(&amal()).await;
    assert_eq!(result, PersistenceResult { succeeded: true, tier: Tier::FallbackStore, error: None });

    let raw = tokio::fs::read_to_string(fallback.path()).await.unwrap();
    let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let rsvps = doc["rsvps"].as_array().unwrap();
    assert_eq!(rsvps.len(), 1);
    assert_eq!(rsvps[0]["name"], "Amal");
    assert_eq!(rsvps[0]["favoriteSong"], "Perfect");
    assert_eq!(rsvps[0]["isAttending"], true);
    assert!(OffsetDateTime::parse(rsvps[0]["createdAt"].as_str().unwrap(), &time::format_description::well_known::Rfc3339).is_ok());

    if let Some(dir) = fallback.path().parent() {
        tokio::fs::remove_dir_all(dir).await.ok();
    }
}

// =============================================================================
// list_all
// =============================================================================

#[tokio::test]
async fn list_all_merges_tiers_in_time_order() {
    let primary = Arc::new(MemoryStore::new());
    let fallback = Arc::new(MemoryStore::new());
    primary.insert(&rsvp_at("second", datetime!(2026-06-02 12:00 UTC))).await.unwrap();
    fallback.insert(&rsvp_at("first", datetime!(2026-06-01 12:00 UTC))).await.unwrap();
    fallback.insert(&rsvp_at("third", datetime!(2026-06-03 12:00 UTC))).await.unwrap();
    fallback
        .insert(&SubmissionRecord::Message(MessageRecord {
            id: Uuid::new_v4(),
            name: "Amal".into(),
            message: "hi".into(),
            created_at: datetime!(2026-06-01 13:00 UTC),
        }))
        .await
        .unwrap();

    let gw = gateway(Some(primary), fallback);
    let all = gw.list_all().await.unwrap();
    let names: Vec<_> = all.rsvps.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["first", "second", "third"]);
    assert_eq!(all.messages.len(), 1);
}

#[tokio::test]
async fn list_all_skips_failing_primary() {
    let fallback = Arc::new(MemoryStore::new());
    fallback.insert(&amal()).await.unwrap();
    let gw = gateway(Some(Arc::new(FailingStore::default())), fallback);
    assert_eq!(gw.list_all().await.unwrap().rsvps.len(), 1);
}

#[tokio::test]
async fn list_all_uses_primary_when_fallback_fails() {
    let primary = Arc::new(MemoryStore::new());
    primary.insert(&amal()).await.unwrap();
    let gw = gateway(Some(primary), Arc::new(FailingStore::default()));
    assert_eq!(gw.list_all().await.unwrap().rsvps.len(), 1);
}

#[tokio::test]
async fn list_all_fails_when_every_tier_fails() {
    let gw = gateway(Some(Arc::new(FailingStore::default())), Arc::new(FailingStore::default()));
    assert!(matches!(gw.list_all().await, Err(StoreError::Unavailable(_))));
}
