use std::sync::Arc;

use time::OffsetDateTime;
use uuid::Uuid;

use super::*;
use crate::records::{MessageRecord, RsvpRecord};
use crate::state::test_helpers::temp_store_path;

fn rsvp(name: &str) -> SubmissionRecord {
    SubmissionRecord::Rsvp(RsvpRecord {
        id: Uuid::new_v4(),
        name: name.into(),
        favorite_song: "Perfect".into(),
        is_attending: true,
        message_image_ref: None,
        created_at: OffsetDateTime::now_utc(),
    })
}

fn message(name: &str) -> SubmissionRecord {
    SubmissionRecord::Message(MessageRecord {
        id: Uuid::new_v4(),
        name: name.into(),
        message: "data:image/png;base64,AAAA".into(),
        created_at: OffsetDateTime::now_utc(),
    })
}

async fn cleanup(store: &FileRecordStore) {
    if let Some(dir) = store.path().parent() {
        tokio::fs::remove_dir_all(dir).await.ok();
    }
}

// =============================================================================
// read
// =============================================================================

#[tokio::test]
async fn missing_file_lists_empty() {
    let store = FileRecordStore::new(temp_store_path("missing"));
    assert_eq!(store.list().await.unwrap().total(), 0);
}

#[tokio::test]
async fn empty_file_lists_empty() {
    let store = FileRecordStore::new(temp_store_path("empty"));
    tokio::fs::create_dir_all(store.path().parent().unwrap()).await.unwrap();
    tokio::fs::write(store.path(), "  \n").await.unwrap();
    assert_eq!(store.list().await.unwrap().total(), 0);
    cleanup(&store).await;
}

#[tokio::test]
async fn malformed_file_is_replaced_on_insert() {
    let store = FileRecordStore::new(temp_store_path("malformed"));
    tokio::fs::create_dir_all(store.path().parent().unwrap()).await.unwrap();
    tokio::fs::write(store.path(), "{\"rsvps\": [oops").await.unwrap();

    assert_eq!(store.list().await.unwrap().total(), 0);
    store.insert(&rsvp("Amal")).await.unwrap();
    assert_eq!(store.list().await.unwrap().rsvps.len(), 1);
    cleanup(&store).await;
}

#[cfg(unix)]
#[tokio::test]
async fn unreadable_file_is_treated_as_empty_and_rewritten() {
    use std::os::unix::fs::PermissionsExt;

    let store = FileRecordStore::new(temp_store_path("unreadable"));
    tokio::fs::create_dir_all(store.path().parent().unwrap()).await.unwrap();
    tokio::fs::write(store.path(), "{\"rsvps\": [], \"messages\": []}").await.unwrap();
    tokio::fs::set_permissions(store.path(), std::fs::Permissions::from_mode(0o000)).await.unwrap();

    store.insert(&rsvp("Amal")).await.unwrap();

    let doc = store.list().await.unwrap();
    assert_eq!(doc.rsvps.len(), 1);
    assert_eq!(doc.rsvps[0].name, "Amal");
    cleanup(&store).await;
}

#[tokio::test]
async fn unwritable_path_fails_the_insert() {
    // A directory where the file should be reads as empty but cannot be replaced.
    let store = FileRecordStore::new(temp_store_path("isdir"));
    tokio::fs::create_dir_all(store.path().join("occupied")).await.unwrap();

    assert_eq!(store.list().await.unwrap().total(), 0);
    assert!(matches!(store.insert(&rsvp("Amal")).await, Err(StoreError::Io { .. })));
    cleanup(&store).await;
}

// =============================================================================
// insert
// =============================================================================

#[tokio::test]
async fn insert_creates_parent_dirs_and_document() {
    let store = FileRecordStore::new(temp_store_path("create"));
    store.insert(&rsvp("Amal")).await.unwrap();

    let raw = tokio::fs::read_to_string(store.path()).await.unwrap();
    let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(doc["rsvps"].as_array().unwrap().len(), 1);
    assert_eq!(doc["messages"].as_array().unwrap().len(), 0);
    assert_eq!(doc["rsvps"][0]["name"], "Amal");
    assert_eq!(doc["rsvps"][0]["favoriteSong"], "Perfect");
    assert!(doc["rsvps"][0]["createdAt"].is_string());
    cleanup(&store).await;
}

#[tokio::test]
async fn inserts_accumulate_in_both_collections() {
    let store = FileRecordStore::new(temp_store_path("accumulate"));
    store.insert(&rsvp("Amal")).await.unwrap();
    store.insert(&message("Amal")).await.unwrap();
    store.insert(&rsvp("Sami")).await.unwrap();

    let doc = store.list().await.unwrap();
    assert_eq!(doc.rsvps.len(), 2);
    assert_eq!(doc.messages.len(), 1);
    assert_eq!(doc.rsvps[0].name, "Amal");
    cleanup(&store).await;
}

#[tokio::test]
async fn rsvp_and_message_written_together_are_both_kept() {
    let store = FileRecordStore::new(temp_store_path("pair"));
    for _ in 0..20 {
        let (r, m) = (rsvp("Amal"), message("Amal"));
        let (a, b) = tokio::join!(store.insert(&r), store.insert(&m));
        a.unwrap();
        b.unwrap();
    }
    let doc = store.list().await.unwrap();
    assert_eq!(doc.rsvps.len(), 20);
    assert_eq!(doc.messages.len(), 20);
    cleanup(&store).await;
}

#[tokio::test]
async fn no_temporary_files_left_behind() {
    let store = FileRecordStore::new(temp_store_path("tmpfiles"));
    for i in 0..3 {
        store.insert(&rsvp(&format!("guest {i}"))).await.unwrap();
    }
    let dir = store.path().parent().unwrap().to_path_buf();
    let mut entries = tokio::fs::read_dir(&dir).await.unwrap();
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await.unwrap() {
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    assert_eq!(names, vec!["submissions.json".to_owned()]);
    cleanup(&store).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_inserts_through_one_store_are_all_kept() {
    let store = Arc::new(FileRecordStore::new(temp_store_path("race")));
    let writers = 16;

    let mut handles = Vec::new();
    for i in 0..writers {
        let store = store.clone();
        handles.push(tokio::spawn(async move { store.insert(&rsvp(&format!("guest {i}"))).await }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let raw = tokio::fs::read_to_string(store.path()).await.unwrap();
    let doc: StoredRecords = serde_json::from_str(&raw).unwrap();
    assert_eq!(doc.rsvps.len(), writers);
    cleanup(&store).await;
}
