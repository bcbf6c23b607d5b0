//! Postgres primary store.

use sqlx::{PgPool, Row};

use super::persistence::{RecordStore, StoreError};
use crate::records::{MessageRecord, RsvpRecord, StoredRecords, SubmissionRecord};

pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl RecordStore for PgRecordStore {
    fn name(&self) -> &'static str {
        "postgres"
    }

    async fn insert(&self, record: &SubmissionRecord) -> Result<(), StoreError> {
        match record {
            SubmissionRecord::Rsvp(r) => {
                sqlx::query(
                    r"INSERT INTO rsvps (id, name, favorite_song, is_attending, message_image_ref, created_at)
                      VALUES ($1, $2, $3, $4, $5, $6)",
                )
                .bind(r.id)
                .bind(&r.name)
                .bind(&r.favorite_song)
                .bind(r.is_attending)
                .bind(r.message_image_ref)
                .bind(r.created_at)
                .execute(&self.pool)
                .await?;
            }
            SubmissionRecord::Message(m) => {
                sqlx::query("INSERT INTO messages (id, name, message, created_at) VALUES ($1, $2, $3, $4)")
                    .bind(m.id)
                    .bind(&m.name)
                    .bind(&m.message)
                    .bind(m.created_at)
                    .execute(&self.pool)
                    .await?;
            }
        }
        Ok(())
    }

    async fn list(&self) -> Result<StoredRecords, StoreError> {
        let rsvp_rows = sqlx::query(
            "SELECT id, name, favorite_song, is_attending, message_image_ref, created_at FROM rsvps ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;
        let message_rows = sqlx::query("SELECT id, name, message, created_at FROM messages ORDER BY created_at")
            .fetch_all(&self.pool)
            .await?;

        let rsvps = rsvp_rows
            .iter()
            .map(|r| RsvpRecord {
                id: r.get("id"),
                name: r.get("name"),
                favorite_song: r.get("favorite_song"),
                is_attending: r.get("is_attending"),
                message_image_ref: r.get("message_image_ref"),
                created_at: r.get("created_at"),
            })
            .collect();
        let messages = message_rows
            .iter()
            .map(|r| MessageRecord {
                id: r.get("id"),
                name: r.get("name"),
                message: r.get("message"),
                created_at: r.get("created_at"),
            })
            .collect();

        Ok(StoredRecords { rsvps, messages })
    }
}
