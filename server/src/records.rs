//! Submission records and request validation.
//!
//! DESIGN
//! ======
//! Request bodies deserialize into permissive `*Input` structs (every field
//! optional) so a missing field becomes an [`InputError`] naming it, instead
//! of a generic JSON rejection. Validation produces the immutable records the
//! persistence gateway stores; ids and `created_at` are assigned here, on the
//! server, never taken from the client.

#[cfg(test)]
#[path = "records_test.rs"]
mod records_test;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

// =============================================================================
// RECORDS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpRecord {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub favorite_song: String,
    pub is_attending: bool,
    /// Id of the handwritten message submitted with this RSVP, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_image_ref: Option<Uuid>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRecord {
    pub id: Uuid,
    pub name: String,
    /// Plain text, or a `data:image/png;base64,...` URL for a handwritten note.
    pub message: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl MessageRecord {
    #[must_use]
    pub fn is_handwritten(&self) -> bool {
        self.message.starts_with(PNG_DATA_URL_PREFIX)
    }
}

/// Anything the persistence gateway can store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionRecord {
    Rsvp(RsvpRecord),
    Message(MessageRecord),
}

impl SubmissionRecord {
    #[must_use]
    pub fn id(&self) -> Uuid {
        match self {
            Self::Rsvp(r) => r.id,
            Self::Message(m) => m.id,
        }
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Rsvp(_) => "rsvp",
            Self::Message(_) => "message",
        }
    }
}

impl From<RsvpRecord> for SubmissionRecord {
    fn from(value: RsvpRecord) -> Self {
        Self::Rsvp(value)
    }
}

impl From<MessageRecord> for SubmissionRecord {
    fn from(value: MessageRecord) -> Self {
        Self::Message(value)
    }
}

/// Both collections, in the shape of the fallback JSON document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecords {
    #[serde(default)]
    pub rsvps: Vec<RsvpRecord>,
    #[serde(default)]
    pub messages: Vec<MessageRecord>,
}

impl StoredRecords {
    pub fn push(&mut self, record: SubmissionRecord) {
        match record {
            SubmissionRecord::Rsvp(r) => self.rsvps.push(r),
            SubmissionRecord::Message(m) => self.messages.push(m),
        }
    }

    /// Append `other`, skipping ids already present, then order by `created_at`.
    pub fn merge(&mut self, other: StoredRecords) {
        for r in other.rsvps {
            if !self.rsvps.iter().any(|x| x.id == r.id) {
                self.rsvps.push(r);
            }
        }
        for m in other.messages {
            if !self.messages.iter().any(|x| x.id == m.id) {
                self.messages.push(m);
            }
        }
        self.sort();
    }

    pub fn sort(&mut self) {
        self.rsvps.sort_by_key(|r| r.created_at);
        self.messages.sort_by_key(|m| m.created_at);
    }

    /// Number of records across both collections.
    #[must_use]
    pub fn total(&self) -> usize {
        self.rsvps.len() + self.messages.len()
    }
}

// =============================================================================
// INPUT
// =============================================================================

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InputError {
    #[error("please fill in {0}")]
    Missing(&'static str),
}

/// `POST /api/rsvp` body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub favorite_song: Option<String>,
    #[serde(default)]
    pub is_attending: Option<bool>,
}

impl RsvpInput {
    /// Validate and stamp into a record.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::Missing`] for a blank name or no attendance choice.
    pub fn into_record(self, now: OffsetDateTime) -> Result<RsvpRecord, InputError> {
        let name = required(self.name, "name")?;
        let is_attending = self.is_attending.ok_or(InputError::Missing("attendance"))?;
        Ok(RsvpRecord {
            id: Uuid::new_v4(),
            name,
            favorite_song: self.favorite_song.map(|s| s.trim().to_owned()).unwrap_or_default(),
            is_attending,
            message_image_ref: None,
            created_at: now,
        })
    }
}

/// `POST /api/messages` body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl MessageInput {
    /// # Errors
    ///
    /// Returns [`InputError::Missing`] for a blank name or message.
    pub fn into_record(self, now: OffsetDateTime) -> Result<MessageRecord, InputError> {
        let name = required(self.name, "name")?;
        let message = required(self.message, "message")?;
        Ok(MessageRecord { id: Uuid::new_v4(), name, message, created_at: now })
    }
}

/// `POST /api/submissions` body: an RSVP with an optional handwritten note.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub favorite_song: Option<String>,
    #[serde(default)]
    pub is_attending: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
}

impl SubmissionInput {
    /// Split into the RSVP and, when a message was drawn, the message record
    /// it references.
    ///
    /// # Errors
    ///
    /// Same as [`RsvpInput::into_record`].
    pub fn into_records(self, now: OffsetDateTime) -> Result<(RsvpRecord, Option<MessageRecord>), InputError> {
        let rsvp = RsvpInput { name: self.name, favorite_song: self.favorite_song, is_attending: self.is_attending };
        let mut rsvp = rsvp.into_record(now)?;
        let message = self
            .message
            .filter(|m| !m.trim().is_empty())
            .map(|message| MessageRecord { id: Uuid::new_v4(), name: rsvp.name.clone(), message, created_at: now });
        rsvp.message_image_ref = message.as_ref().map(|m| m.id);
        Ok((rsvp, message))
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, InputError> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .ok_or(InputError::Missing(field))
}
