//! Email notifications for new submissions.
//!
//! DESIGN
//! ======
//! Composing an email is pure and tested directly; delivery sits behind the
//! [`Notifier`] trait with a Resend implementation. Routes hand a stored
//! record to [`notify_in_background`], which composes and sends on a spawned
//! task, so delivery latency and failures never reach the guest's response.

#[cfg(test)]
#[path = "notify_test.rs"]
mod notify_test;

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use resend_rs::Resend;
use resend_rs::types::{CreateAttachment, CreateEmailBaseOptions};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::config::NotifyConfig;
use crate::records::{MessageRecord, PNG_DATA_URL_PREFIX, RsvpRecord, SubmissionRecord};

const RSVP_TEMPLATE: &str = include_str!("../../templates/rsvp.html");
const HANDWRITTEN_TEMPLATE: &str = include_str!("../../templates/handwritten.html");
const MESSAGE_TEMPLATE: &str = include_str!("../../templates/message.html");

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("email delivery failed: {0}")]
    Delivery(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub content: Vec<u8>,
}

/// A composed notification, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub subject: String,
    pub html: String,
    pub attachment: Option<Attachment>,
}

#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, email: Email) -> Result<(), NotifyError>;
}

pub struct ResendNotifier {
    client: Resend,
    from: String,
    to: String,
}

impl ResendNotifier {
    #[must_use]
    pub fn new(config: &NotifyConfig) -> Self {
        Self { client: Resend::new(&config.api_key), from: config.from.clone(), to: config.to.clone() }
    }
}

#[async_trait::async_trait]
impl Notifier for ResendNotifier {
    async fn send(&self, email: Email) -> Result<(), NotifyError> {
        let mut options =
            CreateEmailBaseOptions::new(&self.from, [self.to.as_str()], &email.subject).with_html(&email.html);
        if let Some(attachment) = email.attachment {
            options = options
                .with_attachment(CreateAttachment::from_content(attachment.content).with_filename(&attachment.filename));
        }
        self.client
            .emails
            .send(options)
            .await
            .map_err(|e| NotifyError::Delivery(e.to_string()))?;
        Ok(())
    }
}

/// Compose and send the notification for `record` on a background task.
/// Does nothing when notifications are not configured.
pub fn notify_in_background(notifier: Option<Arc<dyn Notifier>>, record: SubmissionRecord) {
    let Some(notifier) = notifier else {
        return;
    };
    tokio::spawn(async move {
        let email = compose(&record);
        match notifier.send(email).await {
            Ok(()) => info!(kind = record.kind(), id = %record.id(), "notification sent"),
            Err(e) => warn!(error = %e, kind = record.kind(), id = %record.id(), "notification failed"),
        }
    });
}

/// Build the email for a stored record.
#[must_use]
pub fn compose(record: &SubmissionRecord) -> Email {
    match record {
        SubmissionRecord::Rsvp(r) => compose_rsvp(r),
        SubmissionRecord::Message(m) => compose_message(m),
    }
}

fn compose_rsvp(r: &RsvpRecord) -> Email {
    let song = if r.favorite_song.is_empty() { "-" } else { r.favorite_song.as_str() };
    let html = RSVP_TEMPLATE
        .replace("{{NAME}}", &escape_html(&r.name))
        .replace("{{ATTENDING}}", if r.is_attending { "Yes" } else { "No" })
        .replace("{{SONG}}", &escape_html(song))
        .replace("{{CREATED_AT}}", &timestamp(r.created_at));
    let subject = if r.is_attending {
        format!("New RSVP: {} is attending", r.name)
    } else {
        format!("New RSVP: {} can't make it", r.name)
    };
    Email { subject, html, attachment: None }
}

fn compose_message(m: &MessageRecord) -> Email {
    if m.is_handwritten() {
        if let Some(png) = decode_png(&m.message) {
            let filename = format!("message-{}.png", m.id);
            let html = HANDWRITTEN_TEMPLATE
                .replace("{{NAME}}", &escape_html(&m.name))
                .replace("{{FILENAME}}", &filename)
                .replace("{{CREATED_AT}}", &timestamp(m.created_at));
            return Email {
                subject: format!("New handwritten message from {}", m.name),
                html,
                attachment: Some(Attachment { filename, content: png }),
            };
        }
    }
    let html = MESSAGE_TEMPLATE
        .replace("{{NAME}}", &escape_html(&m.name))
        .replace("{{MESSAGE}}", &escape_html(&m.message))
        .replace("{{CREATED_AT}}", &timestamp(m.created_at));
    Email { subject: format!("New message from {}", m.name), html, attachment: None }
}

/// PNG bytes of a `data:image/png;base64,...` message, if it is one.
fn decode_png(message: &str) -> Option<Vec<u8>> {
    let payload = message.strip_prefix(PNG_DATA_URL_PREFIX)?;
    match STANDARD.decode(payload) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            warn!(error = %e, "handwritten message is not valid base64; sending as text");
            None
        }
    }
}

fn timestamp(at: OffsetDateTime) -> String {
    at.format(&Rfc3339).unwrap_or_default()
}

/// Escape text for interpolation into an HTML template.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
