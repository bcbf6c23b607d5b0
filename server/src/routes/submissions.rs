//! Guest-facing submission routes.
//!
//! Each handler validates, persists through the gateway, and only then
//! schedules the notification email. A failed notification never changes the
//! response; a failed persist on every tier returns 500 so the guest retries.

#[cfg(test)]
#[path = "submissions_test.rs"]
mod submissions_test;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use time::OffsetDateTime;
use tracing::warn;

use crate::records::{InputError, MessageInput, RsvpInput, SubmissionInput, SubmissionRecord};
use crate::services::notify::notify_in_background;
use crate::services::persistence::{PersistenceResult, Tier};
use crate::state::AppState;

pub const RETRY_MESSAGE: &str = "something went wrong, please retry";

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<Tier>,
}

/// `POST /api/rsvp`
pub async fn submit_rsvp(State(state): State<AppState>, Json(body): Json<RsvpInput>) -> Response {
    let record = match body.into_record(OffsetDateTime::now_utc()) {
        Ok(record) => SubmissionRecord::Rsvp(record),
        Err(e) => return rejected(&e),
    };
    store_one(&state, record, "rsvp received").await
}

/// `POST /api/messages`
pub async fn submit_message(State(state): State<AppState>, Json(body): Json<MessageInput>) -> Response {
    let record = match body.into_record(OffsetDateTime::now_utc()) {
        Ok(record) => SubmissionRecord::Message(record),
        Err(e) => return rejected(&e),
    };
    store_one(&state, record, "message saved").await
}

/// `POST /api/submissions` — RSVP plus optional handwritten message, written
/// concurrently. Both writes must succeed.
pub async fn submit_combined(State(state): State<AppState>, Json(body): Json<SubmissionInput>) -> Response {
    let (rsvp, message) = match body.into_records(OffsetDateTime::now_utc()) {
        Ok(records) => records,
        Err(e) => return rejected(&e),
    };
    let Some(message) = message else {
        return store_one(&state, rsvp.into(), "rsvp received").await;
    };

    let rsvp = SubmissionRecord::Rsvp(rsvp);
    let message = SubmissionRecord::Message(message);
    let (rsvp_result, message_result) = tokio::join!(state.gateway.persist(&rsvp), state.gateway.persist(&message));

    if !rsvp_result.succeeded || !message_result.succeeded {
        warn!(
            rsvp_tier = rsvp_result.tier.as_str(),
            message_tier = message_result.tier.as_str(),
            rsvp_error = rsvp_result.error.as_deref().unwrap_or(""),
            message_error = message_result.error.as_deref().unwrap_or(""),
            "combined submission incomplete"
        );
        return failed();
    }

    notify_in_background(state.notifier.clone(), rsvp);
    notify_in_background(state.notifier.clone(), message);
    stored(rsvp_result.tier.weakest(message_result.tier), "rsvp and message received")
}

async fn store_one(state: &AppState, record: SubmissionRecord, ok_message: &str) -> Response {
    let PersistenceResult { succeeded, tier, error } = state.gateway.persist(&record).await;
    if !succeeded {
        warn!(kind = record.kind(), error = error.as_deref().unwrap_or("unknown"), "submission not stored");
        return failed();
    }
    notify_in_background(state.notifier.clone(), record);
    stored(tier, ok_message)
}

pub(crate) fn input_error_to_status(err: &InputError) -> StatusCode {
    match err {
        InputError::Missing(_) => StatusCode::BAD_REQUEST,
    }
}

fn rejected(err: &InputError) -> Response {
    let body = SubmitResponse { success: false, message: err.to_string(), tier: None };
    (input_error_to_status(err), Json(body)).into_response()
}

fn failed() -> Response {
    let body = SubmitResponse { success: false, message: RETRY_MESSAGE.into(), tier: None };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

fn stored(tier: Tier, message: &str) -> Response {
    let body = SubmitResponse { success: true, message: message.into(), tier: Some(tier) };
    (StatusCode::OK, Json(body)).into_response()
}
