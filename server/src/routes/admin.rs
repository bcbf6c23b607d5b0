//! Admin listing routes, guarded by a bearer token.

#[cfg(test)]
#[path = "admin_test.rs"]
mod admin_test;

use axum::Json;
use axum::extract::{FromRef, FromRequestParts, State};
use axum::http::StatusCode;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use sha2::{Digest, Sha256};
use tracing::{debug, error, warn};

use super::submissions::{RETRY_MESSAGE, SubmitResponse};
use crate::records::{MessageRecord, RsvpRecord, StoredRecords};
use crate::services::csv::rsvps_to_csv;
use crate::services::persistence::StoreError;
use crate::state::AppState;

// =============================================================================
// EXTRACTOR
// =============================================================================

/// Proof that the request carried the configured admin token.
///
/// Rejects with 503 when no token is configured and 401 when the header is
/// missing or wrong.
#[derive(Debug)]
pub struct AdminAuth;

impl<S> FromRequestParts<S> for AdminAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let Some(expected) = app_state.admin_token.as_deref() else {
            return Err(StatusCode::SERVICE_UNAVAILABLE);
        };

        let TypedHeader(Authorization(bearer)) = TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
            .await
            .map_err(|_| StatusCode::UNAUTHORIZED)?;

        if !tokens_match(bearer.token(), expected) {
            warn!("admin request with wrong token");
            return Err(StatusCode::UNAUTHORIZED);
        }
        Ok(Self)
    }
}

/// Compare digests so the comparison time does not depend on the token prefix.
fn tokens_match(presented: &str, expected: &str) -> bool {
    let a = Sha256::digest(presented.as_bytes());
    let b = Sha256::digest(expected.as_bytes());
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `GET /api/messages`
pub async fn list_messages(
    State(state): State<AppState>,
    _admin: AdminAuth,
) -> Result<Json<Vec<MessageRecord>>, Response> {
    let records = load(&state).await?;
    Ok(Json(records.messages))
}

/// `GET /api/rsvps`
pub async fn list_rsvps(State(state): State<AppState>, _admin: AdminAuth) -> Result<Json<Vec<RsvpRecord>>, Response> {
    let records = load(&state).await?;
    Ok(Json(records.rsvps))
}

/// `GET /api/rsvps/download`
pub async fn download_rsvps(State(state): State<AppState>, _admin: AdminAuth) -> Result<Response, Response> {
    let records = load(&state).await?;
    Ok((
        [(CONTENT_TYPE, "text/csv; charset=utf-8"), (CONTENT_DISPOSITION, "attachment; filename=\"rsvps.csv\"")],
        rsvps_to_csv(&records.rsvps),
    )
        .into_response())
}

async fn load(state: &AppState) -> Result<StoredRecords, Response> {
    let records = state.gateway.list_all().await.map_err(|e| {
        error!(error = %e, "admin listing failed");
        let status = store_error_to_status(&e);
        (status, Json(SubmitResponse { success: false, message: RETRY_MESSAGE.into(), tier: None })).into_response()
    })?;
    debug!(rsvps = records.rsvps.len(), messages = records.messages.len(), total = records.total(), "admin listing");
    Ok(records)
}

pub(crate) fn store_error_to_status(err: &StoreError) -> StatusCode {
    match err {
        StoreError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        StoreError::Database(_) | StoreError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        StoreError::Io { .. } | StoreError::Serialize(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
