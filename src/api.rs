//! Read-only HTTP endpoints.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::state::AppState;

/// GET /api/participants
///
/// The same list the next broadcast would carry, minus movement.
pub async fn list_participants(State(state): State<AppState>) -> impl IntoResponse {
    match state.snapshot().await {
        Ok(participants) => Json(participants).into_response(),
        Err(e) => {
            tracing::error!("Participant snapshot failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, e.to_string()).into_response()
        }
    }
}

/// GET /healthz
pub async fn health() -> &'static str {
    "ok"
}
