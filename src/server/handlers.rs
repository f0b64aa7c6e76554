use axum::body::{to_bytes, Body};
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::error::ApiError;
use super::AppState;
use crate::error::NoteStashError;

/// `{"status": ..., "message": ...}` body used by `/save` and `/ping`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBody {
    pub status: String,
    pub message: String,
}

impl StatusBody {
    pub fn new(status: &str, message: &str) -> Self {
        Self {
            status: status.to_string(),
            message: message.to_string(),
        }
    }

    pub fn saved() -> Self {
        Self::new("success", "Data saved successfully")
    }

    pub fn alive() -> Self {
        Self::new("ok", "Server is running")
    }
}

/// POST /save
///
/// The gate is held from before the body is read until both store writes
/// are done. The guard moves into the blocking write, so dropping the
/// request mid-write does not free the gate early.
pub(crate) async fn save(
    State(state): State<AppState>,
    body: Body,
) -> Result<Json<StatusBody>, ApiError> {
    let gate = state.save_gate.clone().lock_owned().await;

    let payload = to_bytes(body, state.max_body_bytes).await.map_err(|e| {
        warn!(error = %e, "failed to read save request body");
        ApiError::from_save(NoteStashError::BodyRead(e.to_string()))
    })?;

    let store = state.store.clone();
    let saved = tokio::task::spawn_blocking(move || {
        let _gate = gate;
        store.save(&payload)
    })
    .await
    .map_err(|e| ApiError::Internal {
        message: e.to_string(),
    })?;
    saved.map_err(ApiError::from_save)?;

    Ok(Json(StatusBody::saved()))
}

/// GET /load
pub(crate) async fn load(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let store = state.store.clone();
    let bytes = tokio::task::spawn_blocking(move || store.load())
        .await
        .map_err(|e| ApiError::Internal {
            message: e.to_string(),
        })?
        .map_err(ApiError::from_load)?;

    Ok(([(header::CONTENT_TYPE, "application/json")], bytes))
}

/// /ping, any method
pub(crate) async fn ping() -> Json<StatusBody> {
    Json(StatusBody::alive())
}

pub(crate) async fn save_wrong_method() -> ApiError {
    ApiError::MethodNotAllowed { allowed: "POST" }
}

pub(crate) async fn load_wrong_method() -> ApiError {
    ApiError::MethodNotAllowed { allowed: "GET" }
}
