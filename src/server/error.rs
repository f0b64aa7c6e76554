//! HTTP-facing errors and their status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::error::NoteStashError;

/// Every non-success outcome a route can produce.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Only {allowed} method is allowed")]
    MethodNotAllowed { allowed: &'static str },

    #[error("Error reading request body")]
    BodyUnreadable,

    #[error("No saved data found")]
    NotFound,

    #[error("Error saving to data.txt: {message}")]
    SaveFailed { message: String },

    #[error("Error reading saved data: {message}")]
    LoadFailed { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::BodyUnreadable => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::SaveFailed { .. }
            | ApiError::LoadFailed { .. }
            | ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Map a store error raised while saving.
    pub fn from_save(err: NoteStashError) -> Self {
        match err {
            NoteStashError::BodyRead(_) => ApiError::BodyUnreadable,
            NoteStashError::Io(e) => ApiError::SaveFailed {
                message: e.to_string(),
            },
            other => ApiError::Internal {
                message: other.to_string(),
            },
        }
    }

    /// Map a store error raised while loading.
    pub fn from_load(err: NoteStashError) -> Self {
        match err {
            NoteStashError::StoreMissing => ApiError::NotFound,
            NoteStashError::Io(e) => ApiError::LoadFailed {
                message: e.to_string(),
            },
            other => ApiError::Internal {
                message: other.to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // newline-terminated plain text
        (self.status_code(), format!("{}\n", self)).into_response()
    }
}
