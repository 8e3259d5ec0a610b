use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use synthspace_core::{cursor::CursorError, db::StoreError};

///
/// ApiError
///
/// Client-visible failures, rendered as `{"detail": ...}` with the matching
/// status code. Store internals are logged but never echoed to the client.
///

#[derive(Debug)]
pub enum ApiError {
    WorkspaceNotFound,
    BadRequest(String),
    Internal(String),
}

impl From<CursorError> for ApiError {
    fn from(err: CursorError) -> Self {
        match err {
            CursorError::MixedPagination => {
                Self::BadRequest("cursor cannot be combined with offset".to_string())
            }
            _ => Self::BadRequest("invalid cursor".to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::WorkspaceNotFound(_) => Self::WorkspaceNotFound,
            StoreError::Cursor(err) => err.into(),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            Self::WorkspaceNotFound => {
                (StatusCode::NOT_FOUND, "workspace not found".to_string())
            }
            Self::BadRequest(detail) => (StatusCode::BAD_REQUEST, detail),
            Self::Internal(detail) => {
                error!(%detail, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error".to_string(),
                )
            }
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
