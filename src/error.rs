use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::posts::store::StoreError;
use crate::posts::validation::FieldErrors;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation failed: {0:?}")]
    Validation(FieldErrors),

    #[error("Not found: {0}")]
    NotFound(&'static str),

    #[error("Conflict: {0}")]
    Conflict(&'static str),

    #[error("Unauthorized: {0}")]
    Unauthorized(&'static str),

    #[error("Internal error: {0}")]
    Internal(StoreError),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            // The post vanished between read and write.
            StoreError::Missing(_) => AppError::NotFound(POST_NOT_FOUND),
            other => AppError::Internal(other),
        }
    }
}

pub const POST_NOT_FOUND: &str = "Post not found";
pub const COMMENT_NOT_FOUND: &str = "Comment not found";
pub const ALREADY_LIKED: &str = "User already liked this post";
pub const NOT_LIKED: &str = "User has not yet liked this post";
pub const NOT_OWNER: &str = "User not authorized";
pub const NOT_AUTHENTICATED: &str = "Unauthorized";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(fields) => {
                (StatusCode::BAD_REQUEST, Json(fields)).into_response()
            }
            AppError::NotFound(msg) => result(StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => result(StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized(msg) => result(StatusCode::UNAUTHORIZED, msg),
            AppError::Internal(e) => {
                tracing::error!("Store error: {}", e);
                result(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

fn result(status: StatusCode, msg: &str) -> Response {
    (status, Json(json!({ "result": msg }))).into_response()
}

pub type AppResult<T> = Result<T, AppError>;
