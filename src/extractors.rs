use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::request::Parts;
use axum::http::{header, HeaderMap};

use crate::error::{AppError, NOT_AUTHENTICATED};
use crate::posts::validation::{parse_post_input, FieldErrors};
use crate::posts::PostInput;
use crate::state::AppState;

/// Represents the currently authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: String,
    pub name: Option<String>,
    pub avatar: Option<String>,
}

/// Extractor that requires a valid bearer token.
/// Rejects with 401 before the handler (and so the store) is reached.
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token =
            extract_bearer_token(parts).ok_or(AppError::Unauthorized(NOT_AUTHENTICATED))?;

        state.auth.authenticate(token).map_err(|e| {
            tracing::debug!("Rejected bearer token: {}", e);
            AppError::Unauthorized(NOT_AUTHENTICATED)
        })
    }
}

fn extract_bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Post or comment payload. Every malformed body becomes a 400 field map
/// instead of the framework's plain-text rejection.
///
/// A body sent without a JSON content type is read as `{}`.
#[derive(Debug, Clone)]
pub struct PostPayload(pub PostInput);

impl<S> FromRequest<S> for PostPayload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !has_json_content_type(req.headers()) {
            return Ok(PostPayload(PostInput::default()));
        }

        let body = Bytes::from_request(req, state).await.map_err(|e| {
            tracing::debug!("Failed to read request body: {}", e);
            let mut errors = FieldErrors::new();
            errors.insert("body".to_string(), "Request body could not be read".to_string());
            AppError::Validation(errors)
        })?;

        parse_post_input(&body)
            .map(PostPayload)
            .map_err(AppError::Validation)
    }
}

fn has_json_content_type(headers: &HeaderMap) -> bool {
    let Some(value) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };
    let essence = value.split(';').next().unwrap_or_default().trim();
    let Some((kind, subtype)) = essence.split_once('/') else {
        return false;
    };
    let subtype = subtype.to_ascii_lowercase();
    kind.eq_ignore_ascii_case("application") && (subtype == "json" || subtype.ends_with("+json"))
}
