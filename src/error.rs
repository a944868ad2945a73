use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// One failed check on one input field.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Every failure a handler can surface to a client.
///
/// The three token variants are distinct so the auth gate can log which check
/// failed, but they all render as the same 401 body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed")]
    Validation(Vec<FieldError>),
    #[error("email or username already in use")]
    DuplicateIdentity,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("missing Authorization header")]
    MissingToken,
    #[error("malformed Authorization header")]
    MalformedToken,
    #[error("token verification failed")]
    InvalidToken,
    #[error("record not found")]
    NotFound,
    #[error("caller does not own this record")]
    Forbidden,
    #[error("google token verification failed")]
    FederatedVerificationFailed,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if matches!(
            self,
            ApiError::MissingToken | ApiError::MalformedToken | ApiError::InvalidToken
        ) {
            warn!(reason = %self, "request rejected by auth gate");
        }
        let (status, body) = match self {
            ApiError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, json!({ "errors": errors }))
            }
            ApiError::DuplicateIdentity => (
                StatusCode::BAD_REQUEST,
                json!({ "message": "Email or username already in use" }),
            ),
            ApiError::InvalidCredentials => (
                StatusCode::BAD_REQUEST,
                json!({ "message": "Invalid credentials" }),
            ),
            ApiError::MissingToken | ApiError::MalformedToken | ApiError::InvalidToken => {
                (StatusCode::UNAUTHORIZED, json!({ "message": "Not authorized" }))
            }
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                json!({ "message": "Record not found" }),
            ),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, json!({ "message": "Access denied" })),
            ApiError::FederatedVerificationFailed => (
                StatusCode::BAD_REQUEST,
                json!({ "message": "Google token verification failed" }),
            ),
            ApiError::Internal(e) => {
                error!(error = %format!("{e:#}"), "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": "Server error" }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
