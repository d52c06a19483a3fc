//! LMS auth error types.
//!
//! All errors map to HTTP status codes via the `IntoResponse` impl. The body
//! always has the shape:
//!
//! ```json
//! { "success": false, "message": "...", "error": { "code": "INVALID_TOKEN", "reason": "expired" } }
//! ```
//!
//! Clients branch on `error.code` (and `error.reason` for token failures); the
//! message is for humans. Internal failures are logged server-side and answered
//! with a generic message.

use crate::models::Role;
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Why a bearer token was rejected.
///
/// Surfaced to clients as `error.reason` so a frontend can tell a stale
/// session (`expired`) apart from a forged or stale-subject token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidTokenReason {
    /// Signature did not verify, or the token was malformed.
    InvalidSignature,
    /// Signature verified but `exp` has passed.
    Expired,
    /// Signature verified but the subject no longer exists.
    UnknownSubject,
}

impl InvalidTokenReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvalidTokenReason::InvalidSignature => "invalid_signature",
            InvalidTokenReason::Expired => "expired",
            InvalidTokenReason::UnknownSubject => "unknown_subject",
        }
    }
}

impl fmt::Display for InvalidTokenReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// LMS auth error type.
///
/// Maps to HTTP status codes:
/// - MissingToken, InvalidToken, AccountDeactivated, Unauthenticated,
///   InvalidCredentials: 401 Unauthorized
/// - Forbidden: 403 Forbidden
/// - BadRequest: 400, NotFound: 404
/// - Database, Crypto, Internal: 500 Internal Server Error
#[derive(Debug, Error)]
pub enum LmsError {
    #[error("Missing or malformed Authorization header")]
    MissingToken,

    #[error("Invalid token: {0}")]
    InvalidToken(InvalidTokenReason),

    #[error("Account deactivated")]
    AccountDeactivated,

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Forbidden: role '{role}' is not permitted")]
    Forbidden { role: Role },

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cryptographic error: {0}")]
    Crypto(String),

    #[error("Internal server error")]
    Internal,
}

impl LmsError {
    /// Returns the HTTP status code for this error (for metrics recording).
    pub fn status_code(&self) -> u16 {
        match self {
            LmsError::MissingToken
            | LmsError::InvalidToken(_)
            | LmsError::AccountDeactivated
            | LmsError::Unauthenticated
            | LmsError::InvalidCredentials => 401,
            LmsError::Forbidden { .. } => 403,
            LmsError::BadRequest(_) => 400,
            LmsError::NotFound(_) => 404,
            LmsError::Database(_) | LmsError::Crypto(_) | LmsError::Internal => 500,
        }
    }

    /// Stable machine-readable code carried in `error.code`.
    pub fn code(&self) -> &'static str {
        match self {
            LmsError::MissingToken => "MISSING_TOKEN",
            LmsError::InvalidToken(_) => "INVALID_TOKEN",
            LmsError::AccountDeactivated => "ACCOUNT_DEACTIVATED",
            LmsError::Unauthenticated => "UNAUTHENTICATED",
            LmsError::Forbidden { .. } => "FORBIDDEN",
            LmsError::InvalidCredentials => "INVALID_CREDENTIALS",
            LmsError::BadRequest(_) => "BAD_REQUEST",
            LmsError::NotFound(_) => "NOT_FOUND",
            LmsError::Database(_) | LmsError::Crypto(_) | LmsError::Internal => "INTERNAL_ERROR",
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    message: String,
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<InvalidTokenReason>,
}

impl IntoResponse for LmsError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let (message, reason) = match &self {
            LmsError::MissingToken => ("Access denied. No token provided.".to_string(), None),
            LmsError::InvalidToken(reason) => {
                let message = match reason {
                    InvalidTokenReason::Expired => "Token has expired",
                    InvalidTokenReason::InvalidSignature | InvalidTokenReason::UnknownSubject => {
                        "Invalid token"
                    }
                };
                (message.to_string(), Some(*reason))
            }
            LmsError::AccountDeactivated => ("Account has been deactivated".to_string(), None),
            LmsError::Unauthenticated => ("Authentication required".to_string(), None),
            LmsError::Forbidden { role } => (
                format!("User role '{role}' is not authorized to access this resource"),
                None,
            ),
            LmsError::InvalidCredentials => ("Invalid email or password".to_string(), None),
            LmsError::BadRequest(reason) => (reason.clone(), None),
            LmsError::NotFound(resource) => (resource.clone(), None),
            LmsError::Database(err) => {
                // Log actual error server-side, return generic message to client
                tracing::error!(target: "lms.database", error = %err, "Database operation failed");
                ("An internal error occurred".to_string(), None)
            }
            LmsError::Crypto(err) => {
                tracing::error!(target: "lms.crypto", error = %err, "Cryptographic operation failed");
                ("An internal error occurred".to_string(), None)
            }
            LmsError::Internal => ("An internal error occurred".to_string(), None),
        };

        let body = ErrorResponse {
            success: false,
            message,
            error: ErrorDetail {
                code: self.code(),
                reason,
            },
        };

        let mut response = (status, Json(body)).into_response();

        if status == StatusCode::UNAUTHORIZED {
            let challenge = match self {
                LmsError::InvalidToken(_) | LmsError::AccountDeactivated => {
                    "Bearer realm=\"lms-api\", error=\"invalid_token\""
                }
                _ => "Bearer realm=\"lms-api\"",
            };
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static(challenge));
        }

        response
    }
}

/// Convert sqlx errors to LmsError
impl From<sqlx::Error> for LmsError {
    fn from(err: sqlx::Error) -> Self {
        LmsError::Database(err.to_string())
    }
}
