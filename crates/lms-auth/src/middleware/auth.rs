//! Authentication gate.
//!
//! Extracts the bearer token from the `Authorization` header, verifies it
//! with the [`TokenCodec`], resolves its subject to an active account and
//! inserts the resulting [`Principal`] into request extensions. Any failure
//! terminates the request with a 401 (or 500 if the account store is down).
//!
//! The gate never writes: no refresh, no revocation, no last-seen updates.

use crate::auth::TokenCodec;
use crate::errors::{InvalidTokenReason, LmsError};
use crate::models::Principal;
use crate::observability::hash_for_correlation;
use crate::observability::metrics::record_gate_decision;
use crate::services::{PrincipalResolver, ResolveError};
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::instrument;

const GATE: &str = "authentication";

/// State for the authentication middleware.
#[derive(Clone)]
pub struct AuthState {
    pub codec: Arc<TokenCodec>,
    pub resolver: PrincipalResolver,
}

/// Extract the bearer token from request headers.
///
/// The scheme must be exactly `Bearer` followed by a single space and a
/// non-empty token containing no whitespace.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, LmsError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            tracing::debug!(target: "lms.middleware.auth", "Missing Authorization header");
            LmsError::MissingToken
        })?;

    match auth_header.strip_prefix("Bearer ") {
        Some(token) if !token.is_empty() && !token.contains(char::is_whitespace) => Ok(token),
        _ => {
            tracing::debug!(target: "lms.middleware.auth", "Invalid Authorization header format");
            Err(LmsError::MissingToken)
        }
    }
}

/// Run the authentication gate against `headers`.
///
/// # Errors
///
/// - `MissingToken` if there is no usable bearer token
/// - `InvalidToken` if the token does not verify, has expired or names no account
/// - `AccountDeactivated` if the account exists but is inactive
/// - `Database` if the account store could not be read
pub async fn authenticate(state: &AuthState, headers: &HeaderMap) -> Result<Principal, LmsError> {
    let token = extract_bearer_token(headers).inspect_err(|_| {
        record_gate_decision(GATE, "missing_token");
    })?;

    let decoded = state.codec.decode(token).map_err(|e| {
        let reason = InvalidTokenReason::from(e);
        tracing::debug!(target: "lms.middleware.auth", reason = %reason, "Token rejected");
        record_gate_decision(GATE, reason.as_str());
        LmsError::InvalidToken(reason)
    })?;

    let account_ref = hash_for_correlation(&decoded.subject_id);

    let account = state
        .resolver
        .resolve(&decoded.subject_id)
        .await
        .map_err(|e| match e {
            ResolveError::NotFound => {
                tracing::info!(
                    target: "lms.middleware.auth",
                    account = %account_ref,
                    "Token subject has no account"
                );
                record_gate_decision(GATE, InvalidTokenReason::UnknownSubject.as_str());
                LmsError::InvalidToken(InvalidTokenReason::UnknownSubject)
            }
            ResolveError::Deactivated => {
                tracing::info!(
                    target: "lms.middleware.auth",
                    account = %account_ref,
                    "Token subject is deactivated"
                );
                record_gate_decision(GATE, "deactivated");
                LmsError::AccountDeactivated
            }
            ResolveError::Store(detail) => {
                tracing::warn!(
                    target: "lms.middleware.auth",
                    account = %account_ref,
                    "Account store unavailable during authentication"
                );
                record_gate_decision(GATE, "store_error");
                LmsError::Database(detail)
            }
        })?;

    tracing::debug!(
        target: "lms.middleware.auth",
        account = %account_ref,
        role = %account.role,
        "Request authenticated"
    );
    record_gate_decision(GATE, "success");

    Ok(Principal::from(&account))
}

/// Authentication middleware.
///
/// # Response
///
/// - Returns 401 Unauthorized if the token is missing, invalid, expired or
///   names an unknown or deactivated account
/// - Returns 500 if the account store fails
/// - Continues to next handler with `Principal` in extensions otherwise
#[instrument(skip_all, name = "lms.middleware.auth")]
pub async fn require_auth(
    State(state): State<Arc<AuthState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, LmsError> {
    tracing::trace!(target: "lms.middleware.auth", path = %req.uri().path(), "Authenticating request");

    let principal = authenticate(&state, req.headers()).await?;

    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}

/// Extension trait for reading the authenticated principal from a request.
pub trait PrincipalExt {
    /// Returns `None` if the authentication gate did not run for this request.
    fn principal(&self) -> Option<&Principal>;
}

impl<B> PrincipalExt for axum::http::Request<B> {
    fn principal(&self) -> Option<&Principal> {
        self.extensions().get::<Principal>()
    }
}
