//! Session endpoints: login, current principal, logout.

use crate::errors::LmsError;
use crate::models::{LoginRequest, LoginResponse, MeResponse, MessageResponse, Principal};
use crate::routes::AppState;
use crate::services::login_service;
use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use common::secret::ExposeSecret;
use std::sync::Arc;
use tracing::instrument;

/// Handle login.
///
/// POST /api/v1/auth/login
///
/// Malformed JSON bodies are answered with `BAD_REQUEST` in the standard
/// error shape rather than axum's plain-text rejection.
#[instrument(skip_all, name = "lms.handlers.auth.login")]
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, LmsError> {
    let Json(payload) = payload.map_err(|e| {
        tracing::debug!(target: "lms.handlers.auth", error = %e, "Rejected login body");
        LmsError::BadRequest("Email and password are required".to_string())
    })?;

    let outcome = login_service::login(
        state.store.as_ref(),
        &state.codec,
        &payload.email,
        &payload.password,
    )
    .await?;

    Ok(Json(LoginResponse {
        success: true,
        token: outcome.token.token.expose_secret().to_string(),
        token_type: "Bearer".to_string(),
        expires_in: state.codec.lifetime_seconds(),
        user: outcome.principal,
    }))
}

/// Return the authenticated principal.
///
/// GET /api/v1/auth/me
#[instrument(skip_all, name = "lms.handlers.auth.me")]
pub async fn me(Extension(principal): Extension<Principal>) -> Json<MeResponse> {
    Json(MeResponse {
        success: true,
        user: principal,
    })
}

/// Acknowledge logout.
///
/// POST /api/v1/auth/logout
///
/// Sessions are stateless; the client discards its token.
#[instrument(skip_all, name = "lms.handlers.auth.logout")]
pub async fn logout(Extension(_principal): Extension<Principal>) -> Json<MessageResponse> {
    tracing::debug!(target: "lms.handlers.auth", "Logout acknowledged");
    Json(MessageResponse {
        success: true,
        message: "Logged out successfully".to_string(),
    })
}
