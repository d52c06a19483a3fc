//! Password login.
//!
//! Verifies an email/password pair against the account store and issues a
//! session token for the account.

use crate::auth::{IssuedToken, TokenCodec};
use crate::errors::LmsError;
use crate::models::Principal;
use crate::observability::hash_for_correlation;
use crate::observability::metrics::record_login;
use crate::repositories::AccountStore;
use common::secret::{ExposeSecret, SecretString};
use tracing::instrument;

/// Default bcrypt cost for stored password hashes.
pub const DEFAULT_BCRYPT_COST: u32 = 12;

/// Minimum bcrypt cost accepted by [`hash_password`].
pub const MIN_BCRYPT_COST: u32 = 4;

/// Maximum bcrypt cost accepted by [`hash_password`].
pub const MAX_BCRYPT_COST: u32 = 31;

/// Verified against when the email is unknown so both paths cost one bcrypt
/// verification.
const DUMMY_PASSWORD_HASH: &str = "$2b$12$LQv3c1yqBWVHxkd0LHAkCOYz6TtxMQJqhN8/LewY5GyYqExt7YD3a";

/// Result of a successful login.
#[derive(Debug)]
pub struct LoginOutcome {
    pub principal: Principal,
    pub token: IssuedToken,
}

/// Hash a password with bcrypt.
///
/// # Errors
///
/// Returns `LmsError::Crypto` if `cost` is outside
/// `MIN_BCRYPT_COST..=MAX_BCRYPT_COST` or hashing fails.
#[instrument(skip_all)]
pub fn hash_password(password: &str, cost: u32) -> Result<String, LmsError> {
    if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&cost) {
        return Err(LmsError::Crypto(format!(
            "Invalid bcrypt cost: {} (must be {}-{})",
            cost, MIN_BCRYPT_COST, MAX_BCRYPT_COST
        )));
    }

    bcrypt::hash(password, cost)
        .map_err(|e| LmsError::Crypto(format!("Password hashing failed: {}", e)))
}

/// Verify a password against a bcrypt hash.
#[instrument(skip_all)]
pub fn verify_password(password: &str, hash: &str) -> Result<bool, LmsError> {
    bcrypt::verify(password, hash)
        .map_err(|e| LmsError::Crypto(format!("Password verification failed: {}", e)))
}

/// Authenticate `email`/`password` and issue a session token.
///
/// Unknown emails and wrong passwords both yield `InvalidCredentials`. An
/// inactive account is only reported as such once its password has been
/// verified.
#[instrument(skip_all, name = "lms.services.login")]
pub async fn login(
    store: &dyn AccountStore,
    codec: &TokenCodec,
    email: &str,
    password: &SecretString,
) -> Result<LoginOutcome, LmsError> {
    let email = email.trim();
    if email.is_empty() || password.expose_secret().is_empty() {
        record_login("bad_request");
        return Err(LmsError::BadRequest(
            "Email and password are required".to_string(),
        ));
    }

    let credentials = store.find_credentials_by_email(email).await?;

    let hash_to_verify = match &credentials {
        Some(c) => c.password_hash.clone(),
        None => DUMMY_PASSWORD_HASH.to_string(),
    };

    // bcrypt is CPU-bound; keep it off the async workers
    let candidate = SecretString::from(password.expose_secret());
    let is_valid = tokio::task::spawn_blocking(move || {
        verify_password(candidate.expose_secret(), &hash_to_verify)
    })
    .await
    .map_err(|e| {
        tracing::error!(target: "lms.services.login", error = %e, "Password verification task failed");
        LmsError::Internal
    })??;

    let Some(credentials) = credentials else {
        record_login("invalid_credentials");
        return Err(LmsError::InvalidCredentials);
    };

    let account = credentials.account;
    let account_ref = hash_for_correlation(&account.id.to_string());

    if !is_valid {
        tracing::info!(
            target: "lms.services.login",
            account = %account_ref,
            "Login rejected: wrong password"
        );
        record_login("invalid_credentials");
        return Err(LmsError::InvalidCredentials);
    }

    if !account.is_active {
        tracing::info!(
            target: "lms.services.login",
            account = %account_ref,
            "Login rejected: account deactivated"
        );
        record_login("deactivated");
        return Err(LmsError::AccountDeactivated);
    }

    let token = codec.issue(&account.id.to_string())?;

    tracing::info!(
        target: "lms.services.login",
        account = %account_ref,
        role = %account.role,
        "Login succeeded"
    );
    record_login("success");

    Ok(LoginOutcome {
        principal: Principal::from(&account),
        token,
    })
}
