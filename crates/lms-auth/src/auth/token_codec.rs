//! Session token codec.
//!
//! Issues and verifies HS256 JWTs signed with the process-wide secret.
//!
//! # Security
//!
//! - Tokens are size-checked BEFORE parsing (DoS prevention)
//! - Only HS256 is accepted; `alg: none` and asymmetric algorithms are rejected
//! - Verification fails closed: any parse, signature or claim problem is
//!   reported as [`TokenError::InvalidSignature`]
//! - Expiry is only reported once the signature has verified, so a forged
//!   token can never be told apart from garbage by its `exp`

use crate::auth::claims::Claims;
use crate::auth::clock::Clock;
use crate::errors::{InvalidTokenReason, LmsError};
use crate::observability::metrics::{record_token_issuance, record_token_validation};
use common::jwt::{check_token_size, validate_exp_at, validate_iat_at};
use common::secret::{ExposeSecret, SecretString};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::instrument;

/// Why a token failed to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,
}

impl From<TokenError> for InvalidTokenReason {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::InvalidSignature => InvalidTokenReason::InvalidSignature,
            TokenError::Expired => InvalidTokenReason::Expired,
        }
    }
}

/// Verified contents of a session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedToken {
    pub subject_id: String,
    pub issued_at: i64,
    pub expires_at: i64,
}

/// A freshly signed session token.
#[derive(Debug)]
pub struct IssuedToken {
    pub token: SecretString,
    pub issued_at: i64,
    pub expires_at: i64,
}

/// Issues and verifies session tokens.
///
/// Secret, lifetime and clock are injected so the codec holds no ambient
/// state; clones of the surrounding `Arc` are shared across requests.
pub struct TokenCodec {
    secret: SecretString,
    lifetime_seconds: i64,
    clock_skew: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    /// Create a codec.
    ///
    /// # Arguments
    ///
    /// * `secret` - HMAC signing secret
    /// * `lifetime_seconds` - Validity window of issued tokens
    /// * `clock_skew_seconds` - Tolerance for `iat` values in the future
    /// * `clock` - Time source for `iat`/`exp`
    pub fn new(
        secret: SecretString,
        lifetime_seconds: i64,
        clock_skew_seconds: i64,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            secret,
            lifetime_seconds,
            clock_skew: Duration::from_secs(u64::try_from(clock_skew_seconds).unwrap_or(0)),
            clock,
        }
    }

    /// Lifetime of issued tokens in seconds.
    pub fn lifetime_seconds(&self) -> i64 {
        self.lifetime_seconds
    }

    /// Sign a new token for `subject_id`.
    ///
    /// # Errors
    ///
    /// Returns `LmsError::Crypto` if signing fails.
    #[instrument(skip_all, name = "lms.auth.token.issue")]
    pub fn issue(&self, subject_id: &str) -> Result<IssuedToken, LmsError> {
        let now = self.clock.now();
        let claims = Claims {
            sub: subject_id.to_string(),
            iat: now,
            exp: now.saturating_add(self.lifetime_seconds),
        };

        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());

        let key = EncodingKey::from_secret(self.secret.expose_secret().as_bytes());
        let token = encode(&header, &claims, &key).map_err(|e| {
            record_token_issuance("error");
            LmsError::Crypto(format!("JWT signing operation failed: {}", e))
        })?;

        record_token_issuance("success");

        Ok(IssuedToken {
            token: SecretString::from(token),
            issued_at: claims.iat,
            expires_at: claims.exp,
        })
    }

    /// Verify `raw_token` and return its subject and validity window.
    ///
    /// Checks, in order: size, structure and HS256 signature, presence of
    /// `sub`/`exp`, `iat` not beyond the clock skew, `exp` after now.
    ///
    /// # Errors
    ///
    /// - `TokenError::Expired` if the signature verifies but `exp <= now`
    /// - `TokenError::InvalidSignature` for every other failure
    #[instrument(skip_all, name = "lms.auth.token.decode")]
    pub fn decode(&self, raw_token: &str) -> Result<DecodedToken, TokenError> {
        let result = self.decode_inner(raw_token);
        record_token_validation(match &result {
            Ok(_) => "success",
            Err(TokenError::InvalidSignature) => "invalid_signature",
            Err(TokenError::Expired) => "expired",
        });
        result
    }

    fn decode_inner(&self, raw_token: &str) -> Result<DecodedToken, TokenError> {
        check_token_size(raw_token).map_err(|_| TokenError::InvalidSignature)?;

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked below against the injected clock
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let key = DecodingKey::from_secret(self.secret.expose_secret().as_bytes());
        let token_data = decode::<Claims>(raw_token, &key, &validation).map_err(|e| {
            tracing::debug!(target: "lms.auth.token", error = %e, "Token verification failed");
            TokenError::InvalidSignature
        })?;
        let claims = token_data.claims;

        if claims.sub.is_empty() {
            tracing::debug!(target: "lms.auth.token", "Token rejected: empty subject");
            return Err(TokenError::InvalidSignature);
        }

        let now = self.clock.now();
        validate_iat_at(claims.iat, self.clock_skew, now)
            .map_err(|_| TokenError::InvalidSignature)?;
        validate_exp_at(claims.exp, now).map_err(|_| TokenError::Expired)?;

        Ok(DecodedToken {
            subject_id: claims.sub,
            issued_at: claims.iat,
            expires_at: claims.exp,
        })
    }
}
