//! Builder for hand-made session tokens.
//!
//! Lets tests produce tokens the service would never issue: signed with the
//! wrong secret, already expired, missing claims, or unsigned.

use crate::test_ids::TEST_JWT_SECRET;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Map, Value};
use uuid::Uuid;

/// Builder for test session tokens.
///
/// # Example
/// ```rust,ignore
/// let expired = TestTokenBuilder::new()
///     .for_account(TEST_STUDENT_ID)
///     .expired()
///     .sign();
/// ```
pub struct TestTokenBuilder {
    sub: Option<String>,
    iat: i64,
    exp: Option<i64>,
    secret: String,
}

impl TestTokenBuilder {
    /// Token for a random subject, valid for one hour, signed with the test secret.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            sub: Some(Uuid::new_v4().to_string()),
            iat: now.timestamp(),
            exp: Some((now + Duration::seconds(3600)).timestamp()),
            secret: TEST_JWT_SECRET.to_string(),
        }
    }

    pub fn for_account(mut self, id: Uuid) -> Self {
        self.sub = Some(id.to_string());
        self
    }

    /// Use an arbitrary subject string.
    pub fn for_subject(mut self, subject: &str) -> Self {
        self.sub = Some(subject.to_string());
        self
    }

    pub fn without_subject(mut self) -> Self {
        self.sub = None;
        self
    }

    /// Set expiration in seconds from now (negative for the past).
    pub fn expires_in(mut self, seconds: i64) -> Self {
        self.exp = Some((Utc::now() + Duration::seconds(seconds)).timestamp());
        self
    }

    /// Issued two hours ago, expired one hour ago.
    pub fn expired(mut self) -> Self {
        let now = Utc::now();
        self.iat = (now - Duration::seconds(7200)).timestamp();
        self.exp = Some((now - Duration::seconds(3600)).timestamp());
        self
    }

    pub fn without_expiry(mut self) -> Self {
        self.exp = None;
        self
    }

    /// Set issued-at timestamp
    pub fn issued_at(mut self, timestamp: i64) -> Self {
        self.iat = timestamp;
        self
    }

    pub fn signed_with(mut self, secret: &str) -> Self {
        self.secret = secret.to_string();
        self
    }

    /// Build the claims as a JSON value.
    pub fn claims(&self) -> Value {
        let mut claims = Map::new();
        if let Some(sub) = &self.sub {
            claims.insert("sub".to_string(), json!(sub));
        }
        claims.insert("iat".to_string(), json!(self.iat));
        if let Some(exp) = self.exp {
            claims.insert("exp".to_string(), json!(exp));
        }
        Value::Object(claims)
    }

    /// Sign the claims with HS256.
    pub fn sign(self) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            &self.claims(),
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .expect("signing test token")
    }

    /// Encode the claims with `alg: none` and an empty signature.
    pub fn unsigned(self) -> String {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(self.claims().to_string());
        format!("{header}.{payload}.")
    }
}

impl Default for TestTokenBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Replace the payload of `token` with `claims`, keeping header and signature.
pub fn tamper_payload(token: &str, claims: &Value) -> String {
    let parts: Vec<&str> = token.split('.').collect();
    assert_eq!(parts.len(), 3, "expected a three-part JWT");
    format!(
        "{}.{}.{}",
        parts[0],
        URL_SAFE_NO_PAD.encode(claims.to_string()),
        parts[2]
    )
}
