//! Custom test assertions for expressive tests.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct JwtHeader {
    alg: String,
    typ: String,
}

#[derive(Debug, Deserialize)]
struct JwtClaims {
    sub: String,
    iat: i64,
    exp: i64,
}

fn decode_part<T: for<'de> Deserialize<'de>>(token: &str, index: usize) -> T {
    let part = token
        .split('.')
        .nth(index)
        .unwrap_or_else(|| panic!("JWT has no part {index}"));
    let bytes = URL_SAFE_NO_PAD
        .decode(part)
        .unwrap_or_else(|e| panic!("Failed to base64 decode JWT part {index}: {e}"));
    serde_json::from_slice(&bytes)
        .unwrap_or_else(|e| panic!("Failed to parse JWT part {index} as JSON: {e}"))
}

/// Assertions on issued session tokens.
///
/// # Example
/// ```rust,ignore
/// token
///     .assert_valid_jwt()
///     .assert_for_subject(&TEST_STUDENT_ID.to_string())
///     .assert_expires_in(604_800);
/// ```
pub trait TokenAssertions {
    /// Three parts, HS256 header, `sub`/`iat`/`exp` claims.
    fn assert_valid_jwt(&self) -> &Self;

    fn assert_for_subject(&self, subject: &str) -> &Self;

    /// `exp - iat` equals `seconds`.
    fn assert_expires_in(&self, seconds: i64) -> &Self;
}

impl TokenAssertions for String {
    fn assert_valid_jwt(&self) -> &Self {
        assert_eq!(
            self.split('.').count(),
            3,
            "JWT must have 3 parts (header.payload.signature)"
        );

        let header: JwtHeader = decode_part(self, 0);
        assert_eq!(header.alg, "HS256", "Expected HS256 algorithm");
        assert_eq!(header.typ, "JWT", "Expected JWT type");

        let _: JwtClaims = decode_part(self, 1);
        self
    }

    fn assert_for_subject(&self, subject: &str) -> &Self {
        let claims: JwtClaims = decode_part(self, 1);
        assert_eq!(claims.sub, subject, "Token subject mismatch");
        self
    }

    fn assert_expires_in(&self, seconds: i64) -> &Self {
        let claims: JwtClaims = decode_part(self, 1);
        assert_eq!(
            claims.exp - claims.iat,
            seconds,
            "Token lifetime mismatch"
        );
        self
    }
}

/// Assertions on the `{ success, message, error: { code, reason } }` body.
pub trait ErrorBodyAssertions {
    /// `success` is false and `error.code` equals `code`.
    fn assert_error_code(&self, code: &str) -> &Self;

    fn assert_error_reason(&self, reason: &str) -> &Self;

    fn assert_message(&self, message: &str) -> &Self;
}

impl ErrorBodyAssertions for Value {
    fn assert_error_code(&self, code: &str) -> &Self {
        assert_eq!(self["success"], false, "Expected success=false in {self}");
        assert_eq!(
            self["error"]["code"], code,
            "Unexpected error code in {self}"
        );
        self
    }

    fn assert_error_reason(&self, reason: &str) -> &Self {
        assert_eq!(
            self["error"]["reason"], reason,
            "Unexpected error reason in {self}"
        );
        self
    }

    fn assert_message(&self, message: &str) -> &Self {
        assert_eq!(self["message"], message, "Unexpected message in {self}");
        self
    }
}
