//! Observability for the LMS auth service.
//!
//! # Privacy by Default
//!
//! All instrumentation uses `#[instrument(skip_all)]` and explicit field
//! allow-listing. Fields are categorized as:
//! - **SAFE**: Can be logged in plaintext (roles, outcomes, gate names)
//! - **HASHED**: Must be SHA-256 hashed for correlation (account ids)
//! - **NEVER**: Must never appear in logs (tokens, passwords, secrets, emails)

pub mod metrics;

use sha2::{Digest, Sha256};

/// Hash a field value for correlation in logs (SHA-256, first 8 hex chars).
///
/// This is a one-way hash for correlating log lines, not a secret-safe
/// digest.
pub fn hash_for_correlation(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let result = hasher.finalize();
    hex::encode(result.get(..4).unwrap_or_default())
}
