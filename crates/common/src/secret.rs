//! Secret types for keeping sensitive values out of logs.
//!
//! Re-exports [`secrecy`] types. `SecretString` implements `Debug` with
//! redaction, so a struct deriving `Debug` that holds one (a login request, the
//! service config) is safe to pass to `tracing` or `{:?}`. The inner value is
//! only reachable through an explicit `expose_secret()` call, which makes every
//! read site greppable. Secrets are zeroized on drop.
//!
//! # LMS Usage
//!
//! Use `SecretString` for:
//! - The JWT signing secret (`JWT_SECRET`)
//! - Passwords submitted to the login endpoint
//! - Issued bearer tokens held by test harnesses
//!
//! ```rust
//! use common::secret::{ExposeSecret, SecretString};
//!
//! #[derive(Debug)]
//! struct LoginAttempt {
//!     email: String,
//!     password: SecretString,
//! }
//!
//! let attempt = LoginAttempt {
//!     email: "ada@lms.test".to_string(),
//!     password: SecretString::from("correct-horse"),
//! };
//!
//! assert!(!format!("{attempt:?}").contains("correct-horse"));
//! assert_eq!(attempt.password.expose_secret(), "correct-horse");
//! ```

pub use secrecy::{ExposeSecret, SecretString};
