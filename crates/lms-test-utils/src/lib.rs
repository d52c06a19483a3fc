//! # LMS Test Utilities
//!
//! Shared test utilities for the LMS auth service.
//!
//! This crate provides:
//! - Fixed test IDs and secrets
//! - Account fixtures with cheap bcrypt hashes
//! - Token builders for forged, expired and tampered tokens
//! - Server test harness (`TestAuthServer` over an in-memory store)
//! - Custom assertions for tokens and error bodies
//!
//! ## Usage
//!
//! ```rust,ignore
//! use lms_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() -> anyhow::Result<()> {
//!     let server = TestAuthServer::spawn().await?;
//!     let token = server.token_for(TEST_STUDENT_ID)?;
//!
//!     let body: serde_json::Value = reqwest::Client::new()
//!         .get(format!("{}/api/v1/auth/me", server.url()))
//!         .bearer_auth(&token)
//!         .send()
//!         .await?
//!         .json()
//!         .await?;
//!
//!     assert_eq!(body["user"]["role"], "student");
//!     Ok(())
//! }
//! ```

pub mod assertions;
pub mod fixtures;
pub mod server_harness;
pub mod test_ids;
pub mod token_builders;

pub use assertions::*;
pub use fixtures::*;
pub use server_harness::*;
pub use test_ids::*;
pub use token_builders::*;
