//! LMS Auth Service Library
//!
//! The request pipeline of the LMS backend that decides who is calling and
//! whether they may proceed:
//!
//! - Token codec: issues and verifies HS256 session tokens
//! - Principal resolver: maps a token subject to an active account
//! - Authentication gate: bearer token in, `Principal` in request extensions out
//! - Authorization gate: compares the principal's role to a route's `RoleRequirement`
//!
//! # Architecture
//!
//! ```text
//! routes/mod.rs -> middleware/*.rs -> handlers/*.rs -> services/*.rs -> repositories/*.rs
//! ```
//!
//! # Modules
//!
//! - `auth` - Token codec, claims and clock
//! - `config` - Service configuration from environment
//! - `errors` - Error types with HTTP status code mapping
//! - `handlers` - HTTP request handlers
//! - `middleware` - Authentication, authorization and HTTP metrics layers
//! - `models` - Data models
//! - `observability` - Metrics and log correlation helpers
//! - `repositories` - Account store
//! - `routes` - Axum router setup
//! - `services` - Principal resolution and login

pub mod auth;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod routes;
pub mod services;
