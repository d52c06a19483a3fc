pub mod auth;
pub mod authorization;
pub mod http_metrics;

pub use auth::{require_auth, AuthState, PrincipalExt};
pub use authorization::{require_roles, RoleRequirement};
