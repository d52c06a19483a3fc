pub mod login_service;
pub mod principal_resolver;

pub use principal_resolver::{PrincipalResolver, ResolveError};
