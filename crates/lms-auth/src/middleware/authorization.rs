//! Authorization gate.
//!
//! Compares the authenticated principal's role against the set of roles a
//! route declares. Must be layered inside [`require_auth`](super::auth::require_auth).

use crate::errors::LmsError;
use crate::middleware::auth::PrincipalExt;
use crate::models::{Principal, Role, UnknownRole};
use crate::observability::metrics::record_gate_decision;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::instrument;

const GATE: &str = "authorization";

/// Roles permitted to call a route.
///
/// Built once at router construction and shared read-only across requests.
/// A principal with role `admin` satisfies any non-empty requirement; an
/// empty requirement admits nobody.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRequirement {
    roles: Arc<[Role]>,
}

impl RoleRequirement {
    pub fn new(roles: impl IntoIterator<Item = Role>) -> Self {
        let mut unique: Vec<Role> = Vec::new();
        for role in roles {
            if !unique.contains(&role) {
                unique.push(role);
            }
        }
        Self {
            roles: unique.into(),
        }
    }

    /// Build a requirement from role names such as `"instructor"`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownRole` for the first name that is not a known role.
    pub fn from_names<I, S>(names: I) -> Result<Self, UnknownRole>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let roles = names
            .into_iter()
            .map(|name| name.as_ref().parse::<Role>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(roles))
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Whether `role` satisfies this requirement.
    pub fn permits(&self, role: Role) -> bool {
        if self.roles.is_empty() {
            return false;
        }
        role == Role::Admin || self.roles.contains(&role)
    }
}

/// Run the authorization gate.
///
/// # Errors
///
/// - `Unauthenticated` if no principal is attached
/// - `Forbidden` if the principal's role is not permitted
pub fn authorize(
    principal: Option<&Principal>,
    requirement: &RoleRequirement,
) -> Result<(), LmsError> {
    let Some(principal) = principal else {
        tracing::warn!(
            target: "lms.middleware.authorization",
            "No principal on request; authorization gate ran without authentication"
        );
        record_gate_decision(GATE, "unauthenticated");
        return Err(LmsError::Unauthenticated);
    };

    if !requirement.permits(principal.role) {
        tracing::info!(
            target: "lms.middleware.authorization",
            role = %principal.role,
            "Role not permitted"
        );
        record_gate_decision(GATE, "forbidden");
        return Err(LmsError::Forbidden {
            role: principal.role,
        });
    }

    record_gate_decision(GATE, "success");
    Ok(())
}

/// Authorization middleware.
///
/// # Response
///
/// - Returns 401 Unauthorized if no principal is attached
/// - Returns 403 Forbidden if the principal's role is not permitted
/// - Continues to next handler otherwise
#[instrument(skip_all, name = "lms.middleware.authorization")]
pub async fn require_roles(
    State(requirement): State<RoleRequirement>,
    req: Request,
    next: Next,
) -> Result<Response, LmsError> {
    authorize(req.principal(), &requirement)?;
    Ok(next.run(req).await)
}
