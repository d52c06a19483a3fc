//! Principal resolver.
//!
//! Maps the subject of a verified token to a live account. One store read
//! per call; no caching, so deactivation takes effect on the next request.

use crate::models::Account;
use crate::observability::hash_for_correlation;
use crate::repositories::AccountStore;
use std::sync::Arc;
use thiserror::Error;
use tracing::instrument;
use uuid::Uuid;

/// Why a subject could not be resolved to an active account.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("account not found")]
    NotFound,

    #[error("account is deactivated")]
    Deactivated,

    /// The store could not be read. Carries server-side detail only.
    #[error("account store failure: {0}")]
    Store(String),
}

/// Resolves token subjects to accounts.
#[derive(Clone)]
pub struct PrincipalResolver {
    store: Arc<dyn AccountStore>,
}

impl PrincipalResolver {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }

    /// Load the account for `subject_id` and check it is active.
    ///
    /// A subject that is not a UUID cannot name an account and resolves to
    /// `NotFound` without touching the store.
    #[instrument(skip_all, name = "lms.services.resolver.resolve")]
    pub async fn resolve(&self, subject_id: &str) -> Result<Account, ResolveError> {
        let Ok(account_id) = Uuid::parse_str(subject_id) else {
            tracing::debug!(
                target: "lms.services.resolver",
                "Subject is not an account id"
            );
            return Err(ResolveError::NotFound);
        };

        match self.store.find_by_id(account_id).await {
            Ok(Some(account)) if account.is_active => Ok(account),
            Ok(Some(_)) => {
                tracing::debug!(
                    target: "lms.services.resolver",
                    account = %hash_for_correlation(subject_id),
                    "Account is deactivated"
                );
                Err(ResolveError::Deactivated)
            }
            Ok(None) => {
                tracing::debug!(
                    target: "lms.services.resolver",
                    account = %hash_for_correlation(subject_id),
                    "No account for subject"
                );
                Err(ResolveError::NotFound)
            }
            Err(e) => Err(ResolveError::Store(e.to_string())),
        }
    }
}
