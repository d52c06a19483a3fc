//! Account repository.
//!
//! The auth core reads accounts through the [`AccountStore`] trait so the
//! gates can run against Postgres in production and an in-memory store in
//! tests. Only the login path ever reads the password hash.

use crate::errors::LmsError;
use crate::models::{Account, AccountCredentials, Role};
use sqlx::PgPool;
use uuid::Uuid;

/// Read access to the account collection.
#[async_trait::async_trait]
pub trait AccountStore: Send + Sync {
    /// Look up an account by id. Returns `Ok(None)` when no row matches.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, LmsError>;

    /// Look up an account and its password hash by email (case-insensitive).
    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<AccountCredentials>, LmsError>;

    /// Cheap connectivity probe used by the readiness endpoint.
    async fn ping(&self) -> Result<(), LmsError>;
}

/// Row shape of the `accounts` table as selected below.
#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    account_id: Uuid,
    name: String,
    email: String,
    role: String,
    is_active: bool,
    is_verified: bool,
}

impl TryFrom<AccountRow> for Account {
    type Error = LmsError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let role: Role = row
            .role
            .parse()
            .map_err(|e| LmsError::Database(format!("Corrupt account row: {}", e)))?;

        Ok(Account {
            id: row.account_id,
            name: row.name,
            email: row.email,
            role,
            is_active: row.is_active,
            is_verified: row.is_verified,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CredentialsRow {
    #[sqlx(flatten)]
    account: AccountRow,
    password_hash: String,
}

/// Postgres-backed account store.
#[derive(Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl AccountStore for PgAccountStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, LmsError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT account_id, name, email, role, is_active, is_verified
            FROM accounts
            WHERE account_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| LmsError::Database(format!("Failed to fetch account by id: {}", e)))?;

        row.map(Account::try_from).transpose()
    }

    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<AccountCredentials>, LmsError> {
        let row = sqlx::query_as::<_, CredentialsRow>(
            r#"
            SELECT account_id, name, email, role, is_active, is_verified, password_hash
            FROM accounts
            WHERE lower(email) = lower($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| LmsError::Database(format!("Failed to fetch account by email: {}", e)))?;

        row.map(|row| {
            Ok(AccountCredentials {
                account: Account::try_from(row.account)?,
                password_hash: row.password_hash,
            })
        })
        .transpose()
    }

    async fn ping(&self) -> Result<(), LmsError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| LmsError::Database(format!("Health check query failed: {}", e)))?;
        Ok(())
    }
}

/// In-memory account store for tests.
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::RwLock;

    /// Account store backed by a `HashMap`.
    ///
    /// Can be switched into a failing mode to simulate an unreachable
    /// database.
    #[derive(Default)]
    pub struct InMemoryAccountStore {
        accounts: RwLock<HashMap<Uuid, AccountCredentials>>,
        failing: AtomicBool,
        call_count: AtomicUsize,
    }

    impl InMemoryAccountStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Create a store pre-populated with `accounts`.
        pub fn with_accounts(accounts: impl IntoIterator<Item = AccountCredentials>) -> Self {
            let store = Self::new();
            for credentials in accounts {
                store.insert(credentials);
            }
            store
        }

        /// Create a store whose every call fails with a database error.
        pub fn failing() -> Self {
            let store = Self::new();
            store.set_failing(true);
            store
        }

        /// Insert or replace an account.
        pub fn insert(&self, credentials: AccountCredentials) {
            let mut accounts = self.accounts.write().unwrap_or_else(|e| e.into_inner());
            accounts.insert(credentials.account.id, credentials);
        }

        /// Remove an account. Returns whether it existed.
        pub fn remove(&self, id: Uuid) -> bool {
            let mut accounts = self.accounts.write().unwrap_or_else(|e| e.into_inner());
            accounts.remove(&id).is_some()
        }

        /// Flip the `is_active` flag of an existing account.
        pub fn set_active(&self, id: Uuid, is_active: bool) {
            let mut accounts = self.accounts.write().unwrap_or_else(|e| e.into_inner());
            if let Some(credentials) = accounts.get_mut(&id) {
                credentials.account.is_active = is_active;
            }
        }

        pub fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        /// Number of store calls made so far.
        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }

        fn check(&self) -> Result<(), LmsError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            if self.failing.load(Ordering::SeqCst) {
                return Err(LmsError::Database("Mock account store failure".to_string()));
            }
            Ok(())
        }
    }

    #[async_trait::async_trait]
    impl AccountStore for InMemoryAccountStore {
        async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, LmsError> {
            self.check()?;
            let accounts = self.accounts.read().unwrap_or_else(|e| e.into_inner());
            Ok(accounts.get(&id).map(|c| c.account.clone()))
        }

        async fn find_credentials_by_email(
            &self,
            email: &str,
        ) -> Result<Option<AccountCredentials>, LmsError> {
            self.check()?;
            let accounts = self.accounts.read().unwrap_or_else(|e| e.into_inner());
            Ok(accounts
                .values()
                .find(|c| c.account.email.eq_ignore_ascii_case(email))
                .cloned())
        }

        async fn ping(&self) -> Result<(), LmsError> {
            self.check()
        }
    }
}
