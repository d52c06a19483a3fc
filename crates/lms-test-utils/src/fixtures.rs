//! Account and configuration fixtures.

use crate::test_ids::*;
use lms_auth::config::Config;
use lms_auth::models::{Account, AccountCredentials, Role};
use lms_auth::repositories::accounts::mock::InMemoryAccountStore;
use lms_auth::services::login_service::{hash_password, MIN_BCRYPT_COST};
use std::collections::HashMap;
use std::sync::OnceLock;
use uuid::Uuid;

/// bcrypt hash of [`TEST_PASSWORD`] at the minimum cost, computed once.
pub fn test_password_hash() -> String {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| {
        hash_password(TEST_PASSWORD, MIN_BCRYPT_COST).expect("hashing test password")
    })
    .clone()
}

/// Build an account fixture whose password is [`TEST_PASSWORD`].
pub fn test_account(id: Uuid, email: &str, role: Role, is_active: bool) -> AccountCredentials {
    AccountCredentials {
        account: Account {
            id,
            name: format!("Test {}", role),
            email: email.to_string(),
            role,
            is_active,
            is_verified: true,
        },
        password_hash: test_password_hash(),
    }
}

/// The standard fixture accounts: one per role plus a deactivated student.
pub fn seed_accounts() -> Vec<AccountCredentials> {
    vec![
        test_account(TEST_ADMIN_ID, TEST_ADMIN_EMAIL, Role::Admin, true),
        test_account(TEST_INSTRUCTOR_ID, TEST_INSTRUCTOR_EMAIL, Role::Instructor, true),
        test_account(TEST_STUDENT_ID, TEST_STUDENT_EMAIL, Role::Student, true),
        test_account(
            TEST_DEACTIVATED_ID,
            TEST_DEACTIVATED_EMAIL,
            Role::Student,
            false,
        ),
    ]
}

/// In-memory store holding [`seed_accounts`].
pub fn seeded_store() -> InMemoryAccountStore {
    InMemoryAccountStore::with_accounts(seed_accounts())
}

/// Service configuration for tests, signing with [`TEST_JWT_SECRET`].
pub fn test_config() -> Config {
    Config::from_vars(&HashMap::from([
        (
            "DATABASE_URL".to_string(),
            "postgresql://unused@localhost/lms_test".to_string(),
        ),
        ("BIND_ADDRESS".to_string(), "127.0.0.1:0".to_string()),
        ("JWT_SECRET".to_string(), TEST_JWT_SECRET.to_string()),
    ]))
    .expect("test configuration is valid")
}
