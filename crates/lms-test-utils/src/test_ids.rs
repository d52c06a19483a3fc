//! Fixed test IDs and secrets for deterministic tests.

use uuid::Uuid;

// Account IDs (100-199)
pub const TEST_ADMIN_ID: Uuid = Uuid::from_u128(100);
pub const TEST_INSTRUCTOR_ID: Uuid = Uuid::from_u128(101);
pub const TEST_STUDENT_ID: Uuid = Uuid::from_u128(102);
pub const TEST_DEACTIVATED_ID: Uuid = Uuid::from_u128(103);

/// Never present in any fixture store.
pub const TEST_UNKNOWN_ID: Uuid = Uuid::from_u128(199);

// Emails
pub const TEST_ADMIN_EMAIL: &str = "admin@lms.test";
pub const TEST_INSTRUCTOR_EMAIL: &str = "instructor@lms.test";
pub const TEST_STUDENT_EMAIL: &str = "student@lms.test";
pub const TEST_DEACTIVATED_EMAIL: &str = "deactivated@lms.test";

/// Password of every fixture account.
pub const TEST_PASSWORD: &str = "test-password-do-not-use-in-production";

/// Signing secret of the test server.
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-0123456789abcdef-do-not-use";

/// A different secret, for forging tokens the server must reject.
pub const TEST_WRONG_JWT_SECRET: &str = "wrong-jwt-secret-0123456789abcdef-do-not-use";
