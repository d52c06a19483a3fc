//! Integration tests for the authorization gate on the admin-only route.

use lms_auth::models::Role;
use lms_test_utils::*;
use reqwest::StatusCode;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

async fn get_account(
    server: &TestAuthServer,
    caller: Option<Uuid>,
    target: Uuid,
) -> Result<(StatusCode, Value), anyhow::Error> {
    let mut request = reqwest::Client::new().get(format!(
        "{}/api/v1/admin/accounts/{}",
        server.url(),
        target
    ));
    if let Some(caller) = caller {
        request = request.bearer_auth(server.token_for(caller)?);
    }
    let response = request.send().await?;
    let status = response.status();
    Ok((status, response.json().await?))
}

#[tokio::test]
async fn test_admin_can_read_account() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;

    let (status, body) = get_account(&server, Some(TEST_ADMIN_ID), TEST_STUDENT_ID).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["account"]["id"], TEST_STUDENT_ID.to_string());
    assert_eq!(body["account"]["role"], "student");
    assert_eq!(body["account"]["is_active"], true);
    assert!(!body.to_string().contains("password"));

    Ok(())
}

#[tokio::test]
async fn test_admin_sees_deactivated_accounts() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;

    let (status, body) =
        get_account(&server, Some(TEST_ADMIN_ID), TEST_DEACTIVATED_ID).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["account"]["is_active"], false);

    Ok(())
}

#[tokio::test]
async fn test_student_is_forbidden_with_role_in_message() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;

    let (status, body) = get_account(&server, Some(TEST_STUDENT_ID), TEST_ADMIN_ID).await?;

    assert_eq!(status, StatusCode::FORBIDDEN);
    body.assert_error_code("FORBIDDEN")
        .assert_message("User role 'student' is not authorized to access this resource");

    Ok(())
}

#[tokio::test]
async fn test_instructor_is_forbidden() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;

    let (status, body) =
        get_account(&server, Some(TEST_INSTRUCTOR_ID), TEST_STUDENT_ID).await?;

    assert_eq!(status, StatusCode::FORBIDDEN);
    body.assert_message("User role 'instructor' is not authorized to access this resource");

    Ok(())
}

#[tokio::test]
async fn test_authentication_runs_before_authorization() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;

    let (status, body) = get_account(&server, None, TEST_STUDENT_ID).await?;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    body.assert_error_code("MISSING_TOKEN");

    Ok(())
}

#[tokio::test]
async fn test_deactivated_admin_is_rejected_by_authentication() -> Result<(), anyhow::Error> {
    let store = Arc::new(seeded_store());
    let deactivated_admin = Uuid::from_u128(150);
    store.insert(test_account(
        deactivated_admin,
        "former-admin@lms.test",
        Role::Admin,
        false,
    ));
    let server = TestAuthServer::spawn_with_store(store).await?;

    let (status, body) = get_account(&server, Some(deactivated_admin), TEST_STUDENT_ID).await?;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    body.assert_error_code("ACCOUNT_DEACTIVATED");

    Ok(())
}

#[tokio::test]
async fn test_role_change_applies_on_next_request() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;

    let (status, _) = get_account(&server, Some(TEST_INSTRUCTOR_ID), TEST_STUDENT_ID).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    server.store().insert(test_account(
        TEST_INSTRUCTOR_ID,
        TEST_INSTRUCTOR_EMAIL,
        Role::Admin,
        true,
    ));

    let (status, _) = get_account(&server, Some(TEST_INSTRUCTOR_ID), TEST_STUDENT_ID).await?;
    assert_eq!(status, StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn test_unknown_target_is_not_found() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;

    let (status, body) = get_account(&server, Some(TEST_ADMIN_ID), TEST_UNKNOWN_ID).await?;

    assert_eq!(status, StatusCode::NOT_FOUND);
    body.assert_error_code("NOT_FOUND");

    Ok(())
}
