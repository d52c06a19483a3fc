//! Integration tests for login, logout and the login → gate round trip.

use lms_test_utils::*;
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn post_login(server: &TestAuthServer, body: Value) -> Result<(StatusCode, Value), anyhow::Error> {
    let response = reqwest::Client::new()
        .post(format!("{}/api/v1/auth/login", server.url()))
        .json(&body)
        .send()
        .await?;
    let status = response.status();
    Ok((status, response.json().await?))
}

#[tokio::test]
async fn test_login_issues_token_accepted_by_gate() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;

    let (status, body) = post_login(
        &server,
        json!({"email": TEST_STUDENT_EMAIL, "password": TEST_PASSWORD}),
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], server.config().jwt_expiry_seconds);
    assert_eq!(body["user"]["user_id"], TEST_STUDENT_ID.to_string());

    let token = body["token"].as_str().unwrap().to_string();
    token
        .assert_valid_jwt()
        .assert_for_subject(&TEST_STUDENT_ID.to_string())
        .assert_expires_in(server.config().jwt_expiry_seconds);

    let me: Value = reqwest::Client::new()
        .get(format!("{}/api/v1/auth/me", server.url()))
        .bearer_auth(&token)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(me["user"], body["user"]);

    Ok(())
}

#[tokio::test]
async fn test_login_wrong_password_and_unknown_email_look_alike() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;

    let (wrong_status, wrong_body) = post_login(
        &server,
        json!({"email": TEST_STUDENT_EMAIL, "password": "not-the-password"}),
    )
    .await?;
    let (unknown_status, unknown_body) = post_login(
        &server,
        json!({"email": "nobody@lms.test", "password": TEST_PASSWORD}),
    )
    .await?;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    wrong_body
        .assert_error_code("INVALID_CREDENTIALS")
        .assert_message("Invalid email or password");
    assert_eq!(wrong_body, unknown_body);

    Ok(())
}

#[tokio::test]
async fn test_login_deactivated_account() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;

    let (status, body) = post_login(
        &server,
        json!({"email": TEST_DEACTIVATED_EMAIL, "password": TEST_PASSWORD}),
    )
    .await?;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    body.assert_error_code("ACCOUNT_DEACTIVATED");

    Ok(())
}

#[tokio::test]
async fn test_login_missing_fields_is_bad_request() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;

    for payload in [
        json!({"email": TEST_STUDENT_EMAIL}),
        json!({"email": "", "password": TEST_PASSWORD}),
        json!({"email": TEST_STUDENT_EMAIL, "password": ""}),
    ] {
        let (status, body) = post_login(&server, payload.clone()).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload {payload}");
        body.assert_error_code("BAD_REQUEST");
    }

    Ok(())
}

#[tokio::test]
async fn test_login_through_harness_helper() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;

    let token = server.login(TEST_ADMIN_EMAIL).await?;

    token.assert_for_subject(&TEST_ADMIN_ID.to_string());

    Ok(())
}

#[tokio::test]
async fn test_logout_requires_authentication() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/v1/auth/logout", server.url()))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = client
        .post(format!("{}/api/v1/auth/logout", server.url()))
        .bearer_auth(server.token_for(TEST_STUDENT_ID)?)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await?;
    assert_eq!(body["message"], "Logged out successfully");

    Ok(())
}

#[tokio::test]
async fn test_logout_is_stateless() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;
    let client = reqwest::Client::new();
    let token = server.token_for(TEST_STUDENT_ID)?;

    client
        .post(format!("{}/api/v1/auth/logout", server.url()))
        .bearer_auth(&token)
        .send()
        .await?;

    // No server-side revocation: the token stays valid until it expires
    let response = client
        .get(format!("{}/api/v1/auth/me", server.url()))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}
