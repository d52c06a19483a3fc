//! Integration tests for the authentication gate.
//!
//! Every test drives `GET /api/v1/auth/me` on a spawned server and checks
//! the status plus the structured error body.

use lms_test_utils::*;
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn get_me(
    server: &TestAuthServer,
    authorization: Option<&str>,
) -> Result<(StatusCode, Value, Option<String>), anyhow::Error> {
    let mut request = reqwest::Client::new().get(format!("{}/api/v1/auth/me", server.url()));
    if let Some(value) = authorization {
        request = request.header("authorization", value);
    }
    let response = request.send().await?;
    let status = response.status();
    let challenge = response
        .headers()
        .get("www-authenticate")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = response.json().await?;
    Ok((status, body, challenge))
}

// ============================================================================
// Missing / malformed credentials
// ============================================================================

#[tokio::test]
async fn test_no_authorization_header_is_missing_token() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;

    let (status, body, challenge) = get_me(&server, None).await?;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    body.assert_error_code("MISSING_TOKEN")
        .assert_message("Access denied. No token provided.");
    assert_eq!(challenge.as_deref(), Some("Bearer realm=\"lms-api\""));
    assert_eq!(server.store().call_count(), 0);

    Ok(())
}

#[tokio::test]
async fn test_non_bearer_scheme_is_missing_token() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;
    let token = server.token_for(TEST_STUDENT_ID)?;

    for value in [
        format!("Basic {token}"),
        format!("bearer {token}"),
        format!("Bearer  {token}"),
        token.clone(),
        "Bearer ".to_string(),
    ] {
        let (status, body, _) = get_me(&server, Some(&value)).await?;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "header {value:?}");
        body.assert_error_code("MISSING_TOKEN");
    }

    Ok(())
}

// ============================================================================
// Token codec failures
// ============================================================================

#[tokio::test]
async fn test_wrong_secret_is_invalid_token_not_500() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;
    let forged = TestTokenBuilder::new()
        .for_account(TEST_ADMIN_ID)
        .signed_with(TEST_WRONG_JWT_SECRET)
        .sign();

    let (status, body, challenge) = get_me(&server, Some(&format!("Bearer {forged}"))).await?;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    body.assert_error_code("INVALID_TOKEN")
        .assert_error_reason("invalid_signature")
        .assert_message("Invalid token");
    assert!(challenge.unwrap().contains("error=\"invalid_token\""));
    assert_eq!(server.store().call_count(), 0);

    Ok(())
}

#[tokio::test]
async fn test_tampered_payload_is_invalid_token() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;
    let genuine = server.token_for(TEST_STUDENT_ID)?;
    let now = chrono::Utc::now().timestamp();
    let tampered = tamper_payload(
        &genuine,
        &json!({"sub": TEST_ADMIN_ID.to_string(), "iat": now, "exp": now + 3600}),
    );

    let (status, body, _) = get_me(&server, Some(&format!("Bearer {tampered}"))).await?;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    body.assert_error_reason("invalid_signature");

    Ok(())
}

#[tokio::test]
async fn test_unsigned_token_is_invalid_token() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;
    let unsigned = TestTokenBuilder::new()
        .for_account(TEST_ADMIN_ID)
        .unsigned();

    let (status, body, _) = get_me(&server, Some(&format!("Bearer {unsigned}"))).await?;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    body.assert_error_code("INVALID_TOKEN")
        .assert_error_reason("invalid_signature");

    Ok(())
}

#[tokio::test]
async fn test_expired_token_reports_expired() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;
    let expired = TestTokenBuilder::new()
        .for_account(TEST_STUDENT_ID)
        .expired()
        .sign();

    let (status, body, _) = get_me(&server, Some(&format!("Bearer {expired}"))).await?;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    body.assert_error_code("INVALID_TOKEN")
        .assert_error_reason("expired")
        .assert_message("Token has expired");

    Ok(())
}

#[tokio::test]
async fn test_expired_token_with_wrong_secret_reports_invalid_signature(
) -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;
    let forged = TestTokenBuilder::new()
        .for_account(TEST_STUDENT_ID)
        .expired()
        .signed_with(TEST_WRONG_JWT_SECRET)
        .sign();

    let (_, body, _) = get_me(&server, Some(&format!("Bearer {forged}"))).await?;

    body.assert_error_reason("invalid_signature");

    Ok(())
}

#[tokio::test]
async fn test_token_without_expiry_is_rejected() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;
    let token = TestTokenBuilder::new()
        .for_account(TEST_STUDENT_ID)
        .without_expiry()
        .sign();

    let (status, body, _) = get_me(&server, Some(&format!("Bearer {token}"))).await?;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    body.assert_error_reason("invalid_signature");

    Ok(())
}

#[tokio::test]
async fn test_iat_beyond_clock_skew_is_rejected() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;
    let now = chrono::Utc::now().timestamp();
    let skew = server.config().jwt_clock_skew_seconds;

    let future = TestTokenBuilder::new()
        .for_account(TEST_STUDENT_ID)
        .issued_at(now + skew + 60)
        .expires_in(skew + 3600)
        .sign();
    let (status, _, _) = get_me(&server, Some(&format!("Bearer {future}"))).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let within = TestTokenBuilder::new()
        .for_account(TEST_STUDENT_ID)
        .issued_at(now + 30)
        .sign();
    let (status, _, _) = get_me(&server, Some(&format!("Bearer {within}"))).await?;
    assert_eq!(status, StatusCode::OK);

    Ok(())
}

// ============================================================================
// Principal resolution
// ============================================================================

#[tokio::test]
async fn test_unknown_subject_is_401_not_404() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;
    let token = server.token_for(TEST_UNKNOWN_ID)?;

    let (status, body, _) = get_me(&server, Some(&format!("Bearer {token}"))).await?;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    body.assert_error_code("INVALID_TOKEN")
        .assert_error_reason("unknown_subject")
        .assert_message("Invalid token");

    Ok(())
}

#[tokio::test]
async fn test_non_uuid_subject_is_unknown_subject() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;
    let token = TestTokenBuilder::new().for_subject("student-42").sign();

    let (status, body, _) = get_me(&server, Some(&format!("Bearer {token}"))).await?;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    body.assert_error_reason("unknown_subject");

    Ok(())
}

#[tokio::test]
async fn test_deactivated_account_is_distinct_code() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;
    let token = server.token_for(TEST_DEACTIVATED_ID)?;

    let (status, body, _) = get_me(&server, Some(&format!("Bearer {token}"))).await?;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    body.assert_error_code("ACCOUNT_DEACTIVATED")
        .assert_message("Account has been deactivated");

    Ok(())
}

#[tokio::test]
async fn test_deactivation_takes_effect_on_next_request() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;
    let token = server.token_for(TEST_STUDENT_ID)?;
    let header = format!("Bearer {token}");

    let (status, _, _) = get_me(&server, Some(&header)).await?;
    assert_eq!(status, StatusCode::OK);

    server.store().set_active(TEST_STUDENT_ID, false);

    let (status, body, _) = get_me(&server, Some(&header)).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    body.assert_error_code("ACCOUNT_DEACTIVATED");

    Ok(())
}

#[tokio::test]
async fn test_deleted_account_token_becomes_invalid() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;
    let token = server.token_for(TEST_INSTRUCTOR_ID)?;

    assert!(server.store().remove(TEST_INSTRUCTOR_ID));

    let (_, body, _) = get_me(&server, Some(&format!("Bearer {token}"))).await?;
    body.assert_error_reason("unknown_subject");

    Ok(())
}

#[tokio::test]
async fn test_store_failure_is_generic_500() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;
    let token = server.token_for(TEST_STUDENT_ID)?;
    server.store().set_failing(true);

    let (status, body, _) = get_me(&server, Some(&format!("Bearer {token}"))).await?;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    body.assert_error_code("INTERNAL_ERROR")
        .assert_message("An internal error occurred");
    assert!(!body.to_string().contains("Mock"));

    Ok(())
}

// ============================================================================
// Success path
// ============================================================================

#[tokio::test]
async fn test_valid_token_returns_principal() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;
    let token = server.token_for(TEST_INSTRUCTOR_ID)?;

    let (status, body, _) = get_me(&server, Some(&format!("Bearer {token}"))).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["user_id"], TEST_INSTRUCTOR_ID.to_string());
    assert_eq!(body["user"]["role"], "instructor");
    assert_eq!(body["user"]["email"], TEST_INSTRUCTOR_EMAIL);
    assert_eq!(body["user"]["is_verified"], true);
    assert!(body["user"].get("password_hash").is_none());

    Ok(())
}

#[tokio::test]
async fn test_repeated_token_yields_identical_principal() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;
    let header = format!("Bearer {}", server.token_for(TEST_STUDENT_ID)?);

    let (_, first, _) = get_me(&server, Some(&header)).await?;
    let (_, second, _) = get_me(&server, Some(&header)).await?;

    assert_eq!(first, second);

    Ok(())
}
