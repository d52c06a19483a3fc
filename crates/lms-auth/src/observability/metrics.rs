//! Metrics definitions for the LMS auth service.
//!
//! All metrics follow Prometheus naming conventions:
//! - `lms_` prefix
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded:
//! - `gate`: 2 values (authentication, authorization)
//! - `outcome`: bounded by the error taxonomy
//! - `endpoint`: known routes, dynamic segments replaced, everything else `/other`

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

const HTTP_REQUEST_BUCKETS: &[f64] = &[
    0.005, 0.010, 0.025, 0.050, 0.100, 0.150, 0.200, 0.300, 0.500, 1.000, 2.000,
];

/// Build a Prometheus recorder with the service's histogram buckets.
///
/// # Errors
///
/// Returns error if the bucket configuration is rejected.
pub fn build_metrics_recorder() -> Result<PrometheusBuilder, String> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Prefix("lms_http_request".to_string()),
            HTTP_REQUEST_BUCKETS,
        )
        .map_err(|e| format!("Failed to set HTTP request buckets: {e}"))
}

/// Install the Prometheus recorder globally and return the handle for
/// serving `/metrics`.
///
/// Must be called before any metrics are recorded.
///
/// # Errors
///
/// Returns error if a recorder is already installed.
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    build_metrics_recorder()?
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {e}"))
}

// ============================================================================
// Gate Metrics
// ============================================================================

/// Record a gate decision.
///
/// Metric: `lms_auth_gate_decisions_total`
/// Labels: `gate` (authentication, authorization), `outcome`
pub fn record_gate_decision(gate: &'static str, outcome: &'static str) {
    counter!("lms_auth_gate_decisions_total", "gate" => gate, "outcome" => outcome).increment(1);
}

// ============================================================================
// Token Metrics
// ============================================================================

/// Record token issuance outcome.
///
/// Metric: `lms_token_issuance_total`
/// Labels: `status` (success, error)
pub fn record_token_issuance(status: &'static str) {
    counter!("lms_token_issuance_total", "status" => status).increment(1);
}

/// Record token validation outcome.
///
/// Metric: `lms_token_validations_total`
/// Labels: `outcome` (success, invalid_signature, expired)
pub fn record_token_validation(outcome: &'static str) {
    counter!("lms_token_validations_total", "outcome" => outcome).increment(1);
}

/// Record a login attempt.
///
/// Metric: `lms_login_attempts_total`
/// Labels: `outcome` (success, invalid_credentials, deactivated, bad_request)
pub fn record_login(outcome: &'static str) {
    counter!("lms_login_attempts_total", "outcome" => outcome).increment(1);
}

// ============================================================================
// HTTP Request Metrics
// ============================================================================

/// Record HTTP request completion.
///
/// Metric: `lms_http_requests_total`, `lms_http_request_duration_seconds`
/// Labels: `method`, `endpoint`, `status` / `status_code`
pub fn record_http_request(method: &str, endpoint: &str, status_code: u16, duration: Duration) {
    let normalized_endpoint = normalize_endpoint(endpoint);
    let status = categorize_status_code(status_code);

    histogram!("lms_http_request_duration_seconds",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint,
        "status" => status
    )
    .record(duration.as_secs_f64());

    counter!("lms_http_requests_total",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint,
        "status_code" => status_code.to_string()
    )
    .increment(1);
}

/// Categorize HTTP status code into success/error/timeout.
fn categorize_status_code(status_code: u16) -> &'static str {
    match status_code {
        200..=299 => "success",
        408 | 504 => "timeout",
        _ => "error",
    }
}

/// Map a request path onto a bounded set of endpoint labels.
fn normalize_endpoint(path: &str) -> &'static str {
    match path {
        "/health" => "/health",
        "/ready" => "/ready",
        "/metrics" => "/metrics",
        "/api/v1/auth/login" => "/api/v1/auth/login",
        "/api/v1/auth/me" => "/api/v1/auth/me",
        "/api/v1/auth/logout" => "/api/v1/auth/logout",
        _ => {
            if let Some(rest) = path.strip_prefix("/api/v1/admin/accounts/") {
                if !rest.is_empty() && !rest.contains('/') {
                    return "/api/v1/admin/accounts/{id}";
                }
            }
            "/other"
        }
    }
}
