//! HTTP routes for the LMS auth service.
//!
//! Defines the Axum router and application state.

use crate::auth::TokenCodec;
use crate::config::Config;
use crate::handlers::{self, admin_handler, auth_handler};
use crate::middleware::http_metrics::http_metrics_middleware;
use crate::middleware::{require_auth, require_roles, AuthState, RoleRequirement};
use crate::models::Role;
use crate::repositories::AccountStore;
use crate::services::PrincipalResolver;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration.
    pub config: Config,

    /// Account store (Postgres in production, in-memory in tests).
    pub store: Arc<dyn AccountStore>,

    /// Session token codec.
    pub codec: Arc<TokenCodec>,
}

/// Build the application routes.
///
/// Creates an Axum router with:
/// - `/health`, `/ready`, `/metrics` - public, unversioned
/// - `POST /api/v1/auth/login` - public
/// - `GET /api/v1/auth/me`, `POST /api/v1/auth/logout` - authenticated
/// - `GET /api/v1/admin/accounts/:id` - authenticated, role `admin`
/// - TraceLayer, HTTP metrics middleware, 30 second request timeout
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let auth_state = Arc::new(AuthState {
        codec: state.codec.clone(),
        resolver: PrincipalResolver::new(state.store.clone()),
    });

    let public_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/api/v1/auth/login", post(auth_handler::login))
        .with_state(state.clone());

    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    let session_routes = Router::new()
        .route("/api/v1/auth/me", get(auth_handler::me))
        .route("/api/v1/auth/logout", post(auth_handler::logout))
        .route_layer(middleware::from_fn_with_state(
            auth_state.clone(),
            require_auth,
        ))
        .with_state(state.clone());

    // route_layer runs last-added first: require_auth, then require_roles
    let admin_routes = Router::new()
        .route(
            "/api/v1/admin/accounts/:id",
            get(admin_handler::get_account),
        )
        .route_layer(middleware::from_fn_with_state(
            RoleRequirement::new([Role::Admin]),
            require_roles,
        ))
        .route_layer(middleware::from_fn_with_state(auth_state, require_auth))
        .with_state(state);

    // Layer order (bottom-to-top execution):
    // 1. TimeoutLayer (innermost)
    // 2. TraceLayer
    // 3. http_metrics_middleware (outermost)
    public_routes
        .merge(metrics_routes)
        .merge(session_routes)
        .merge(admin_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(middleware::from_fn(http_metrics_middleware))
}
