//! Test server harness for E2E testing.
//!
//! Provides `TestAuthServer` for spawning a real LMS auth server over an
//! in-memory account store.

use crate::fixtures::{seeded_store, test_config};
use crate::test_ids::TEST_PASSWORD;
use common::secret::ExposeSecret;
use lms_auth::auth::{SystemClock, TokenCodec};
use lms_auth::config::Config;
use lms_auth::observability::metrics::init_metrics_recorder;
use lms_auth::repositories::accounts::mock::InMemoryAccountStore;
use lms_auth::routes::{self, AppState};
use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Test harness for spawning the LMS auth server in E2E tests.
///
/// # Example
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_me_e2e() -> Result<()> {
///     let server = TestAuthServer::spawn().await?;
///     let response = reqwest::Client::new()
///         .get(format!("{}/api/v1/auth/me", server.url()))
///         .bearer_auth(server.token_for(TEST_ADMIN_ID)?)
///         .send()
///         .await?;
///
///     assert_eq!(response.status(), 200);
///     Ok(())
/// }
/// ```
pub struct TestAuthServer {
    addr: SocketAddr,
    store: Arc<InMemoryAccountStore>,
    codec: Arc<TokenCodec>,
    config: Config,
    handle: JoinHandle<()>,
}

impl TestAuthServer {
    /// Spawn a server over [`seeded_store`](crate::fixtures::seeded_store).
    pub async fn spawn() -> Result<Self, anyhow::Error> {
        Self::spawn_with_store(Arc::new(seeded_store())).await
    }

    /// Spawn a server over the given store.
    ///
    /// The server will:
    /// - Bind to a random available port (127.0.0.1:0)
    /// - Sign tokens with `TEST_JWT_SECRET` against the system clock
    /// - Start the HTTP server in the background
    pub async fn spawn_with_store(store: Arc<InMemoryAccountStore>) -> Result<Self, anyhow::Error> {
        let config = test_config();

        let codec = Arc::new(TokenCodec::new(
            config.jwt_secret.clone(),
            config.jwt_expiry_seconds,
            config.jwt_clock_skew_seconds,
            Arc::new(SystemClock),
        ));

        let state = Arc::new(AppState {
            config: config.clone(),
            store: store.clone(),
            codec: codec.clone(),
        });

        // The global recorder can only be installed once per process; later
        // servers get a standalone recorder.
        let metrics_handle = match init_metrics_recorder() {
            Ok(handle) => handle,
            Err(_) => PrometheusBuilder::new().build_recorder().handle(),
        };

        let app = routes::build_routes(state, metrics_handle);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            store,
            codec,
            config,
            handle,
        })
    }

    /// Get the base URL of the test server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// The store behind the server, for mutating accounts mid-test.
    pub fn store(&self) -> &InMemoryAccountStore {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Issue a token for `account_id` with the server's own codec.
    pub fn token_for(&self, account_id: Uuid) -> Result<String, anyhow::Error> {
        let issued = self
            .codec
            .issue(&account_id.to_string())
            .map_err(|e| anyhow::anyhow!("Failed to issue test token: {}", e))?;
        Ok(issued.token.expose_secret().to_string())
    }

    /// Log in through the HTTP API with [`TEST_PASSWORD`] and return the token.
    pub async fn login(&self, email: &str) -> Result<String, anyhow::Error> {
        let response = reqwest::Client::new()
            .post(format!("{}/api/v1/auth/login", self.url()))
            .json(&json!({ "email": email, "password": TEST_PASSWORD }))
            .send()
            .await?;

        let status = response.status();
        let body: Value = response.json().await?;
        if !status.is_success() {
            anyhow::bail!("Login failed with {}: {}", status, body);
        }

        body["token"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("Login response has no token: {}", body))
    }
}

impl Drop for TestAuthServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
