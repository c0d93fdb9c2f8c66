//! Integration tests for the agency content service.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p agency-integration-tests
//! ```
//!
//! Each test starts the real router on an ephemeral port, backed by the
//! in-memory record store, an in-memory session store, a temporary content
//! file and a temporary media directory. No database is needed.

use std::net::SocketAddr;

use reqwest::{Client, Response, StatusCode};
use secrecy::SecretString;
use serde_json::Value;
use tempfile::TempDir;
use tokio::net::TcpListener;

use agency_admin::content_file::ContentFile;
use agency_admin::db::MemoryStore;
use agency_admin::middleware::create_session_layer;
use agency_admin::services::PasswordVerifier;
use agency_admin::state::AppState;
use agency_admin::storage::{LocalStorage, MediaStorage};

/// Admin password accepted by every test server.
pub const ADMIN_PASSWORD: &str = "correct horse battery staple";

const SESSION_SECRET: &str = "integration-test-session-secret-0123456789abcdef";

/// A running test server and the state behind it.
pub struct TestContext {
    pub base_url: String,
    pub store: MemoryStore,
    pub content_file: ContentFile,
    _workdir: TempDir,
}

impl TestContext {
    /// Start a server on `127.0.0.1:0`.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory, listener or password verifier
    /// cannot be set up.
    pub async fn spawn() -> Self {
        let workdir = tempfile::tempdir().expect("Failed to create temp dir");
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr: SocketAddr = listener.local_addr().expect("Listener has no address");
        let base_url = format!("http://{addr}");

        let content_file = ContentFile::new(workdir.path().join("content.json"));
        content_file
            .ensure_exists()
            .await
            .expect("Failed to create content file");

        let media = MediaStorage::Local(LocalStorage::new(
            workdir.path().join("media"),
            &format!("{base_url}/media"),
        ));
        let verifier = PasswordVerifier::new(
            &SecretString::from(SESSION_SECRET),
            &SecretString::from(ADMIN_PASSWORD),
        )
        .expect("Failed to key password verifier");

        let store = MemoryStore::new();
        let state = AppState::new(store.clone(), media, content_file.clone(), verifier);
        let app = agency_admin::app(state).layer(create_session_layer(
            tower_sessions::MemoryStore::default(),
            false,
        ));

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Test server failed");
        });

        Self {
            base_url,
            store,
            content_file,
            _workdir: workdir,
        }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// A client with its own cookie jar and no session.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    pub fn client(&self) -> Client {
        Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client")
    }

    /// A client holding a logged-in admin session.
    ///
    /// # Panics
    ///
    /// Panics if the login request fails.
    pub async fn admin_client(&self) -> Client {
        let client = self.client();
        let resp = client
            .post(self.url("/api/auth/login"))
            .json(&serde_json::json!({ "password": ADMIN_PASSWORD }))
            .send()
            .await
            .expect("Login request failed");
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        client
    }
}

/// Read a response body as JSON.
///
/// # Panics
///
/// Panics if the body is not JSON.
pub async fn json_body(resp: Response) -> Value {
    resp.json().await.expect("Response body is not JSON")
}
