//! Integration test harness for Recipe Book.
//!
//! Each test boots the real router on an ephemeral port, backed by the
//! in-memory document store and in-memory session store, and drives it over
//! HTTP with a cookie-keeping `reqwest` client. No database is needed.
//!
//! ```bash
//! cargo test -p recipe-book-integration-tests
//! ```

#![allow(clippy::missing_panics_doc, clippy::expect_used)]

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use reqwest::{Client, Response, redirect::Policy};
use secrecy::SecretString;
use url::Url;

use recipe_book_web::app;
use recipe_book_web::config::WebConfig;
use recipe_book_web::db::MemoryStore;
use recipe_book_web::state::AppState;

/// Signing secret used by every test server.
const TEST_SESSION_SECRET: &str = "Zq8#vN2!kLp4@Wm7$Rt9^Yx3&Bc6*Hd1";

/// A running server plus a client that keeps its cookies.
pub struct TestApp {
    pub client: Client,
    pub base_url: String,
    /// The document store behind the server, for asserting on stored state.
    pub store: Arc<MemoryStore>,
}

impl TestApp {
    /// Boot a fresh server with empty stores.
    pub async fn spawn() -> Self {
        let listener = tokio::net::TcpListener::bind(SocketAddr::from((Ipv4Addr::LOCALHOST, 0)))
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local address");

        let config = WebConfig {
            database_url: None,
            host: addr.ip(),
            port: addr.port(),
            base_url: Url::parse(&format!("http://{addr}")).expect("valid test URL"),
            session_secret: SecretString::from(TEST_SESSION_SECRET),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 0.0,
            sentry_traces_sample_rate: 0.0,
        };

        let store = Arc::new(MemoryStore::new());
        let state = AppState::with_store(config, store.clone());
        let router = app::build_router(state, tower_sessions::MemoryStore::default());

        tokio::spawn(async move {
            app::serve(listener, router, std::future::pending::<()>())
                .await
                .expect("Test server failed");
        });

        let client = Client::builder()
            .cookie_store(true)
            .redirect(Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: format!("http://{addr}"),
            store,
        }
    }

    /// Absolute URL for a path on the test server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// `GET` a path.
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed")
    }

    /// `POST` a urlencoded form to a path.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST request failed")
    }

    /// Submit an HTML delete form (`POST ?_method=DELETE`).
    pub async fn delete_via_form(&self, path: &str) -> Response {
        self.client
            .post(self.url(&format!("{path}?_method=DELETE")))
            .send()
            .await
            .expect("DELETE request failed")
    }
}

/// The `Location` header of a redirect response.
#[must_use]
pub fn location(response: &Response) -> String {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .expect("Response has no Location header")
        .to_string()
}
