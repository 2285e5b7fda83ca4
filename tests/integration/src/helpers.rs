//! Test helper utilities for integration tests

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use storefront_sdk::{Client, MemoryCredentialStore, Navigator, Session};
use tracing_subscriber::EnvFilter;

/// Initialize tracing for tests (only once)
static TRACING: Lazy<()> = Lazy::new(|| {
    if std::env::var("TEST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }
});

/// Initialize tracing for tests
pub fn init_tracing() {
    Lazy::force(&TRACING);
}

/// Navigator that remembers every destination it was sent to
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visits: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    /// Destinations visited so far, in order
    pub fn visits(&self) -> Vec<String> {
        self.visits.lock().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.visits.lock().push(path.to_string());
    }
}

/// A client wired to an in-memory session and a recording navigator
pub struct TestClient {
    /// Client under test
    pub client: Client,
    /// Session shared with the client
    pub session: Session,
    /// Navigator shared with the session
    pub navigator: Arc<RecordingNavigator>,
}

impl TestClient {
    /// Unauthenticated client for `base_url`
    pub fn new(base_url: &str) -> Self {
        Self::build(base_url, None, None)
    }

    /// Client that already holds `token`
    pub fn with_token(base_url: &str, token: &str) -> Self {
        Self::build(base_url, Some(token), None)
    }

    /// Client with a custom request timeout
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Self {
        Self::build(base_url, None, Some(timeout))
    }

    fn build(base_url: &str, token: Option<&str>, timeout: Option<Duration>) -> Self {
        init_tracing();

        let store = match token {
            Some(token) => MemoryCredentialStore::with_token(token),
            None => MemoryCredentialStore::new(),
        };
        let navigator = Arc::new(RecordingNavigator::default());
        let session = Session::new(Arc::new(store), navigator.clone());

        let mut builder = Client::builder()
            .base_url(base_url)
            .session(session.clone());
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().expect("Failed to build client");

        Self {
            client,
            session,
            navigator,
        }
    }
}
