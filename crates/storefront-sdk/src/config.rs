//! Client configuration for the storefront SDK.

use std::time::Duration;
use url::Url;

/// Environment variable holding the API base address.
pub const BASE_URL_ENV: &str = "STOREFRONT_API_BASE_URL";

/// Base address used when [`BASE_URL_ENV`] is unset or blank.
pub const FALLBACK_BASE_URL: &str = "https://api.example.com";

/// Configuration for the storefront client.
///
/// Built once through [`ClientBuilder`](crate::ClientBuilder) and shared
/// read-only for the lifetime of the client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the storefront API.
    pub(crate) base_url: Url,
    /// Request timeout duration.
    pub(crate) timeout: Duration,
    /// Connection timeout duration.
    pub(crate) connect_timeout: Duration,
    /// User agent string.
    pub(crate) user_agent: String,
    /// Path the session navigates to after an authentication failure.
    pub(crate) login_path: String,
    /// Custom headers to include in requests.
    pub(crate) custom_headers: Vec<(String, String)>,
}

impl ClientConfig {
    /// Default request timeout (10 seconds).
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
    /// Default connection timeout (10 seconds).
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
    /// Default login destination.
    pub const DEFAULT_LOGIN_PATH: &'static str = "/login";
    /// Default user agent.
    pub const DEFAULT_USER_AGENT: &'static str = concat!(
        "storefront-sdk-rust/",
        env!("CARGO_PKG_VERSION")
    );

    /// Create a new configuration with default values.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: Self::DEFAULT_TIMEOUT,
            connect_timeout: Self::DEFAULT_CONNECT_TIMEOUT,
            user_agent: Self::DEFAULT_USER_AGENT.to_string(),
            login_path: Self::DEFAULT_LOGIN_PATH.to_string(),
            custom_headers: Vec::new(),
        }
    }

    /// Create a configuration whose base URL comes from [`BASE_URL_ENV`].
    ///
    /// Falls back to [`FALLBACK_BASE_URL`] when the variable is unset, blank
    /// or not a valid URL.
    pub fn from_env() -> Self {
        Self::new(resolve_base_url(std::env::var(BASE_URL_ENV).ok().as_deref()))
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Get the request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Get the connection timeout.
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Get the user agent.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Get the login path used on session teardown.
    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Get custom headers.
    pub fn custom_headers(&self) -> &[(String, String)] {
        &self.custom_headers
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(fallback_base_url())
    }
}

/// Pick the base URL from an optional configured value.
pub(crate) fn resolve_base_url(configured: Option<&str>) -> Url {
    match configured.map(str::trim).filter(|v| !v.is_empty()) {
        Some(value) => Url::parse(value).unwrap_or_else(|e| {
            tracing::warn!(
                value,
                error = %e,
                "Ignoring invalid {}, using {}",
                BASE_URL_ENV,
                FALLBACK_BASE_URL
            );
            fallback_base_url()
        }),
        None => fallback_base_url(),
    }
}

#[allow(clippy::expect_used)]
fn fallback_base_url() -> Url {
    Url::parse(FALLBACK_BASE_URL).expect("valid fallback URL")
}
