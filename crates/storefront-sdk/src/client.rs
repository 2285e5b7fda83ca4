//! HTTP client for the storefront SDK.

use crate::config::{resolve_base_url, ClientConfig, BASE_URL_ENV};
use crate::envelope::Envelope;
use crate::error::{Error, Result};
use crate::request::{EndpointCall, RequestOptions, Verb};
use crate::session::Session;
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT,
};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn, Span};
use url::Url;
use uuid::Uuid;

/// Header carrying the per-call correlation ID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Client for the storefront API.
///
/// Every outbound call picks up the session credential, every 401 tears the
/// session down, and every verb operation returns an [`Envelope`] instead of
/// an error.
///
/// # Example
///
/// ```rust,no_run
/// use storefront_sdk::{Client, RequestOptions, Session};
///
/// #[tokio::main]
/// async fn main() -> Result<(), storefront_sdk::Error> {
///     let client = Client::builder()
///         .base_url("https://shop.example.com/api")
///         .session(Session::in_memory())
///         .build()?;
///
///     let page = client
///         .get("/products", RequestOptions::new().param("page", 1))
///         .await;
///
///     if page.is_success() {
///         println!("{:?}", page.data());
///     } else {
///         eprintln!("{}", page.message());
///     }
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Client {
    /// HTTP client.
    http: reqwest::Client,
    /// Client configuration.
    config: Arc<ClientConfig>,
    /// Injected session context.
    session: Session,
}

impl Client {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a client from the environment with the given session.
    pub fn from_env(session: Session) -> Result<Self> {
        Self::new(ClientConfig::from_env(), session)
    }

    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig, session: Session) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| Error::configuration(format!("Invalid user agent: {}", e)))?,
        );

        for (name, value) in &config.custom_headers {
            let (name, value) = parse_header(name, value)?;
            headers.insert(name, value);
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| Error::configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            config: Arc::new(config),
            session,
        })
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the session context.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Read a resource.
    pub async fn get(&self, path: &str, options: RequestOptions) -> Envelope {
        self.call(EndpointCall::new(Verb::Get, path).with_options(options))
            .await
    }

    /// Create a resource.
    pub async fn post<B>(&self, path: &str, body: &B, options: RequestOptions) -> Envelope
    where
        B: Serialize + ?Sized,
    {
        self.call_with_body(Verb::Post, path, body, options).await
    }

    /// Replace a resource.
    pub async fn put<B>(&self, path: &str, body: &B, options: RequestOptions) -> Envelope
    where
        B: Serialize + ?Sized,
    {
        self.call_with_body(Verb::Put, path, body, options).await
    }

    /// Partially update a resource.
    pub async fn patch<B>(&self, path: &str, body: &B, options: RequestOptions) -> Envelope
    where
        B: Serialize + ?Sized,
    {
        self.call_with_body(Verb::Patch, path, body, options).await
    }

    /// Delete a resource.
    pub async fn delete(&self, path: &str, options: RequestOptions) -> Envelope {
        self.call(EndpointCall::new(Verb::Delete, path).with_options(options))
            .await
    }

    /// Dispatch a call and fold the outcome into an envelope.
    pub async fn call(&self, call: EndpointCall) -> Envelope {
        match self.execute(&call).await {
            Ok(data) => Envelope::success(data),
            Err(e) => Envelope::failure(&e),
        }
    }

    /// Dispatch a call and return the raw outcome.
    ///
    /// The session is still torn down on a 401 before the error is returned.
    #[instrument(
        skip(self, call),
        fields(method = %call.verb, path = %call.path, request_id = tracing::field::Empty)
    )]
    pub async fn execute(&self, call: &EndpointCall) -> Result<Value> {
        let request_id = Uuid::new_v4().to_string();
        Span::current().record("request_id", request_id.as_str());

        self.dispatch(call, &request_id)
            .await
            .map_err(|e| self.intercept_failure(e))
    }

    async fn call_with_body<B>(
        &self,
        verb: Verb,
        path: &str,
        body: &B,
        options: RequestOptions,
    ) -> Envelope
    where
        B: Serialize + ?Sized,
    {
        match encode_body(body) {
            Ok(body) => {
                self.call(
                    EndpointCall::new(verb, path)
                        .with_body(body)
                        .with_options(options),
                )
                .await
            }
            Err(e) => Envelope::failure(&e),
        }
    }

    async fn dispatch(&self, call: &EndpointCall, request_id: &str) -> Result<Value> {
        let url = self.url(&call.path)?;

        let mut request = self
            .http
            .request(call.verb.as_method(), url.clone())
            .header(REQUEST_ID_HEADER, request_id);

        if !call.options.query.is_empty() {
            request = request.query(&call.options.query);
        }
        for (name, value) in &call.options.headers {
            let (name, value) = parse_header(name, value)?;
            request = request.header(name, value);
        }
        if let Some(body) = call.wire_body() {
            request = request.json(&body);
        }
        let mut request = request.build().map_err(|e| self.map_reqwest_error(e))?;
        self.authorize(&mut request);

        debug!("Sending {} request to {}", call.verb, url);

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| self.map_reqwest_error(e))?;
        let status = response.status();

        debug!(status = status.as_u16(), "Received response");

        if status.is_success() {
            self.read_body(response).await
        } else {
            Err(self.handle_error_response(response, request_id).await)
        }
    }

    /// Attach the session credential, if any, to an outgoing request.
    ///
    /// The session bearer replaces any `Authorization` header set per call.
    fn authorize(&self, request: &mut reqwest::Request) {
        let Some(token) = self.session.bearer() else {
            return;
        };

        match HeaderValue::from_str(&format!("Bearer {}", token.expose_secret())) {
            Ok(mut value) => {
                value.set_sensitive(true);
                request.headers_mut().insert(AUTHORIZATION, value);
            }
            Err(_) => {
                warn!("Stored credential is not a valid header value, sending unauthenticated");
            }
        }
    }

    /// Tear the session down on a 401, then hand the error back unchanged.
    fn intercept_failure(&self, error: Error) -> Error {
        if error.is_unauthorized() {
            self.session.teardown(self.config.login_path());
        }
        error
    }

    /// Build a URL for the given path.
    fn url(&self, path: &str) -> Result<Url> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return Url::parse(path)
                .map_err(|e| Error::configuration(format!("Invalid URL '{}': {}", path, e)));
        }

        let base = self.config.base_url.as_str().trim_end_matches('/');
        let joined = format!("{}/{}", base, path.trim_start_matches('/'));
        Url::parse(&joined)
            .map_err(|e| Error::configuration(format!("Invalid URL path '{}': {}", path, e)))
    }

    /// Read a successful response body.
    async fn read_body(&self, response: reqwest::Response) -> Result<Value> {
        let text = response.text().await.map_err(|e| self.map_reqwest_error(e))?;
        Ok(parse_body(&text).unwrap_or(Value::Null))
    }

    /// Handle an error response.
    ///
    /// A request ID echoed by the server wins over the one we sent.
    async fn handle_error_response(&self, response: reqwest::Response, sent_id: &str) -> Error {
        let status = response.status().as_u16();
        let request_id = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(sent_id)
            .to_string();

        let body = response.text().await.unwrap_or_default();

        Error::from_status(status, parse_body(&body), Some(request_id))
    }

    /// Map a reqwest error to an SDK error.
    fn map_reqwest_error(&self, error: reqwest::Error) -> Error {
        if error.is_timeout() {
            Error::Timeout {
                duration_ms: self.config.timeout.as_millis() as u64,
            }
        } else if error.is_connect() {
            Error::Connection {
                message: error.to_string(),
            }
        } else {
            Error::Http(error)
        }
    }
}

/// Decode a response body: JSON when possible, the raw text otherwise.
fn parse_body(text: &str) -> Option<Value> {
    if text.trim().is_empty() {
        return None;
    }
    Some(serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string())))
}

fn encode_body<B: Serialize + ?Sized>(body: &B) -> Result<Value> {
    serde_json::to_value(body).map_err(|e| Error::encode(e.to_string()))
}

fn parse_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue)> {
    let header_name = HeaderName::try_from(name)
        .map_err(|e| Error::configuration(format!("Invalid header name '{}': {}", name, e)))?;
    let header_value = HeaderValue::from_str(value)
        .map_err(|e| Error::configuration(format!("Invalid header value for '{}': {}", name, e)))?;
    Ok((header_name, header_value))
}

/// Builder for creating a Client.
#[derive(Debug, Default)]
pub struct ClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    user_agent: Option<String>,
    login_path: Option<String>,
    custom_headers: Vec<(String, String)>,
    session: Option<Session>,
}

impl ClientBuilder {
    /// Create a new client builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL. Without one, the builder reads [`BASE_URL_ENV`].
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the login path used on session teardown.
    pub fn login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = Some(path.into());
        self
    }

    /// Add a header sent with every request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_headers.push((name.into(), value.into()));
        self
    }

    /// Inject the session context.
    pub fn session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<Client> {
        let base_url = match self.base_url {
            Some(raw) => Url::parse(&raw)
                .map_err(|e| Error::configuration(format!("Invalid base URL '{}': {}", raw, e)))?,
            None => resolve_base_url(std::env::var(BASE_URL_ENV).ok().as_deref()),
        };

        let config = ClientConfig {
            base_url,
            timeout: self.timeout.unwrap_or(ClientConfig::DEFAULT_TIMEOUT),
            connect_timeout: self
                .connect_timeout
                .unwrap_or(ClientConfig::DEFAULT_CONNECT_TIMEOUT),
            user_agent: self
                .user_agent
                .unwrap_or_else(|| ClientConfig::DEFAULT_USER_AGENT.to_string()),
            login_path: self
                .login_path
                .unwrap_or_else(|| ClientConfig::DEFAULT_LOGIN_PATH.to_string()),
            custom_headers: self.custom_headers,
        };

        Client::new(config, self.session.unwrap_or_default())
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.config.base_url)
            .field("timeout", &self.config.timeout)
            .field("authenticated", &self.session.is_authenticated())
            .finish()
    }
}
