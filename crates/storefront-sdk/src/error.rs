//! Error types for the storefront SDK.

use serde_json::{json, Value};
use thiserror::Error;

/// Result type for SDK operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the transport layer of the client.
///
/// The verb operations on [`Client`](crate::Client) never return these
/// directly; they fold them into a failure [`Envelope`](crate::Envelope).
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error during client setup or URL construction.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message describing the configuration issue.
        message: String,
    },

    /// Transport failure that is neither a timeout nor a refused connection.
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-2xx status.
    #[error("Request failed with status code {status}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Decoded response body, if the server sent one.
        body: Option<Value>,
        /// Request ID echoed by the server.
        request_id: Option<String>,
    },

    /// Server answered with 401.
    #[error("Request failed with status code 401")]
    Authentication {
        /// Decoded response body, if the server sent one.
        body: Option<Value>,
        /// Request ID echoed by the server.
        request_id: Option<String>,
    },

    /// No response arrived within the configured timeout.
    #[error("Request timed out after {duration_ms}ms")]
    Timeout {
        /// Duration in milliseconds before timeout.
        duration_ms: u64,
    },

    /// The server could not be reached.
    #[error("Connection error: {message}")]
    Connection {
        /// Error message describing the connection error.
        message: String,
    },

    /// A request payload could not be encoded as JSON.
    #[error("Failed to encode request body: {message}")]
    Encode {
        /// Error message from the serializer.
        message: String,
    },

    /// A response payload could not be decoded.
    #[error("Failed to parse response: {message}")]
    ParseError {
        /// Error message describing the parse failure.
        message: String,
    },

    /// A route was called without one of its template parameters.
    #[error("Missing path parameter '{name}' for route {route}")]
    MissingParam {
        /// Route name.
        route: String,
        /// Name of the missing parameter.
        name: String,
    },

    /// No route with the given name exists.
    #[error("Unknown route: {name}")]
    UnknownRoute {
        /// Name that was looked up.
        name: String,
    },
}

impl Error {
    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an error for a non-2xx response.
    ///
    /// A 401 status yields [`Error::Authentication`].
    pub fn from_status(status: u16, body: Option<Value>, request_id: Option<String>) -> Self {
        if status == 401 {
            Self::Authentication { body, request_id }
        } else {
            Self::Api {
                status,
                body,
                request_id,
            }
        }
    }

    /// Create a timeout error.
    pub fn timeout(duration_ms: u64) -> Self {
        Self::Timeout { duration_ms }
    }

    /// Create a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create an encode error.
    pub fn encode(message: impl Into<String>) -> Self {
        Self::Encode {
            message: message.into(),
        }
    }

    /// Create a parse error.
    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::ParseError {
            message: message.into(),
        }
    }

    /// Get the HTTP status code if a response was received.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Authentication { .. } => Some(401),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check whether this error is an authentication failure.
    pub fn is_unauthorized(&self) -> bool {
        self.status_code() == Some(401)
    }

    /// Check whether no response was received at all.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::Timeout { .. } | Self::Connection { .. }
        ) && self.status_code().is_none()
    }

    /// Get the response body the server sent with the failure.
    pub fn body(&self) -> Option<&Value> {
        match self {
            Self::Api { body, .. } | Self::Authentication { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// Get the request ID if available.
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Self::Api { request_id, .. } | Self::Authentication { request_id, .. } => {
                request_id.as_deref()
            }
            _ => None,
        }
    }

    /// Short machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "configuration",
            Self::Http(_) => "network",
            Self::Api { .. } => "http",
            Self::Authentication { .. } => "unauthorized",
            Self::Timeout { .. } => "timeout",
            Self::Connection { .. } => "connection",
            Self::Encode { .. } => "encode",
            Self::ParseError { .. } => "parse",
            Self::MissingParam { .. } => "missing_param",
            Self::UnknownRoute { .. } => "unknown_route",
        }
    }

    /// Describe the raw failure as JSON.
    pub fn to_value(&self) -> Value {
        let mut value = json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        if let Some(status) = self.status_code() {
            value["status"] = json!(status);
        }
        value
    }
}
