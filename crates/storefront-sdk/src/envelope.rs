//! The uniform result envelope returned by every gateway operation.

use crate::error::Error;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Message attached to successful envelopes.
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Success";

/// Last-resort message for failures that carry no text of their own.
pub const DEFAULT_ERROR_MESSAGE: &str = "An error occurred";

/// Outcome of a single API call.
///
/// A successful envelope always carries `data` and never `error`; a failed
/// one never carries `data`. The fields are read through accessors so the
/// two shapes cannot be mixed.
///
/// Serializes as `{success, data, message, error, statusCode}`, with
/// `statusCode` omitted when unknown.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T = Value> {
    success: bool,
    data: Option<T>,
    message: String,
    error: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status_code: Option<u16>,
}

/// The failure half of an envelope, for callers that prefer `Result`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Failure {
    /// Resolved human-readable message.
    pub message: String,
    /// Server error body, or a description of the transport failure.
    pub error: Value,
    /// HTTP status, when a response was received.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status_code {
            Some(status) => write!(f, "{} (status {})", self.message, status),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for Failure {}

impl<T> Envelope<T> {
    /// Wrap a successful payload with the default message.
    pub fn success(data: T) -> Self {
        Self::success_with_message(data, DEFAULT_SUCCESS_MESSAGE)
    }

    /// Wrap a successful payload with a custom message.
    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: message.into(),
            error: None,
            status_code: None,
        }
    }

    /// Convert a transport error into a failure envelope.
    pub fn failure(error: &Error) -> Self {
        Self::failure_with_default(error, DEFAULT_ERROR_MESSAGE)
    }

    /// Convert a transport error, using `default_message` when neither the
    /// server nor the transport supplied any text.
    pub fn failure_with_default(error: &Error, default_message: &str) -> Self {
        let transport_text = error.to_string();
        let message = resolve_message(error.body(), &transport_text, default_message);
        let detail = error.body().cloned().unwrap_or_else(|| error.to_value());
        Self::from_failure(Failure {
            message,
            error: detail,
            status_code: error.status_code(),
        })
    }

    /// Build a failure envelope from its parts.
    pub fn from_failure(failure: Failure) -> Self {
        Self {
            success: false,
            data: None,
            message: failure.message,
            error: Some(failure.error),
            status_code: failure.status_code,
        }
    }

    /// Whether the call succeeded.
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// The response payload of a successful call.
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// The resolved message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The failure detail of an unsuccessful call.
    pub fn error(&self) -> Option<&Value> {
        self.error.as_ref()
    }

    /// The HTTP status of an unsuccessful call, when known.
    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    /// Convert into a `Result`.
    pub fn into_result(self) -> Result<T, Failure> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            _ => Err(Failure {
                message: self.message,
                error: self.error.unwrap_or(Value::Null),
                status_code: self.status_code,
            }),
        }
    }

    /// Map the payload of a successful envelope.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Envelope<U> {
        Envelope {
            success: self.success,
            data: self.data.map(f),
            message: self.message,
            error: self.error,
            status_code: self.status_code,
        }
    }
}

impl Envelope<Value> {
    /// Decode the payload into `T`.
    ///
    /// A payload that does not match `T` turns the envelope into a failure.
    pub fn into_typed<T: DeserializeOwned>(self) -> Envelope<T> {
        if !self.success {
            return Envelope {
                success: false,
                data: None,
                message: self.message,
                error: self.error,
                status_code: self.status_code,
            };
        }
        let data = self.data.unwrap_or(Value::Null);
        match serde_json::from_value(data) {
            Ok(typed) => Envelope::success_with_message(typed, self.message),
            Err(e) => Envelope::failure(&Error::parse_error(e.to_string())),
        }
    }
}

/// Pick the failure message: the server's `message` field, then the
/// transport's own text, then `default_message`. Empty strings are skipped.
pub fn resolve_message(
    body: Option<&Value>,
    transport_text: &str,
    default_message: &str,
) -> String {
    body.and_then(|b| b.get("message"))
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .or(Some(transport_text).filter(|t| !t.is_empty()))
        .unwrap_or(default_message)
        .to_string()
}
