//! Error types for the APISIX client.
//!
//! # Design
//! Caller mistakes (`UnsupportedOperation`, `MissingPathParam`,
//! `InvalidRequest`, `InvalidConfig`) are detected before any network I/O.
//! The remaining variants describe the outcome of the single request a call
//! performs: the transport failed, the server answered with a non-2xx
//! status, or a 2xx body was not JSON.

use thiserror::Error;

use crate::http::HttpMethod;
use crate::transport::TransportError;

/// Errors returned by `ResourceClient` and the typed clients built on it.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The verb is not one the dispatcher can send.
    #[error("unsupported HTTP method: {verb}")]
    UnsupportedOperation { verb: String },

    /// A placeholder in the path template had no value.
    #[error("missing path parameter `{name}` for template `{template}`")]
    MissingPathParam { name: String, template: String },

    /// The call cannot be turned into a valid request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),

    /// The request never produced a response.
    #[error("error connecting to APISIX ({method} {url}): {source}")]
    Connectivity {
        method: HttpMethod,
        url: String,
        #[source]
        source: TransportError,
    },

    /// The server returned a status outside 2xx.
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// A 2xx response body was not valid JSON.
    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// The request payload could not be serialized to JSON.
    #[error("failed to serialize request body: {0}")]
    Serialization(#[source] serde_json::Error),
}

impl ApiError {
    /// HTTP status code, for `HttpStatus` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The server's `error_msg` field, when the error body is APISIX's
    /// structured JSON error.
    pub fn error_message(&self) -> Option<String> {
        let ApiError::HttpStatus { body, .. } = self else {
            return None;
        };
        let value: serde_json::Value = serde_json::from_str(body).ok()?;
        value
            .get("error_msg")
            .and_then(|m| m.as_str())
            .map(str::to_string)
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
