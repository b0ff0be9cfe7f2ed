//! Executes `HttpRequest` values against the network.
//!
//! # Design
//! `Transport` is the only seam that performs I/O. The default
//! `UreqTransport` is blocking and disables ureq's status-code-as-error
//! behavior so 4xx/5xx responses come back as data and the client decides
//! what they mean. Bodies are read as bytes, never decoded here. Only
//! failures that produced no response at all surface as `TransportError`.

use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::time::Duration;

use thiserror::Error;

use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Performs one HTTP round-trip.
///
/// Implementations must not retry: one `execute` is one request.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Coarse classification of a failed round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    Timeout,
    Dns,
    Connect,
    Tls,
    Io,
    Other,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransportErrorKind::Timeout => "timed out",
            TransportErrorKind::Dns => "host not found",
            TransportErrorKind::Connect => "connection failed",
            TransportErrorKind::Tls => "TLS failure",
            TransportErrorKind::Io => "I/O error",
            TransportErrorKind::Other => "transport error",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error)]
#[error("{kind}: {source}")]
pub struct TransportError {
    kind: TransportErrorKind,
    #[source]
    source: Box<dyn StdError + Send + Sync>,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self {
            kind,
            source: source.into(),
        }
    }

    pub fn kind(&self) -> TransportErrorKind {
        self.kind
    }
}

impl From<ureq::Error> for TransportError {
    fn from(err: ureq::Error) -> Self {
        let kind = match &err {
            ureq::Error::Timeout(_) => TransportErrorKind::Timeout,
            ureq::Error::HostNotFound => TransportErrorKind::Dns,
            ureq::Error::ConnectionFailed => TransportErrorKind::Connect,
            ureq::Error::Io(io_err) => io_kind(io_err),
            other if other.to_string().to_ascii_lowercase().contains("tls") => {
                TransportErrorKind::Tls
            }
            _ => TransportErrorKind::Other,
        };
        Self::new(kind, err)
    }
}

fn io_kind(err: &io::Error) -> TransportErrorKind {
    match err.kind() {
        io::ErrorKind::TimedOut => TransportErrorKind::Timeout,
        io::ErrorKind::ConnectionRefused
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::NotConnected
        | io::ErrorKind::AddrNotAvailable => TransportErrorKind::Connect,
        _ => TransportErrorKind::Io,
    }
}

/// Copies the request headers onto a ureq builder of either typestate.
macro_rules! with_headers {
    ($builder:expr, $request:expr) => {{
        let mut builder = $builder;
        for (name, value) in &$request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder
    }};
}

/// Blocking transport backed by a pooled `ureq::Agent`.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport").finish_non_exhaustive()
    }
}

impl UreqTransport {
    pub fn new(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(Some(Duration::from_secs(30)))
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = request.url.as_str();
        let body = request.body.as_deref().map(str::as_bytes);

        let result = match request.method {
            HttpMethod::Get => with_headers!(self.agent.get(url), request).call(),
            HttpMethod::Delete => with_headers!(self.agent.delete(url), request).call(),
            HttpMethod::Post => send(with_headers!(self.agent.post(url), request), body),
            HttpMethod::Put => send(with_headers!(self.agent.put(url), request), body),
            HttpMethod::Patch => send(with_headers!(self.agent.patch(url), request), body),
        };
        let mut response = result?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.body_mut().read_to_vec()?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn send(
    builder: ureq::RequestBuilder<ureq::typestate::WithBody>,
    body: Option<&[u8]>,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match body {
        Some(bytes) => builder.send(bytes),
        None => builder.send_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_are_classified() {
        let refused = io::Error::new(io::ErrorKind::ConnectionRefused, "refused");
        assert_eq!(io_kind(&refused), TransportErrorKind::Connect);
        let timed_out = io::Error::new(io::ErrorKind::TimedOut, "slow");
        assert_eq!(io_kind(&timed_out), TransportErrorKind::Timeout);
        let other = io::Error::new(io::ErrorKind::InvalidData, "garbage");
        assert_eq!(io_kind(&other), TransportErrorKind::Io);
    }

    #[test]
    fn ureq_errors_are_classified() {
        assert_eq!(
            TransportError::from(ureq::Error::HostNotFound).kind(),
            TransportErrorKind::Dns
        );
        assert_eq!(
            TransportError::from(ureq::Error::ConnectionFailed).kind(),
            TransportErrorKind::Connect
        );
    }

    #[test]
    fn display_includes_kind_and_cause() {
        let err = TransportError::new(TransportErrorKind::Timeout, "deadline exceeded");
        assert_eq!(err.to_string(), "timed out: deadline exceeded");
    }
}
