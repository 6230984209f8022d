//! HTTP transport seam.
//!
//! The rest of the crate talks to the server exclusively through the
//! [`Transport`] trait: one call per request, blocking, raising on non-2xx.
//! `HttpTransport` is the reqwest-backed implementation; tests substitute an
//! in-memory fake. Authentication, retries and timeouts are the transport
//! owner's concern, not the client's.

use std::io::Read;

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::decode::DecodeError;

mod http;

pub use http::HttpTransport;

/// HTTP method selector for [`Transport::send`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// A fully buffered 2xx response.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code (always in the 2xx range).
    pub status: u16,
    /// Filename parsed from a `Content-Disposition` header, when present.
    pub filename: Option<String>,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Deserialize the body as JSON into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, DecodeError> {
        serde_json::from_slice(&self.body).map_err(DecodeError::from)
    }

    /// Parse the body into a dynamic JSON value.
    pub fn json_value(&self) -> Result<serde_json::Value, DecodeError> {
        serde_json::from_slice(&self.body).map_err(DecodeError::from)
    }
}

/// A 2xx response whose body is consumed incrementally.
pub struct ByteStream {
    /// Chunked body reader; dropped without draining on error paths.
    pub reader: Box<dyn Read>,
    /// Filename parsed from a `Content-Disposition` header, when present.
    pub filename: Option<String>,
}

/// Blocking request/response transport.
///
/// Implementations must return `Err` for any non-2xx status and must be safe
/// for concurrent use from multiple threads if callers share them.
pub trait Transport {
    /// Perform a request with optional query parameters and JSON body,
    /// buffering the full response.
    fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&serde_json::Value>,
    ) -> Result<RawResponse, TransportError>;

    /// Perform a GET request whose body is streamed rather than buffered.
    fn stream(&self, path: &str, query: &[(&str, String)]) -> Result<ByteStream, TransportError>;
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },
}

/// Extract the filename from a `Content-Disposition` header value.
///
/// Handles the common `attachment; filename="capture.pcap"` form plus the
/// unquoted variant; `filename*=` encoding is not supported.
pub(crate) fn filename_from_disposition(value: &str) -> Option<String> {
    for part in value.split(';') {
        let part = part.trim();
        if let Some(rest) = part.strip_prefix("filename=") {
            let name = rest.trim().trim_matches('"');
            if !name.is_empty() {
                return Some(name.to_string());
            }
        }
    }
    None
}
