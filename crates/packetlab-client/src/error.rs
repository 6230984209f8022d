use thiserror::Error;

use crate::decode::DecodeError;
use crate::transport::TransportError;

/// Top-level error taxonomy for the client.
///
/// `Transport` and `Malformed` wrap the focused error types from the
/// `transport` and `decode` modules; the remaining variants are raised by the
/// collection and capture services themselves. `InvalidSelection` and
/// `InvalidResource` are caller contract violations and are detected before
/// any request is issued.
#[derive(Debug, Error)]
pub enum Error {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("malformed response: {0}")]
    Malformed(#[from] DecodeError),
    #[error("invalid bulk selection: {0}")]
    InvalidSelection(String),
    #[error("invalid resource: {0}")]
    InvalidResource(String),
    #[error("server error: {message}")]
    Server { message: String },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
