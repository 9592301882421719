//! Error types for the client and its transports.
//!
//! # Design
//! Callers see exactly two failure kinds. `NetworkError` covers every
//! transport failure and every response that is not a plain 200;
//! `CannotFindDataOrResponse` covers a transport that finished without an
//! error yet failed to hand over both a body and response metadata. The
//! underlying reason (transport message, status code) is logged, not
//! carried, so the surface stays small.

use thiserror::Error;

/// Failure delivered to a client completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The transport failed, or the response status was not 200.
    #[error("network error")]
    NetworkError,

    /// No error was reported, but the body or the response was missing.
    #[error("transport finished without data or response")]
    CannotFindDataOrResponse,
}

/// Failure reported by a transport while executing a wire request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<ureq::Error> for TransportError {
    fn from(err: ureq::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// Invalid transport configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be an unsigned integer, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
}
