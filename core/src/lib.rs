//! Minimal HTTP client built around declarative request specifications.
//!
//! # Overview
//! A `RequestSpec` describes one request (base URL, path, query, method,
//! headers, body) and composes the final URL and wire request. An
//! `HttpClient` submits a specification and delivers exactly one
//! `ClientResult`. `TransportClient` is the implementation: it hands the
//! wire request to an injected `Transport` on a worker thread and classifies
//! the outcome.
//!
//! # Design
//! - The transport is a trait object injected at construction, so tests
//!   swap the network for a replaying fake without touching client code.
//! - `UreqTransport` is the network transport; its settings come from
//!   `TransportConfig`.
//! - Only a response with status exactly 200 and a body counts as success.
//! - Events are emitted with `tracing`; installing a subscriber is left to
//!   the application.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod request;
pub mod transport;
pub mod transport_client;
pub mod ureq_transport;

pub use client::{ClientResult, Completion, HttpClient, PendingResponse};
pub use config::TransportConfig;
pub use error::{ClientError, ConfigError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use request::{QueryItem, RequestSpec};
pub use transport::{Transport, TransportOutcome};
pub use transport_client::{classify, TransportClient};
pub use ureq_transport::UreqTransport;
pub use url::Url;
