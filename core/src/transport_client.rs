//! `HttpClient` implementation over an injected `Transport`.
//!
//! # Design
//! `TransportClient` is stateless beyond its construction-time handles: the
//! transport that executes wire requests and the Tokio runtime whose
//! blocking pool runs them. Each submission derives the wire request on the
//! caller's thread, then executes, classifies and completes on a worker.
//! Classification is a single function, `classify`, so the order in which
//! an ambiguous outcome is resolved is fixed in one place.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::{debug, warn};

use crate::client::{ClientResult, Completion, HttpClient};
use crate::config::TransportConfig;
use crate::error::ClientError;
use crate::request::RequestSpec;
use crate::transport::{Transport, TransportOutcome};
use crate::ureq_transport::UreqTransport;

/// The only status treated as success.
const SUCCESS_STATUS: u16 = 200;

#[derive(Clone)]
pub struct TransportClient {
    transport: Arc<dyn Transport>,
    runtime: Handle,
}

impl TransportClient {
    /// Client over `transport`, running exchanges on the current runtime.
    ///
    /// # Panics
    /// When called outside a Tokio runtime; use `with_runtime` there.
    pub fn new(transport: impl Transport) -> Self {
        Self::with_runtime(transport, Handle::current())
    }

    pub fn with_runtime(transport: impl Transport, runtime: Handle) -> Self {
        Self {
            transport: Arc::new(transport),
            runtime,
        }
    }

    /// Client over a network transport built from `config`.
    ///
    /// # Panics
    /// When called outside a Tokio runtime.
    pub fn network(config: &TransportConfig) -> Self {
        Self::new(UreqTransport::new(config))
    }
}

impl HttpClient for TransportClient {
    fn request_with(&self, spec: &dyn RequestSpec, completion: Completion) {
        let request = spec.wire_request();
        let transport = Arc::clone(&self.transport);
        debug!(method = %request.method, url = %request.url, "submitting request");

        self.runtime.spawn_blocking(move || {
            let executed = panic::catch_unwind(AssertUnwindSafe(|| transport.execute(&request)));
            let result = match executed {
                Ok(outcome) => classify(outcome),
                Err(_) => {
                    warn!(url = %request.url, "transport panicked");
                    Err(ClientError::NetworkError)
                }
            };
            completion(result);
        });
    }
}

/// Map a transport outcome to the client result.
///
/// Order matters: a transport error wins over any data or response that came
/// with it; a body plus a response with status exactly 200 is success;
/// anything else fails.
pub fn classify(outcome: TransportOutcome) -> ClientResult {
    match outcome {
        TransportOutcome::Failed(err) => {
            warn!(error = %err, "transport failed");
            Err(ClientError::NetworkError)
        }
        TransportOutcome::Finished {
            body: Some(body),
            response: Some(response),
        } => {
            if response.status == SUCCESS_STATUS {
                debug!(url = %response.url, bytes = body.len(), "request succeeded");
                Ok((response, body))
            } else {
                warn!(url = %response.url, status = response.status, "unexpected status");
                Err(ClientError::NetworkError)
            }
        }
        TransportOutcome::Finished { body, response } => {
            warn!(
                has_body = body.is_some(),
                has_response = response.is_some(),
                "transport finished without data or response"
            );
            Err(ClientError::CannotFindDataOrResponse)
        }
    }
}
