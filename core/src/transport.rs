//! The boundary between the client and whatever actually moves bytes.
//!
//! # Design
//! A `Transport` executes one wire request and reports one
//! `TransportOutcome`. Execution is blocking; `TransportClient` runs it on a
//! worker so submission never blocks the caller. Real transports talk to the
//! network (`UreqTransport`); test transports replay programmed outcomes.

use std::sync::Arc;

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};

/// Executes wire requests. Called once per submitted request, on a worker
/// thread.
pub trait Transport: Send + Sync + 'static {
    fn execute(&self, request: &HttpRequest) -> TransportOutcome;
}

impl<T: Transport> Transport for Arc<T> {
    fn execute(&self, request: &HttpRequest) -> TransportOutcome {
        (**self).execute(request)
    }
}

/// What a transport reports when a request finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportOutcome {
    /// The exchange failed at the transport level.
    Failed(TransportError),

    /// The exchange finished without a transport error. Either part may be
    /// missing.
    Finished {
        body: Option<Vec<u8>>,
        response: Option<HttpResponse>,
    },
}

impl TransportOutcome {
    /// Fold the loose `(data, response, error)` shape reported by callback
    /// style transports. An error wins over anything delivered with it.
    pub fn from_parts(
        body: Option<Vec<u8>>,
        response: Option<HttpResponse>,
        error: Option<TransportError>,
    ) -> Self {
        match error {
            Some(err) => TransportOutcome::Failed(err),
            None => TransportOutcome::Finished { body, response },
        }
    }

    /// A finished exchange that produced nothing at all.
    pub fn empty() -> Self {
        TransportOutcome::Finished {
            body: None,
            response: None,
        }
    }
}
