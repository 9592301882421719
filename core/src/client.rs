//! The client contract: submit a request specification, get one typed result.
//!
//! # Design
//! `HttpClient::request_with` is the primitive: it returns immediately and
//! invokes the completion exactly once, from whatever worker finished the
//! exchange. `HttpClient::request` wraps it in a `PendingResponse` future so
//! async callers can simply `.await` the result. Neither form imposes a
//! timeout; callers that want one wrap the future themselves.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;
use tracing::warn;

use crate::error::ClientError;
use crate::http::HttpResponse;
use crate::request::RequestSpec;

/// Response metadata and body of a successful exchange, or why it failed.
pub type ClientResult = Result<(HttpResponse, Vec<u8>), ClientError>;

/// Callback invoked once with the result of a submission.
pub type Completion = Box<dyn FnOnce(ClientResult) + Send + 'static>;

/// Submits request specifications and delivers typed results.
pub trait HttpClient: Send + Sync {
    /// Start the request and return immediately. `completion` runs exactly
    /// once, possibly on another thread.
    fn request_with(&self, spec: &dyn RequestSpec, completion: Completion);

    /// Start the request and return a future resolving to its result.
    fn request(&self, spec: &dyn RequestSpec) -> PendingResponse {
        let (sender, receiver) = oneshot::channel();
        self.request_with(
            spec,
            Box::new(move |result| {
                // The caller may have dropped the future; nothing to deliver to.
                let _ = sender.send(result);
            }),
        );
        PendingResponse { receiver }
    }
}

/// Result of one submission, resolved exactly once.
///
/// If the worker disappears without completing (it panicked, or the runtime
/// shut down) the future resolves to `ClientError::NetworkError` instead of
/// hanging.
#[derive(Debug)]
pub struct PendingResponse {
    receiver: oneshot::Receiver<ClientResult>,
}

impl PendingResponse {
    /// Block the current thread until the result arrives.
    ///
    /// # Panics
    /// When called from within an async execution context.
    pub fn wait(self) -> ClientResult {
        self.receiver.blocking_recv().unwrap_or_else(|_| abandoned())
    }
}

impl Future for PendingResponse {
    type Output = ClientResult;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<ClientResult> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|received| received.unwrap_or_else(|_| abandoned()))
    }
}

fn abandoned() -> ClientResult {
    warn!("request worker dropped its completion");
    Err(ClientError::NetworkError)
}
