//! Replaying transport for testing code built on `reqkit_core`.
//!
//! # Overview
//! `InterceptionHarness` is a `Transport`. Hand it to a `TransportClient`
//! in place of the network transport, program an outcome with `stub`, and
//! the unmodified client classifies the replayed outcome exactly as it
//! would a real one.
//!
//! # Design
//! - While intercepting, every request is answered from the single
//!   programmed `(data, response, error)` triple. Nothing programmed means
//!   an empty outcome.
//! - Playback ignores which request triggered it: every request sees the
//!   same triple. Tests that submit several different requests at once
//!   cannot give them different answers.
//! - When not intercepting, requests go to the fallback transport. The
//!   programmed triple is cleared on `stop_intercepting`, so a stale stub is
//!   never replayed.
//! - State is per harness instance, not process-wide; clones share it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use reqkit_core::{HttpRequest, HttpResponse, Transport, TransportError, TransportOutcome};
use tracing::debug;

/// Fallback used by `InterceptionHarness::offline`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Offline;

impl Transport for Offline {
    fn execute(&self, request: &HttpRequest) -> TransportOutcome {
        debug!(url = %request.url, "request reached offline fallback");
        TransportOutcome::Failed(TransportError::new("request was not intercepted"))
    }
}

#[derive(Debug, Clone)]
struct Stub {
    data: Option<Vec<u8>>,
    response: Option<HttpResponse>,
    error: Option<TransportError>,
}

#[derive(Debug, Default)]
struct State {
    intercepting: bool,
    stub: Option<Stub>,
    intercepted: Vec<HttpRequest>,
}

struct Shared {
    fallback: Box<dyn Transport>,
    state: Mutex<State>,
}

/// Transport that replays a programmed outcome while intercepting.
#[derive(Clone)]
pub struct InterceptionHarness {
    shared: Arc<Shared>,
}

impl InterceptionHarness {
    /// Harness that passes requests to `fallback` when not intercepting.
    pub fn new(fallback: impl Transport) -> Self {
        Self {
            shared: Arc::new(Shared {
                fallback: Box::new(fallback),
                state: Mutex::new(State::default()),
            }),
        }
    }

    /// Harness whose fallback fails every request.
    pub fn offline() -> Self {
        Self::new(Offline)
    }

    pub fn start_intercepting(&self) {
        self.state().intercepting = true;
    }

    /// Stop replaying and forget the programmed triple and recorded requests.
    pub fn stop_intercepting(&self) {
        let mut state = self.state();
        state.intercepting = false;
        state.stub = None;
        state.intercepted.clear();
    }

    pub fn is_intercepting(&self) -> bool {
        self.state().intercepting
    }

    /// Start intercepting until the returned guard is dropped.
    pub fn intercept(&self) -> InterceptGuard {
        self.start_intercepting();
        InterceptGuard {
            harness: self.clone(),
        }
    }

    /// Program the outcome for subsequent requests, replacing any earlier one.
    pub fn stub(
        &self,
        data: Option<Vec<u8>>,
        response: Option<HttpResponse>,
        error: Option<TransportError>,
    ) {
        self.state().stub = Some(Stub {
            data,
            response,
            error,
        });
    }

    /// Wire requests answered by playback since interception started.
    ///
    /// The log grows with every intercepted request and is only cleared by
    /// `stop_intercepting`.
    pub fn intercepted_requests(&self) -> Vec<HttpRequest> {
        self.state().intercepted.clone()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for InterceptionHarness {
    fn default() -> Self {
        Self::offline()
    }
}

impl Transport for InterceptionHarness {
    fn execute(&self, request: &HttpRequest) -> TransportOutcome {
        let stub = {
            let mut state = self.state();
            if !state.intercepting {
                None
            } else {
                state.intercepted.push(request.clone());
                Some(state.stub.clone())
            }
        };

        match stub {
            None => self.shared.fallback.execute(request),
            Some(stub) => {
                debug!(url = %request.url, programmed = stub.is_some(), "replaying stub");
                play(stub)
            }
        }
    }
}

/// Fold the programmed triple into a single outcome; an error in the
/// triple wins over data and response.
fn play(stub: Option<Stub>) -> TransportOutcome {
    match stub {
        None => TransportOutcome::empty(),
        Some(Stub {
            data,
            response,
            error,
        }) => TransportOutcome::from_parts(data, response, error),
    }
}

/// Stops interception on drop.
#[must_use = "interception stops as soon as the guard is dropped"]
pub struct InterceptGuard {
    harness: InterceptionHarness,
}

impl Drop for InterceptGuard {
    fn drop(&mut self) {
        self.harness.stop_intercepting();
    }
}

#[cfg(test)]
mod tests {
    use reqkit_core::{HttpMethod, Url};

    use super::*;

    fn request(path: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: Url::parse("https://any-url.test").unwrap().join(path).unwrap(),
            headers: Vec::new(),
            body: None,
        }
    }

    #[test]
    fn not_intercepting_uses_fallback() {
        let harness = InterceptionHarness::offline();
        harness.stub(Some(b"data".to_vec()), None, None);
        assert!(matches!(
            harness.execute(&request("/a")),
            TransportOutcome::Failed(_)
        ));
        assert!(harness.intercepted_requests().is_empty());
    }

    #[test]
    fn nothing_programmed_replays_empty_outcome() {
        let harness = InterceptionHarness::offline();
        harness.start_intercepting();
        assert_eq!(harness.execute(&request("/a")), TransportOutcome::empty());
    }

    #[test]
    fn later_stub_overwrites_earlier() {
        let harness = InterceptionHarness::offline();
        harness.start_intercepting();
        harness.stub(Some(b"first".to_vec()), None, None);
        harness.stub(Some(b"second".to_vec()), None, None);
        assert_eq!(
            harness.execute(&request("/a")),
            TransportOutcome::Finished {
                body: Some(b"second".to_vec()),
                response: None,
            }
        );
    }

    #[test]
    fn playback_ignores_request_content() {
        let harness = InterceptionHarness::offline();
        harness.start_intercepting();
        harness.stub(Some(b"same".to_vec()), None, None);
        assert_eq!(
            harness.execute(&request("/a")),
            harness.execute(&request("/b"))
        );
        let seen: Vec<_> = harness
            .intercepted_requests()
            .into_iter()
            .map(|r| r.url.path().to_string())
            .collect();
        assert_eq!(seen, vec!["/a", "/b"]);
    }

    #[test]
    fn programmed_error_wins_in_playback() {
        let harness = InterceptionHarness::offline();
        harness.start_intercepting();
        harness.stub(
            Some(b"data".to_vec()),
            None,
            Some(TransportError::new("reset")),
        );
        assert_eq!(
            harness.execute(&request("/a")),
            TransportOutcome::Failed(TransportError::new("reset"))
        );
    }

    #[test]
    fn intercepted_log_grows_until_stopped() {
        let harness = InterceptionHarness::offline();
        harness.start_intercepting();
        for path in ["/a", "/b", "/c"] {
            harness.execute(&request(path));
        }
        assert_eq!(harness.intercepted_requests().len(), 3);

        harness.stop_intercepting();
        assert!(harness.intercepted_requests().is_empty());
    }

    #[test]
    fn guard_drop_stops_and_clears() {
        let harness = InterceptionHarness::offline();
        {
            let _guard = harness.intercept();
            harness.stub(Some(b"data".to_vec()), None, None);
            assert!(harness.is_intercepting());
            harness.execute(&request("/a"));
        }
        assert!(!harness.is_intercepting());
        assert!(harness.intercepted_requests().is_empty());

        harness.start_intercepting();
        assert_eq!(harness.execute(&request("/a")), TransportOutcome::empty());
    }
}
