//! Network transport backed by a blocking `ureq` agent.
//!
//! The agent is configured to return 4xx/5xx responses as data rather than
//! errors, so status interpretation stays with `TransportClient`. Redirects
//! are followed by the agent; the reported URL is the final one.

use tracing::debug;
use ureq::http::Response;
use ureq::typestate::{WithBody, WithoutBody};
use ureq::{Agent, Body, RequestBuilder, ResponseExt};
use url::Url;

use crate::config::TransportConfig;
use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::{Transport, TransportOutcome};

#[derive(Clone)]
pub struct UreqTransport {
    agent: Agent,
    max_body_bytes: u64,
}

impl UreqTransport {
    pub fn new(config: &TransportConfig) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(config.timeout())
            .max_redirects(config.max_redirects)
            .build()
            .new_agent();
        Self {
            agent,
            max_body_bytes: config.max_body_bytes,
        }
    }

    fn send(&self, request: &HttpRequest) -> Result<Response<Body>, ureq::Error> {
        let url = request.url.as_str();
        match request.method {
            HttpMethod::Get => send_without_body(self.agent.get(url), request),
            HttpMethod::Head => send_without_body(self.agent.head(url), request),
            HttpMethod::Delete => send_without_body(self.agent.delete(url), request),
            HttpMethod::Post => send_with_body(self.agent.post(url), request),
            HttpMethod::Put => send_with_body(self.agent.put(url), request),
            HttpMethod::Patch => send_with_body(self.agent.patch(url), request),
        }
    }

    fn exchange(&self, request: &HttpRequest) -> Result<(HttpResponse, Vec<u8>), TransportError> {
        let mut response = self.send(request)?;

        let url = Url::parse(&response.get_uri().to_string()).unwrap_or_else(|_| request.url.clone());
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let metadata = HttpResponse {
            url,
            status: response.status().as_u16(),
            headers,
        };

        let body = response
            .body_mut()
            .with_config()
            .limit(self.max_body_bytes)
            .read_to_vec()?;

        Ok((metadata, body))
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(&TransportConfig::default())
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> TransportOutcome {
        debug!(method = %request.method, url = %request.url, "sending request");
        match self.exchange(request) {
            Ok((response, body)) => TransportOutcome::Finished {
                body: Some(body),
                response: Some(response),
            },
            Err(err) => TransportOutcome::Failed(err),
        }
    }
}

fn with_headers<B>(mut builder: RequestBuilder<B>, headers: &[(String, String)]) -> RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn send_without_body(
    builder: RequestBuilder<WithoutBody>,
    request: &HttpRequest,
) -> Result<Response<Body>, ureq::Error> {
    let builder = with_headers(builder, &request.headers);
    match &request.body {
        Some(body) => builder.force_send_body().send(body.as_slice()),
        None => builder.call(),
    }
}

fn send_with_body(
    builder: RequestBuilder<WithBody>,
    request: &HttpRequest,
) -> Result<Response<Body>, ureq::Error> {
    let builder = with_headers(builder, &request.headers);
    match &request.body {
        Some(body) => builder.send(body.as_slice()),
        None => builder.send_empty(),
    }
}
