//! Declarative request specifications.
//!
//! # Design
//! A `RequestSpec` names the parts of one outbound request (base URL, path,
//! query, method, headers, body). URL and wire-request composition live in
//! the trait's provided methods so every implementation composes requests
//! the same way. Specifications are built by the caller from trusted values,
//! so composition has no error path: a base URL that cannot carry a path is
//! a programming error and panics.

use std::collections::BTreeMap;

use url::Url;

use crate::http::{HttpMethod, HttpRequest};

/// One `name[=value]` entry of a query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryItem {
    pub name: String,
    pub value: Option<String>,
}

impl QueryItem {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    /// A query entry without a value, serialized as a bare `name`.
    pub fn flag(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }
}

/// Description of a single outbound HTTP request.
pub trait RequestSpec: Send + Sync {
    /// Scheme, host and optional port. Any path on it is kept as a prefix.
    fn base_url(&self) -> Url;

    /// Appended verbatim to the base URL's path.
    fn path(&self) -> &str;

    fn method(&self) -> HttpMethod;

    /// Query entries, serialized in this order.
    fn query_items(&self) -> Vec<QueryItem> {
        Vec::new()
    }

    fn headers(&self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    fn body(&self) -> Option<Vec<u8>> {
        None
    }

    /// Base URL with `path` appended and `query_items` as the query string.
    ///
    /// Query entries are `application/x-www-form-urlencoded`: a space becomes
    /// `+`, and a literal `+` or `/` is percent-encoded (`a b+c/d` is sent as
    /// `a+b%2Bc%2Fd`).
    ///
    /// # Panics
    /// If the base URL cannot carry a path (e.g. `mailto:` or `data:` URLs).
    fn full_url(&self) -> Url {
        compose_url(self.base_url(), self.path(), &self.query_items())
    }

    /// The request a transport should execute for this specification.
    fn wire_request(&self) -> HttpRequest {
        HttpRequest {
            method: self.method(),
            url: self.full_url(),
            headers: self.headers().into_iter().collect(),
            body: self.body(),
        }
    }
}

fn compose_url(mut url: Url, path: &str, query: &[QueryItem]) -> Url {
    assert!(
        !url.cannot_be_a_base(),
        "base URL {url} cannot carry a path"
    );

    // A root-only base contributes no path of its own.
    let joined = match url.path() {
        "/" => path.to_string(),
        prefix => format!("{prefix}{path}"),
    };
    url.set_path(&joined);

    url.set_query(None);
    if !query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for item in query {
            match &item.value {
                Some(value) => pairs.append_pair(&item.name, value),
                None => pairs.append_key_only(&item.name),
            };
        }
    }
    url
}
