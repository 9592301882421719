//! Verify request composition and outcome classification against the JSON
//! test vectors stored in `test-vectors/`.
//!
//! Each request vector describes a specification and the wire request it
//! must compose to; each outcome vector describes what a transport reported
//! and the client result it must map to.

use std::collections::BTreeMap;

use reqkit_core::{
    classify, ClientError, HttpMethod, HttpResponse, QueryItem, RequestSpec, TransportError,
    TransportOutcome, Url,
};
use serde::Deserialize;

/// Request specification read from a vector file.
#[derive(Deserialize)]
struct VectorSpec {
    base_url: Url,
    path: String,
    method: HttpMethod,
    query: Vec<(String, Option<String>)>,
    headers: BTreeMap<String, String>,
    body: Option<String>,
}

impl RequestSpec for VectorSpec {
    fn base_url(&self) -> Url {
        self.base_url.clone()
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn method(&self) -> HttpMethod {
        self.method
    }

    fn query_items(&self) -> Vec<QueryItem> {
        self.query
            .iter()
            .map(|(name, value)| match value {
                Some(value) => QueryItem::new(name.as_str(), value.as_str()),
                None => QueryItem::flag(name.as_str()),
            })
            .collect()
    }

    fn headers(&self) -> BTreeMap<String, String> {
        self.headers.clone()
    }

    fn body(&self) -> Option<Vec<u8>> {
        self.body.as_ref().map(|body| body.clone().into_bytes())
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[test]
fn request_test_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let spec: VectorSpec = serde_json::from_value(case["spec"].clone()).unwrap();
        let expected = &case["expected_request"];

        let req = spec.wire_request();
        assert_eq!(req.method.as_str(), expected["method"].as_str().unwrap(), "{name}: method");
        assert_eq!(req.url.as_str(), expected["url"].as_str().unwrap(), "{name}: url");
        assert_eq!(req.url, spec.full_url(), "{name}: url matches full_url");

        let expected_headers: Vec<(String, String)> =
            serde_json::from_value(expected["headers"].clone()).unwrap();
        assert_eq!(req.headers, expected_headers, "{name}: headers");

        let expected_body = expected["body"].as_str().map(|b| b.as_bytes().to_vec());
        assert_eq!(req.body, expected_body, "{name}: body");
    }
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

#[test]
fn outcome_test_vectors() {
    let raw = include_str!("../../test-vectors/outcomes.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();
    let url = Url::parse("https://x.test/users").unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let sim = &case["outcome"];

        let body = sim["body"].as_str().map(|b| b.as_bytes().to_vec());
        let response = sim["status"]
            .as_u64()
            .map(|status| HttpResponse::new(url.clone(), status as u16));
        let error = sim["error"].as_str().map(TransportError::new);
        let result = classify(TransportOutcome::from_parts(body, response, error));

        let expected = &case["expected"];
        if let Some(expected_error) = expected.get("error") {
            let err = result.unwrap_err();
            match expected_error.as_str().unwrap() {
                "NetworkError" => assert_eq!(err, ClientError::NetworkError, "{name}"),
                "CannotFindDataOrResponse" => {
                    assert_eq!(err, ClientError::CannotFindDataOrResponse, "{name}")
                }
                other => panic!("{name}: unknown expected error: {other}"),
            }
        } else {
            let (response, body) = result.unwrap();
            assert_eq!(response.url, url, "{name}: url");
            assert_eq!(u64::from(response.status), expected["status"].as_u64().unwrap(), "{name}: status");
            assert_eq!(body, expected["body"].as_str().unwrap().as_bytes(), "{name}: body");
        }
    }
}
