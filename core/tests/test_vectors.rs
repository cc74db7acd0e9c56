//! Drive every handler operation against JSON test vectors in `test-vectors/`.
//!
//! Each vector describes the operation inputs, the request the handler must
//! produce, a simulated response body and either the expected result or the
//! expected error kind. A replaying transport stands in for the network and
//! records the request it was handed. Request bodies are compared as parsed
//! JSON so field order does not matter.

use std::cell::RefCell;

use serde_json::Value;
use svcapi_core::{
    host_port, ApiError, CreateServiceRequest, HttpMethod, HttpRequest, Service, ServicesHandler,
    Transport, TransportError, UpdateServiceRequest, UriError,
};

/// Returns the case's simulated body and keeps the request it was given.
struct Replay {
    body: Vec<u8>,
    seen: RefCell<Option<HttpRequest>>,
}

impl Replay {
    fn for_case(case: &Value) -> Self {
        let body = case["simulated_response"]["body"].as_str().unwrap();
        Self {
            body: body.as_bytes().to_vec(),
            seen: RefCell::new(None),
        }
    }

    fn request(&self) -> HttpRequest {
        self.seen.borrow().clone().expect("transport was not called")
    }
}

impl Transport for Replay {
    fn execute(&self, request: HttpRequest) -> Result<Vec<u8>, TransportError> {
        *self.seen.borrow_mut() = Some(request);
        Ok(self.body.clone())
    }
}

fn load(raw: &str) -> Vec<Value> {
    let vectors: Value = serde_json::from_str(raw).unwrap();
    vectors["cases"].as_array().unwrap().clone()
}

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn str_field<'a>(case: &'a Value, key: &str) -> &'a str {
    case[key].as_str().unwrap_or_else(|| panic!("missing {key}"))
}

/// Compare method, path, headers and (parsed) body against the vector.
fn check_request(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.path, expected["path"].as_str().unwrap(), "{name}: path");

    let expected_headers: Vec<(String, String)> = expected
        .get("headers")
        .and_then(Value::as_array)
        .map(|headers| {
            headers
                .iter()
                .map(|h| {
                    let arr = h.as_array().unwrap();
                    (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
                })
                .collect()
        })
        .unwrap_or_default();
    assert_eq!(req.headers, expected_headers, "{name}: headers");

    match expected.get("body") {
        Some(body) => {
            let actual: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(&actual, body, "{name}: body");
        }
        None => assert!(req.body.is_none(), "{name}: body should be None"),
    }
}

fn check_error(name: &str, err: &ApiError, expected: &Value) {
    match expected["kind"].as_str().unwrap() {
        "Api" => {
            let ApiError::Api { message, .. } = err else {
                panic!("{name}: expected Api error, got {err:?}");
            };
            assert_eq!(message, expected["message"].as_str().unwrap(), "{name}: message");
            let status = expected["status"].as_u64().unwrap() as u16;
            assert_eq!(err.status(), Some(status), "{name}: status");
        }
        "Decode" => assert!(matches!(err, ApiError::Decode(_)), "{name}: expected Decode, got {err:?}"),
        other => panic!("{name}: unknown expected_error kind: {other}"),
    }
}

/// Check a single-service outcome against `expected_result` / `expected_error`.
/// A `null` expected result means an error-free envelope with no service.
fn check_service(name: &str, case: &Value, result: Result<Option<Service>, ApiError>) {
    if let Some(expected_error) = case.get("expected_error") {
        check_error(name, &result.unwrap_err(), expected_error);
        return;
    }
    let service = result.unwrap_or_else(|e| panic!("{name}: {e}"));
    let expected: Option<Service> =
        serde_json::from_value(case["expected_result"].clone()).unwrap();
    assert_eq!(service, expected, "{name}: parsed result");
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[test]
fn create_test_vectors() {
    for case in load(include_str!("../../test-vectors/create.json")) {
        let name = str_field(&case, "name");
        let input: CreateServiceRequest = serde_json::from_value(case["input"].clone()).unwrap();

        let transport = Replay::for_case(&case);
        let result = ServicesHandler::new(&transport).create(str_field(&case, "project"), &input);

        check_request(name, &transport.request(), &case["expected_request"]);
        check_service(name, &case, result);
    }
}

// ---------------------------------------------------------------------------
// Get
// ---------------------------------------------------------------------------

#[test]
fn get_test_vectors() {
    for case in load(include_str!("../../test-vectors/get.json")) {
        let name = str_field(&case, "name");

        let transport = Replay::for_case(&case);
        let result = ServicesHandler::new(&transport)
            .get(str_field(&case, "project"), str_field(&case, "service"));

        check_request(name, &transport.request(), &case["expected_request"]);
        if let (Some(host), Ok(Some(service))) = (case.get("expected_host"), &result) {
            assert_eq!(service.hostname().unwrap(), host.as_str().unwrap(), "{name}: host");
            assert_eq!(service.port().unwrap(), str_field(&case, "expected_port"), "{name}: port");
        }
        check_service(name, &case, result);
    }
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[test]
fn update_test_vectors() {
    for case in load(include_str!("../../test-vectors/update.json")) {
        let name = str_field(&case, "name");
        let input: UpdateServiceRequest = serde_json::from_value(case["input"].clone()).unwrap();

        let transport = Replay::for_case(&case);
        let result = ServicesHandler::new(&transport).update(
            str_field(&case, "project"),
            str_field(&case, "service"),
            &input,
        );

        check_request(name, &transport.request(), &case["expected_request"]);
        check_service(name, &case, result);
    }
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[test]
fn delete_test_vectors() {
    for case in load(include_str!("../../test-vectors/delete.json")) {
        let name = str_field(&case, "name");

        let transport = Replay::for_case(&case);
        let result = ServicesHandler::new(&transport)
            .delete(str_field(&case, "project"), str_field(&case, "service"));

        check_request(name, &transport.request(), &case["expected_request"]);
        match case.get("expected_error") {
            Some(expected) => check_error(name, &result.unwrap_err(), expected),
            None => assert!(result.is_ok(), "{name}: expected success, got {result:?}"),
        }
    }
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[test]
fn list_test_vectors() {
    for case in load(include_str!("../../test-vectors/list.json")) {
        let name = str_field(&case, "name");

        let transport = Replay::for_case(&case);
        let result = ServicesHandler::new(&transport).list(str_field(&case, "project"));

        check_request(name, &transport.request(), &case["expected_request"]);
        match case.get("expected_error") {
            Some(expected) => check_error(name, &result.unwrap_err(), expected),
            None => {
                let services = result.unwrap_or_else(|e| panic!("{name}: {e}"));
                let expected: Vec<Service> =
                    serde_json::from_value(case["expected_result"].clone()).unwrap();
                assert_eq!(services, expected, "{name}: parsed result");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Connection URIs
// ---------------------------------------------------------------------------

#[test]
fn uri_test_vectors() {
    for case in load(include_str!("../../test-vectors/uri.json")) {
        let uri = str_field(&case, "uri");
        let result = host_port(uri);

        match case.get("error").and_then(Value::as_str) {
            Some("InvalidHost") => {
                assert!(matches!(result, Err(UriError::InvalidHost { .. })), "{uri:?}: {result:?}")
            }
            Some("Malformed") => {
                assert!(matches!(result, Err(UriError::Malformed { .. })), "{uri:?}: {result:?}")
            }
            Some(other) => panic!("{uri:?}: unknown error kind {other}"),
            None => {
                let (host, port) = result.unwrap_or_else(|e| panic!("{uri:?}: {e}"));
                assert_eq!(host, str_field(&case, "host"), "{uri:?}: host");
                assert_eq!(port, str_field(&case, "port"), "{uri:?}: port");
                assert!(uri.contains(&format!("{host}:{port}")), "{uri:?}: substrings");
            }
        }
    }
}
