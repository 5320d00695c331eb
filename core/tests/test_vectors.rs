//! Verify header selection, request building and response decoding against
//! the JSON test vectors stored in `test-vectors/`.
//!
//! Comparing parsed JSON (not raw strings) avoids false negatives from
//! field-ordering differences.

use jobboard_core::{
    authorization_header, parse_response, ApiConfig, AuthScheme, Gateway, HttpMethod,
    HttpRequest, HttpResponse, RequestOptions, ResponseBody, Transport, TransportError,
};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:8000";

struct NoNetwork;

impl Transport for NoNetwork {
    fn execute(&self, _: &HttpRequest) -> Result<HttpResponse, TransportError> {
        panic!("test vectors never reach the transport")
    }
}

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "PATCH" => HttpMethod::Patch,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn header_pairs(value: &Value) -> Vec<(String, String)> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            let arr = h.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect()
}

fn scheme(value: &Value) -> Option<AuthScheme> {
    value.as_str().map(|s| s.parse().unwrap())
}

// ---------------------------------------------------------------------------
// Authorization header
// ---------------------------------------------------------------------------

#[test]
fn auth_header_test_vectors() {
    let raw = include_str!("../../test-vectors/auth_header.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let token = case["token"].as_str().unwrap();
        let header = authorization_header(token, scheme(&case["hint"]));
        assert_eq!(header.as_deref(), case["expected"].as_str(), "{name}");
    }
}

// ---------------------------------------------------------------------------
// Request building
// ---------------------------------------------------------------------------

#[test]
fn request_test_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let gateway = Gateway::new(ApiConfig::new(BASE_URL), NoNetwork);
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let options = RequestOptions {
            method: parse_method(case["method"].as_str().unwrap()),
            body: case["body"].as_str().map(str::to_string),
            headers: header_pairs(&case["headers"]),
            auth_token: case["auth_token"].as_str().map(str::to_string),
            auth_scheme: scheme(&case["auth_scheme"]),
        };
        let expected = &case["expected_request"];

        let req = gateway.build_request(case["path"].as_str().unwrap(), &options).unwrap();
        assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, format!("{BASE_URL}{}", expected["url"].as_str().unwrap()), "{name}: url");
        assert_eq!(req.headers, header_pairs(&expected["headers"]), "{name}: headers");
        assert_eq!(req.body.as_deref(), expected["body"].as_str(), "{name}: body");
    }
}

// ---------------------------------------------------------------------------
// Response decoding
// ---------------------------------------------------------------------------

#[test]
fn response_test_vectors() {
    let raw = include_str!("../../test-vectors/responses.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let response = HttpResponse::new(
            case["status"].as_u64().unwrap() as u16,
            case["body"].as_str().unwrap(),
        );
        let result = parse_response(response);

        if let Some(expected) = case.get("expected_error") {
            let err = result.unwrap_err();
            assert_eq!(err.status(), Some(expected["status"].as_u64().unwrap() as u16), "{name}: status");
            assert_eq!(err.to_string(), expected["message"].as_str().unwrap(), "{name}: message");
            let expected_data = Some(&expected["data"]).filter(|d| !d.is_null());
            assert_eq!(err.data(), expected_data, "{name}: data");
        } else if let Some(expected) = case.get("expected_json") {
            assert_eq!(result.unwrap(), ResponseBody::Json(expected.clone()), "{name}");
        } else {
            let expected = case["expected_text"].as_str().unwrap();
            assert_eq!(result.unwrap(), ResponseBody::Text(expected.to_string()), "{name}");
        }
    }
}
