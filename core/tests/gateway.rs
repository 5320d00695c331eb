//! Gateway behavior against an in-memory transport.
//!
//! `Scripted` replays one canned outcome and records every request it is
//! asked to execute, so tests can assert both what was sent and whether
//! anything was sent at all.

use std::sync::Mutex;

use jobboard_core::{
    ApiConfig, ApiError, AuthScheme, Credential, Gateway, HttpRequest, HttpResponse,
    RequestOptions, ResponseBody, Transport, TransportError, NETWORK_ERROR_MESSAGE,
};
use serde_json::json;

struct Scripted {
    outcome: Result<HttpResponse, TransportError>,
    seen: Mutex<Vec<HttpRequest>>,
}

impl Scripted {
    fn respond(status: u16, body: &str) -> Self {
        Self {
            outcome: Ok(HttpResponse::new(status, body)),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn fail(err: TransportError) -> Self {
        Self {
            outcome: Err(err),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    fn last(&self) -> HttpRequest {
        self.seen.lock().unwrap().last().cloned().expect("no request sent")
    }
}

impl Transport for Scripted {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.seen.lock().unwrap().push(request.clone());
        self.outcome.clone()
    }
}

fn gateway(transport: &Scripted) -> Gateway<&Scripted> {
    Gateway::new(ApiConfig::new("http://api.test"), transport)
}

// --- authorization scheme ---

#[test]
fn three_segment_token_is_sent_as_bearer() {
    let transport = Scripted::respond(200, "{}");
    let options = RequestOptions::get().auth_token(" aaa.bbb.ccc ");
    gateway(&transport).request("/api/profile/", &options).unwrap();
    assert_eq!(transport.last().header("Authorization"), Some("Bearer aaa.bbb.ccc"));
}

#[test]
fn other_token_shapes_are_sent_as_token() {
    for token in ["abc", "a.b", "a..c", "a.b.c.d", ".b.c"] {
        let transport = Scripted::respond(200, "{}");
        let options = RequestOptions::get().auth_token(token);
        gateway(&transport).request("/api/profile/", &options).unwrap();
        assert_eq!(
            transport.last().header("Authorization"),
            Some(format!("Token {token}").as_str()),
            "{token}"
        );
    }
}

#[test]
fn scheme_hint_overrides_shape() {
    let transport = Scripted::respond(200, "{}");
    let credential = Credential::new("aaa.bbb.ccc").with_scheme(AuthScheme::Django);
    gateway(&transport)
        .request("/api/profile/", &RequestOptions::get().auth(&credential))
        .unwrap();
    assert_eq!(transport.last().header("Authorization"), Some("Token aaa.bbb.ccc"));

    let transport = Scripted::respond(200, "{}");
    let credential = Credential::new("opaque").with_scheme(AuthScheme::Supabase);
    gateway(&transport)
        .request("/api/profile/", &RequestOptions::get().auth(&credential))
        .unwrap();
    assert_eq!(transport.last().header("Authorization"), Some("Bearer opaque"));
}

#[test]
fn no_token_means_no_authorization_header() {
    let transport = Scripted::respond(200, "{}");
    gateway(&transport).request("/api/health/", &RequestOptions::get()).unwrap();
    let sent = transport.last();
    assert_eq!(sent.header("Authorization"), None);
    assert_eq!(sent.header("Content-Type"), Some("application/json"));
    assert_eq!(sent.header("ngrok-skip-browser-warning"), Some("true"));
    assert_eq!(sent.url, "http://api.test/api/health/");
}

// --- configuration ---

#[test]
fn unset_base_url_fails_before_any_io() {
    let transport = Scripted::respond(200, "{}");
    let gateway = Gateway::new(ApiConfig::unset(), &transport);
    let err = gateway.request("/api/health/", &RequestOptions::get()).unwrap_err();
    assert!(matches!(err, ApiError::Config(_)));
    assert_eq!(transport.calls(), 0);
}

#[test]
fn undefined_base_url_fails_before_any_io() {
    let transport = Scripted::respond(200, "{}");
    let gateway = Gateway::new(ApiConfig::new("undefined"), &transport);
    let err = gateway.request("/api/health/", &RequestOptions::get()).unwrap_err();
    assert!(matches!(err, ApiError::Config(_)));
    assert_eq!(transport.calls(), 0);
}

// --- error responses ---

#[test]
fn json_error_body_is_exposed_as_data() {
    let transport = Scripted::respond(401, r#"{"detail":"Invalid credentials"}"#);
    let err = gateway(&transport)
        .request("/api/auth/login/", &RequestOptions::post().body("{}"))
        .unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.data(), Some(&json!({"detail": "Invalid credentials"})));
    assert_eq!(err.detail(), Some("Invalid credentials"));
}

#[test]
fn text_error_body_becomes_message() {
    let transport = Scripted::respond(500, "Internal Server Error");
    let err = gateway(&transport).request("/api/jobs/", &RequestOptions::get()).unwrap_err();
    assert_eq!(err.to_string(), "Internal Server Error");
    assert_eq!(err.status(), Some(500));
    assert!(err.data().is_none());
}

// --- transport failures ---

#[test]
fn failed_to_fetch_is_rewritten() {
    let transport = Scripted::fail(TransportError::other("Failed to fetch"));
    let err = gateway(&transport).request("/api/health/", &RequestOptions::get()).unwrap_err();
    assert_eq!(err.to_string(), NETWORK_ERROR_MESSAGE);
    assert!(err.status().is_none());
}

#[test]
fn unreachable_kind_is_rewritten() {
    let transport = Scripted::fail(TransportError::unreachable("io: Connection refused"));
    let err = gateway(&transport).request("/api/health/", &RequestOptions::get()).unwrap_err();
    assert!(matches!(err, ApiError::Network));
}

#[test]
fn other_transport_errors_are_unchanged() {
    let transport = Scripted::fail(TransportError::other("certificate has expired"));
    let err = gateway(&transport).request("/api/health/", &RequestOptions::get()).unwrap_err();
    assert_eq!(err.to_string(), "certificate has expired");
}

// --- success responses ---

#[test]
fn json_success_round_trips() {
    let transport = Scripted::respond(200, r#"{"status":"ok"}"#);
    let body = gateway(&transport).request("/api/health/", &RequestOptions::get()).unwrap();
    assert_eq!(body, ResponseBody::Json(json!({"status": "ok"})));
}

#[test]
fn text_success_is_returned_verbatim() {
    let transport = Scripted::respond(200, "pong\n");
    let body = gateway(&transport).request("/api/ping/", &RequestOptions::get()).unwrap();
    assert_eq!(body.as_text(), Some("pong\n"));
}

#[test]
fn each_call_builds_its_own_headers() {
    let transport = Scripted::respond(200, "{}");
    let gw = gateway(&transport);
    gw.request("/api/profile/", &RequestOptions::get().auth_token("first"))
        .unwrap();
    gw.request("/api/health/", &RequestOptions::get()).unwrap();
    let seen = transport.seen.lock().unwrap();
    assert_eq!(seen[0].header("Authorization"), Some("Token first"));
    assert_eq!(seen[1].header("Authorization"), None);
}
