//! The single entry point every backend call goes through.
//!
//! # Design
//! `Gateway` holds an immutable `ApiConfig` and a `Transport`, nothing else.
//! A call is split the same way the rest of the crate is: `build_request`
//! produces an `HttpRequest`, the transport executes it, `parse_response`
//! decodes the `HttpResponse`. Each step is public so it can be tested
//! without a network.
//!
//! The gateway does not log, retry, or time out. Those belong to callers.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::auth::{authorization_header, AuthScheme, Credential};
use crate::config::ApiConfig;
use crate::error::{ApiError, TransportError, TransportErrorKind};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::Transport;

pub const CONTENT_TYPE_HEADER: &str = "Content-Type";
pub const AUTHORIZATION_HEADER: &str = "Authorization";
/// Stops tunneling proxies from answering with an HTML interstitial.
pub const PROXY_BYPASS_HEADER: &str = "ngrok-skip-browser-warning";

/// Per-call options. Defaults to a GET with no body and no credential.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub method: HttpMethod,
    /// Pre-serialized JSON.
    pub body: Option<String>,
    /// Merged over the default headers; same-named entries win.
    pub headers: Vec<(String, String)>,
    pub auth_token: Option<String>,
    pub auth_scheme: Option<AuthScheme>,
}

impl RequestOptions {
    pub fn new(method: HttpMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn get() -> Self {
        Self::new(HttpMethod::Get)
    }

    pub fn post() -> Self {
        Self::new(HttpMethod::Post)
    }

    pub fn put() -> Self {
        Self::new(HttpMethod::Put)
    }

    pub fn patch() -> Self {
        Self::new(HttpMethod::Patch)
    }

    pub fn delete() -> Self {
        Self::new(HttpMethod::Delete)
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn json<B: Serialize + ?Sized>(self, body: &B) -> Result<Self, ApiError> {
        let body = serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(self.body(body))
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn auth_scheme(mut self, scheme: AuthScheme) -> Self {
        self.auth_scheme = Some(scheme);
        self
    }

    pub fn auth(mut self, credential: &Credential) -> Self {
        self.auth_token = Some(credential.token.clone());
        self.auth_scheme = credential.scheme;
        self
    }

    pub fn maybe_auth(self, credential: Option<&Credential>) -> Self {
        match credential {
            Some(credential) => self.auth(credential),
            None => self,
        }
    }
}

/// A decoded success body: JSON when it parses, otherwise the raw text.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseBody::Text(text) => Some(text),
            ResponseBody::Json(_) => None,
        }
    }

    /// Deserialize a JSON body into a typed contract.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        match self {
            ResponseBody::Json(value) => {
                serde_json::from_value(value).map_err(|e| ApiError::Deserialization(e.to_string()))
            }
            ResponseBody::Text(text) => Err(ApiError::Deserialization(format!(
                "expected a JSON body, got text: {text:?}"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Gateway<T> {
    config: ApiConfig,
    transport: T,
}

impl<T: Transport> Gateway<T> {
    pub fn new(config: ApiConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Issue one request. Fails with `ApiError::Config` before touching the
    /// transport when the base URL is unusable.
    pub fn request(&self, path: &str, options: &RequestOptions) -> Result<ResponseBody, ApiError> {
        let request = self.build_request(path, options)?;
        let response = self
            .transport
            .execute(&request)
            .map_err(normalize_transport_error)?;
        parse_response(response)
    }

    pub fn build_request(&self, path: &str, options: &RequestOptions) -> Result<HttpRequest, ApiError> {
        let base_url = self.config.base_url()?;
        Ok(HttpRequest {
            method: options.method,
            url: format!("{base_url}{path}"),
            headers: merge_headers(options),
            body: options.body.clone(),
        })
    }
}

/// Defaults first, caller overrides replace same-named defaults, then the
/// computed `Authorization` (if any). A caller-supplied `Authorization` is
/// always dropped.
fn merge_headers(options: &RequestOptions) -> Vec<(String, String)> {
    let mut headers = vec![
        (CONTENT_TYPE_HEADER.to_string(), "application/json".to_string()),
        (PROXY_BYPASS_HEADER.to_string(), "true".to_string()),
    ];
    for (name, value) in &options.headers {
        if name.eq_ignore_ascii_case(AUTHORIZATION_HEADER) {
            continue;
        }
        headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
        headers.push((name.clone(), value.clone()));
    }
    if let Some(value) = options
        .auth_token
        .as_deref()
        .and_then(|token| authorization_header(token, options.auth_scheme))
    {
        headers.push((AUTHORIZATION_HEADER.to_string(), value));
    }
    headers
}

/// Decode a response. Non-2xx becomes `ApiError::Http`; 2xx becomes JSON
/// when the body parses and text otherwise.
pub fn parse_response(response: HttpResponse) -> Result<ResponseBody, ApiError> {
    let parsed = serde_json::from_str::<Value>(&response.body);
    if !response.is_success() {
        return Err(match parsed {
            Ok(data) => ApiError::Http {
                status: response.status,
                message: data.to_string(),
                data: Some(data),
            },
            Err(_) => {
                let message = if response.body.is_empty() {
                    format!("Request failed with status {}", response.status)
                } else {
                    response.body
                };
                ApiError::Http {
                    status: response.status,
                    message,
                    data: None,
                }
            }
        });
    }
    Ok(match parsed {
        Ok(value) => ResponseBody::Json(value),
        Err(_) => ResponseBody::Text(response.body),
    })
}

/// Rewrite "cannot reach the server" failures to the fixed user-facing
/// message; pass every other transport failure through unchanged.
pub fn normalize_transport_error(err: TransportError) -> ApiError {
    let unreachable = err.kind == TransportErrorKind::Unreachable
        || err.message == "Failed to fetch"
        || err.message.contains("NetworkError");
    if unreachable {
        ApiError::Network
    } else {
        ApiError::Transport(err.message)
    }
}
