//! Client core for the job-board REST API.
//!
//! # Overview
//! Every backend call goes through one [`Gateway`]: it resolves the base
//! URL, builds headers (including `Authorization` scheme detection),
//! dispatches through a [`Transport`], and decodes the response into JSON,
//! plain text, or a uniform [`ApiError`]. [`JobBoardClient`] layers typed
//! endpoint methods on top.
//!
//! # Design
//! - The gateway is stateless: an immutable [`ApiConfig`] plus a transport.
//! - Requests and responses are plain data (`HttpRequest`/`HttpResponse`),
//!   so the transport is the only place that does I/O.
//! - Credentials travel with each call and are never stored.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod gateway;
pub mod http;
pub mod logging;
pub mod transport;
pub mod types;

pub use auth::{authorization_header, AuthScheme, Credential};
pub use client::JobBoardClient;
pub use config::{ApiConfig, API_URL_ENV};
pub use error::{ApiError, TransportError, TransportErrorKind, NETWORK_ERROR_MESSAGE};
pub use gateway::{normalize_transport_error, parse_response, Gateway, RequestOptions, ResponseBody};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport};
