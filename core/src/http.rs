//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. The client builds `HttpRequest`
//! values and parses `HttpResponse` values without touching the network.
//! Hosts either execute the round-trip themselves between
//! `build_request` and `parse_response`, or hand the client a `Transport`
//! and let `commit` drive it.
//!
//! Every adaptive payments call is a POST, so the request carries no method.

use std::error::Error;

/// Failure raised by a `Transport`. It reaches the caller unchanged.
pub type TransportError = Box<dyn Error + Send + Sync>;

/// An HTTP POST described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpRequest {
    /// Value of the first header matching `name`, ignoring ASCII case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Blocking executor for a single request.
///
/// Implementations own TLS, timeouts and retries. Non-2xx statuses may be
/// returned either as `Err` or as an `HttpResponse`; the client rejects the
/// latter with `GatewayError::HttpStatus`.
pub trait Transport {
    fn post(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<F> Transport for F
where
    F: Fn(&HttpRequest) -> Result<HttpResponse, TransportError>,
{
    fn post(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self(request)
    }
}
