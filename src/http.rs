//! HTTP transport
//!
//! A small trait over the three verbs the cleanup tool needs, so the server
//! can be mocked in tests.

use anyhow::{Context, Result};
use std::io::Read;
use std::time::Duration;

#[cfg(test)]
use mockall::automock;

/// HTTP response abstraction for testing
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    /// Reason phrase ("Not Found", ...)
    pub status_text: String,
    pub body: String,
}

impl HttpResponse {
    /// 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Auth failures whose body is worth showing to the operator
    pub fn is_auth_error(&self) -> bool {
        matches!(self.status, 401 | 403)
    }
}

/// HTTP headers type
pub type Headers = Vec<(String, String)>;

/// Trait for HTTP operations (allows mocking)
///
/// Non-success statuses come back as `Ok`; `Err` means the exchange itself
/// failed (connection refused, timeout, unreadable body).
#[cfg_attr(test, automock)]
pub trait HttpClient {
    /// Send a GET request
    fn get(&self, url: &str, headers: Headers) -> Result<HttpResponse>;

    /// Send a POST request with JSON body
    fn post(&self, url: &str, headers: Headers, body: String) -> Result<HttpResponse>;

    /// Send a DELETE request
    fn delete(&self, url: &str, headers: Headers) -> Result<HttpResponse>;
}

/// Real HTTP client using ureq
pub struct UreqHttpClient {
    agent: ureq::Agent,
}

impl UreqHttpClient {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self { agent }
    }
}

impl Default for UreqHttpClient {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

/// Turn a ureq result into a response, keeping error statuses as responses
///
/// The body is read through the raw reader: `into_string` caps bodies at
/// 10 MB and a full page of threads with their state can exceed that.
fn into_response(
    result: std::result::Result<ureq::Response, ureq::Error>,
    method: &str,
) -> Result<HttpResponse> {
    match result {
        Ok(response) | Err(ureq::Error::Status(_, response)) => {
            let status = response.status();
            let status_text = response.status_text().to_string();
            let mut body = String::new();
            response
                .into_reader()
                .read_to_string(&mut body)
                .context("Failed to read response body")?;
            Ok(HttpResponse {
                status,
                status_text,
                body,
            })
        }
        Err(err) => Err(err).with_context(|| format!("HTTP {method} failed")),
    }
}

fn with_headers(mut request: ureq::Request, headers: &Headers) -> ureq::Request {
    for (key, value) in headers {
        request = request.set(key, value);
    }
    request
}

impl HttpClient for UreqHttpClient {
    fn get(&self, url: &str, headers: Headers) -> Result<HttpResponse> {
        let request = with_headers(self.agent.get(url), &headers);
        into_response(request.call(), "GET")
    }

    fn post(&self, url: &str, headers: Headers, body: String) -> Result<HttpResponse> {
        let request = with_headers(self.agent.post(url), &headers);
        into_response(request.send_string(&body), "POST")
    }

    fn delete(&self, url: &str, headers: Headers) -> Result<HttpResponse> {
        let request = with_headers(self.agent.delete(url), &headers);
        into_response(request.call(), "DELETE")
    }
}
