//! Threads API client
//!
//! Knows the endpoint shapes a LangGraph-compatible server may expose for
//! listing threads, and how to page through and delete them.

use crate::debug;
use crate::http::{Headers, HttpClient, HttpResponse, UreqHttpClient};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Default number of threads requested per page
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// HTTP method of a listing endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
        }
    }
}

/// A candidate (or adopted) thread listing endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub method: Method,
    pub url: String,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}

impl Endpoint {
    /// URL for the page starting at `offset`
    ///
    /// POST endpoints carry paging in the body, so their URL never changes.
    /// GET endpoints keep the adopted URL for the first page and switch to
    /// explicit `limit`/`offset` query parameters afterwards.
    pub fn page_url(&self, offset: usize, page_size: usize) -> String {
        match self.method {
            Method::Post => self.url.clone(),
            Method::Get if offset == 0 => self.url.clone(),
            Method::Get => {
                let path = self.url.split('?').next().unwrap_or(&self.url);
                format!("{path}?limit={page_size}&offset={offset}")
            }
        }
    }
}

/// Body of a `POST /threads/search` request
#[derive(Debug, Serialize)]
struct SearchRequest {
    limit: usize,
    offset: usize,
}

/// Threads API client
pub struct ThreadsClient<H: HttpClient = UreqHttpClient> {
    /// Base URL without trailing slash
    base_url: String,

    /// Value for the `X-Api-Key` header
    api_key: Option<String>,

    /// Threads per page
    page_size: usize,

    /// HTTP client
    http: H,
}

impl ThreadsClient<UreqHttpClient> {
    /// Create a client backed by ureq
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> Self {
        Self::with_http_client(base_url, api_key, UreqHttpClient::new(timeout))
    }
}

impl<H: HttpClient> ThreadsClient<H> {
    /// Create client with custom HTTP client (for testing)
    pub fn with_http_client(base_url: &str, api_key: Option<String>, http: H) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            page_size: DEFAULT_PAGE_SIZE,
            http,
        }
    }

    /// Override the page size (minimum 1)
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Build common headers for requests
    fn build_headers(&self) -> Headers {
        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];

        if let Some(ref key) = self.api_key {
            headers.push(("X-Api-Key".to_string(), key.clone()));
        }

        headers
    }

    /// Listing endpoints to probe, in order of preference
    pub fn candidate_endpoints(&self) -> Vec<Endpoint> {
        vec![
            Endpoint {
                method: Method::Post,
                url: format!("{}/threads/search", self.base_url),
            },
            Endpoint {
                method: Method::Get,
                url: format!("{}/threads", self.base_url),
            },
            Endpoint {
                method: Method::Get,
                url: format!("{}/threads?limit={}", self.base_url, self.page_size),
            },
        ]
    }

    /// Request the page of `endpoint` starting at `offset`
    pub fn send_page(&self, endpoint: &Endpoint, offset: usize) -> Result<HttpResponse> {
        let url = endpoint.page_url(offset, self.page_size);
        let headers = self.build_headers();

        let result = match endpoint.method {
            Method::Post => {
                let body = serde_json::to_string(&SearchRequest {
                    limit: self.page_size,
                    offset,
                })
                .context("Failed to encode search request")?;
                self.http.post(&url, headers, body)
            }
            Method::Get => self.http.get(&url, headers),
        };

        debug::log_request(
            &endpoint.method.to_string(),
            &url,
            result.as_ref().ok().map(|r| r.status),
        );
        result.with_context(|| format!("{} {} failed", endpoint.method, url))
    }

    /// Delete a single thread
    pub fn delete_thread(&self, thread_id: &str) -> Result<HttpResponse> {
        let url = format!("{}/threads/{}", self.base_url, thread_id);
        let result = self.http.delete(&url, self.build_headers());

        debug::log_request("DELETE", &url, result.as_ref().ok().map(|r| r.status));
        result.with_context(|| format!("Failed to delete thread {thread_id}"))
    }
}
