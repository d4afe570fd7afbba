//! The wire boundary of the API client.
//!
//! [`Transport`] turns an [`ApiRequest`] into an [`ApiResponse`]. Status codes
//! are not interpreted here; that is the client's job.

use crate::domain::error::{DeskError, Result};
use serde_json::Value;
use std::time::Duration;

/// Default timeout for real HTTP requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

/// One request relative to the API base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path below the base URL, without a leading slash (`students/7`).
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into().trim_start_matches('/').to_string(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn with_query(mut self, query: &[(String, String)]) -> Self {
        self.query.extend_from_slice(query);
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Value of the first header called `name` (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Raw response: status code and body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// `true` for statuses in `200..300`.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Sends requests somewhere and returns what came back.
pub trait Transport: Send {
    /// # Errors
    ///
    /// Returns [`DeskError::Transport`] when no response could be obtained
    /// (connection refused, timeout, invalid URL). HTTP error statuses are
    /// *not* errors at this level.
    fn send(&self, base_url: &str, request: &ApiRequest) -> Result<ApiResponse>;
}

/// Real HTTP transport over `reqwest`'s blocking client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// # Errors
    ///
    /// Returns [`DeskError::Transport`] if the TLS backend cannot be initialized.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("classdesk/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DeskError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

/// Joins `path` onto `base_url` and appends the query pairs, percent-encoded.
///
/// # Errors
///
/// Returns [`DeskError::Transport`] if either part is not a valid URL.
pub fn build_url(base_url: &str, path: &str, query: &[(String, String)]) -> Result<reqwest::Url> {
    let mut base = reqwest::Url::parse(base_url)
        .map_err(|e| DeskError::Transport(format!("invalid base URL {base_url:?}: {e}")))?;
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }

    let mut url = base
        .join(path)
        .map_err(|e| DeskError::Transport(format!("invalid path {path:?}: {e}")))?;
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }
    Ok(url)
}

impl Transport for HttpTransport {
    fn send(&self, base_url: &str, request: &ApiRequest) -> Result<ApiResponse> {
        let url = build_url(base_url, &request.path, &request.query)?;
        let _span = tracing::debug_span!("http_send", method = request.method.as_str(), url = %url).entered();

        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .map_err(|e| DeskError::Transport(format!("request failed: {e}")))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| DeskError::Transport(format!("failed to read response body: {e}")))?;

        tracing::debug!(status, bytes = body.len(), "response received");
        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect()
    }

    #[test]
    fn joins_paths_under_base_path() {
        let url = build_url("https://school.example/api/v1", "students/7", &[]).unwrap();
        assert_eq!(url.as_str(), "https://school.example/api/v1/students/7");
    }

    #[test]
    fn encodes_query_pairs() {
        let url = build_url("https://school.example/api/", "lessons", &pairs(&[("group", "5 A"), ("day", "пн")]))
            .unwrap();
        assert_eq!(url.query(), Some("group=5+A&day=%D0%BF%D0%BD"));
    }

    #[test]
    fn rejects_relative_base() {
        assert!(matches!(build_url("not a url", "x", &[]), Err(DeskError::Transport(_))));
    }

    #[test]
    fn success_range_is_half_open() {
        assert!(ApiResponse::new(200, "").is_success());
        assert!(ApiResponse::new(299, "").is_success());
        assert!(!ApiResponse::new(300, "").is_success());
        assert!(!ApiResponse::new(199, "").is_success());
    }
}
