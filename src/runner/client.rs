//! Request primitive for the blog API.
//!
//! Every call is a single attempt. Transport failures are not errors here:
//! they come back as an [`ApiResponse`] without a status code so the step
//! that made the call can record them like any other failure.

use anyhow::{Context, Result};
use reqwest::header::CONTENT_TYPE;
use serde_json::{json, Value};
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Status code (absent on network failure) and parsed body of one call
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: Option<u16>,
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self {
            status: Some(status),
            body,
        }
    }

    /// No response at all: connection refused, timeout, DNS failure
    pub fn network_failure(error: impl fmt::Display) -> Self {
        Self {
            status: None,
            body: json!({ "error": error.to_string() }),
        }
    }

    /// Parse a response body, wrapping anything that isn't JSON as `{"rawResponse": text}`
    pub fn from_text(status: u16, text: &str) -> Self {
        let body = serde_json::from_str(text).unwrap_or_else(|_| json!({ "rawResponse": text }));
        Self::new(status, body)
    }

    /// Expected status code and a literal `"success": true` in the body
    pub fn is_success(&self, expected_status: u16) -> bool {
        self.status == Some(expected_status) && self.body.get("success") == Some(&Value::Bool(true))
    }

    /// Error line recorded for a failed step
    pub fn describe_failure(&self) -> String {
        let status = self
            .status
            .map_or_else(|| "none".to_string(), |s| s.to_string());
        format!("Status: {}, Response: {}", status, self.body)
    }
}

/// Everything the transport needs for one call
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest<'a> {
    pub method: HttpMethod,
    pub endpoint: &'a str,
    pub body: Option<&'a Value>,
    /// Bearer token, already resolved against the auth flag and session
    pub token: Option<&'a str>,
}

/// Sends one request and returns whatever came back
pub trait ApiTransport {
    fn send(&self, request: &ApiRequest<'_>) -> ApiResponse;
}

/// Blocking `reqwest` transport rooted at `<base_url>/<api_prefix>/`
pub struct HttpClient {
    api_root: String,
    client: reqwest::blocking::Client,
}

impl HttpClient {
    pub fn new(base_url: &str, api_prefix: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        let prefix = api_prefix.trim_matches('/');
        let base = base_url.trim_end_matches('/');
        let api_root = if prefix.is_empty() {
            base.to_string()
        } else {
            format!("{}/{}", base, prefix)
        };

        Ok(Self { api_root, client })
    }

    pub fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.api_root, endpoint.trim_start_matches('/'))
    }
}

impl ApiTransport for HttpClient {
    fn send(&self, request: &ApiRequest<'_>) -> ApiResponse {
        let url = self.url(request.endpoint);
        log::debug!("{} {}", request.method, url);

        let mut builder = self
            .client
            .request(request.method.into(), &url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = request.token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = request.body {
            builder = builder.json(body);
        }

        let response = match builder.send() {
            Ok(response) => response,
            Err(e) => {
                log::debug!("{} {} failed: {}", request.method, url, e);
                return ApiResponse::network_failure(e);
            }
        };

        let status = response.status().as_u16();
        log::debug!("{} {} -> {}", request.method, url, status);

        match response.text() {
            Ok(text) => ApiResponse::from_text(status, &text),
            Err(e) => {
                log::warn!("Failed to read response body from {}: {}", url, e);
                ApiResponse::new(status, json!({ "error": e.to_string() }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let client = HttpClient::new("http://localhost:4000/", "/api/", Duration::from_secs(1))
            .expect("client");
        assert_eq!(client.url("health"), "http://localhost:4000/api/health");
        assert_eq!(client.url("/blogs/b1"), "http://localhost:4000/api/blogs/b1");

        let bare = HttpClient::new("http://localhost:4000", "", Duration::from_secs(1))
            .expect("client");
        assert_eq!(bare.url("health"), "http://localhost:4000/health");
    }

    #[test]
    fn test_non_json_body_is_wrapped() {
        let response = ApiResponse::from_text(502, "<html>Bad Gateway</html>");
        assert_eq!(
            response.body,
            json!({"rawResponse": "<html>Bad Gateway</html>"})
        );
        assert!(!response.is_success(502));
    }

    #[test]
    fn test_success_needs_code_and_flag() {
        assert!(ApiResponse::new(201, json!({"success": true})).is_success(201));
        assert!(!ApiResponse::new(200, json!({"success": true})).is_success(201));
        assert!(!ApiResponse::new(201, json!({"success": "true"})).is_success(201));
        assert!(!ApiResponse::new(201, json!({"data": {}})).is_success(201));
        assert!(!ApiResponse::network_failure("refused").is_success(200));
    }

    #[test]
    fn test_failure_description() {
        let response = ApiResponse::new(400, json!({"success": false}));
        assert_eq!(
            response.describe_failure(),
            r#"Status: 400, Response: {"success":false}"#
        );

        let response = ApiResponse::network_failure("connection refused");
        assert_eq!(
            response.describe_failure(),
            r#"Status: none, Response: {"error":"connection refused"}"#
        );
    }
}
