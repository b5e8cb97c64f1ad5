//! HTTP Client Abstraction
//!
//! The request/response seam every provider agent and the image probe go
//! through. Only `GET` is needed: all provider endpoints are read-only.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::time::Duration;

use crate::error::Result;

/// Outbound `GET` request
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub headers: HashMap<String, String>,
    /// Upper bound for the whole exchange, body included
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: HashMap::new(),
            timeout: None,
        }
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// URL without its query string, safe to log when the query carries keys
    pub fn url_without_query(&self) -> &str {
        self.url
            .split_once('?')
            .map_or(self.url.as_str(), |(base, _)| base)
    }
}

/// Response as received; any status is a valid response
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status == 429
    }

    /// First `max_chars` characters of the body, lossily decoded
    pub fn body_preview(&self, max_chars: usize) -> String {
        String::from_utf8_lossy(&self.body)
            .chars()
            .take(max_chars)
            .collect()
    }
}

/// Async HTTP client trait
///
/// Implementations must honor [`HttpRequest::timeout`] and must not retry on
/// their own; a retry below the rate limiter would break per-provider call
/// spacing.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::http::{HttpClient, HttpRequest};
///
/// let request = HttpRequest::get("https://musicbrainz.org/ws/2/artist?query=x&fmt=json")
///     .header("User-Agent", "MyApp/1.0 (me@example.com)");
/// let response = client.execute(request).await?;
/// ```
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Execute an HTTP request
    ///
    /// Non-2xx statuses are returned as a normal response; only transport
    /// failures (DNS, connection reset, TLS, timeout) produce an error.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = HttpRequest::get("https://coverartarchive.org/release/abc")
            .header("User-Agent", "test")
            .timeout(Duration::from_secs(8));

        assert_eq!(request.headers.get("User-Agent"), Some(&"test".to_string()));
        assert_eq!(request.timeout, Some(Duration::from_secs(8)));
        assert_eq!(
            request.url_without_query(),
            "https://coverartarchive.org/release/abc"
        );
    }

    #[test]
    fn test_url_without_query() {
        let request = HttpRequest::get("https://webservice.fanart.tv/v3/music/x?api_key=secret");
        assert_eq!(
            request.url_without_query(),
            "https://webservice.fanart.tv/v3/music/x"
        );
    }

    #[test]
    fn test_response_status_checks() {
        assert!(HttpResponse::new(204, "").is_success());
        assert!(HttpResponse::new(404, Bytes::new()).is_not_found());
        assert!(HttpResponse::new(429, Bytes::new()).is_rate_limited());
        assert!(!HttpResponse::new(503, Bytes::new()).is_success());
    }

    #[test]
    fn test_header_lookup_ignores_case() {
        let response = HttpResponse::new(429, "").with_header("Retry-After", "2");
        assert_eq!(response.header("retry-after"), Some("2"));
        assert_eq!(response.header("x-missing"), None);
    }

    #[test]
    fn test_body_preview() {
        let response = HttpResponse::new(500, "ñandú error page");
        assert_eq!(response.body_preview(5), "ñandú");
        assert_eq!(response.body_preview(100), "ñandú error page");
    }
}
