//! Shared test doubles for the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
use bridge_traits::image::{ImageDimensions, ImageProbe};
use core_metadata::rate_limiter::RateLimiter;
use core_metadata::transport::ProviderTransport;
use core_runtime::config::RateLimitConfig;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

mockall::mock! {
    pub Probe {}

    #[async_trait]
    impl ImageProbe for Probe {
        async fn probe(&self, url: &str) -> BridgeResult<Option<ImageDimensions>>;
    }
}

enum Reply {
    Respond(u16, String),
    Fail,
    Hang,
}

/// In-memory HTTP client answering by URL substring
///
/// Routes are checked in insertion order, so register specific patterns
/// before broader ones. Unmatched URLs get a 404.
pub struct ScriptedHttpClient {
    routes: Vec<(String, Reply)>,
    requests: Mutex<Vec<(Instant, String)>>,
}

impl ScriptedHttpClient {
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn respond(mut self, pattern: &str, status: u16, body: impl Into<String>) -> Self {
        self.routes
            .push((pattern.to_string(), Reply::Respond(status, body.into())));
        self
    }

    pub fn json(self, pattern: &str, body: serde_json::Value) -> Self {
        self.respond(pattern, 200, body.to_string())
    }

    /// Connection-level failure
    pub fn fail(mut self, pattern: &str) -> Self {
        self.routes.push((pattern.to_string(), Reply::Fail));
        self
    }

    /// Never answers
    pub fn hang(mut self, pattern: &str) -> Self {
        self.routes.push((pattern.to_string(), Reply::Hang));
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(_, url)| url.clone())
            .collect()
    }

    pub fn request_times(&self, pattern: &str) -> Vec<Instant> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, url)| url.contains(pattern))
            .map(|(at, _)| *at)
            .collect()
    }

    pub fn count(&self, pattern: &str) -> usize {
        self.request_times(pattern).len()
    }
}

#[async_trait]
impl HttpClient for ScriptedHttpClient {
    async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse> {
        self.requests
            .lock()
            .unwrap()
            .push((Instant::now(), request.url.clone()));

        let route = self
            .routes
            .iter()
            .find(|(pattern, _)| request.url.contains(pattern.as_str()));

        match route {
            Some((_, Reply::Respond(status, body))) => Ok(HttpResponse::new(*status, body.clone())),
            Some((_, Reply::Fail)) => Err(BridgeError::OperationFailed(
                "Connection failed: connection reset".to_string(),
            )),
            Some((_, Reply::Hang)) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(BridgeError::Timeout(Duration::from_secs(3600)))
            }
            None => Ok(HttpResponse::new(404, "")),
        }
    }
}

pub fn transport(client: Arc<ScriptedHttpClient>) -> ProviderTransport {
    ProviderTransport::new(
        client,
        Arc::new(RateLimiter::new(RateLimitConfig::default())),
        Duration::from_secs(8),
    )
}

/// Probe answering with a square size derived from the URL length, so
/// distinct URLs of distinct length never collapse
pub fn probe_by_url_length() -> MockProbe {
    let mut probe = MockProbe::new();
    probe.expect_probe().returning(|url: &str| {
        let side = url.len() as u32;
        Ok(Some(ImageDimensions::new(side, side)))
    });
    probe
}

pub fn wikipedia_summary(title: &str, extract: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "standard",
        "title": title,
        "extract": extract,
        "description": "",
        "content_urls": {
            "desktop": {"page": format!("https://en.wikipedia.org/wiki/{}", title.replace(' ', "_"))}
        }
    })
}

pub fn opensearch(query: &str, titles: &[&str]) -> serde_json::Value {
    let descriptions: Vec<&str> = titles.iter().map(|_| "").collect();
    let urls: Vec<String> = titles
        .iter()
        .map(|t| format!("https://en.wikipedia.org/wiki/{}", t.replace(' ', "_")))
        .collect();
    serde_json::json!([query, titles, descriptions, urls])
}
