//! Provider Transport
//!
//! The one path every agent uses to reach its service. For each call it:
//!
//! 1. waits on the [`RateLimiter`] under the provider's name,
//! 2. issues the request with an explicit timeout,
//! 3. maps HTTP 404 to `Ok(None)`,
//! 4. maps any other non-2xx status or transport failure to a typed error.

use crate::error::{MetadataError, Result};
use crate::rate_limiter::RateLimiter;
use bridge_traits::error::BridgeError;
use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
use core_runtime::logging::redact_url;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Longest error body kept in [`MetadataError::HttpError`]
const MAX_ERROR_BODY: usize = 512;

#[derive(Clone)]
pub struct ProviderTransport {
    http_client: Arc<dyn HttpClient>,
    rate_limiter: Arc<RateLimiter>,
    timeout: Duration,
}

impl ProviderTransport {
    /// # Arguments
    ///
    /// * `http_client` - Host HTTP implementation
    /// * `rate_limiter` - Limiter shared by every agent of the process
    /// * `timeout` - Per-request timeout
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        rate_limiter: Arc<RateLimiter>,
        timeout: Duration,
    ) -> Self {
        Self {
            http_client,
            rate_limiter,
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Executes a rate-limited, time-bounded request
    ///
    /// # Returns
    ///
    /// - `Ok(Some(response))` - 2xx response
    /// - `Ok(None)` - HTTP 404
    /// - `Err` - Timeout, transport failure or any other status
    pub async fn get(&self, provider: &str, request: HttpRequest) -> Result<Option<HttpResponse>> {
        self.rate_limiter.wait_for_rate_limit(provider).await;

        let url = redact_url(&request.url);
        debug!(provider = %provider, url = %url, "Provider request");

        let request = request.timeout(self.timeout);
        let response = match tokio::time::timeout(self.timeout, self.http_client.execute(request))
            .await
        {
            Err(_) | Ok(Err(BridgeError::Timeout(_))) => {
                return Err(MetadataError::Timeout {
                    provider: provider.to_string(),
                    timeout: self.timeout,
                });
            }
            Ok(Err(e)) => {
                return Err(MetadataError::NetworkError(format!(
                    "{} request failed: {}",
                    provider, e
                )));
            }
            Ok(Ok(response)) => response,
        };

        if response.is_success() {
            return Ok(Some(response));
        }
        if response.is_not_found() {
            debug!(provider = %provider, url = %url, "Provider has no entry (404)");
            return Ok(None);
        }
        if response.is_rate_limited() {
            warn!(
                provider = %provider,
                retry_after = response.header("Retry-After").unwrap_or("-"),
                "Provider rate limit exceeded (429)"
            );
            return Err(MetadataError::RateLimited {
                provider: provider.to_string(),
            });
        }

        Err(MetadataError::HttpError {
            status: response.status,
            body: response.body_preview(MAX_ERROR_BODY),
        })
    }

    /// Same as [`get`](Self::get), decoding the body as JSON
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        provider: &str,
        request: HttpRequest,
    ) -> Result<Option<T>> {
        let Some(response) = self.get(provider, request).await? else {
            return Ok(None);
        };

        serde_json::from_slice(&response.body)
            .map(Some)
            .map_err(|e| MetadataError::JsonParse(format!("{} response: {}", provider, e)))
    }
}
