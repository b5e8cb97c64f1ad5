//! Metadata Orchestrator
//!
//! Drives provider agents through the registry and combines their answers.
//!
//! ## Strategies
//!
//! - **First match** ([`resolve_bio`](MetadataOrchestrator::resolve_bio),
//!   [`resolve_covers`](MetadataOrchestrator::resolve_covers)): agents in
//!   priority order, sequentially, stopping at the first accepted answer.
//! - **Aggregate all** ([`aggregate_avatars`](MetadataOrchestrator::aggregate_avatars),
//!   [`aggregate_covers`](MetadataOrchestrator::aggregate_covers)): every
//!   enabled agent concurrently, each isolated from the others, results
//!   flattened and (for images) deduplicated.
//!
//! Nothing here fails: provider errors, timeouts and panics become empty
//! contributions and are logged. The worst outcome is `None` or an empty list.
//!
//! ## Usage
//!
//! ```ignore
//! use core_metadata::MetadataOrchestrator;
//!
//! let orchestrator = MetadataOrchestrator::from_config(&config, http_client, image_probe);
//!
//! let bio = orchestrator.resolve_bio(None, "Soda Stereo").await;
//! let avatars = orchestrator.aggregate_avatars(None, "Soda Stereo").await;
//! ```

mod aggregate;
mod first_match;

use crate::dedup::ImageResultDeduplicator;
use crate::disambiguator::ContentDisambiguator;
use crate::error::Result;
use crate::models::{ArtistMatch, ReleaseMatch};
use crate::rate_limiter::RateLimiter;
use crate::registry::AgentRegistry;
use bridge_traits::http::HttpClient;
use bridge_traits::image::ImageProbe;
use core_runtime::config::ResolverConfig;
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Search hits requested when resolving a name to an MBID
const MBID_SEARCH_LIMIT: u32 = 5;

pub struct MetadataOrchestrator {
    registry: Arc<AgentRegistry>,
    deduplicator: ImageResultDeduplicator,
    disambiguator: ContentDisambiguator,
    agent_timeout: Duration,
}

impl MetadataOrchestrator {
    /// # Arguments
    ///
    /// * `registry` - Agents by capability
    /// * `deduplicator` - Applied to every aggregate image call
    /// * `disambiguator` - Validates prose from agents that require it
    /// * `agent_timeout` - Upper bound for one agent step
    pub fn new(
        registry: Arc<AgentRegistry>,
        deduplicator: ImageResultDeduplicator,
        disambiguator: ContentDisambiguator,
        agent_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            deduplicator,
            disambiguator,
            agent_timeout,
        }
    }

    /// Wires the standard agents, one process-wide rate limiter and the
    /// deduplicator from configuration
    pub fn from_config(
        config: &ResolverConfig,
        http_client: Arc<dyn HttpClient>,
        image_probe: Arc<dyn ImageProbe>,
    ) -> Self {
        let rate_limiter = Arc::new(RateLimiter::new(config.rate_limits.clone()));
        let registry = AgentRegistry::from_config(config, http_client, rate_limiter);
        let deduplicator = ImageResultDeduplicator::new(
            image_probe,
            config.probe_chunk_size,
            config.probe_timeout,
        );

        Self::new(
            Arc::new(registry),
            deduplicator,
            ContentDisambiguator::default(),
            config.agent_timeout,
        )
    }

    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    /// Resolves an artist name to an MBID through the search agents
    ///
    /// Search agents are asked in priority order; the first one with a
    /// trustworthy hit wins. Failures are logged and skipped.
    pub async fn search_artist_mbid(&self, name: &str) -> Option<String> {
        for agent in self.registry.search_agents() {
            let hits = self
                .isolate(agent.name(), agent.search_artists(name, MBID_SEARCH_LIMIT))
                .await
                .unwrap_or_default();

            if let Some(best) = ArtistMatch::best(name, &hits) {
                info!(
                    provider = %agent.name(),
                    artist = %name,
                    mbid = %best.mbid,
                    score = best.score,
                    "Resolved artist MBID"
                );
                return Some(best.mbid.clone());
            }
        }

        debug!(artist = %name, "No artist MBID found");
        None
    }

    /// Resolves an album to a release MBID through the search agents
    pub async fn search_release_mbid(&self, artist: &str, album: &str) -> Option<String> {
        for agent in self.registry.search_agents() {
            let hits = self
                .isolate(
                    agent.name(),
                    agent.search_releases(artist, album, MBID_SEARCH_LIMIT),
                )
                .await
                .unwrap_or_default();

            if let Some(best) = ReleaseMatch::best(album, &hits) {
                info!(
                    provider = %agent.name(),
                    artist = %artist,
                    album = %album,
                    mbid = %best.mbid,
                    "Resolved release MBID"
                );
                return Some(best.mbid.clone());
            }
        }

        debug!(artist = %artist, album = %album, "No release MBID found");
        None
    }

    /// Runs one agent step under the agent timeout, absorbing errors and panics
    async fn isolate<T, F>(&self, provider: &str, step: F) -> Option<T>
    where
        F: Future<Output = Result<T>>,
    {
        let guarded = AssertUnwindSafe(step).catch_unwind();
        match tokio::time::timeout(self.agent_timeout, guarded).await {
            Ok(Ok(Ok(value))) => Some(value),
            Ok(Ok(Err(e))) => {
                warn!(provider = %provider, error = %e, "Provider call failed");
                None
            }
            Ok(Err(_)) => {
                error!(provider = %provider, "Provider call panicked");
                None
            }
            Err(_) => {
                warn!(
                    provider = %provider,
                    timeout = ?self.agent_timeout,
                    "Provider call timed out"
                );
                None
            }
        }
    }
}
