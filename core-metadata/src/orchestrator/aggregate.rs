//! Aggregate-all strategy
//!
//! One concurrent call per enabled agent. Each call is isolated (error,
//! timeout or panic contributes nothing) and never affects its siblings.
//! Contributions keep each agent's own order; no order is promised across
//! agents.

use super::MetadataOrchestrator;
use crate::models::{AlbumCover, ArtistQuery, CoverQuery, ImageVariant};
use crate::providers::ImageRetriever;
use futures::future::join_all;
use tracing::{debug, info};

impl MetadataOrchestrator {
    /// Collects every avatar candidate across providers, deduplicated
    ///
    /// Without an MBID the search agents are asked for one first; agents
    /// that need it simply contribute nothing when none is found.
    pub async fn aggregate_avatars(&self, mbid: Option<&str>, name: &str) -> Vec<ImageVariant> {
        let agents = self.registry.image_agents();
        if agents.is_empty() {
            debug!(artist = %name, "No image agents enabled");
            return Vec::new();
        }

        let mbid = match mbid {
            Some(mbid) => Some(mbid.to_string()),
            None => self.search_artist_mbid(name).await,
        };
        let query = ArtistQuery::new(mbid.as_deref(), name);

        let contributions = join_all(
            agents
                .iter()
                .map(|agent| self.collect_images(agent.as_ref(), &query)),
        )
        .await;

        let variants: Vec<ImageVariant> = contributions.into_iter().flatten().collect();
        let collected = variants.len();
        let variants = self.deduplicator.dedupe(variants).await;

        info!(
            artist = %name,
            agents = agents.len(),
            collected,
            returned = variants.len(),
            "Avatar aggregation complete"
        );
        variants
    }

    /// One agent's contribution; bulk providers are expanded per entry
    async fn collect_images(
        &self,
        agent: &dyn ImageRetriever,
        query: &ArtistQuery,
    ) -> Vec<ImageVariant> {
        let contribution = match (agent.as_bulk_variant_provider(), query.mbid.as_deref()) {
            (Some(bulk), Some(mbid)) => self
                .isolate(agent.name(), bulk.fetch_all_variants(mbid))
                .await
                .flatten()
                .map(|variants| variants.into_variants(agent.name())),
            _ => self
                .isolate(agent.name(), agent.fetch_images(query))
                .await,
        };

        let contribution = contribution.unwrap_or_default();
        debug!(provider = %agent.name(), variants = contribution.len(), "Image agent finished");
        contribution
    }

    /// Collects every non-empty cover across providers
    pub async fn aggregate_covers(
        &self,
        release_mbid: Option<&str>,
        artist: &str,
        album: &str,
    ) -> Vec<AlbumCover> {
        let agents = self.registry.cover_agents();
        if agents.is_empty() {
            debug!(artist = %artist, album = %album, "No cover agents enabled");
            return Vec::new();
        }

        let release_mbid = match release_mbid {
            Some(mbid) => Some(mbid.to_string()),
            None => self.search_release_mbid(artist, album).await,
        };
        let query = CoverQuery::new(release_mbid.as_deref(), artist, album);

        let covers: Vec<AlbumCover> = join_all(
            agents
                .iter()
                .map(|agent| self.isolate(agent.name(), agent.fetch_cover(&query))),
        )
        .await
        .into_iter()
        .flatten()
        .flatten()
        .filter(|cover| !cover.is_empty())
        .collect();

        info!(artist = %artist, album = %album, covers = covers.len(), "Cover aggregation complete");
        covers
    }
}
