//! Provider Agents
//!
//! One agent per external service. Every agent declares a stable name (also its
//! rate-limiter key), a priority and whether it is enabled, then implements the
//! capability traits its service actually supports:
//!
//! | Agent               | Bio | Image | Cover | Search | Bulk |
//! |---------------------|-----|-------|-------|--------|------|
//! | MusicBrainz         |  x  |       |       |   x    |      |
//! | Last.fm             |  x  |       |   x   |        |      |
//! | Fanart.tv           |     |   x   |       |        |  x   |
//! | Cover Art Archive   |     |       |   x   |        |      |
//! | Wikipedia           |  x  |   x   |       |        |      |
//!
//! All outbound calls go through [`ProviderTransport`](crate::transport::ProviderTransport),
//! which applies the rate limit and timeout and maps 404 to "not found". Agents
//! return typed errors for everything else; the orchestrator turns those into
//! empty contributions.

pub mod coverart;
pub mod fanart;
pub mod lastfm;
pub mod musicbrainz;
pub mod wikipedia;

pub use coverart::CoverArtArchiveAgent;
pub use fanart::FanartAgent;
pub use lastfm::LastFmAgent;
pub use musicbrainz::MusicBrainzAgent;
pub use wikipedia::WikipediaAgent;

use crate::error::Result;
use crate::models::{
    AlbumCover, ArtistBio, ArtistMatch, ArtistQuery, BioRequest, BulkVariants, CoverQuery,
    ImageVariant, RecordingMatch, RecordingSearch, ReleaseMatch,
};
use async_trait::async_trait;

/// Identity shared by every agent
pub trait ProviderAgent: Send + Sync {
    /// Unique, stable identifier; also the rate-limiter key
    fn name(&self) -> &str;

    /// Lower is tried first in first-match mode
    fn priority(&self) -> i32;

    /// Evaluated on every registry lookup
    fn is_enabled(&self) -> bool {
        true
    }
}

/// Artist biography lookup
#[async_trait]
pub trait BioRetriever: ProviderAgent {
    /// Languages to try in order. Empty means a single language-neutral pass.
    fn languages(&self) -> &[String] {
        &[]
    }

    /// Query suffixes to try in order, most specific first. Empty means the
    /// bare name only.
    fn query_suffixes(&self) -> &[String] {
        &[]
    }

    /// Whether returned prose must pass the content disambiguator
    fn requires_validation(&self) -> bool {
        false
    }

    /// One lookup attempt
    ///
    /// # Returns
    ///
    /// - `Ok(Some(bio))` - A candidate biography
    /// - `Ok(None)` - Nothing for this attempt
    /// - `Err` - Transport or protocol failure
    async fn fetch_bio(&self, request: &BioRequest) -> Result<Option<ArtistBio>>;
}

/// Artist image lookup
#[async_trait]
pub trait ImageRetriever: ProviderAgent {
    async fn fetch_images(&self, artist: &ArtistQuery) -> Result<Vec<ImageVariant>>;

    /// Extended capability: full per-category enumeration for a known MBID
    fn as_bulk_variant_provider(&self) -> Option<&dyn BulkVariantProvider> {
        None
    }
}

/// Enumerates every image variant a service holds for an artist MBID
#[async_trait]
pub trait BulkVariantProvider: Send + Sync {
    async fn fetch_all_variants(&self, artist_mbid: &str) -> Result<Option<BulkVariants>>;
}

/// Album cover lookup
#[async_trait]
pub trait CoverRetriever: ProviderAgent {
    async fn fetch_cover(&self, query: &CoverQuery) -> Result<Option<AlbumCover>>;
}

/// Structured catalogue search
#[async_trait]
pub trait StructuredSearch: ProviderAgent {
    async fn search_artists(&self, name: &str, limit: u32) -> Result<Vec<ArtistMatch>>;

    async fn search_release_groups(
        &self,
        artist: &str,
        title: &str,
        limit: u32,
    ) -> Result<Vec<ReleaseMatch>>;

    async fn search_releases(
        &self,
        artist: &str,
        title: &str,
        limit: u32,
    ) -> Result<Vec<ReleaseMatch>>;

    async fn search_recordings(
        &self,
        search: &RecordingSearch,
        limit: u32,
    ) -> Result<Vec<RecordingMatch>>;
}
