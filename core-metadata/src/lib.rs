//! # Metadata Resolution Module
//!
//! Resolves artist biographies, artist images and album covers from several
//! independent, rate-limited third-party services and merges their answers.
//!
//! ## Overview
//!
//! This module handles:
//! - Per-provider call spacing ([`RateLimiter`])
//! - Capability-based agent registration ([`AgentRegistry`])
//! - Provider agents for MusicBrainz, Last.fm, Fanart.tv, the Cover Art Archive
//!   and Wikipedia ([`providers`])
//! - First-match and aggregate-all orchestration ([`MetadataOrchestrator`])
//! - Image deduplication by probed dimensions ([`ImageResultDeduplicator`])
//! - Prose disambiguation for name-ambiguous sources ([`ContentDisambiguator`])
//!
//! Every outbound call goes through one shared transport, so the rate limit,
//! timeout and 404 handling are applied the same way for all providers.

pub mod dedup;
pub mod disambiguator;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod probe;
pub mod providers;
pub mod rate_limiter;
pub mod registry;
pub mod text;
pub mod transport;

pub use dedup::ImageResultDeduplicator;
pub use disambiguator::ContentDisambiguator;
pub use error::{MetadataError, Result};
pub use models::{
    AlbumCover, ArtistBio, ArtistMatch, ArtistQuery, BioRequest, BulkVariants, Capability,
    CoverQuery, DedupKey, ImageType, ImageVariant, RecordingMatch, RecordingSearch, ReleaseMatch,
};
pub use orchestrator::MetadataOrchestrator;
pub use probe::HttpImageProbe;
pub use rate_limiter::RateLimiter;
pub use registry::{AgentRegistry, RegisteredAgent};
pub use transport::ProviderTransport;
