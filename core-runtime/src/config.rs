//! # Resolver Configuration Module
//!
//! Provides configuration management for the metadata resolver.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a
//! `ResolverConfig` holding provider credentials, per-provider rate limits,
//! request timeouts and the search heuristics (languages, disambiguation
//! suffixes). It enforces fail-fast validation so a malformed configuration is
//! rejected at startup instead of surfacing as silent empty results later.
//!
//! ## Provider enablement
//!
//! Providers that need credentials are enabled only when those credentials are
//! present:
//!
//! | Provider          | Requirement            |
//! |-------------------|------------------------|
//! | MusicBrainz       | User-Agent (defaulted) |
//! | Cover Art Archive | none                   |
//! | Wikipedia         | none                   |
//! | Last.fm           | `lastfm_api_key`       |
//! | Fanart.tv         | `fanart_api_key`       |
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::ResolverConfig;
//! use std::time::Duration;
//!
//! let config = ResolverConfig::builder()
//!     .musicbrainz_user_agent("MyMusicApp/1.0 (contact@example.com)")
//!     .lastfm_api_key("your_lastfm_api_key")
//!     .languages(["es", "en"])
//!     .request_timeout(Duration::from_secs(8))
//!     .build()
//!     .expect("Failed to build config");
//! ```
//!
//! ## Environment
//!
//! [`ResolverConfig::from_env`] reads `MUSICBRAINZ_USER_AGENT`,
//! `LASTFM_API_KEY`, `FANART_API_KEY` and `METADATA_LANGUAGES`
//! (comma-separated, e.g. `es,en`).

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::time::Duration;

/// Stable provider names, shared by the agents and the rate limiter.
pub mod providers {
    pub const MUSICBRAINZ: &str = "musicbrainz";
    pub const LASTFM: &str = "lastfm";
    pub const FANARTTV: &str = "fanarttv";
    pub const COVERARTARCHIVE: &str = "coverartarchive";
    pub const WIKIPEDIA: &str = "wikipedia";
}

/// Default MusicBrainz User-Agent when the host does not provide one
pub const DEFAULT_USER_AGENT: &str =
    "MetadataResolver/0.1 (https://github.com/music-platform/metadata-resolver)";

/// Calibrated per-request timeout for provider calls
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(8);

/// Upper bound for one agent's whole contribution in an aggregate call
pub const DEFAULT_AGENT_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for a single image-dimension probe
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Number of images probed concurrently by the deduplicator
pub const DEFAULT_PROBE_CHUNK_SIZE: usize = 5;

/// Maximum accepted rate-limit interval
const MAX_INTERVAL: Duration = Duration::from_secs(60);

/// Credentials for external metadata services.
///
/// API keys should never be hardcoded in the binary. They should be:
/// - Loaded from environment variables
/// - Stored in secure configuration files
/// - Injected via the host platform's secure configuration system
#[derive(Clone, Default, PartialEq, Eq)]
pub struct MetadataApiConfig {
    /// MusicBrainz user agent string (format: "AppName/Version (Contact)")
    ///
    /// See: https://musicbrainz.org/doc/MusicBrainz_API/Rate_Limiting
    pub musicbrainz_user_agent: Option<String>,

    /// Last.fm API key for artist.getinfo and album.getinfo
    ///
    /// Obtain an API key from: https://www.last.fm/api/account/create
    pub lastfm_api_key: Option<String>,

    /// Fanart.tv personal or project API key
    pub fanart_api_key: Option<String>,
}

impl std::fmt::Debug for MetadataApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataApiConfig")
            .field("musicbrainz_user_agent", &self.musicbrainz_user_agent)
            .field(
                "lastfm_api_key",
                &self.lastfm_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field(
                "fanart_api_key",
                &self.fanart_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl MetadataApiConfig {
    /// Creates a new MetadataApiConfig with no API keys configured
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the MusicBrainz user agent
    pub fn with_musicbrainz_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.musicbrainz_user_agent = Some(user_agent.into());
        self
    }

    /// Sets the Last.fm API key
    pub fn with_lastfm_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.lastfm_api_key = Some(api_key.into());
        self
    }

    /// Sets the Fanart.tv API key
    pub fn with_fanart_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.fanart_api_key = Some(api_key.into());
        self
    }

    /// User agent sent to MusicBrainz and the Cover Art Archive
    pub fn user_agent(&self) -> &str {
        self.musicbrainz_user_agent
            .as_deref()
            .unwrap_or(DEFAULT_USER_AGENT)
    }

    /// Checks if Last.fm is configured
    pub fn has_lastfm(&self) -> bool {
        self.lastfm_api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    /// Checks if Fanart.tv is configured
    pub fn has_fanart(&self) -> bool {
        self.fanart_api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    /// Validates the credentials
    pub fn validate(&self) -> Result<()> {
        if let Some(ref ua) = self.musicbrainz_user_agent {
            if ua.is_empty() {
                return Err(Error::Config(
                    "MusicBrainz user agent cannot be empty".to_string(),
                ));
            }
            if !ua.contains('/') || !ua.contains('(') || !ua.contains(')') {
                return Err(Error::Config(
                    "MusicBrainz user agent must follow format: 'AppName/Version (Contact)'"
                        .to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Minimum spacing between outbound calls, keyed by provider name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Interval used for providers without an explicit entry
    pub default_interval: Duration,
    /// Explicit per-provider intervals
    pub intervals: HashMap<String, Duration>,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        let intervals = [
            // MusicBrainz allows 1 request/second per client
            (providers::MUSICBRAINZ, Duration::from_millis(1000)),
            (providers::COVERARTARCHIVE, Duration::from_millis(500)),
            (providers::LASTFM, Duration::from_millis(250)),
            (providers::FANARTTV, Duration::from_millis(250)),
            (providers::WIKIPEDIA, Duration::from_millis(100)),
        ]
        .into_iter()
        .map(|(name, interval)| (name.to_string(), interval))
        .collect();

        Self {
            default_interval: Duration::from_millis(1000),
            intervals,
        }
    }
}

impl RateLimitConfig {
    /// Interval configured for `provider`, or the default
    pub fn interval_for(&self, provider: &str) -> Duration {
        self.intervals
            .get(provider)
            .copied()
            .unwrap_or(self.default_interval)
    }

    /// Overrides the interval for one provider
    pub fn with_interval(mut self, provider: impl Into<String>, interval: Duration) -> Self {
        self.intervals.insert(provider.into(), interval);
        self
    }

    fn validate(&self) -> Result<()> {
        let all = std::iter::once(("default", &self.default_interval))
            .chain(self.intervals.iter().map(|(k, v)| (k.as_str(), v)));

        for (provider, interval) in all {
            if *interval > MAX_INTERVAL {
                return Err(Error::Config(format!(
                    "Rate limit interval for '{}' exceeds maximum of 60 seconds",
                    provider
                )));
            }
        }

        Ok(())
    }
}

/// Resolver configuration.
///
/// Use [`ResolverConfig::builder`] to construct validated instances.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Provider credentials
    pub api: MetadataApiConfig,

    /// Per-provider minimum call spacing
    pub rate_limits: RateLimitConfig,

    /// Timeout applied to every outbound provider request
    pub request_timeout: Duration,

    /// Upper bound for a single agent's task in an aggregate call
    pub agent_timeout: Duration,

    /// Timeout applied to every image-dimension probe
    pub probe_timeout: Duration,

    /// How many images the deduplicator probes concurrently
    pub probe_chunk_size: usize,

    /// Language priority list for prose sources (e.g. `["es", "en"]`)
    pub languages: Vec<String>,

    /// Wikipedia title suffixes, most specific first, ending with `""`
    pub disambiguation_suffixes: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            api: MetadataApiConfig::default(),
            rate_limits: RateLimitConfig::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            agent_timeout: DEFAULT_AGENT_TIMEOUT,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            probe_chunk_size: DEFAULT_PROBE_CHUNK_SIZE,
            languages: vec!["es".to_string(), "en".to_string()],
            disambiguation_suffixes: [
                "(band)",
                "(musical group)",
                "(musician)",
                "(singer)",
                "(rapper)",
                "(banda)",
                "(grupo musical)",
                "(músico)",
                "(cantante)",
                "",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

impl ResolverConfig {
    /// Creates a new builder seeded with the defaults.
    pub fn builder() -> ResolverConfigBuilder {
        ResolverConfigBuilder::default()
    }

    /// Builds a configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut builder = Self::builder();

        if let Some(ua) = non_empty("MUSICBRAINZ_USER_AGENT") {
            builder = builder.musicbrainz_user_agent(ua);
        }
        if let Some(key) = non_empty("LASTFM_API_KEY") {
            builder = builder.lastfm_api_key(key);
        }
        if let Some(key) = non_empty("FANART_API_KEY") {
            builder = builder.fanart_api_key(key);
        }
        if let Some(langs) = non_empty("METADATA_LANGUAGES") {
            builder = builder.languages(
                langs
                    .split(',')
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>(),
            );
        }

        builder.build()
    }

    /// Validates the whole configuration
    pub fn validate(&self) -> Result<()> {
        self.api.validate()?;
        self.rate_limits.validate()?;

        for (name, value) in [
            ("request_timeout", self.request_timeout),
            ("agent_timeout", self.agent_timeout),
            ("probe_timeout", self.probe_timeout),
        ] {
            if value.is_zero() {
                return Err(Error::Config(format!("{} must be greater than 0", name)));
            }
        }

        if self.probe_chunk_size == 0 {
            return Err(Error::Config(
                "probe_chunk_size must be at least 1".to_string(),
            ));
        }

        if self.languages.is_empty() {
            return Err(Error::Config(
                "At least one language must be configured".to_string(),
            ));
        }

        if self.disambiguation_suffixes.is_empty() {
            return Err(Error::Config(
                "At least one disambiguation suffix (possibly empty) must be configured"
                    .to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for [`ResolverConfig`].
#[derive(Debug, Default)]
pub struct ResolverConfigBuilder {
    config: ResolverConfig,
}

impl ResolverConfigBuilder {
    pub fn musicbrainz_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.api.musicbrainz_user_agent = Some(user_agent.into());
        self
    }

    pub fn lastfm_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.api.lastfm_api_key = Some(api_key.into());
        self
    }

    pub fn fanart_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.api.fanart_api_key = Some(api_key.into());
        self
    }

    pub fn api(mut self, api: MetadataApiConfig) -> Self {
        self.config.api = api;
        self
    }

    pub fn rate_limits(mut self, rate_limits: RateLimitConfig) -> Self {
        self.config.rate_limits = rate_limits;
        self
    }

    pub fn provider_interval(mut self, provider: impl Into<String>, interval: Duration) -> Self {
        self.config.rate_limits.intervals.insert(provider.into(), interval);
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    pub fn agent_timeout(mut self, timeout: Duration) -> Self {
        self.config.agent_timeout = timeout;
        self
    }

    pub fn probe_timeout(mut self, timeout: Duration) -> Self {
        self.config.probe_timeout = timeout;
        self
    }

    pub fn probe_chunk_size(mut self, size: usize) -> Self {
        self.config.probe_chunk_size = size;
        self
    }

    pub fn languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.languages = languages.into_iter().map(Into::into).collect();
        self
    }

    pub fn disambiguation_suffixes<I, S>(mut self, suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.disambiguation_suffixes = suffixes.into_iter().map(Into::into).collect();
        self
    }

    /// Validates and returns the configuration
    pub fn build(self) -> Result<ResolverConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ResolverConfig::builder().build().unwrap();
        assert_eq!(config.request_timeout, Duration::from_secs(8));
        assert_eq!(config.probe_chunk_size, 5);
        assert_eq!(config.languages, vec!["es", "en"]);
        assert_eq!(config.disambiguation_suffixes.first().unwrap(), "(band)");
        assert_eq!(config.disambiguation_suffixes.last().unwrap(), "");
    }

    #[test]
    fn test_provider_enablement() {
        let api = MetadataApiConfig::new();
        assert!(!api.has_lastfm());
        assert!(!api.has_fanart());
        assert_eq!(api.user_agent(), DEFAULT_USER_AGENT);

        let api = api
            .with_lastfm_api_key("abc")
            .with_fanart_api_key("")
            .with_musicbrainz_user_agent("App/1.0 (me@example.com)");
        assert!(api.has_lastfm());
        assert!(!api.has_fanart());
        assert_eq!(api.user_agent(), "App/1.0 (me@example.com)");
    }

    #[test]
    fn test_invalid_user_agent_rejected() {
        let result = ResolverConfig::builder()
            .musicbrainz_user_agent("just-a-name")
            .build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_zero_values_rejected() {
        assert!(ResolverConfig::builder()
            .request_timeout(Duration::ZERO)
            .build()
            .is_err());
        assert!(ResolverConfig::builder().probe_chunk_size(0).build().is_err());
        assert!(ResolverConfig::builder()
            .languages(Vec::<String>::new())
            .build()
            .is_err());
    }

    #[test]
    fn test_interval_bounds() {
        let config = ResolverConfig::builder()
            .provider_interval(providers::LASTFM, Duration::from_secs(61))
            .build();
        assert!(config.is_err());
    }

    #[test]
    fn test_interval_lookup() {
        let limits = RateLimitConfig::default().with_interval("custom", Duration::from_millis(42));
        assert_eq!(
            limits.interval_for(providers::MUSICBRAINZ),
            Duration::from_secs(1)
        );
        assert_eq!(limits.interval_for("custom"), Duration::from_millis(42));
        assert_eq!(limits.interval_for("unknown"), limits.default_interval);
    }

    #[test]
    fn test_from_lookup() {
        let config = ResolverConfig::from_lookup(|key| match key {
            "LASTFM_API_KEY" => Some("lf-key".to_string()),
            "FANART_API_KEY" => Some("   ".to_string()),
            "METADATA_LANGUAGES" => Some("en, fr ,".to_string()),
            _ => None,
        })
        .unwrap();

        assert!(config.api.has_lastfm());
        assert!(!config.api.has_fanart());
        assert_eq!(config.languages, vec!["en", "fr"]);
    }

    #[test]
    fn test_debug_redacts_keys() {
        let api = MetadataApiConfig::new().with_lastfm_api_key("super-secret");
        let rendered = format!("{:?}", api);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
