//! First-match strategy
//!
//! Sequential by intent: a short-circuiting search gains nothing from
//! parallelism, and going one step at a time keeps pressure on any single
//! provider low.

use super::MetadataOrchestrator;
use crate::models::{AlbumCover, ArtistBio, BioRequest, CoverQuery};
use crate::providers::BioRetriever;
use tracing::{debug, info};

impl MetadataOrchestrator {
    /// Resolves one biography
    ///
    /// Order: agent (priority) → language → suffix (most specific first, bare
    /// name last). Prose from agents that require validation must pass the
    /// content disambiguator. The first accepted text is returned.
    ///
    /// # Returns
    ///
    /// - `Some(bio)` - First accepted biography
    /// - `None` - Every combination was exhausted (normal "not found")
    pub async fn resolve_bio(&self, mbid: Option<&str>, name: &str) -> Option<ArtistBio> {
        let agents = self.registry.bio_agents();
        if agents.is_empty() {
            debug!(artist = %name, "No biography agents enabled");
            return None;
        }

        for agent in &agents {
            if let Some(bio) = self.first_bio_from(agent.as_ref(), mbid, name).await {
                info!(provider = %agent.name(), artist = %name, "Biography resolved");
                return Some(bio);
            }
        }

        info!(artist = %name, "No biography found");
        None
    }

    async fn first_bio_from(
        &self,
        agent: &dyn BioRetriever,
        mbid: Option<&str>,
        name: &str,
    ) -> Option<ArtistBio> {
        let languages: Vec<Option<&str>> = if agent.languages().is_empty() {
            vec![None]
        } else {
            agent.languages().iter().map(|l| Some(l.as_str())).collect()
        };
        let suffixes: Vec<&str> = if agent.query_suffixes().is_empty() {
            vec![""]
        } else {
            agent.query_suffixes().iter().map(String::as_str).collect()
        };

        for language in &languages {
            for suffix in &suffixes {
                let request = BioRequest::new(mbid, name)
                    .with_language(*language)
                    .with_suffix(suffix);

                let Some(bio) = self
                    .isolate(agent.name(), agent.fetch_bio(&request))
                    .await
                    .flatten()
                else {
                    continue;
                };

                if agent.requires_validation() && !self.disambiguator.is_music_related(&bio.content)
                {
                    debug!(
                        provider = %agent.name(),
                        language = ?language,
                        suffix = %suffix,
                        keyword_matches = self.disambiguator.keyword_matches(&bio.content),
                        "Biography rejected by content validation"
                    );
                    continue;
                }

                return Some(bio);
            }
        }

        None
    }

    /// Resolves one album cover
    ///
    /// Without a release MBID the search agents are asked for one first.
    /// Cover agents are then tried in priority order; the first non-empty
    /// cover wins.
    pub async fn resolve_covers(
        &self,
        release_mbid: Option<&str>,
        artist: &str,
        album: &str,
    ) -> Option<AlbumCover> {
        let agents = self.registry.cover_agents();
        if agents.is_empty() {
            debug!(artist = %artist, album = %album, "No cover agents enabled");
            return None;
        }

        let release_mbid = match release_mbid {
            Some(mbid) => Some(mbid.to_string()),
            None => self.search_release_mbid(artist, album).await,
        };
        let query = CoverQuery::new(release_mbid.as_deref(), artist, album);

        for agent in &agents {
            let cover = self
                .isolate(agent.name(), agent.fetch_cover(&query))
                .await
                .flatten()
                .filter(|cover| !cover.is_empty());

            if let Some(cover) = cover {
                info!(provider = %agent.name(), artist = %artist, album = %album, "Cover resolved");
                return Some(cover);
            }
        }

        info!(artist = %artist, album = %album, "No cover found");
        None
    }
}
