//! MusicBrainz Agent
//!
//! Structured catalogue search over the MusicBrainz web service, plus a
//! last-resort biography taken from the artist annotation.
//!
//! ## API Endpoints
//!
//! - **Search**: `https://musicbrainz.org/ws/2/{artist|release-group|release|recording}?query={lucene}&limit={n}&fmt=json`
//! - **Lookup**: `https://musicbrainz.org/ws/2/artist/{mbid}?inc=annotation+tags&fmt=json`
//!
//! ## Rate Limiting
//!
//! MusicBrainz allows one request per second per client. The shared rate
//! limiter enforces it under the `musicbrainz` key.
//!
//! ## User Agent Requirement
//!
//! MusicBrainz requires all API clients to identify themselves with a proper User-Agent header:
//! Format: "ApplicationName/Version (ContactEmail)"
//!
//! ## Query Construction
//!
//! Searches use Lucene syntax with field weighting: title fields are boosted
//! `^3`, artist `^2`; recordings add a ±10 s duration window (milliseconds)
//! and an exact ISRC alternative.
//!
//! ```ignore
//! let query = build_recording_query(
//!     &RecordingSearch::new("Persiana Americana").artist("Soda Stereo").duration_secs(263),
//! );
//! // recording:"Persiana Americana"^3 AND artist:"Soda Stereo"^2 AND dur:[253000 TO 273000]
//! ```

use super::{BioRetriever, ProviderAgent, StructuredSearch};
use crate::error::Result;
use crate::models::{
    ArtistBio, ArtistMatch, BioRequest, RecordingMatch, RecordingSearch, ReleaseMatch, Tag,
};
use crate::text::clean_biography;
use crate::transport::ProviderTransport;
use async_trait::async_trait;
use bridge_traits::http::HttpRequest;
use core_runtime::config::providers::MUSICBRAINZ;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};

/// MusicBrainz API base URL
const MUSICBRAINZ_API_BASE: &str = "https://musicbrainz.org/ws/2";

/// Public artist page, used as the biography source
const MUSICBRAINZ_ARTIST_PAGE: &str = "https://musicbrainz.org/artist";

const PRIORITY: i32 = 30;

/// Search results considered when resolving a name to an MBID
const MAX_SEARCH_RESULTS: u32 = 5;

/// Recording duration tolerance, in seconds either side
const DURATION_TOLERANCE_SECS: u32 = 10;

pub struct MusicBrainzAgent {
    transport: ProviderTransport,
    user_agent: String,
}

#[derive(Debug, Default, Deserialize)]
struct ArtistSearchResponse {
    #[serde(default)]
    artists: Vec<ArtistResult>,
}

#[derive(Debug, Deserialize)]
struct ArtistResult {
    id: String,
    name: String,
    #[serde(default)]
    score: i32,
    country: Option<String>,
    disambiguation: Option<String>,
    #[serde(default)]
    tags: Vec<TagResult>,
}

#[derive(Debug, Deserialize)]
struct TagResult {
    name: String,
    #[serde(default)]
    count: i32,
}

#[derive(Debug, Deserialize)]
struct ArtistCredit {
    name: String,
    #[serde(default)]
    joinphrase: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ReleaseGroupSearchResponse {
    #[serde(default)]
    release_groups: Vec<ReleaseGroupResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ReleaseGroupResult {
    id: String,
    title: String,
    #[serde(default)]
    score: i32,
    primary_type: Option<String>,
    first_release_date: Option<String>,
    #[serde(default)]
    artist_credit: Vec<ArtistCredit>,
}

#[derive(Debug, Default, Deserialize)]
struct ReleaseSearchResponse {
    #[serde(default)]
    releases: Vec<ReleaseResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ReleaseResult {
    id: String,
    title: String,
    #[serde(default)]
    score: i32,
    date: Option<String>,
    #[serde(default)]
    artist_credit: Vec<ArtistCredit>,
    release_group: Option<ReleaseGroupType>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ReleaseGroupType {
    primary_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RecordingSearchResponse {
    #[serde(default)]
    recordings: Vec<RecordingResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RecordingResult {
    id: String,
    title: String,
    #[serde(default)]
    score: i32,
    length: Option<u64>,
    #[serde(default)]
    isrcs: Vec<String>,
    #[serde(default)]
    artist_credit: Vec<ArtistCredit>,
}

/// MusicBrainz artist lookup response
#[derive(Debug, Deserialize)]
struct ArtistLookupResponse {
    id: String,
    annotation: Option<String>,
    disambiguation: Option<String>,
}

impl MusicBrainzAgent {
    /// # Arguments
    ///
    /// * `transport` - Shared rate-limited transport
    /// * `user_agent` - User-Agent header (format: "AppName/Version (Contact)")
    pub fn new(transport: ProviderTransport, user_agent: impl Into<String>) -> Self {
        Self {
            transport,
            user_agent: user_agent.into(),
        }
    }

    fn request(&self, url: String) -> HttpRequest {
        HttpRequest::get(url)
            .header("User-Agent", &self.user_agent)
            .header("Accept", "application/json")
    }

    async fn search<T>(&self, entity: &str, query: &str, limit: u32) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        let url = format!(
            "{}/{}?query={}&limit={}&fmt=json",
            MUSICBRAINZ_API_BASE,
            entity,
            urlencoding::encode(query),
            limit
        );
        debug!(entity = %entity, query = %query, "Searching MusicBrainz");

        let response = self.transport.get_json(MUSICBRAINZ, self.request(url)).await?;
        Ok(response.unwrap_or_default())
    }

    async fn lookup_artist(&self, mbid: &str) -> Result<Option<ArtistLookupResponse>> {
        let url = format!(
            "{}/artist/{}?inc=annotation+tags&fmt=json",
            MUSICBRAINZ_API_BASE, mbid
        );
        self.transport.get_json(MUSICBRAINZ, self.request(url)).await
    }

    async fn resolve_artist_mbid(&self, request: &BioRequest) -> Result<Option<String>> {
        if let Some(mbid) = &request.mbid {
            return Ok(Some(mbid.clone()));
        }

        let matches = self.search_artists(&request.name, MAX_SEARCH_RESULTS).await?;
        Ok(ArtistMatch::best(&request.name, &matches).map(|m| m.mbid.clone()))
    }
}

impl ProviderAgent for MusicBrainzAgent {
    fn name(&self) -> &str {
        MUSICBRAINZ
    }

    fn priority(&self) -> i32 {
        PRIORITY
    }
}

#[async_trait]
impl StructuredSearch for MusicBrainzAgent {
    async fn search_artists(&self, name: &str, limit: u32) -> Result<Vec<ArtistMatch>> {
        let response: ArtistSearchResponse = self
            .search("artist", &build_artist_query(name), limit)
            .await?;

        Ok(response
            .artists
            .into_iter()
            .map(|artist| ArtistMatch {
                mbid: artist.id,
                name: artist.name,
                score: artist.score,
                country: artist.country,
                disambiguation: artist.disambiguation.filter(|d| !d.is_empty()),
                tags: filter_tags(artist.tags),
            })
            .collect())
    }

    async fn search_release_groups(
        &self,
        artist: &str,
        title: &str,
        limit: u32,
    ) -> Result<Vec<ReleaseMatch>> {
        let response: ReleaseGroupSearchResponse = self
            .search("release-group", &build_release_group_query(artist, title), limit)
            .await?;

        Ok(response
            .release_groups
            .into_iter()
            .map(|group| ReleaseMatch {
                mbid: group.id,
                title: group.title,
                artist: credit_name(&group.artist_credit),
                score: group.score,
                primary_type: group.primary_type,
                date: group.first_release_date,
            })
            .collect())
    }

    async fn search_releases(
        &self,
        artist: &str,
        title: &str,
        limit: u32,
    ) -> Result<Vec<ReleaseMatch>> {
        let response: ReleaseSearchResponse = self
            .search("release", &build_release_query(artist, title), limit)
            .await?;

        Ok(response
            .releases
            .into_iter()
            .map(|release| ReleaseMatch {
                mbid: release.id,
                title: release.title,
                artist: credit_name(&release.artist_credit),
                score: release.score,
                primary_type: release.release_group.and_then(|g| g.primary_type),
                date: release.date,
            })
            .collect())
    }

    async fn search_recordings(
        &self,
        search: &RecordingSearch,
        limit: u32,
    ) -> Result<Vec<RecordingMatch>> {
        let response: RecordingSearchResponse = self
            .search("recording", &build_recording_query(search), limit)
            .await?;

        Ok(response
            .recordings
            .into_iter()
            .map(|recording| RecordingMatch {
                mbid: recording.id,
                title: recording.title,
                artist: credit_name(&recording.artist_credit),
                length_ms: recording.length,
                score: recording.score,
                isrcs: recording.isrcs,
            })
            .collect())
    }
}

#[async_trait]
impl BioRetriever for MusicBrainzAgent {
    async fn fetch_bio(&self, request: &BioRequest) -> Result<Option<ArtistBio>> {
        let Some(mbid) = self.resolve_artist_mbid(request).await? else {
            info!(artist = %request.name, "No MusicBrainz artist found");
            return Ok(None);
        };

        let Some(artist) = self.lookup_artist(&mbid).await? else {
            return Ok(None);
        };

        let Some(content) = artist
            .annotation
            .as_deref()
            .map(strip_wiki_markup)
            .and_then(|text| clean_biography(&text))
        else {
            debug!(mbid = %mbid, "MusicBrainz artist has no usable annotation");
            return Ok(None);
        };

        Ok(Some(ArtistBio {
            content,
            summary: artist.disambiguation.filter(|d| !d.is_empty()),
            source_url: Some(format!("{}/{}", MUSICBRAINZ_ARTIST_PAGE, artist.id)),
            provider_name: MUSICBRAINZ.to_string(),
        }))
    }
}

/// Escape special Lucene query characters
///
/// MusicBrainz uses Lucene for search, so user-supplied terms are escaped.
pub fn escape_lucene_query(query: &str) -> String {
    const SPECIAL_CHARS: &[char] = &[
        '+', '-', '&', '|', '!', '(', ')', '{', '}', '[', ']', '^', '"', '~', '*', '?', ':', '\\',
        '/',
    ];

    let mut escaped = String::with_capacity(query.len());
    for c in query.chars() {
        if SPECIAL_CHARS.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

pub fn build_artist_query(name: &str) -> String {
    let name = escape_lucene_query(name);
    format!("artist:\"{0}\"^2 OR alias:\"{0}\"", name)
}

pub fn build_release_group_query(artist: &str, title: &str) -> String {
    format!(
        "releasegroup:\"{}\"^3 AND artist:\"{}\"^2",
        escape_lucene_query(title),
        escape_lucene_query(artist)
    )
}

pub fn build_release_query(artist: &str, title: &str) -> String {
    format!(
        "release:\"{}\"^3 AND artist:\"{}\"^2",
        escape_lucene_query(title),
        escape_lucene_query(artist)
    )
}

/// Builds a weighted recording query
///
/// With an ISRC the exact code is offered as an alternative to the
/// fielded match, so a correct ISRC wins even when titles differ.
pub fn build_recording_query(search: &RecordingSearch) -> String {
    let mut clauses = vec![format!(
        "recording:\"{}\"^3",
        escape_lucene_query(&search.title)
    )];

    if let Some(artist) = &search.artist {
        clauses.push(format!("artist:\"{}\"^2", escape_lucene_query(artist)));
    }
    if let Some(release) = &search.release {
        clauses.push(format!("release:\"{}\"", escape_lucene_query(release)));
    }
    if let Some(duration) = search.duration_secs {
        let low = u64::from(duration.saturating_sub(DURATION_TOLERANCE_SECS)) * 1000;
        let high = u64::from(duration.saturating_add(DURATION_TOLERANCE_SECS)) * 1000;
        clauses.push(format!("dur:[{} TO {}]", low, high));
    }

    let fielded = clauses.join(" AND ");
    match search.isrc.as_deref().filter(|isrc| !isrc.is_empty()) {
        Some(isrc) => format!("isrc:{} OR ({})", escape_lucene_query(isrc), fielded),
        None => fielded,
    }
}

/// Keeps tags used at least once, most used first
fn filter_tags(tags: Vec<TagResult>) -> Vec<Tag> {
    let mut tags: Vec<Tag> = tags
        .into_iter()
        .filter(|tag| tag.count >= 1)
        .map(|tag| Tag {
            name: tag.name,
            count: tag.count,
        })
        .collect();
    tags.sort_by(|a, b| b.count.cmp(&a.count));
    tags
}

fn credit_name(credits: &[ArtistCredit]) -> Option<String> {
    if credits.is_empty() {
        return None;
    }
    Some(
        credits
            .iter()
            .map(|credit| format!("{}{}", credit.name, credit.joinphrase))
            .collect(),
    )
}

/// Annotations use wiki markup: `'''bold'''`, `''italic''` and `[url|label]`
fn strip_wiki_markup(text: &str) -> String {
    let text = text.replace("'''", "").replace("''", "");
    let mut output = String::with_capacity(text.len());
    let mut rest = text.as_str();

    while let Some(start) = rest.find('[') {
        output.push_str(&rest[..start]);
        let Some(end) = rest[start..].find(']') else {
            rest = &rest[start..];
            break;
        };
        let link = &rest[start + 1..start + end];
        output.push_str(link.split_once('|').map_or(link, |(_, label)| label));
        rest = &rest[start + end + 1..];
    }
    output.push_str(rest);
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_lucene_query() {
        assert_eq!(escape_lucene_query("AC/DC"), "AC\\/DC");
        assert_eq!(escape_lucene_query("Artist (Name)"), "Artist \\(Name\\)");
        assert_eq!(escape_lucene_query("Normal Name"), "Normal Name");
        assert_eq!(escape_lucene_query("Guns N' Roses"), "Guns N' Roses");
    }

    #[test]
    fn test_recording_query_duration_window() {
        let query = build_recording_query(
            &RecordingSearch::new("Persiana Americana")
                .artist("Soda Stereo")
                .duration_secs(263),
        );
        assert_eq!(
            query,
            "recording:\"Persiana Americana\"^3 AND artist:\"Soda Stereo\"^2 AND dur:[253000 TO 273000]"
        );
    }

    #[test]
    fn test_recording_query_short_track_does_not_underflow() {
        let query = build_recording_query(&RecordingSearch::new("Intro").duration_secs(4));
        assert!(query.contains("dur:[0 TO 14000]"));
    }

    #[test]
    fn test_recording_query_with_release_and_isrc() {
        let query = build_recording_query(
            &RecordingSearch::new("De Música Ligera")
                .release("Canción Animal")
                .isrc("ARF169000043"),
        );
        assert_eq!(
            query,
            "isrc:ARF169000043 OR (recording:\"De Música Ligera\"^3 AND release:\"Canción Animal\")"
        );
    }

    #[test]
    fn test_artist_and_release_queries() {
        assert_eq!(
            build_artist_query("Los Prisioneros"),
            "artist:\"Los Prisioneros\"^2 OR alias:\"Los Prisioneros\""
        );
        assert_eq!(
            build_release_query("Soda Stereo", "Signos"),
            "release:\"Signos\"^3 AND artist:\"Soda Stereo\"^2"
        );
        assert_eq!(
            build_release_group_query("AC/DC", "Back in Black"),
            "releasegroup:\"Back in Black\"^3 AND artist:\"AC\\/DC\"^2"
        );
    }

    #[test]
    fn test_filter_tags() {
        let tags = filter_tags(vec![
            TagResult {
                name: "spam".into(),
                count: 0,
            },
            TagResult {
                name: "rock".into(),
                count: 3,
            },
            TagResult {
                name: "new wave".into(),
                count: 7,
            },
            TagResult {
                name: "downvoted".into(),
                count: -1,
            },
        ]);

        let names: Vec<_> = tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["new wave", "rock"]);
    }

    #[test]
    fn test_credit_name_joins_phrases() {
        let credits = vec![
            ArtistCredit {
                name: "Charly García".into(),
                joinphrase: " & ".into(),
            },
            ArtistCredit {
                name: "Pedro Aznar".into(),
                joinphrase: String::new(),
            },
        ];
        assert_eq!(
            credit_name(&credits).as_deref(),
            Some("Charly García & Pedro Aznar")
        );
        assert_eq!(credit_name(&[]), None);
    }

    #[test]
    fn test_strip_wiki_markup() {
        assert_eq!(
            strip_wiki_markup("'''Soda Stereo''' see [https://sodastereo.com|official site] and [plain]"),
            "Soda Stereo see official site and plain"
        );
    }
}
