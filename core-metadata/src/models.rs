//! Resolution Value Types
//!
//! Request-scoped values produced by provider agents and combined by the
//! orchestrator. Nothing in here is persisted; callers own the results.

use serde::{Deserialize, Serialize};

/// Narrow interface an agent can be registered under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Bio,
    Image,
    Cover,
    Search,
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Capability::Bio => "bio",
            Capability::Image => "image",
            Capability::Cover => "cover",
            Capability::Search => "search",
        };
        f.write_str(name)
    }
}

/// Artist biography returned by a single provider attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistBio {
    /// Cleaned prose
    pub content: String,
    /// Optional short form
    pub summary: Option<String>,
    pub source_url: Option<String>,
    pub provider_name: String,
}

/// Album cover URLs in up to three sizes
///
/// A provider may supply only a subset. Absent sizes are `None`, never an
/// empty string; use [`AlbumCover::from_sizes`] to normalize raw values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumCover {
    pub small_url: Option<String>,
    pub medium_url: Option<String>,
    pub large_url: Option<String>,
    pub provider_name: String,
}

impl AlbumCover {
    /// Builds a cover, mapping blank URLs to `None`
    pub fn from_sizes(
        provider_name: impl Into<String>,
        small: Option<String>,
        medium: Option<String>,
        large: Option<String>,
    ) -> Self {
        fn non_blank(url: Option<String>) -> Option<String> {
            url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty())
        }

        Self {
            small_url: non_blank(small),
            medium_url: non_blank(medium),
            large_url: non_blank(large),
            provider_name: provider_name.into(),
        }
    }

    /// True when the provider supplied no size at all
    pub fn is_empty(&self) -> bool {
        self.small_url.is_none() && self.medium_url.is_none() && self.large_url.is_none()
    }
}

/// Semantic type of an image variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageType {
    Profile,
    Background,
    Banner,
    Logo,
}

/// One candidate image option returned by a provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageVariant {
    pub provider: String,
    pub url: String,
    pub thumbnail_url: Option<String>,
    /// Unknown until probed
    pub width: Option<u32>,
    pub height: Option<u32>,
    #[serde(rename = "type")]
    pub image_type: ImageType,
}

impl ImageVariant {
    pub fn new(provider: impl Into<String>, url: impl Into<String>, image_type: ImageType) -> Self {
        Self {
            provider: provider.into(),
            url: url.into(),
            thumbnail_url: None,
            width: None,
            height: None,
            image_type,
        }
    }

    pub fn with_thumbnail(mut self, thumbnail_url: impl Into<String>) -> Self {
        self.thumbnail_url = Some(thumbnail_url.into());
        self
    }

    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }
}

/// Resolution-redundancy key used by the deduplicator
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    pub image_type: ImageType,
    pub width: u32,
    pub height: u32,
}

impl DedupKey {
    pub fn new(image_type: ImageType, width: u32, height: u32) -> Self {
        Self {
            image_type,
            width,
            height,
        }
    }
}

/// One attempt of a biography lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BioRequest {
    pub mbid: Option<String>,
    pub name: String,
    /// Language code, `None` for language-neutral providers
    pub language: Option<String>,
    /// Disambiguation suffix, empty for the bare name
    pub suffix: String,
}

impl BioRequest {
    pub fn new(mbid: Option<&str>, name: &str) -> Self {
        Self {
            mbid: mbid.map(str::to_string),
            name: name.to_string(),
            language: None,
            suffix: String::new(),
        }
    }

    pub fn with_language(mut self, language: Option<&str>) -> Self {
        self.language = language.map(str::to_string);
        self
    }

    pub fn with_suffix(mut self, suffix: &str) -> Self {
        self.suffix = suffix.to_string();
        self
    }

    /// Search term for this attempt, e.g. `"Queen (band)"`
    pub fn query(&self) -> String {
        if self.suffix.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.name, self.suffix)
        }
    }
}

/// Artist identity used by image lookups
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistQuery {
    pub mbid: Option<String>,
    pub name: String,
}

impl ArtistQuery {
    pub fn new(mbid: Option<&str>, name: &str) -> Self {
        Self {
            mbid: mbid.map(str::to_string),
            name: name.to_string(),
        }
    }
}

/// Album identity used by cover lookups
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverQuery {
    /// MusicBrainz release MBID
    pub release_mbid: Option<String>,
    pub artist: String,
    pub album: String,
}

impl CoverQuery {
    pub fn new(release_mbid: Option<&str>, artist: &str, album: &str) -> Self {
        Self {
            release_mbid: release_mbid.map(str::to_string),
            artist: artist.to_string(),
            album: album.to_string(),
        }
    }
}

/// Recording search criteria
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingSearch {
    pub title: String,
    pub artist: Option<String>,
    pub release: Option<String>,
    /// Track length in seconds
    pub duration_secs: Option<u32>,
    pub isrc: Option<String>,
}

impl RecordingSearch {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }

    pub fn release(mut self, release: impl Into<String>) -> Self {
        self.release = Some(release.into());
        self
    }

    pub fn duration_secs(mut self, duration: u32) -> Self {
        self.duration_secs = Some(duration);
        self
    }

    pub fn isrc(mut self, isrc: impl Into<String>) -> Self {
        self.isrc = Some(isrc.into());
        self
    }
}

/// Folksonomy tag attached to a search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub count: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistMatch {
    pub mbid: String,
    pub name: String,
    pub score: i32,
    pub country: Option<String>,
    pub disambiguation: Option<String>,
    /// Tags with `count >= 1`, most used first
    pub tags: Vec<Tag>,
}

/// Search score below which a non-exact hit is not trusted
pub const MIN_MATCH_SCORE: i32 = 80;

impl ArtistMatch {
    /// Exact (case-insensitive) name match first, then highest score.
    /// Ties keep search order.
    pub fn best<'a>(name: &str, candidates: &'a [ArtistMatch]) -> Option<&'a ArtistMatch> {
        best_by_name(candidates, name, |c| (&c.name, c.score))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseMatch {
    pub mbid: String,
    pub title: String,
    pub artist: Option<String>,
    pub score: i32,
    pub primary_type: Option<String>,
    pub date: Option<String>,
}

impl ReleaseMatch {
    /// Exact (case-insensitive) title match first, then highest score
    pub fn best<'a>(title: &str, candidates: &'a [ReleaseMatch]) -> Option<&'a ReleaseMatch> {
        best_by_name(candidates, title, |c| (&c.title, c.score))
    }
}

fn best_by_name<'a, T, F>(candidates: &'a [T], wanted: &str, key: F) -> Option<&'a T>
where
    F: Fn(&T) -> (&String, i32),
{
    let wanted = wanted.trim().to_lowercase();
    candidates
        .iter()
        .rev()
        .map(|candidate| {
            let (name, score) = key(candidate);
            (candidate, name.trim().to_lowercase() == wanted, score)
        })
        .filter(|(_, exact, score)| *exact || *score >= MIN_MATCH_SCORE)
        .max_by_key(|(_, exact, score)| (*exact, *score))
        .map(|(candidate, _, _)| candidate)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingMatch {
    pub mbid: String,
    pub title: String,
    pub artist: Option<String>,
    pub length_ms: Option<u64>,
    pub score: i32,
    pub isrcs: Vec<String>,
}

/// One entry of a bulk variant category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkImage {
    pub url: String,
    pub thumbnail_url: Option<String>,
}

/// Every image a bulk provider knows for an artist, per category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkVariants {
    pub artist_thumbs: Vec<BulkImage>,
    pub backgrounds: Vec<BulkImage>,
    pub banners: Vec<BulkImage>,
    pub logos: Vec<BulkImage>,
}

impl BulkVariants {
    pub fn is_empty(&self) -> bool {
        self.artist_thumbs.is_empty()
            && self.backgrounds.is_empty()
            && self.banners.is_empty()
            && self.logos.is_empty()
    }

    /// Expands into one variant per entry, tagged with its semantic type
    pub fn into_variants(self, provider: &str) -> Vec<ImageVariant> {
        let categories = [
            (self.artist_thumbs, ImageType::Profile),
            (self.backgrounds, ImageType::Background),
            (self.banners, ImageType::Banner),
            (self.logos, ImageType::Logo),
        ];

        categories
            .into_iter()
            .flat_map(|(images, image_type)| {
                images.into_iter().map(move |image| ImageVariant {
                    provider: provider.to_string(),
                    url: image.url,
                    thumbnail_url: image.thumbnail_url,
                    width: None,
                    height: None,
                    image_type,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_album_cover_blank_sizes_are_none() {
        let cover = AlbumCover::from_sizes(
            "lastfm",
            Some(String::new()),
            Some("  ".to_string()),
            Some("https://img/large.png".to_string()),
        );

        assert_eq!(cover.small_url, None);
        assert_eq!(cover.medium_url, None);
        assert_eq!(cover.large_url.as_deref(), Some("https://img/large.png"));
        assert!(!cover.is_empty());

        let empty = AlbumCover::from_sizes("lastfm", None, Some(String::new()), None);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_bio_request_query() {
        let request = BioRequest::new(None, "Queen");
        assert_eq!(request.query(), "Queen");
        assert_eq!(request.with_suffix("(band)").query(), "Queen (band)");
    }

    #[test]
    fn test_bulk_variants_expand_with_types() {
        let bulk = BulkVariants {
            artist_thumbs: vec![BulkImage {
                url: "t1".into(),
                thumbnail_url: Some("t1-preview".into()),
            }],
            backgrounds: vec![
                BulkImage {
                    url: "b1".into(),
                    thumbnail_url: None,
                },
                BulkImage {
                    url: "b2".into(),
                    thumbnail_url: None,
                },
            ],
            banners: vec![],
            logos: vec![BulkImage {
                url: "l1".into(),
                thumbnail_url: None,
            }],
        };

        let variants = bulk.into_variants("fanarttv");
        let summary: Vec<_> = variants
            .iter()
            .map(|v| (v.url.as_str(), v.image_type))
            .collect();

        assert_eq!(
            summary,
            vec![
                ("t1", ImageType::Profile),
                ("b1", ImageType::Background),
                ("b2", ImageType::Background),
                ("l1", ImageType::Logo),
            ]
        );
        assert_eq!(variants[0].thumbnail_url.as_deref(), Some("t1-preview"));
        assert!(variants.iter().all(|v| v.provider == "fanarttv"));
        assert!(variants.iter().all(|v| v.width.is_none()));
    }

    fn artist(mbid: &str, name: &str, score: i32) -> ArtistMatch {
        ArtistMatch {
            mbid: mbid.into(),
            name: name.into(),
            score,
            country: None,
            disambiguation: None,
            tags: vec![],
        }
    }

    #[test]
    fn test_best_artist_prefers_exact_name() {
        let candidates = vec![
            artist("1", "Soda Stereo Tribute", 100),
            artist("2", "soda stereo", 92),
            artist("3", "Soda Stereo", 92),
        ];
        assert_eq!(ArtistMatch::best("Soda Stereo", &candidates).unwrap().mbid, "2");
    }

    #[test]
    fn test_best_artist_rejects_low_scores() {
        let candidates = vec![artist("1", "Sodastereo Fans", 45)];
        assert!(ArtistMatch::best("Soda Stereo", &candidates).is_none());

        let candidates = vec![artist("1", "Sumo", 85), artist("2", "Sumo.", 95)];
        assert_eq!(ArtistMatch::best("Zumo", &candidates).unwrap().mbid, "2");
    }

    #[test]
    fn test_image_type_serializes_lowercase() {
        let variant = ImageVariant::new("wikipedia", "https://x/a.jpg", ImageType::Profile);
        let json = serde_json::to_value(&variant).unwrap();
        assert_eq!(json["type"], "profile");
    }
}
