//! Last.fm Agent
//!
//! Artist biographies (`artist.getinfo`, per language) and album covers
//! (`album.getinfo`). Enabled only when an API key is configured.
//!
//! ## API Endpoint
//!
//! `https://ws.audioscrobbler.com/2.0/?method={method}&api_key={key}&format=json`
//!
//! Last.fm reports lookup failures inside a 200 body as `{"error": N, "message": ..}`.
//! Error 6 ("not found") is treated as absence; other codes are provider errors.
//!
//! ## Usage
//!
//! ```ignore
//! let agent = LastFmAgent::new(transport, Some(api_key), vec!["es".into(), "en".into()]);
//! let cover = agent.fetch_cover(&CoverQuery::new(None, "Soda Stereo", "Signos")).await?;
//! ```

use super::{BioRetriever, CoverRetriever, ProviderAgent};
use crate::error::{MetadataError, Result};
use crate::models::{AlbumCover, ArtistBio, BioRequest, CoverQuery};
use crate::text::{clean_biography, strip_html_tags, strip_lastfm_footer};
use crate::transport::ProviderTransport;
use async_trait::async_trait;
use bridge_traits::http::HttpRequest;
use core_runtime::config::providers::LASTFM;
use serde::Deserialize;
use tracing::debug;

/// Last.fm API base URL
const LASTFM_API_BASE: &str = "https://ws.audioscrobbler.com/2.0/";

const PRIORITY: i32 = 20;

/// Last.fm error code for unknown artist/album
const ERROR_NOT_FOUND: i32 = 6;

pub struct LastFmAgent {
    transport: ProviderTransport,
    api_key: Option<String>,
    languages: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ArtistInfoResponse {
    artist: Option<ArtistInfo>,
    error: Option<i32>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ArtistInfo {
    url: Option<String>,
    bio: Option<Biography>,
}

#[derive(Debug, Deserialize)]
struct Biography {
    summary: Option<String>,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AlbumInfoResponse {
    album: Option<AlbumInfo>,
    error: Option<i32>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AlbumInfo {
    #[serde(default)]
    image: Vec<AlbumImage>,
}

/// Last.fm album image
#[derive(Debug, Deserialize)]
struct AlbumImage {
    #[serde(rename = "#text")]
    url: String,
    size: String,
}

impl LastFmAgent {
    /// # Arguments
    ///
    /// * `transport` - Shared rate-limited transport
    /// * `api_key` - Last.fm API key; the agent is disabled without one
    /// * `languages` - Biography languages to try, in order
    pub fn new(transport: ProviderTransport, api_key: Option<String>, languages: Vec<String>) -> Self {
        Self {
            transport,
            api_key: api_key.filter(|k| !k.is_empty()),
            languages,
        }
    }

    fn method_url(&self, method: &str, api_key: &str, params: &[(&str, &str)]) -> String {
        let mut url = format!(
            "{}?method={}&api_key={}&format=json&autocorrect=1",
            LASTFM_API_BASE,
            method,
            urlencoding::encode(api_key)
        );
        for (key, value) in params {
            url.push_str(&format!("&{}={}", key, urlencoding::encode(value)));
        }
        url
    }
}

/// Error 6 means absence; any other code is a provider failure
fn check_api_error(error: Option<i32>, message: Option<String>) -> Result<bool> {
    match error {
        None => Ok(true),
        Some(ERROR_NOT_FOUND) => Ok(false),
        Some(code) => Err(MetadataError::Provider {
            provider: LASTFM.to_string(),
            message: format!(
                "error {}: {}",
                code,
                message.unwrap_or_else(|| "unknown".to_string())
            ),
        }),
    }
}

impl ProviderAgent for LastFmAgent {
    fn name(&self) -> &str {
        LASTFM
    }

    fn priority(&self) -> i32 {
        PRIORITY
    }

    fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl BioRetriever for LastFmAgent {
    fn languages(&self) -> &[String] {
        &self.languages
    }

    async fn fetch_bio(&self, request: &BioRequest) -> Result<Option<ArtistBio>> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Ok(None);
        };

        let mut params = vec![("artist", request.name.as_str())];
        if let Some(mbid) = request.mbid.as_deref() {
            params.push(("mbid", mbid));
        }
        if let Some(language) = request.language.as_deref() {
            params.push(("lang", language));
        }

        let url = self.method_url("artist.getinfo", api_key, &params);
        let Some(response) = self
            .transport
            .get_json::<ArtistInfoResponse>(LASTFM, HttpRequest::get(url))
            .await?
        else {
            return Ok(None);
        };

        if !check_api_error(response.error, response.message)? {
            debug!(artist = %request.name, "Artist not found on Last.fm");
            return Ok(None);
        }

        let Some(artist) = response.artist else {
            return Ok(None);
        };
        let Some(bio) = artist.bio else {
            return Ok(None);
        };

        let summary = bio
            .summary
            .as_deref()
            .map(|s| strip_html_tags(strip_lastfm_footer(s)).trim().to_string())
            .filter(|s| !s.is_empty());

        let raw = bio
            .content
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .or(bio.summary.as_deref())
            .unwrap_or_default();

        let Some(content) = clean_biography(strip_lastfm_footer(raw)) else {
            return Ok(None);
        };

        Ok(Some(ArtistBio {
            content,
            summary,
            source_url: artist.url,
            provider_name: LASTFM.to_string(),
        }))
    }
}

#[async_trait]
impl CoverRetriever for LastFmAgent {
    async fn fetch_cover(&self, query: &CoverQuery) -> Result<Option<AlbumCover>> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Ok(None);
        };

        let url = self.method_url(
            "album.getinfo",
            api_key,
            &[("artist", query.artist.as_str()), ("album", query.album.as_str())],
        );
        let Some(response) = self
            .transport
            .get_json::<AlbumInfoResponse>(LASTFM, HttpRequest::get(url))
            .await?
        else {
            return Ok(None);
        };

        if !check_api_error(response.error, response.message)? {
            debug!(artist = %query.artist, album = %query.album, "Album not found on Last.fm");
            return Ok(None);
        }

        let Some(album) = response.album else {
            return Ok(None);
        };

        let cover = cover_from_images(&album.image);
        Ok((!cover.is_empty()).then_some(cover))
    }
}

fn cover_from_images(images: &[AlbumImage]) -> AlbumCover {
    let by_size = |sizes: &[&str]| {
        sizes.iter().find_map(|size| {
            images
                .iter()
                .find(|image| image.size == *size && !image.url.is_empty())
                .map(|image| image.url.clone())
        })
    };

    AlbumCover::from_sizes(
        LASTFM,
        by_size(&["small"]),
        by_size(&["medium"]),
        by_size(&["extralarge", "large", "mega"]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(size: &str, url: &str) -> AlbumImage {
        AlbumImage {
            url: url.to_string(),
            size: size.to_string(),
        }
    }

    #[test]
    fn test_cover_size_selection() {
        let cover = cover_from_images(&[
            image("small", "https://lastfm/34s.png"),
            image("medium", ""),
            image("large", "https://lastfm/174s.png"),
            image("extralarge", "https://lastfm/300x300.png"),
        ]);

        assert_eq!(cover.small_url.as_deref(), Some("https://lastfm/34s.png"));
        assert_eq!(cover.medium_url, None);
        assert_eq!(cover.large_url.as_deref(), Some("https://lastfm/300x300.png"));
        assert_eq!(cover.provider_name, "lastfm");
    }

    #[test]
    fn test_cover_all_blank_is_empty() {
        let cover = cover_from_images(&[image("small", ""), image("large", "")]);
        assert!(cover.is_empty());
    }

    #[test]
    fn test_check_api_error() {
        assert!(check_api_error(None, None).unwrap());
        assert!(!check_api_error(Some(6), Some("not found".into())).unwrap());
        assert!(matches!(
            check_api_error(Some(10), Some("Invalid API key".into())),
            Err(MetadataError::Provider { .. })
        ));
    }
}
