//! Cover Art Archive Agent
//!
//! Album covers for a known MusicBrainz release.
//!
//! ## API Endpoint
//!
//! `https://coverartarchive.org/release/{mbid}` returns an image list; the
//! `front` image (or the first one) is used. Thumbnail sizes are picked from a
//! ladder per slot, falling back to the full image URL:
//!
//! | Slot   | Ladder            |
//! |--------|-------------------|
//! | small  | `250`, `small`    |
//! | medium | `500`, `large`    |
//! | large  | `1200`            |

use super::{CoverRetriever, ProviderAgent};
use crate::error::Result;
use crate::models::{AlbumCover, CoverQuery};
use crate::transport::ProviderTransport;
use async_trait::async_trait;
use bridge_traits::http::HttpRequest;
use core_runtime::config::providers::COVERARTARCHIVE;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

/// Cover Art Archive base URL
const COVERART_ARCHIVE_BASE: &str = "https://coverartarchive.org";

const PRIORITY: i32 = 10;

const SMALL_LADDER: &[&str] = &["250", "small"];
const MEDIUM_LADDER: &[&str] = &["500", "large"];
const LARGE_LADDER: &[&str] = &["1200"];

pub struct CoverArtArchiveAgent {
    transport: ProviderTransport,
    user_agent: String,
}

#[derive(Debug, Deserialize)]
struct ReleaseImagesResponse {
    #[serde(default)]
    images: Vec<ArchiveImage>,
}

#[derive(Debug, Deserialize)]
struct ArchiveImage {
    #[serde(default)]
    front: bool,
    image: String,
    #[serde(default)]
    thumbnails: HashMap<String, String>,
}

impl CoverArtArchiveAgent {
    /// The archive shares MusicBrainz's User-Agent policy
    pub fn new(transport: ProviderTransport, user_agent: impl Into<String>) -> Self {
        Self {
            transport,
            user_agent: user_agent.into(),
        }
    }
}

impl ProviderAgent for CoverArtArchiveAgent {
    fn name(&self) -> &str {
        COVERARTARCHIVE
    }

    fn priority(&self) -> i32 {
        PRIORITY
    }
}

#[async_trait]
impl CoverRetriever for CoverArtArchiveAgent {
    async fn fetch_cover(&self, query: &CoverQuery) -> Result<Option<AlbumCover>> {
        let Some(mbid) = query.release_mbid.as_deref() else {
            debug!(album = %query.album, "Cover Art Archive needs a release MBID, skipping");
            return Ok(None);
        };

        let url = format!("{}/release/{}", COVERART_ARCHIVE_BASE, mbid);
        let request = HttpRequest::get(url)
            .header("User-Agent", &self.user_agent)
            .header("Accept", "application/json");

        let Some(response) = self
            .transport
            .get_json::<ReleaseImagesResponse>(COVERARTARCHIVE, request)
            .await?
        else {
            debug!(mbid = %mbid, "No cover art available for release");
            return Ok(None);
        };

        Ok(select_cover(&response.images))
    }
}

fn select_cover(images: &[ArchiveImage]) -> Option<AlbumCover> {
    let image = images
        .iter()
        .find(|image| image.front)
        .or_else(|| images.first())?;

    let pick = |ladder: &[&str]| {
        ladder
            .iter()
            .find_map(|size| image.thumbnails.get(*size).filter(|url| !url.is_empty()))
            .unwrap_or(&image.image)
            .clone()
    };

    let cover = AlbumCover::from_sizes(
        COVERARTARCHIVE,
        Some(pick(SMALL_LADDER)),
        Some(pick(MEDIUM_LADDER)),
        Some(pick(LARGE_LADDER)),
    );
    (!cover.is_empty()).then_some(cover)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Vec<ArchiveImage> {
        serde_json::from_str::<ReleaseImagesResponse>(json)
            .unwrap()
            .images
    }

    #[test]
    fn test_prefers_front_image() {
        let images = parse(
            r#"{"images": [
                {"front": false, "image": "http://caa/back.jpg", "thumbnails": {"250": "http://caa/back-250.jpg"}},
                {"front": true, "image": "http://caa/front.jpg",
                 "thumbnails": {"250": "http://caa/front-250.jpg", "500": "http://caa/front-500.jpg",
                                "1200": "http://caa/front-1200.jpg", "small": "http://caa/front-250.jpg",
                                "large": "http://caa/front-500.jpg"}}
            ]}"#,
        );

        let cover = select_cover(&images).unwrap();
        assert_eq!(cover.small_url.as_deref(), Some("http://caa/front-250.jpg"));
        assert_eq!(cover.medium_url.as_deref(), Some("http://caa/front-500.jpg"));
        assert_eq!(cover.large_url.as_deref(), Some("http://caa/front-1200.jpg"));
        assert_eq!(cover.provider_name, "coverartarchive");
    }

    #[test]
    fn test_falls_back_through_ladder_to_full_image() {
        let images = parse(
            r#"{"images": [
                {"image": "http://caa/only.jpg", "thumbnails": {"small": "http://caa/only-s.jpg"}}
            ]}"#,
        );

        let cover = select_cover(&images).unwrap();
        assert_eq!(cover.small_url.as_deref(), Some("http://caa/only-s.jpg"));
        assert_eq!(cover.medium_url.as_deref(), Some("http://caa/only.jpg"));
        assert_eq!(cover.large_url.as_deref(), Some("http://caa/only.jpg"));
    }

    #[test]
    fn test_no_images() {
        assert!(select_cover(&parse(r#"{"images": []}"#)).is_none());
    }
}
