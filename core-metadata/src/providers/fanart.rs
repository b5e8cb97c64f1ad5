//! Fanart.tv Agent
//!
//! Bulk artist imagery keyed by MusicBrainz artist ID. One request returns
//! every thumb, background, banner and logo the service holds; the agent
//! exposes that both as flat [`ImageVariant`]s and through the
//! [`BulkVariantProvider`] capability.
//!
//! ## API Endpoint
//!
//! `https://webservice.fanart.tv/v3/music/{mbid}?api_key={key}`
//!
//! | Response key       | Category     |
//! |--------------------|--------------|
//! | `artistthumb`      | profile      |
//! | `artistbackground` | background   |
//! | `musicbanner`      | banner       |
//! | `hdmusiclogo`      | logo         |
//! | `musiclogo`        | logo         |

use super::{BulkVariantProvider, ImageRetriever, ProviderAgent};
use crate::error::Result;
use crate::models::{ArtistQuery, BulkImage, BulkVariants, ImageVariant};
use crate::transport::ProviderTransport;
use async_trait::async_trait;
use bridge_traits::http::HttpRequest;
use core_runtime::config::providers::FANARTTV;
use serde::Deserialize;
use tracing::debug;

/// Fanart.tv v3 music endpoint
const FANART_API_BASE: &str = "https://webservice.fanart.tv/v3/music";

const PRIORITY: i32 = 10;

pub struct FanartAgent {
    transport: ProviderTransport,
    api_key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ArtistImagesResponse {
    #[serde(default)]
    artistthumb: Vec<FanartImage>,
    #[serde(default)]
    artistbackground: Vec<FanartImage>,
    #[serde(default)]
    musicbanner: Vec<FanartImage>,
    #[serde(default)]
    hdmusiclogo: Vec<FanartImage>,
    #[serde(default)]
    musiclogo: Vec<FanartImage>,
}

#[derive(Debug, Deserialize)]
struct FanartImage {
    url: String,
}

impl FanartAgent {
    pub fn new(transport: ProviderTransport, api_key: Option<String>) -> Self {
        Self {
            transport,
            api_key: api_key.filter(|k| !k.is_empty()),
        }
    }
}

/// Fanart.tv serves a reduced copy of every asset under `/preview/`
fn preview_url(url: &str) -> Option<String> {
    url.contains("/fanart/")
        .then(|| url.replacen("/fanart/", "/preview/", 1))
}

fn to_bulk(images: Vec<FanartImage>) -> Vec<BulkImage> {
    images
        .into_iter()
        .filter(|image| !image.url.is_empty())
        .map(|image| BulkImage {
            thumbnail_url: preview_url(&image.url),
            url: image.url,
        })
        .collect()
}

impl From<ArtistImagesResponse> for BulkVariants {
    fn from(response: ArtistImagesResponse) -> Self {
        let mut logos = to_bulk(response.hdmusiclogo);
        logos.extend(to_bulk(response.musiclogo));

        BulkVariants {
            artist_thumbs: to_bulk(response.artistthumb),
            backgrounds: to_bulk(response.artistbackground),
            banners: to_bulk(response.musicbanner),
            logos,
        }
    }
}

impl ProviderAgent for FanartAgent {
    fn name(&self) -> &str {
        FANARTTV
    }

    fn priority(&self) -> i32 {
        PRIORITY
    }

    fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl BulkVariantProvider for FanartAgent {
    async fn fetch_all_variants(&self, artist_mbid: &str) -> Result<Option<BulkVariants>> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Ok(None);
        };

        let url = format!(
            "{}/{}?api_key={}",
            FANART_API_BASE,
            urlencoding::encode(artist_mbid),
            urlencoding::encode(api_key)
        );

        let response: Option<ArtistImagesResponse> = self
            .transport
            .get_json(FANARTTV, HttpRequest::get(url))
            .await?;

        let variants = response.map(BulkVariants::from).filter(|v| !v.is_empty());
        if variants.is_none() {
            debug!(mbid = %artist_mbid, "No Fanart.tv images for artist");
        }
        Ok(variants)
    }
}

#[async_trait]
impl ImageRetriever for FanartAgent {
    async fn fetch_images(&self, artist: &ArtistQuery) -> Result<Vec<ImageVariant>> {
        let Some(mbid) = artist.mbid.as_deref() else {
            debug!(artist = %artist.name, "Fanart.tv needs an artist MBID, skipping");
            return Ok(Vec::new());
        };

        Ok(self
            .fetch_all_variants(mbid)
            .await?
            .map(|bulk| bulk.into_variants(FANARTTV))
            .unwrap_or_default())
    }

    fn as_bulk_variant_provider(&self) -> Option<&dyn BulkVariantProvider> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ImageType;

    const SAMPLE: &str = r#"{
        "name": "Soda Stereo",
        "mbid_id": "3f8a5e5b-c24b-4068-9f1c-afad8829e06b",
        "artistthumb": [
            {"id": "1", "url": "https://assets.fanart.tv/fanart/music/x/artistthumb/a.jpg", "likes": "2"}
        ],
        "artistbackground": [
            {"id": "2", "url": "https://assets.fanart.tv/fanart/music/x/artistbackground/b.jpg", "likes": "0"},
            {"id": "3", "url": "https://assets.fanart.tv/fanart/music/x/artistbackground/c.jpg", "likes": "1"}
        ],
        "hdmusiclogo": [
            {"id": "4", "url": "https://assets.fanart.tv/fanart/music/x/hdmusiclogo/d.png", "likes": "3"}
        ],
        "musiclogo": [
            {"id": "5", "url": "https://assets.fanart.tv/fanart/music/x/musiclogo/e.png", "likes": "1"}
        ]
    }"#;

    #[test]
    fn test_response_maps_to_categories() {
        let response: ArtistImagesResponse = serde_json::from_str(SAMPLE).unwrap();
        let bulk = BulkVariants::from(response);

        assert_eq!(bulk.artist_thumbs.len(), 1);
        assert_eq!(bulk.backgrounds.len(), 2);
        assert!(bulk.banners.is_empty());
        assert_eq!(bulk.logos.len(), 2);
        assert!(bulk.logos[0].url.ends_with("d.png"));
        assert_eq!(
            bulk.artist_thumbs[0].thumbnail_url.as_deref(),
            Some("https://assets.fanart.tv/preview/music/x/artistthumb/a.jpg")
        );

        let variants = bulk.into_variants(FANARTTV);
        assert_eq!(variants.len(), 5);
        assert_eq!(variants[0].image_type, ImageType::Profile);
        assert_eq!(variants[4].image_type, ImageType::Logo);
    }

    #[test]
    fn test_preview_url() {
        assert_eq!(preview_url("https://elsewhere/img.jpg"), None);
    }
}
