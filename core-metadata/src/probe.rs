//! HTTP Image Probe
//!
//! [`ImageProbe`] implementation that downloads an image through the host
//! [`HttpClient`] and reads only its header with the `image` crate. Pixels are
//! never decoded.

use async_trait::async_trait;
use bridge_traits::error::{BridgeError, Result};
use bridge_traits::http::{HttpClient, HttpRequest};
use bridge_traits::image::{ImageDimensions, ImageProbe};
use image::ImageReader;
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub struct HttpImageProbe {
    http_client: Arc<dyn HttpClient>,
    timeout: Duration,
}

impl HttpImageProbe {
    pub fn new(http_client: Arc<dyn HttpClient>, timeout: Duration) -> Self {
        Self {
            http_client,
            timeout,
        }
    }
}

#[async_trait]
impl ImageProbe for HttpImageProbe {
    async fn probe(&self, url: &str) -> Result<Option<ImageDimensions>> {
        let request = HttpRequest::get(url).timeout(self.timeout);
        let response = self.http_client.execute(request).await?;

        if response.is_not_found() {
            debug!(url = %url, "Image not found");
            return Ok(None);
        }
        if !response.is_success() {
            return Err(BridgeError::OperationFailed(format!(
                "HTTP {} while probing {}",
                response.status, url
            )));
        }

        let dimensions = read_dimensions(&response.body);
        if dimensions.is_none() {
            debug!(url = %url, bytes = response.body.len(), "Unrecognized image data");
        }
        Ok(dimensions)
    }
}

/// Reads width and height from an encoded image header
pub fn read_dimensions(bytes: &[u8]) -> Option<ImageDimensions> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?;
    let (width, height) = reader.into_dimensions().ok()?;
    Some(ImageDimensions::new(width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::http::HttpResponse;
    use image::{DynamicImage, ImageFormat, RgbImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = DynamicImage::ImageRgb8(RgbImage::new(width, height));
        let mut buffer = Cursor::new(Vec::new());
        image.write_to(&mut buffer, ImageFormat::Png).unwrap();
        buffer.into_inner()
    }

    struct StaticImage {
        status: u16,
        body: Vec<u8>,
    }

    #[async_trait]
    impl HttpClient for StaticImage {
        async fn execute(&self, _request: HttpRequest) -> Result<HttpResponse> {
            Ok(HttpResponse::new(self.status, self.body.clone()))
        }
    }

    #[test]
    fn test_read_dimensions() {
        assert_eq!(
            read_dimensions(&png_bytes(40, 30)),
            Some(ImageDimensions::new(40, 30))
        );
        assert_eq!(read_dimensions(b"definitely not an image"), None);
    }

    #[tokio::test]
    async fn test_probe_png() {
        let probe = HttpImageProbe::new(
            Arc::new(StaticImage {
                status: 200,
                body: png_bytes(16, 9),
            }),
            Duration::from_secs(10),
        );

        let dims = probe.probe("https://img/a.png").await.unwrap();
        assert_eq!(dims, Some(ImageDimensions::new(16, 9)));
    }

    #[tokio::test]
    async fn test_probe_missing_image() {
        let probe = HttpImageProbe::new(
            Arc::new(StaticImage {
                status: 404,
                body: Vec::new(),
            }),
            Duration::from_secs(10),
        );
        assert_eq!(probe.probe("https://img/gone.png").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_probe_server_error() {
        let probe = HttpImageProbe::new(
            Arc::new(StaticImage {
                status: 500,
                body: Vec::new(),
            }),
            Duration::from_secs(10),
        );
        assert!(probe.probe("https://img/a.png").await.is_err());
    }
}
