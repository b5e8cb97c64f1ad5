//! Image Dimension Probing
//!
//! The deduplicator needs the real pixel size of every candidate image. How the
//! bytes are obtained (full download, ranged request, local cache) is a host
//! concern, so it sits behind this trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Pixel dimensions of a probed image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Key used to compare resolutions, e.g. `"1000x1000"`
    pub fn key(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }
}

/// Image probe trait
///
/// # Returns
///
/// - `Ok(Some(dims))` - Dimensions were read
/// - `Ok(None)` - The image does not exist or could not be decoded
/// - `Err` - Transport failure
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageProbe: Send + Sync {
    async fn probe(&self, url: &str) -> Result<Option<ImageDimensions>>;
}
