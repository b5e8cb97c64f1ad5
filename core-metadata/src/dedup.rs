//! Image Result Deduplicator
//!
//! Reduces one aggregate call's image variants. State lives only for the
//! duration of [`ImageResultDeduplicator::dedupe`]; nothing carries over
//! between calls.
//!
//! ## Algorithm
//!
//! 1. Drop variants whose URL was already seen, so a link returned twice is
//!    probed once.
//! 2. Probe real pixel dimensions in fixed-size chunks (bounded concurrency).
//! 3. Drop variants that could not be probed (warning, not error).
//! 4. Drop variants whose `(type, width, height)` was already accepted.
//!
//! Output keeps input order, with probed dimensions written back.

use crate::models::{DedupKey, ImageVariant};
use bridge_traits::image::{ImageDimensions, ImageProbe};
use futures::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub struct ImageResultDeduplicator {
    probe: Arc<dyn ImageProbe>,
    chunk_size: usize,
    probe_timeout: Duration,
}

impl ImageResultDeduplicator {
    /// # Arguments
    ///
    /// * `probe` - Image dimension capability
    /// * `chunk_size` - Probes run concurrently per chunk (clamped to at least 1)
    /// * `probe_timeout` - Upper bound for a single probe
    pub fn new(probe: Arc<dyn ImageProbe>, chunk_size: usize, probe_timeout: Duration) -> Self {
        Self {
            probe,
            chunk_size: chunk_size.max(1),
            probe_timeout,
        }
    }

    pub async fn dedupe(&self, variants: Vec<ImageVariant>) -> Vec<ImageVariant> {
        let total = variants.len();

        let mut seen_urls = HashSet::new();
        let unique: Vec<ImageVariant> = variants
            .into_iter()
            .filter(|variant| {
                let fresh = seen_urls.insert(variant.url.clone());
                if !fresh {
                    debug!(url = %variant.url, "Skipping duplicate image URL");
                }
                fresh
            })
            .collect();

        let mut dimensions = Vec::with_capacity(unique.len());
        for chunk in unique.chunks(self.chunk_size) {
            let probes = chunk.iter().map(|variant| self.probe_one(&variant.url));
            dimensions.extend(join_all(probes).await);
        }

        let mut seen_keys = HashSet::new();
        let mut accepted = Vec::new();
        for (mut variant, probed) in unique.into_iter().zip(dimensions) {
            let Some(dims) = probed else {
                warn!(
                    provider = %variant.provider,
                    url = %variant.url,
                    "Could not determine image dimensions, dropping variant"
                );
                continue;
            };

            let key = DedupKey::new(variant.image_type, dims.width, dims.height);
            if !seen_keys.insert(key) {
                debug!(
                    provider = %variant.provider,
                    url = %variant.url,
                    dimensions = %dims.key(),
                    "Dropping resolution-redundant variant"
                );
                continue;
            }

            variant.width = Some(dims.width);
            variant.height = Some(dims.height);
            accepted.push(variant);
        }

        debug!(input = total, output = accepted.len(), "Image variants deduplicated");
        accepted
    }

    async fn probe_one(&self, url: &str) -> Option<ImageDimensions> {
        match tokio::time::timeout(self.probe_timeout, self.probe.probe(url)).await {
            Ok(Ok(dims)) => dims,
            Ok(Err(e)) => {
                warn!(url = %url, error = %e, "Image probe failed");
                None
            }
            Err(_) => {
                warn!(url = %url, timeout = ?self.probe_timeout, "Image probe timed out");
                None
            }
        }
    }
}
