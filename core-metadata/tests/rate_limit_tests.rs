//! Integration tests for provider call spacing through the full stack
//!
//! These tests verify:
//! - Concurrent callers of one provider are spaced by its interval
//! - Configured intervals override the defaults
//! - Different providers do not wait on each other

mod common;

use common::{MockProbe, ScriptedHttpClient};
use core_metadata::MetadataOrchestrator;
use core_runtime::config::{providers, ResolverConfig};
use futures::future::join_all;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn artist_search_client() -> Arc<ScriptedHttpClient> {
    Arc::new(ScriptedHttpClient::new().json(
        "ws/2/artist?query=",
        json!({"artists": [{"id": "mbid-1", "name": "Soda Stereo", "score": 100}]}),
    ))
}

fn assert_spaced(times: &[tokio::time::Instant], interval: Duration) {
    for pair in times.windows(2) {
        assert!(
            pair[1] - pair[0] >= interval,
            "calls {:?} apart, expected at least {:?}",
            pair[1] - pair[0],
            interval
        );
    }
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_musicbrainz_calls_are_spaced() {
    let client = artist_search_client();
    let config = ResolverConfig::default();
    let orchestrator =
        MetadataOrchestrator::from_config(&config, client.clone(), Arc::new(MockProbe::new()));

    let results = join_all((0..4).map(|_| orchestrator.search_artist_mbid("Soda Stereo"))).await;

    assert!(results
        .iter()
        .all(|mbid| mbid.as_deref() == Some("mbid-1")));

    let times = client.request_times("musicbrainz.org");
    assert_eq!(times.len(), 4);
    assert_spaced(&times, Duration::from_millis(1000));
}

#[tokio::test(start_paused = true)]
async fn test_configured_interval_is_honored() {
    let client = artist_search_client();
    let config = ResolverConfig::builder()
        .provider_interval(providers::MUSICBRAINZ, Duration::from_millis(2500))
        .build()
        .unwrap();
    let orchestrator =
        MetadataOrchestrator::from_config(&config, client.clone(), Arc::new(MockProbe::new()));

    let started = tokio::time::Instant::now();
    join_all((0..3).map(|_| orchestrator.search_artist_mbid("Soda Stereo"))).await;

    let times = client.request_times("musicbrainz.org");
    assert_spaced(&times, Duration::from_millis(2500));
    assert!(started.elapsed() >= Duration::from_millis(5000));
}

#[tokio::test(start_paused = true)]
async fn test_providers_are_limited_independently() {
    let client = Arc::new(
        ScriptedHttpClient::new()
            .json(
                "ws/2/artist?query=",
                json!({"artists": [{"id": "mbid-1", "name": "Soda Stereo", "score": 100}]}),
            )
            .json(
                "coverartarchive.org/release/rel-1",
                json!({"images": [{"front": true, "image": "https://caa/full.jpg"}]}),
            ),
    );
    let config = ResolverConfig::default();
    let orchestrator =
        MetadataOrchestrator::from_config(&config, client.clone(), Arc::new(MockProbe::new()));

    let started = tokio::time::Instant::now();
    let (mbid, cover) = futures::join!(
        orchestrator.search_artist_mbid("Soda Stereo"),
        orchestrator.resolve_covers(Some("rel-1"), "Soda Stereo", "Signos"),
    );

    assert_eq!(mbid.as_deref(), Some("mbid-1"));
    assert_eq!(
        cover.and_then(|c| c.large_url).as_deref(),
        Some("https://caa/full.jpg")
    );
    // neither first call waited on the other provider's slot
    assert!(started.elapsed() < Duration::from_millis(100));
}
