//! Wikipedia Agent
//!
//! Biographies and a profile image from Wikipedia article summaries. Names are
//! ambiguous here, so every lookup is a two-step fetch:
//!
//! 1. `action=opensearch` lists candidate titles for `"{name} {suffix}"`;
//!    the best candidate is chosen from title and description alone.
//! 2. `rest_v1/page/summary/{title}` fetches the article summary. Pages whose
//!    `type` is not `"standard"` (disambiguation pages, redirects to lists) are
//!    rejected.
//!
//! Biographies returned by this agent must pass the content disambiguator
//! before they are accepted; the orchestrator runs that check.
//!
//! ## API Endpoints
//!
//! - `https://{lang}.wikipedia.org/w/api.php?action=opensearch&search={query}&limit=5&namespace=0&format=json`
//! - `https://{lang}.wikipedia.org/api/rest_v1/page/summary/{title}`

use super::{BioRetriever, ImageRetriever, ProviderAgent};
use crate::disambiguator::{Candidate, ContentDisambiguator};
use crate::error::Result;
use crate::models::{ArtistBio, ArtistQuery, BioRequest, ImageType, ImageVariant};
use crate::text::clean_biography;
use crate::transport::ProviderTransport;
use async_trait::async_trait;
use bridge_traits::http::HttpRequest;
use core_runtime::config::providers::WIKIPEDIA;
use serde::Deserialize;
use tracing::{debug, warn};

const PRIORITY: i32 = 10;

/// Search hits requested from opensearch
const SEARCH_LIMIT: u32 = 5;

/// Language used when a request carries none
const FALLBACK_LANGUAGE: &str = "en";

pub struct WikipediaAgent {
    transport: ProviderTransport,
    user_agent: String,
    languages: Vec<String>,
    suffixes: Vec<String>,
    disambiguator: ContentDisambiguator,
}

/// `[query, titles, descriptions, urls]`
#[derive(Debug, Deserialize)]
struct OpenSearchResponse(String, Vec<String>, Vec<String>, Vec<String>);

#[derive(Debug, Deserialize)]
struct PageSummary {
    #[serde(rename = "type", default)]
    page_type: String,
    title: String,
    #[serde(default)]
    extract: String,
    description: Option<String>,
    content_urls: Option<ContentUrls>,
    originalimage: Option<PageImage>,
    thumbnail: Option<PageImage>,
}

#[derive(Debug, Deserialize)]
struct ContentUrls {
    desktop: Option<PageUrl>,
}

#[derive(Debug, Deserialize)]
struct PageUrl {
    page: String,
}

#[derive(Debug, Deserialize)]
struct PageImage {
    source: String,
}

impl WikipediaAgent {
    /// # Arguments
    ///
    /// * `transport` - Shared rate-limited transport
    /// * `user_agent` - Identifies the client per Wikimedia's API policy
    /// * `languages` - Wiki editions to try, in order
    /// * `suffixes` - Disambiguation suffixes, most specific first
    /// * `disambiguator` - Validates articles for image lookups
    pub fn new(
        transport: ProviderTransport,
        user_agent: impl Into<String>,
        languages: Vec<String>,
        suffixes: Vec<String>,
        disambiguator: ContentDisambiguator,
    ) -> Self {
        Self {
            transport,
            user_agent: user_agent.into(),
            languages,
            suffixes,
            disambiguator,
        }
    }

    fn request(&self, url: String) -> HttpRequest {
        HttpRequest::get(url)
            .header("User-Agent", &self.user_agent)
            .header("Accept", "application/json")
    }

    /// Step 1: pick the most promising title for `query`
    async fn find_title(&self, language: &str, query: &str, name: &str) -> Result<Option<String>> {
        let url = format!(
            "https://{}.wikipedia.org/w/api.php?action=opensearch&search={}&limit={}&namespace=0&format=json",
            language,
            urlencoding::encode(query),
            SEARCH_LIMIT
        );

        let Some(OpenSearchResponse(_, titles, descriptions, _)) =
            self.transport
                .get_json::<OpenSearchResponse>(WIKIPEDIA, self.request(url))
                .await?
        else {
            return Ok(None);
        };

        let name = name.to_lowercase();
        let candidates: Vec<Candidate> = titles
            .into_iter()
            .enumerate()
            .filter(|(_, title)| title.to_lowercase().contains(&name))
            .map(|(index, title)| Candidate {
                title,
                description: descriptions.get(index).cloned().unwrap_or_default(),
            })
            .collect();

        Ok(self
            .disambiguator
            .pick_best_candidate(&candidates)
            .map(|candidate| candidate.title.clone()))
    }

    /// Step 2: fetch the summary, rejecting non-article pages
    async fn fetch_summary(&self, language: &str, title: &str) -> Result<Option<PageSummary>> {
        let url = format!(
            "https://{}.wikipedia.org/api/rest_v1/page/summary/{}",
            language,
            urlencoding::encode(&title.replace(' ', "_"))
        );

        let Some(summary) = self
            .transport
            .get_json::<PageSummary>(WIKIPEDIA, self.request(url))
            .await?
        else {
            return Ok(None);
        };

        if summary.page_type != "standard" {
            debug!(
                title = %summary.title,
                page_type = %summary.page_type,
                "Rejecting non-standard Wikipedia page"
            );
            return Ok(None);
        }
        Ok(Some(summary))
    }

    async fn lookup(&self, language: &str, query: &str, name: &str) -> Result<Option<PageSummary>> {
        match self.find_title(language, query, name).await? {
            Some(title) => self.fetch_summary(language, &title).await,
            None => {
                debug!(language = %language, query = %query, "No Wikipedia candidates");
                Ok(None)
            }
        }
    }

    fn suffix_candidates(&self) -> Vec<&str> {
        if self.suffixes.is_empty() {
            vec![""]
        } else {
            self.suffixes.iter().map(String::as_str).collect()
        }
    }
}

impl ProviderAgent for WikipediaAgent {
    fn name(&self) -> &str {
        WIKIPEDIA
    }

    fn priority(&self) -> i32 {
        PRIORITY
    }
}

#[async_trait]
impl BioRetriever for WikipediaAgent {
    fn languages(&self) -> &[String] {
        &self.languages
    }

    fn query_suffixes(&self) -> &[String] {
        &self.suffixes
    }

    fn requires_validation(&self) -> bool {
        true
    }

    async fn fetch_bio(&self, request: &BioRequest) -> Result<Option<ArtistBio>> {
        let language = request.language.as_deref().unwrap_or(FALLBACK_LANGUAGE);
        let Some(summary) = self.lookup(language, &request.query(), &request.name).await? else {
            return Ok(None);
        };

        let Some(content) = clean_biography(&summary.extract) else {
            return Ok(None);
        };

        Ok(Some(ArtistBio {
            content,
            summary: summary.description.filter(|d| !d.is_empty()),
            source_url: summary
                .content_urls
                .and_then(|urls| urls.desktop)
                .map(|desktop| desktop.page),
            provider_name: WIKIPEDIA.to_string(),
        }))
    }
}

#[async_trait]
impl ImageRetriever for WikipediaAgent {
    /// First validated article with a lead image, searched like a biography
    async fn fetch_images(&self, artist: &ArtistQuery) -> Result<Vec<ImageVariant>> {
        let languages: Vec<&str> = if self.languages.is_empty() {
            vec![FALLBACK_LANGUAGE]
        } else {
            self.languages.iter().map(String::as_str).collect()
        };

        for language in languages {
            for suffix in self.suffix_candidates() {
                let request = BioRequest::new(None, &artist.name).with_suffix(suffix);
                let summary = match self.lookup(language, &request.query(), &artist.name).await {
                    Ok(Some(summary)) => summary,
                    Ok(None) => continue,
                    Err(e) => {
                        warn!(language = %language, suffix = %suffix, error = %e, "Wikipedia lookup failed");
                        continue;
                    }
                };

                if !self.disambiguator.is_music_related(&summary.extract) {
                    continue;
                }

                let Some(original) = summary.originalimage else {
                    debug!(title = %summary.title, "Wikipedia article has no lead image");
                    break;
                };

                let mut variant = ImageVariant::new(WIKIPEDIA, original.source, ImageType::Profile);
                variant.thumbnail_url = summary.thumbnail.map(|t| t.source);
                return Ok(vec![variant]);
            }
        }

        Ok(Vec::new())
    }
}
