//! Agent Registry
//!
//! Holds every agent once per capability it implements, built at startup from
//! static configuration. Lookups return the currently enabled agents for one
//! capability, sorted ascending by priority with ties kept in registration
//! order.
//!
//! ## Usage
//!
//! ```ignore
//! let registry = AgentRegistry::from_config(&config, http_client, rate_limiter);
//! for agent in registry.bio_agents() {
//!     println!("{} (priority {})", agent.name(), agent.priority());
//! }
//! ```

use crate::disambiguator::ContentDisambiguator;
use crate::models::Capability;
use crate::providers::{
    BioRetriever, CoverArtArchiveAgent, CoverRetriever, FanartAgent, ImageRetriever,
    LastFmAgent, MusicBrainzAgent, StructuredSearch, WikipediaAgent,
};
use crate::rate_limiter::RateLimiter;
use crate::transport::ProviderTransport;
use bridge_traits::http::HttpClient;
use core_runtime::config::ResolverConfig;
use std::sync::Arc;
use tracing::{debug, info};

/// An agent registered under one capability
#[derive(Clone)]
pub enum RegisteredAgent {
    Bio(Arc<dyn BioRetriever>),
    Image(Arc<dyn ImageRetriever>),
    Cover(Arc<dyn CoverRetriever>),
    Search(Arc<dyn StructuredSearch>),
}

impl RegisteredAgent {
    pub fn capability(&self) -> Capability {
        match self {
            RegisteredAgent::Bio(_) => Capability::Bio,
            RegisteredAgent::Image(_) => Capability::Image,
            RegisteredAgent::Cover(_) => Capability::Cover,
            RegisteredAgent::Search(_) => Capability::Search,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            RegisteredAgent::Bio(agent) => agent.name(),
            RegisteredAgent::Image(agent) => agent.name(),
            RegisteredAgent::Cover(agent) => agent.name(),
            RegisteredAgent::Search(agent) => agent.name(),
        }
    }

    pub fn priority(&self) -> i32 {
        match self {
            RegisteredAgent::Bio(agent) => agent.priority(),
            RegisteredAgent::Image(agent) => agent.priority(),
            RegisteredAgent::Cover(agent) => agent.priority(),
            RegisteredAgent::Search(agent) => agent.priority(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        match self {
            RegisteredAgent::Bio(agent) => agent.is_enabled(),
            RegisteredAgent::Image(agent) => agent.is_enabled(),
            RegisteredAgent::Cover(agent) => agent.is_enabled(),
            RegisteredAgent::Search(agent) => agent.is_enabled(),
        }
    }
}

#[derive(Clone, Default)]
pub struct AgentRegistry {
    agents: Vec<RegisteredAgent>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the standard agent set
    ///
    /// Every agent shares one transport (and so one rate limiter). Agents that
    /// need an API key are always registered and report themselves disabled
    /// when the key is missing.
    ///
    /// # Arguments
    ///
    /// * `config` - Validated resolver configuration
    /// * `http_client` - Host HTTP implementation
    /// * `rate_limiter` - Process-wide limiter
    pub fn from_config(
        config: &ResolverConfig,
        http_client: Arc<dyn HttpClient>,
        rate_limiter: Arc<RateLimiter>,
    ) -> Self {
        let transport = ProviderTransport::new(http_client, rate_limiter, config.request_timeout);
        let user_agent = config.api.user_agent().to_string();

        let musicbrainz = Arc::new(MusicBrainzAgent::new(transport.clone(), &user_agent));
        let lastfm = Arc::new(LastFmAgent::new(
            transport.clone(),
            config.api.lastfm_api_key.clone(),
            config.languages.clone(),
        ));
        let fanart = Arc::new(FanartAgent::new(
            transport.clone(),
            config.api.fanart_api_key.clone(),
        ));
        let coverart = Arc::new(CoverArtArchiveAgent::new(transport.clone(), &user_agent));
        let wikipedia = Arc::new(WikipediaAgent::new(
            transport,
            &user_agent,
            config.languages.clone(),
            config.disambiguation_suffixes.clone(),
            ContentDisambiguator::default(),
        ));

        let mut registry = Self::new();
        registry
            .register(RegisteredAgent::Bio(wikipedia.clone()))
            .register(RegisteredAgent::Bio(lastfm.clone()))
            .register(RegisteredAgent::Bio(musicbrainz.clone()))
            .register(RegisteredAgent::Image(fanart))
            .register(RegisteredAgent::Image(wikipedia))
            .register(RegisteredAgent::Cover(coverart))
            .register(RegisteredAgent::Cover(lastfm))
            .register(RegisteredAgent::Search(musicbrainz));

        info!(
            agents = registry.len(),
            lastfm = config.api.has_lastfm(),
            fanart = config.api.has_fanart(),
            "Agent registry initialized"
        );
        registry
    }

    /// Adds an agent under its capability
    pub fn register(&mut self, agent: RegisteredAgent) -> &mut Self {
        debug!(
            agent = %agent.name(),
            capability = %agent.capability(),
            priority = agent.priority(),
            "Registering agent"
        );
        self.agents.push(agent);
        self
    }

    /// Enabled agents for `capability`, ascending by priority
    ///
    /// An empty list is a valid answer.
    pub fn agents_for(&self, capability: Capability) -> Vec<RegisteredAgent> {
        let mut agents: Vec<RegisteredAgent> = self
            .agents
            .iter()
            .filter(|agent| agent.capability() == capability && agent.is_enabled())
            .cloned()
            .collect();
        // stable: ties keep registration order
        agents.sort_by_key(RegisteredAgent::priority);
        agents
    }

    pub fn bio_agents(&self) -> Vec<Arc<dyn BioRetriever>> {
        self.agents_for(Capability::Bio)
            .into_iter()
            .filter_map(|agent| match agent {
                RegisteredAgent::Bio(agent) => Some(agent),
                _ => None,
            })
            .collect()
    }

    pub fn image_agents(&self) -> Vec<Arc<dyn ImageRetriever>> {
        self.agents_for(Capability::Image)
            .into_iter()
            .filter_map(|agent| match agent {
                RegisteredAgent::Image(agent) => Some(agent),
                _ => None,
            })
            .collect()
    }

    pub fn cover_agents(&self) -> Vec<Arc<dyn CoverRetriever>> {
        self.agents_for(Capability::Cover)
            .into_iter()
            .filter_map(|agent| match agent {
                RegisteredAgent::Cover(agent) => Some(agent),
                _ => None,
            })
            .collect()
    }

    pub fn search_agents(&self) -> Vec<Arc<dyn StructuredSearch>> {
        self.agents_for(Capability::Search)
            .into_iter()
            .filter_map(|agent| match agent {
                RegisteredAgent::Search(agent) => Some(agent),
                _ => None,
            })
            .collect()
    }

    /// Registrations across all capabilities, enabled or not
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}
