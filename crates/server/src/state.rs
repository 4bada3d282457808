use crate::config::ServerConfig;
use crate::error::ServerResult;
use prodsearch::{SearchConfig, SearchService};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Search orchestrator with its long-lived client handles, created once
    /// at startup and shared across requests.
    pub service: Arc<SearchService>,
}

impl ServerState {
    /// Create new server state, building the search clients from config
    pub fn new(config: ServerConfig, search_config: SearchConfig) -> ServerResult<Self> {
        let service = SearchService::from_config(search_config)
            .map_err(|err| crate::error::ServerError::Config(err.to_string()))?;
        Ok(Self::with_service(config, service))
    }

    /// Wrap an already-built search service (used by tests to inject mocks)
    pub fn with_service(config: ServerConfig, service: SearchService) -> Self {
        Self {
            config: Arc::new(config),
            service: Arc::new(service),
        }
    }
}
