//! Shared application state.

use std::time::Duration;

use parking_lot::RwLock;
use smartoffer_core::SmartOfferConfig;
use smartoffer_extract::{BrandCatalog, ExtractOptions, OfferExtractor};
use smartoffer_llm::LLMConfig;
use tracing::info;

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: SmartOfferConfig,
    pub extractor: OfferExtractor,
    pub llm_config: RwLock<LLMConfig>,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: SmartOfferConfig) -> Self {
        let catalog = BrandCatalog::load(&config.data_paths.brands_file);
        info!("Brand catalog: {} brands", catalog.brands.len());
        let extractor = OfferExtractor::new(catalog, ExtractOptions::from(&config));

        let llm_config = LLMConfig::load(&config.data_paths.llm_config_file);

        Self {
            config,
            extractor,
            llm_config: RwLock::new(llm_config),
            http: reqwest::Client::new(),
        }
    }

    /// Client-side bound on one remote extraction.
    pub fn remote_timeout(&self) -> Duration {
        Duration::from_secs(self.config.remote_timeout_secs)
    }
}
