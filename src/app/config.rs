//! Application configuration types

use brandforge_llm::{DispatcherConfig, ProviderSpec, SelectorConfig};
use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub router: SelectorConfig,
    #[serde(default)]
    pub dispatcher: DispatcherConfig,
}

/// Catalog configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Replaces the built-in provider list when set
    #[serde(default)]
    pub providers: Option<Vec<ProviderSpec>>,
}
