//! BrandForge LLM - cost-aware provider routing
//!
//! This crate picks and calls the text and image providers behind BrandForge
//! content generation:
//! - Catalog: static provider registry with pricing, quality and credential status
//! - Router: tier/complexity routing with low-credit downgrades and upgrade hints
//! - Dispatch: bounded vendor calls with a single cheapest-available fallback
//! - Cost: append-only usage log with savings reporting
//! - Providers: HTTP adapters for Groq, Gemini, DeepSeek, OpenAI, Anthropic, fal.ai Flux and DALL-E

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod catalog;
pub mod cost;
pub mod dispatch;
pub mod error;
pub mod providers;
pub mod router;
pub mod util;

#[cfg(test)]
mod test_support;

pub use catalog::{
    default_catalog_specs, Catalog, CredentialSource, EnvCredentials, Modality, Pricing,
    ProviderDescriptor, ProviderSpec, StaticCredentials,
};
pub use cost::{CostReport, CostSummary, ProviderBreakdown, ProviderPerformance, UsageAggregator, UsageRecord};
pub use dispatch::{
    Dispatcher, DispatcherConfig, ExecutionResult, GeneratedContent, GenerationOutput,
    GenerationRequest, MockClient, ProviderClient,
};
pub use error::{Error, Result, VendorError};
pub use router::{
    ImageType, LowCreditWarning, SelectionContext, SelectionResult, Selector, SelectorConfig,
    SubscriptionTier, TaskComplexity, UpgradeSuggestion,
};
