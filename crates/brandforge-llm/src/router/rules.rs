//! Routing tables
//!
//! Operator-configured mappings from (tier, task key) to a provider name.
//! Unknown-key policy lives here and nowhere else.

use super::types::{ImageType, SubscriptionTier, TaskComplexity};
use crate::catalog::names;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Text routing table: tier × complexity → provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoutingTable {
    routes: HashMap<SubscriptionTier, HashMap<TaskComplexity, String>>,
}

impl RoutingTable {
    /// Empty table
    #[must_use]
    pub fn empty() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }

    /// Add or replace a route
    #[must_use]
    pub fn with_route(
        mut self,
        tier: SubscriptionTier,
        complexity: TaskComplexity,
        provider: impl Into<String>,
    ) -> Self {
        self.routes
            .entry(tier)
            .or_default()
            .insert(complexity, provider.into());
        self
    }

    /// Exact entry, no defaulting
    #[must_use]
    pub fn route(&self, tier: SubscriptionTier, complexity: TaskComplexity) -> Option<&str> {
        self.routes
            .get(&tier)
            .and_then(|by_complexity| by_complexity.get(&complexity))
            .map(String::as_str)
    }

    /// Entry for `(tier, complexity)`, else the `(Free, Standard)` entry
    #[must_use]
    pub fn resolve(&self, tier: SubscriptionTier, complexity: TaskComplexity) -> Option<&str> {
        self.route(tier, complexity)
            .or_else(|| self.route(SubscriptionTier::Free, TaskComplexity::Standard))
    }

    /// Every provider name referenced by the table
    pub fn provider_names(&self) -> impl Iterator<Item = &str> {
        self.routes
            .values()
            .flat_map(|by_complexity| by_complexity.values().map(String::as_str))
    }
}

impl Default for RoutingTable {
    fn default() -> Self {
        use SubscriptionTier::{Agency, Basic, Free, Pro};
        use TaskComplexity::{Complex, Simple, Standard};

        Self::empty()
            .with_route(Free, Simple, names::GROQ)
            .with_route(Free, Standard, names::GROQ)
            .with_route(Free, Complex, names::GEMINI)
            .with_route(Basic, Simple, names::GROQ)
            .with_route(Basic, Standard, names::GEMINI)
            .with_route(Basic, Complex, names::DEEPSEEK)
            .with_route(Pro, Simple, names::GEMINI)
            .with_route(Pro, Standard, names::DEEPSEEK)
            .with_route(Pro, Complex, names::OPENAI)
            .with_route(Agency, Simple, names::DEEPSEEK)
            .with_route(Agency, Standard, names::OPENAI)
            .with_route(Agency, Complex, names::ANTHROPIC)
    }
}

/// Image routes for one tier
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageRoutes {
    /// Provider for image types without a dedicated entry
    #[serde(default)]
    pub all: Option<String>,
    /// Per image type providers
    #[serde(default)]
    pub by_type: HashMap<ImageType, String>,
}

/// Image routing table: tier × image type → provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRoutingTable {
    routes: HashMap<SubscriptionTier, ImageRoutes>,
}

impl ImageRoutingTable {
    /// Empty table
    #[must_use]
    pub fn empty() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }

    /// Set the `all` bucket of a tier
    #[must_use]
    pub fn with_default(mut self, tier: SubscriptionTier, provider: impl Into<String>) -> Self {
        self.routes.entry(tier).or_default().all = Some(provider.into());
        self
    }

    /// Add or replace a per-type route
    #[must_use]
    pub fn with_route(
        mut self,
        tier: SubscriptionTier,
        image_type: ImageType,
        provider: impl Into<String>,
    ) -> Self {
        self.routes
            .entry(tier)
            .or_default()
            .by_type
            .insert(image_type, provider.into());
        self
    }

    /// Per-type entry, else the tier's `all` bucket.
    ///
    /// `None` means the caller should use the baseline (cheapest) provider.
    #[must_use]
    pub fn resolve(&self, tier: SubscriptionTier, image_type: Option<ImageType>) -> Option<&str> {
        let routes = self.routes.get(&tier)?;
        image_type
            .and_then(|t| routes.by_type.get(&t))
            .or(routes.all.as_ref())
            .map(String::as_str)
    }

    /// Every provider name referenced by the table
    pub fn provider_names(&self) -> impl Iterator<Item = &str> {
        self.routes.values().flat_map(|routes| {
            routes
                .all
                .iter()
                .chain(routes.by_type.values())
                .map(String::as_str)
        })
    }
}

impl Default for ImageRoutingTable {
    fn default() -> Self {
        use ImageType::{Ad, Hero, Product};
        use SubscriptionTier::{Agency, Basic, Free, Pro};

        Self::empty()
            .with_default(Free, names::FLUX_SCHNELL)
            .with_default(Basic, names::FLUX_SCHNELL)
            .with_route(Basic, Hero, names::FLUX_DEV)
            .with_default(Pro, names::FLUX_DEV)
            .with_route(Pro, Hero, names::FLUX_PRO)
            .with_route(Pro, Product, names::DALL_E_3)
            .with_default(Agency, names::FLUX_PRO)
            .with_route(Agency, Product, names::DALL_E_3)
            .with_route(Agency, Ad, names::DALL_E_3)
    }
}
