//! Provider descriptors
//!
//! Static facts about a provider: modality, quality rating and pricing.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest quality rating a provider may declare
pub const MIN_QUALITY: u8 = 1;

/// Highest quality rating a provider may declare
pub const MAX_QUALITY: u8 = 5;

/// Tokens per pricing unit for text providers
const TOKENS_PER_UNIT: f64 = 1_000.0;

/// Kind of content a provider generates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
    /// Copy: emails, ads, landing pages
    Text,
    /// Generated images
    Image,
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Image => write!(f, "image"),
        }
    }
}

/// Vendor pricing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Pricing {
    /// Per-token pricing (USD per 1M tokens)
    Tokens {
        /// Input cost per 1M tokens
        input_per_1m: f64,
        /// Output cost per 1M tokens
        output_per_1m: f64,
    },
    /// Flat price per generated image (USD)
    Image {
        /// Cost per image
        per_image: f64,
    },
}

impl Pricing {
    /// Modality implied by the pricing shape
    #[must_use]
    pub fn modality(&self) -> Modality {
        match self {
            Self::Tokens { .. } => Modality::Text,
            Self::Image { .. } => Modality::Image,
        }
    }

    /// Cost of one routing unit: blended 1K tokens, or one image
    #[must_use]
    pub fn unit_cost(&self) -> f64 {
        match self {
            Self::Tokens {
                input_per_1m,
                output_per_1m,
            } => (input_per_1m + output_per_1m) / 2.0 / 1_000.0,
            Self::Image { per_image } => *per_image,
        }
    }
}

/// Catalog entry as written in configuration.
///
/// Credential presence is not stored here; it is resolved once when the
/// [`super::Catalog`] is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderSpec {
    /// Unique provider name (e.g. "groq", "flux-schnell")
    pub name: String,
    /// Quality rating on the 1..=5 scale
    pub quality: u8,
    /// Vendor pricing
    pub pricing: Pricing,
    /// Environment variable holding the API key
    pub credential_env: String,
}

impl ProviderSpec {
    /// Create a spec
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        quality: u8,
        pricing: Pricing,
        credential_env: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            quality,
            pricing,
            credential_env: credential_env.into(),
        }
    }
}

/// Immutable provider descriptor, fixed at startup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderDescriptor {
    /// Unique provider name
    pub name: String,
    /// Text or image
    pub modality: Modality,
    /// Quality rating, comparison only
    pub quality: u8,
    /// Vendor pricing
    pub pricing: Pricing,
    /// Cost per 1K tokens (text) or per image (image)
    pub unit_cost: f64,
    /// Whether an API key was found at startup
    pub credential_present: bool,
}

impl ProviderDescriptor {
    /// Build a descriptor; modality and unit cost derive from pricing
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        quality: u8,
        pricing: Pricing,
        credential_present: bool,
    ) -> Self {
        Self {
            name: name.into(),
            modality: pricing.modality(),
            quality,
            pricing,
            unit_cost: pricing.unit_cost(),
            credential_present,
        }
    }

    /// Cost of `units` tokens (text) or images (image)
    #[must_use]
    pub fn cost_for(&self, units: u64) -> f64 {
        match self.modality {
            Modality::Text => self.unit_cost * (units as f64 / TOKENS_PER_UNIT),
            Modality::Image => self.unit_cost * units as f64,
        }
    }

    /// Input cost per 1M tokens, text providers only
    #[must_use]
    pub fn input_cost_per_1m(&self) -> Option<f64> {
        match self.pricing {
            Pricing::Tokens { input_per_1m, .. } => Some(input_per_1m),
            Pricing::Image { .. } => None,
        }
    }

    /// Output cost per 1M tokens, text providers only
    #[must_use]
    pub fn output_cost_per_1m(&self) -> Option<f64> {
        match self.pricing {
            Pricing::Tokens { output_per_1m, .. } => Some(output_per_1m),
            Pricing::Image { .. } => None,
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Configuration("provider name is empty".to_string()));
        }
        if !(self.unit_cost.is_finite() && self.unit_cost > 0.0) {
            return Err(Error::Configuration(format!(
                "provider {} has non-positive unit cost {}",
                self.name, self.unit_cost
            )));
        }
        if !(MIN_QUALITY..=MAX_QUALITY).contains(&self.quality) {
            return Err(Error::Configuration(format!(
                "provider {} quality {} outside {}..={}",
                self.name, self.quality, MIN_QUALITY, MAX_QUALITY
            )));
        }
        Ok(())
    }
}
