//! Default provider list and credential lookup
//!
//! Prices are USD list prices (per 1M tokens, or per image).

use super::descriptor::{Pricing, ProviderSpec};
use std::collections::HashSet;

/// Source of credential presence, read once at catalog construction
pub trait CredentialSource {
    /// Whether a usable credential exists under `key`
    fn has_credential(&self, key: &str) -> bool;
}

/// Reads credentials from process environment variables
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentials;

impl CredentialSource for EnvCredentials {
    fn has_credential(&self, key: &str) -> bool {
        std::env::var(key)
            .map(|v| !v.trim().is_empty())
            .unwrap_or(false)
    }
}

/// Fixed set of present credential keys (tests, secrets stores)
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    keys: HashSet<String>,
}

impl StaticCredentials {
    /// Create from the keys that are present
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }
}

impl CredentialSource for StaticCredentials {
    fn has_credential(&self, key: &str) -> bool {
        self.keys.contains(key)
    }
}

/// Provider names used by the default catalog and routing tables
pub mod names {
    /// Groq, Llama 3.1 8B
    pub const GROQ: &str = "groq";
    /// Google Gemini 2.0 Flash
    pub const GEMINI: &str = "gemini";
    /// DeepSeek Chat
    pub const DEEPSEEK: &str = "deepseek";
    /// OpenAI GPT-4o
    pub const OPENAI: &str = "openai";
    /// Anthropic Claude Sonnet
    pub const ANTHROPIC: &str = "anthropic";
    /// Flux Schnell on fal.ai
    pub const FLUX_SCHNELL: &str = "flux-schnell";
    /// Flux Dev on fal.ai
    pub const FLUX_DEV: &str = "flux-dev";
    /// OpenAI DALL-E 3
    pub const DALL_E_3: &str = "dall-e-3";
    /// Flux Pro on fal.ai
    pub const FLUX_PRO: &str = "flux-pro";
}

/// Default catalog, in declaration order
#[must_use]
pub fn default_catalog_specs() -> Vec<ProviderSpec> {
    vec![
        // Text
        ProviderSpec::new(
            names::GROQ,
            2,
            Pricing::Tokens {
                input_per_1m: 0.05,
                output_per_1m: 0.08,
            },
            "GROQ_API_KEY",
        ),
        ProviderSpec::new(
            names::GEMINI,
            3,
            Pricing::Tokens {
                input_per_1m: 0.10,
                output_per_1m: 0.40,
            },
            "GEMINI_API_KEY",
        ),
        ProviderSpec::new(
            names::DEEPSEEK,
            3,
            Pricing::Tokens {
                input_per_1m: 0.27,
                output_per_1m: 1.10,
            },
            "DEEPSEEK_API_KEY",
        ),
        ProviderSpec::new(
            names::OPENAI,
            4,
            Pricing::Tokens {
                input_per_1m: 2.50,
                output_per_1m: 10.00,
            },
            "OPENAI_API_KEY",
        ),
        ProviderSpec::new(
            names::ANTHROPIC,
            5,
            Pricing::Tokens {
                input_per_1m: 3.00,
                output_per_1m: 15.00,
            },
            "ANTHROPIC_API_KEY",
        ),
        // Image
        ProviderSpec::new(
            names::FLUX_SCHNELL,
            2,
            Pricing::Image { per_image: 0.003 },
            "FAL_KEY",
        ),
        ProviderSpec::new(
            names::FLUX_DEV,
            3,
            Pricing::Image { per_image: 0.025 },
            "FAL_KEY",
        ),
        ProviderSpec::new(
            names::DALL_E_3,
            4,
            Pricing::Image { per_image: 0.04 },
            "OPENAI_API_KEY",
        ),
        ProviderSpec::new(
            names::FLUX_PRO,
            5,
            Pricing::Image { per_image: 0.05 },
            "FAL_KEY",
        ),
    ]
}
