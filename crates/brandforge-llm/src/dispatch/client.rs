//! Provider client capability
//!
//! One thin adapter per vendor. Adapters own authentication, wire format and
//! error normalisation; the dispatcher only sees success or [`VendorError`].

use crate::error::VendorError;
use serde::{Deserialize, Serialize};

/// Generation payload handed to a vendor client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Prompt text (copy brief or image description)
    pub prompt: String,
    /// Optional system instructions (text providers only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    /// Max output tokens (text) or number of images (image)
    pub max_units: u32,
}

impl GenerationRequest {
    /// Create a request
    #[must_use]
    pub fn new(prompt: impl Into<String>, max_units: u32) -> Self {
        Self {
            prompt: prompt.into(),
            system: None,
            max_units,
        }
    }

    /// Set system instructions
    #[must_use]
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

/// Generated content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum GeneratedContent {
    /// Generated copy
    Text(String),
    /// URLs (or data URIs) of generated images
    Images(Vec<String>),
}

/// Successful vendor response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationOutput {
    /// Generated content
    pub content: GeneratedContent,
    /// Tokens consumed (text) or images produced (image)
    pub units: u64,
}

/// Authenticated vendor client
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ProviderClient: Send + Sync {
    /// Run one generation call
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> std::result::Result<GenerationOutput, VendorError>;
}
