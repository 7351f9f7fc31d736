//! fal.ai - Flux image generation
//!
//! Serves the three Flux catalog entries through fal's synchronous
//! `https://fal.run/<model>` endpoint.

use super::{env_key, http_client, read_json, transport_error, DEFAULT_HTTP_TIMEOUT};
use crate::catalog::names;
use crate::dispatch::{GeneratedContent, GenerationOutput, GenerationRequest, ProviderClient};
use crate::error::{Error, Result, VendorError};
use crate::util::mask_api_key;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, instrument};

/// fal.ai synchronous endpoint
pub const BASE_URL: &str = "https://fal.run";

/// Default output size
pub const DEFAULT_IMAGE_SIZE: &str = "landscape_4_3";

/// fal model path for a Flux catalog provider
#[must_use]
pub fn model_path(provider: &str) -> Option<&'static str> {
    match provider {
        names::FLUX_SCHNELL => Some("fal-ai/flux/schnell"),
        names::FLUX_DEV => Some("fal-ai/flux/dev"),
        names::FLUX_PRO => Some("fal-ai/flux-pro/v1.1"),
        _ => None,
    }
}

/// fal client configuration
#[derive(Clone)]
pub struct FalConfig {
    /// Catalog provider name
    pub provider: String,
    /// API key (`FAL_KEY`)
    pub api_key: String,
    /// Endpoint base URL
    pub base_url: String,
    /// Model path, e.g. `fal-ai/flux/schnell`
    pub model: String,
    /// Output size preset
    pub image_size: String,
    /// Request timeout
    pub timeout: Duration,
}

// SECURITY: Custom Debug implementation to mask API key
impl fmt::Debug for FalConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FalConfig")
            .field("provider", &self.provider)
            .field("api_key", &mask_api_key(&self.api_key))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("image_size", &self.image_size)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl FalConfig {
    /// Configuration for a Flux catalog provider
    pub fn new(provider: &str, api_key: impl Into<String>) -> Result<Self> {
        let model = model_path(provider)
            .ok_or_else(|| Error::Configuration(format!("{provider} is not a Flux provider")))?;
        Ok(Self {
            provider: provider.to_string(),
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
            model: model.to_string(),
            image_size: DEFAULT_IMAGE_SIZE.to_string(),
            timeout: DEFAULT_HTTP_TIMEOUT,
        })
    }

    /// Configuration from `FAL_KEY`
    pub fn from_env(provider: &str) -> Result<Self> {
        Self::new(provider, env_key("FAL_KEY")?)
    }

    /// Set the output size preset
    #[must_use]
    pub fn with_image_size(mut self, image_size: impl Into<String>) -> Self {
        self.image_size = image_size.into();
        self
    }

    /// Set the timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Serialize)]
struct FluxRequest<'a> {
    prompt: &'a str,
    num_images: u32,
    image_size: &'a str,
}

#[derive(Deserialize)]
struct FluxResponse {
    images: Vec<FluxImage>,
}

#[derive(Deserialize)]
struct FluxImage {
    url: String,
}

/// Flux image client
#[derive(Debug)]
pub struct FalClient {
    client: Client,
    config: FalConfig,
}

impl FalClient {
    /// Create a client
    pub fn new(config: FalConfig) -> Result<Self> {
        let client = http_client(config.timeout)?;
        Ok(Self { client, config })
    }

    /// Create a client for a Flux provider from environment variables
    pub fn from_env(provider: &str) -> Result<Self> {
        Self::new(FalConfig::from_env(provider)?)
    }

    fn build_request<'a>(&'a self, request: &'a GenerationRequest) -> FluxRequest<'a> {
        FluxRequest {
            prompt: &request.prompt,
            num_images: request.max_units.max(1),
            image_size: &self.config.image_size,
        }
    }
}

fn into_output(response: FluxResponse) -> std::result::Result<GenerationOutput, VendorError> {
    if response.images.is_empty() {
        return Err(VendorError::InvalidResponse("no images in response".to_string()));
    }
    let urls: Vec<String> = response.images.into_iter().map(|i| i.url).collect();
    Ok(GenerationOutput {
        units: urls.len() as u64,
        content: GeneratedContent::Images(urls),
    })
}

#[async_trait::async_trait]
impl ProviderClient for FalClient {
    #[instrument(skip(self, request), fields(provider = %self.config.provider))]
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> std::result::Result<GenerationOutput, VendorError> {
        debug!(model = %self.config.model, "Sending image request to fal.ai");

        let response = self
            .client
            .post(format!("{}/{}", self.config.base_url, self.config.model))
            .header("Authorization", format!("Key {}", self.config.api_key))
            .json(&self.build_request(request))
            .send()
            .await
            .map_err(transport_error)?;

        into_output(read_json(response).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::parse_body;

    fn parse(body: &str) -> std::result::Result<GenerationOutput, VendorError> {
        parse_body::<FluxResponse>(body).and_then(into_output)
    }

    #[test]
    fn test_model_paths() {
        assert_eq!(model_path(names::FLUX_SCHNELL), Some("fal-ai/flux/schnell"));
        assert_eq!(model_path(names::FLUX_PRO), Some("fal-ai/flux-pro/v1.1"));
        assert_eq!(model_path(names::DALL_E_3), None);
    }

    #[test]
    fn test_config_rejects_non_flux_provider() {
        assert!(FalConfig::new(names::GROQ, "key").is_err());
    }

    #[test]
    fn test_config_debug_masks_key() {
        let config = FalConfig::new(names::FLUX_DEV, "fal-1234567890abcdefghijklmnop").unwrap();
        let debug_str = format!("{:?}", config);
        assert!(!debug_str.contains("1234567890abcdefghijkl"));
    }

    #[test]
    fn test_request_requests_at_least_one_image() {
        let client = FalClient::new(FalConfig::new(names::FLUX_SCHNELL, "k").unwrap()).unwrap();
        let request = GenerationRequest::new("A red sneaker on white", 0);

        let json = serde_json::to_value(client.build_request(&request)).unwrap();
        assert_eq!(json["num_images"], 1);
        assert_eq!(json["image_size"], DEFAULT_IMAGE_SIZE);
    }

    #[test]
    fn test_parse_images() {
        let body = r#"{
            "images": [
                {"url": "https://fal.media/a.png", "width": 1024, "height": 768},
                {"url": "https://fal.media/b.png", "width": 1024, "height": 768}
            ],
            "seed": 42
        }"#;

        let output = parse(body).unwrap();
        assert_eq!(output.units, 2);
        assert_eq!(
            output.content,
            GeneratedContent::Images(vec![
                "https://fal.media/a.png".to_string(),
                "https://fal.media/b.png".to_string()
            ])
        );
    }

    #[test]
    fn test_parse_empty_images() {
        assert!(matches!(
            parse(r#"{"images": []}"#),
            Err(VendorError::InvalidResponse(_))
        ));
    }
}
