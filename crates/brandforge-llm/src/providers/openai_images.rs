//! OpenAI Images - DALL-E 3

use super::{env_key, http_client, read_json, transport_error, DEFAULT_HTTP_TIMEOUT};
use crate::dispatch::{GeneratedContent, GenerationOutput, GenerationRequest, ProviderClient};
use crate::error::{Result, VendorError};
use crate::util::mask_api_key;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, instrument};

/// OpenAI API base URL
pub const BASE_URL: &str = "https://api.openai.com/v1";

/// Image model
pub const DEFAULT_MODEL: &str = "dall-e-3";

/// Default output size
pub const DEFAULT_SIZE: &str = "1024x1024";

/// OpenAI image client configuration
#[derive(Clone)]
pub struct OpenAiImageConfig {
    /// API key
    pub api_key: String,
    /// API base URL
    pub base_url: String,
    /// Model to request
    pub model: String,
    /// Output size
    pub size: String,
    /// Request timeout
    pub timeout: Duration,
}

// SECURITY: Custom Debug implementation to mask API key
impl fmt::Debug for OpenAiImageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiImageConfig")
            .field("api_key", &mask_api_key(&self.api_key))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("size", &self.size)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl OpenAiImageConfig {
    /// Create a configuration with an API key
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            size: DEFAULT_SIZE.to_string(),
            timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }

    /// Create configuration from `OPENAI_API_KEY`
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(env_key("OPENAI_API_KEY")?))
    }

    /// Set the output size
    #[must_use]
    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = size.into();
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
struct ImageRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u32,
    size: &'a str,
}

#[derive(Deserialize)]
struct ImageResponse {
    data: Vec<ImageData>,
}

#[derive(Deserialize)]
struct ImageData {
    url: Option<String>,
    b64_json: Option<String>,
}

/// DALL-E client
#[derive(Debug)]
pub struct OpenAiImageClient {
    client: Client,
    config: OpenAiImageConfig,
}

impl OpenAiImageClient {
    /// Create a client
    pub fn new(config: OpenAiImageConfig) -> Result<Self> {
        let client = http_client(config.timeout)?;
        Ok(Self { client, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(OpenAiImageConfig::from_env()?)
    }

    fn build_request<'a>(&'a self, request: &'a GenerationRequest) -> ImageRequest<'a> {
        ImageRequest {
            model: &self.config.model,
            prompt: &request.prompt,
            // dall-e-3 only accepts n = 1
            n: 1,
            size: &self.config.size,
        }
    }
}

fn into_output(response: ImageResponse) -> std::result::Result<GenerationOutput, VendorError> {
    let images: Vec<String> = response
        .data
        .into_iter()
        .filter_map(|d| {
            d.url
                .or_else(|| d.b64_json.map(|b64| format!("data:image/png;base64,{b64}")))
        })
        .collect();

    if images.is_empty() {
        return Err(VendorError::InvalidResponse("no images in response".to_string()));
    }

    Ok(GenerationOutput {
        units: images.len() as u64,
        content: GeneratedContent::Images(images),
    })
}

#[async_trait::async_trait]
impl ProviderClient for OpenAiImageClient {
    #[instrument(skip(self, request), fields(model = %self.config.model))]
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> std::result::Result<GenerationOutput, VendorError> {
        debug!("Sending image request to OpenAI");

        let response = self
            .client
            .post(format!("{}/images/generations", self.config.base_url))
            .bearer_auth(&self.config.api_key)
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
        parse_body::<ImageResponse>(body).and_then(into_output)
    }

    #[test]
    fn test_request_is_single_image() {
        let client = OpenAiImageClient::new(OpenAiImageConfig::new("k")).unwrap();
        let request = GenerationRequest::new("Product shot of a watch", 4);

        let json = serde_json::to_value(client.build_request(&request)).unwrap();
        assert_eq!(json["model"], "dall-e-3");
        assert_eq!(json["n"], 1);
    }

    #[test]
    fn test_parse_url_response() {
        let body = r#"{"created": 1, "data": [{"url": "https://img.example/x.png", "revised_prompt": "..."}]}"#;
        let output = parse(body).unwrap();
        assert_eq!(output.units, 1);
        assert_eq!(
            output.content,
            GeneratedContent::Images(vec!["https://img.example/x.png".to_string()])
        );
    }

    #[test]
    fn test_parse_b64_response() {
        let body = r#"{"data": [{"b64_json": "aGVsbG8="}]}"#;
        let output = parse(body).unwrap();
        assert_eq!(
            output.content,
            GeneratedContent::Images(vec!["data:image/png;base64,aGVsbG8=".to_string()])
        );
    }

    #[test]
    fn test_config_debug_masks_key() {
        let config = OpenAiImageConfig::new("sk-1234567890abcdefghijklmnop");
        assert!(!format!("{:?}", config).contains("1234567890abcdefghijkl"));
    }
}
