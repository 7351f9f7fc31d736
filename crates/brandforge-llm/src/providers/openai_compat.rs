//! OpenAI-compatible chat completions
//!
//! Groq, Gemini (OpenAI endpoint), DeepSeek and OpenAI all accept the same
//! `/chat/completions` wire format, so one adapter serves all four text
//! providers; only base URL, model and credential differ.

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

/// Endpoint defaults for one OpenAI-compatible vendor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatPreset {
    /// Catalog provider name
    pub provider: &'static str,
    /// API base URL
    pub base_url: &'static str,
    /// Default model
    pub model: &'static str,
    /// Credential environment variable
    pub key_env: &'static str,
    /// Model override environment variable
    pub model_env: &'static str,
}

/// Known OpenAI-compatible text providers
pub const PRESETS: &[ChatPreset] = &[
    ChatPreset {
        provider: names::GROQ,
        base_url: "https://api.groq.com/openai/v1",
        model: "llama-3.1-8b-instant",
        key_env: "GROQ_API_KEY",
        model_env: "GROQ_MODEL",
    },
    ChatPreset {
        provider: names::GEMINI,
        base_url: "https://generativelanguage.googleapis.com/v1beta/openai",
        model: "gemini-2.0-flash",
        key_env: "GEMINI_API_KEY",
        model_env: "GEMINI_MODEL",
    },
    ChatPreset {
        provider: names::DEEPSEEK,
        base_url: "https://api.deepseek.com/v1",
        model: "deepseek-chat",
        key_env: "DEEPSEEK_API_KEY",
        model_env: "DEEPSEEK_MODEL",
    },
    ChatPreset {
        provider: names::OPENAI,
        base_url: "https://api.openai.com/v1",
        model: "gpt-4o",
        key_env: "OPENAI_API_KEY",
        model_env: "OPENAI_MODEL",
    },
];

/// Look up the preset for a catalog provider
#[must_use]
pub fn preset(provider: &str) -> Option<&'static ChatPreset> {
    PRESETS.iter().find(|p| p.provider == provider)
}

/// Chat client configuration
#[derive(Clone)]
pub struct ChatConfig {
    /// Catalog provider name
    pub provider: String,
    /// API key
    pub api_key: String,
    /// API base URL
    pub base_url: String,
    /// Model to request
    pub model: String,
    /// Request timeout
    pub timeout: Duration,
}

// SECURITY: Custom Debug implementation to mask API key
impl fmt::Debug for ChatConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatConfig")
            .field("provider", &self.provider)
            .field("api_key", &mask_api_key(&self.api_key))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ChatConfig {
    /// Configuration from a preset and an explicit key
    #[must_use]
    pub fn from_preset(preset: &ChatPreset, api_key: impl Into<String>) -> Self {
        Self {
            provider: preset.provider.to_string(),
            api_key: api_key.into(),
            base_url: preset.base_url.to_string(),
            model: preset.model.to_string(),
            timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }

    /// Configuration for `provider` from environment variables
    pub fn from_env(provider: &str) -> Result<Self> {
        let preset = preset(provider).ok_or_else(|| {
            Error::Configuration(format!("{provider} is not an OpenAI-compatible provider"))
        })?;
        let api_key = env_key(preset.key_env)?;
        let model = std::env::var(preset.model_env).unwrap_or_else(|_| preset.model.to_string());

        Ok(Self::from_preset(preset, api_key).with_model(model))
    }

    /// Set the model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
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
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    total_tokens: u64,
}

/// OpenAI-compatible chat client
#[derive(Debug)]
pub struct ChatClient {
    client: Client,
    config: ChatConfig,
}

impl ChatClient {
    /// Create a client
    pub fn new(config: ChatConfig) -> Result<Self> {
        let client = http_client(config.timeout)?;
        Ok(Self { client, config })
    }

    /// Create a client for `provider` from environment variables
    pub fn from_env(provider: &str) -> Result<Self> {
        Self::new(ChatConfig::from_env(provider)?)
    }

    /// Client configuration
    #[must_use]
    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    fn build_request<'a>(&'a self, request: &'a GenerationRequest) -> ChatRequest<'a> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &request.system {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &request.prompt,
        });

        ChatRequest {
            model: &self.config.model,
            messages,
            max_tokens: request.max_units,
        }
    }
}

fn into_output(response: ChatResponse) -> std::result::Result<GenerationOutput, VendorError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| VendorError::InvalidResponse("no choices in response".to_string()))?;

    Ok(GenerationOutput {
        content: GeneratedContent::Text(choice.message.content.unwrap_or_default()),
        units: response.usage.map(|u| u.total_tokens).unwrap_or(0),
    })
}

#[async_trait::async_trait]
impl ProviderClient for ChatClient {
    #[instrument(skip(self, request), fields(provider = %self.config.provider, model = %self.config.model))]
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> std::result::Result<GenerationOutput, VendorError> {
        debug!("Sending chat completion request");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&self.build_request(request))
            .send()
            .await
            .map_err(transport_error)?;

        into_output(read_json(response).await?)
    }
}
