//! Vendor adapters
//!
//! HTTP clients implementing [`ProviderClient`](crate::dispatch::ProviderClient)
//! for each catalog provider. Every adapter normalises transport and API
//! failures into [`VendorError`].
//!
//! # Module Structure
//!
//! - `openai_compat`: chat completions for groq, gemini, deepseek and openai
//! - `anthropic`: Anthropic messages API
//! - `fal`: Flux image generation on fal.ai
//! - `openai_images`: DALL-E 3 image generation

pub mod anthropic;
pub mod fal;
pub mod openai_compat;
pub mod openai_images;

pub use anthropic::{AnthropicClient, AnthropicConfig};
pub use fal::{FalClient, FalConfig};
pub use openai_compat::{ChatClient, ChatConfig};
pub use openai_images::{OpenAiImageClient, OpenAiImageConfig};

use crate::catalog::names;
use crate::dispatch::ProviderClient;
use crate::error::{Error, Result, VendorError};
use crate::util::sanitize_vendor_message;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

/// Default HTTP timeout for vendor adapters
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(60);

/// Build the vendor client for a catalog provider from environment variables
pub fn client_from_env(provider: &str) -> Result<Arc<dyn ProviderClient>> {
    let client: Arc<dyn ProviderClient> = match provider {
        names::ANTHROPIC => Arc::new(AnthropicClient::from_env()?),
        names::DALL_E_3 => Arc::new(OpenAiImageClient::from_env()?),
        name if fal::model_path(name).is_some() => Arc::new(FalClient::from_env(name)?),
        name if openai_compat::preset(name).is_some() => Arc::new(ChatClient::from_env(name)?),
        other => return Err(Error::UnknownProvider(other.to_string())),
    };
    Ok(client)
}

/// Build the HTTP client shared by one adapter
pub(crate) fn http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| Error::Configuration(format!("failed to create HTTP client: {e}")))
}

/// Read a required credential from the environment
pub(crate) fn env_key(var: &str) -> Result<String> {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::Configuration(format!("{var} not set"))),
    }
}

/// Map a transport failure
pub(crate) fn transport_error(error: reqwest::Error) -> VendorError {
    if error.is_timeout() {
        VendorError::Network("request timed out".to_string())
    } else {
        VendorError::Network(sanitize_vendor_message(&error.to_string()))
    }
}

/// Map a non-2xx response
pub(crate) fn status_error(status: StatusCode, body: &str) -> VendorError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return VendorError::RateLimit;
    }
    VendorError::Status {
        status: status.as_u16(),
        message: sanitize_vendor_message(body),
    }
}

/// Check the status and decode a JSON body
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: Response,
) -> std::result::Result<T, VendorError> {
    let status = response.status();
    let body = response.text().await.map_err(transport_error)?;

    if !status.is_success() {
        return Err(status_error(status, &body));
    }

    parse_body(&body)
}

/// Decode a JSON body
pub(crate) fn parse_body<T: DeserializeOwned>(body: &str) -> std::result::Result<T, VendorError> {
    serde_json::from_str(body).map_err(|e| VendorError::InvalidResponse(e.to_string()))
}
