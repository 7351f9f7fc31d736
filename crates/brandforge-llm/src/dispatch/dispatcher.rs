//! Dispatcher with a single bounded fallback
//!
//! Runs the call chosen by the selector. On failure it retries exactly once
//! against the cheapest other available provider of the same modality.
//! Every attempt is appended to the usage log.

use super::client::{GeneratedContent, GenerationOutput, GenerationRequest, ProviderClient};
use crate::catalog::{Catalog, ProviderDescriptor};
use crate::cost::UsageAggregator;
use crate::error::{Error, Result, VendorError};
use crate::router::{LowCreditWarning, SelectionResult, UpgradeSuggestion};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// Default per-call timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

/// Dispatcher configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatcherConfig {
    /// Upper bound on each vendor call, in milliseconds; must be non-zero
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

/// Outcome of [`Dispatcher::execute`], with provenance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Generated content
    pub content: GeneratedContent,
    /// Provider that actually served the request
    pub provider_used: String,
    /// Tokens or images billed
    pub units: u64,
    /// Actual cost (USD)
    pub cost: f64,
    /// Whether the fallback provider served the request
    pub fallback_used: bool,
    /// Unit cost difference `fallback - selected`, set when the fallback served
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_impact: Option<f64>,
    /// Latency of the successful call
    pub latency_seconds: f64,
    /// Warning carried over from the selection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<LowCreditWarning>,
    /// Suggestion carried over from the selection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<UpgradeSuggestion>,
}

enum Attempt {
    Succeeded {
        output: GenerationOutput,
        cost: f64,
        latency: Duration,
    },
    Failed(VendorError),
    Cancelled,
}

/// Executes selections against vendor clients
pub struct Dispatcher {
    catalog: Arc<Catalog>,
    usage: Arc<UsageAggregator>,
    clients: HashMap<String, Arc<dyn ProviderClient>>,
    timeout: Duration,
}

impl Dispatcher {
    /// Create a dispatcher. A zero timeout is rejected.
    pub fn new(
        catalog: Arc<Catalog>,
        usage: Arc<UsageAggregator>,
        config: &DispatcherConfig,
    ) -> Result<Self> {
        if config.timeout_ms == 0 {
            return Err(Error::Configuration(
                "dispatcher timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            catalog,
            usage,
            clients: HashMap::new(),
            timeout: Duration::from_millis(config.timeout_ms),
        })
    }

    /// Register the client serving a catalog provider
    pub fn register(&mut self, name: impl Into<String>, client: Arc<dyn ProviderClient>) {
        let name = name.into();
        debug!(provider = %name, "Registering provider client");
        self.clients.insert(name, client);
    }

    /// Whether a client is registered for `name`
    #[must_use]
    pub fn has_client(&self, name: &str) -> bool {
        self.clients.contains_key(name)
    }

    /// Usage log this dispatcher writes to
    #[must_use]
    pub fn usage(&self) -> &Arc<UsageAggregator> {
        &self.usage
    }

    /// Execute a selection with no external cancellation
    pub async fn execute(
        &self,
        selection: &SelectionResult,
        request: &GenerationRequest,
    ) -> Result<ExecutionResult> {
        self.execute_with_cancel(selection, request, &CancellationToken::new())
            .await
    }

    /// Execute a selection, aborting when `cancel` fires.
    ///
    /// At most two vendor calls are made, strictly one after the other.
    #[instrument(skip(self, selection, request, cancel), fields(provider = %selection.provider))]
    pub async fn execute_with_cancel(
        &self,
        selection: &SelectionResult,
        request: &GenerationRequest,
        cancel: &CancellationToken,
    ) -> Result<ExecutionResult> {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let primary = self.catalog.get(&selection.provider)?;

        let primary_error = match self.attempt(primary, request, cancel).await {
            Attempt::Succeeded {
                output,
                cost,
                latency,
            } => return Ok(finish(selection, primary, output, cost, latency, None)),
            Attempt::Cancelled => return Err(Error::Cancelled),
            Attempt::Failed(error) => error,
        };

        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let fallback = match self
            .catalog
            .cheapest_available(primary.modality, &[primary.name.as_str()])
        {
            Ok(fallback) => fallback,
            Err(_) => {
                warn!(primary = %primary.name, "No fallback provider available");
                return Err(Error::ProviderExhausted {
                    primary: primary.name.clone(),
                    fallback: None,
                    source: primary_error,
                });
            }
        };

        info!(
            primary = %primary.name,
            fallback = %fallback.name,
            error = %primary_error,
            "Primary provider failed, trying fallback"
        );

        match self.attempt(fallback, request, cancel).await {
            Attempt::Succeeded {
                output,
                cost,
                latency,
            } => Ok(finish(
                selection,
                fallback,
                output,
                cost,
                latency,
                Some(fallback.unit_cost - selection.unit_cost),
            )),
            Attempt::Cancelled => Err(Error::Cancelled),
            Attempt::Failed(error) => {
                warn!(
                    primary = %primary.name,
                    fallback = %fallback.name,
                    error = %error,
                    "Fallback provider failed"
                );
                Err(Error::ProviderExhausted {
                    primary: primary.name.clone(),
                    fallback: Some(fallback.name.clone()),
                    source: error,
                })
            }
        }
    }

    /// One bounded vendor call, always logged to the usage aggregator
    async fn attempt(
        &self,
        provider: &ProviderDescriptor,
        request: &GenerationRequest,
        cancel: &CancellationToken,
    ) -> Attempt {
        let started = Instant::now();

        let call = async {
            let Some(client) = self.clients.get(&provider.name) else {
                return Err(VendorError::NotConfigured(provider.name.clone()));
            };
            match tokio::time::timeout(self.timeout, client.generate(request)).await {
                Ok(result) => result,
                Err(_) => Err(VendorError::Timeout(self.timeout.as_millis() as u64)),
            }
        };

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            result = call => Some(result),
        };
        let latency = started.elapsed();

        match outcome {
            Some(Ok(output)) => {
                let cost = provider.cost_for(output.units);
                self.usage
                    .record(provider, output.units, cost, true, latency)
                    .await;
                debug!(
                    provider = %provider.name,
                    units = output.units,
                    cost,
                    latency_ms = latency.as_millis() as u64,
                    "Provider call succeeded"
                );
                Attempt::Succeeded {
                    output,
                    cost,
                    latency,
                }
            }
            Some(Err(error)) => {
                self.usage.record(provider, 0, 0.0, false, latency).await;
                warn!(provider = %provider.name, error = %error, "Provider call failed");
                Attempt::Failed(error)
            }
            None => {
                self.usage.record(provider, 0, 0.0, false, latency).await;
                info!(provider = %provider.name, "Provider call cancelled");
                Attempt::Cancelled
            }
        }
    }
}

fn finish(
    selection: &SelectionResult,
    provider: &ProviderDescriptor,
    output: GenerationOutput,
    cost: f64,
    latency: Duration,
    cost_impact: Option<f64>,
) -> ExecutionResult {
    ExecutionResult {
        content: output.content,
        provider_used: provider.name.clone(),
        units: output.units,
        cost,
        fallback_used: cost_impact.is_some(),
        cost_impact,
        latency_seconds: latency.as_secs_f64(),
        warning: selection.warning.clone(),
        suggestion: selection.suggestion.clone(),
    }
}
