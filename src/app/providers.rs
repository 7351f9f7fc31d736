//! Provider resolution
//!
//! Builds the catalog from configured specs and registers a vendor client
//! for every provider whose credential is present.

use super::config::AppConfig;
use anyhow::{Context, Result};
use brandforge_llm::catalog::{Catalog, CredentialSource, EnvCredentials, Modality, StaticCredentials};
use brandforge_llm::{default_catalog_specs, providers, Dispatcher, MockClient, ProviderSpec, UsageAggregator};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Configured provider specs, or the built-in list
pub fn catalog_specs(config: &AppConfig) -> Vec<ProviderSpec> {
    config
        .catalog
        .providers
        .clone()
        .unwrap_or_else(default_catalog_specs)
}

/// Build the catalog. A dry run treats every credential as present.
pub fn build_catalog(config: &AppConfig, dry_run: bool) -> Result<Catalog> {
    let specs = catalog_specs(config);
    let credentials: Box<dyn CredentialSource> = if dry_run {
        Box::new(StaticCredentials::new(
            specs.iter().map(|s| s.credential_env.clone()),
        ))
    } else {
        Box::new(EnvCredentials)
    };

    Catalog::from_specs(&specs, credentials.as_ref(), &[Modality::Text, Modality::Image])
        .context("Failed to build provider catalog")
}

/// Build the dispatcher and register clients for available providers
pub fn build_dispatcher(
    config: &AppConfig,
    catalog: Arc<Catalog>,
    usage: Arc<UsageAggregator>,
    dry_run: bool,
) -> Result<Dispatcher> {
    let mut dispatcher = Dispatcher::new(Arc::clone(&catalog), usage, &config.dispatcher)
        .context("Invalid dispatcher configuration")?;
    let mut registered = 0;

    for provider in catalog.providers().iter().filter(|p| p.credential_present) {
        if dry_run {
            let client = match provider.modality {
                Modality::Text => MockClient::text(
                    format!("[dry run] {} response", provider.name),
                    250,
                ),
                Modality::Image => {
                    MockClient::images(vec![format!("mock://{}/image-1.png", provider.name)])
                }
            };
            dispatcher.register(provider.name.clone(), Arc::new(client));
            registered += 1;
            continue;
        }

        match providers::client_from_env(&provider.name) {
            Ok(client) => {
                dispatcher.register(provider.name.clone(), client);
                registered += 1;
                debug!(provider = %provider.name, "Registered provider client");
            }
            Err(e) => warn!(provider = %provider.name, error = %e, "Provider client unavailable"),
        }
    }

    info!(count = registered, dry_run, "Provider clients registered");
    Ok(dispatcher)
}
