//! Catalog implementation

use super::defaults::CredentialSource;
use super::descriptor::{Modality, ProviderDescriptor, ProviderSpec};
use crate::error::{Error, Result};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Read-only provider registry, built once at startup
#[derive(Debug, Clone)]
pub struct Catalog {
    /// Descriptors in declaration order
    providers: Vec<ProviderDescriptor>,
}

impl Catalog {
    /// Build a catalog from descriptors.
    ///
    /// Fails when a descriptor is invalid, a name is declared twice, or a
    /// modality in `required` has no provider with credentials.
    pub fn new(providers: Vec<ProviderDescriptor>, required: &[Modality]) -> Result<Self> {
        let mut seen = HashSet::new();
        for provider in &providers {
            provider.validate()?;
            if !seen.insert(provider.name.as_str()) {
                return Err(Error::Configuration(format!(
                    "provider {} declared more than once",
                    provider.name
                )));
            }
        }

        let catalog = Self { providers };

        for modality in required {
            let available = catalog.available_providers(*modality);
            if available.is_empty() {
                return Err(Error::Configuration(format!(
                    "no {modality} provider has credentials configured"
                )));
            }
            info!(
                modality = %modality,
                providers = ?available.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
                "Available providers"
            );
        }

        Ok(catalog)
    }

    /// Build a catalog from specs, resolving credential presence once
    pub fn from_specs(
        specs: &[ProviderSpec],
        credentials: &dyn CredentialSource,
        required: &[Modality],
    ) -> Result<Self> {
        let providers = specs
            .iter()
            .map(|spec| {
                let present = credentials.has_credential(&spec.credential_env);
                if present {
                    debug!(provider = %spec.name, "Credential found");
                } else {
                    warn!(
                        provider = %spec.name,
                        env = %spec.credential_env,
                        "Credential missing, provider disabled"
                    );
                }
                ProviderDescriptor::new(spec.name.clone(), spec.quality, spec.pricing, present)
            })
            .collect();

        Self::new(providers, required)
    }

    /// Look up a provider by name
    pub fn get(&self, name: &str) -> Result<&ProviderDescriptor> {
        self.providers
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| Error::UnknownProvider(name.to_string()))
    }

    /// Whether `name` exists and has credentials
    #[must_use]
    pub fn is_available(&self, name: &str) -> bool {
        self.get(name).map(|p| p.credential_present).unwrap_or(false)
    }

    /// All descriptors in declaration order
    #[must_use]
    pub fn providers(&self) -> &[ProviderDescriptor] {
        &self.providers
    }

    /// Available providers of a modality, cheapest first.
    ///
    /// The sort is stable so equal costs keep declaration order.
    #[must_use]
    pub fn available_providers(&self, modality: Modality) -> Vec<&ProviderDescriptor> {
        let mut available: Vec<_> = self
            .providers
            .iter()
            .filter(|p| p.modality == modality && p.credential_present)
            .collect();
        available.sort_by(|a, b| a.unit_cost.total_cmp(&b.unit_cost));
        available
    }

    /// Cheapest available provider whose name is not in `exclude`
    pub fn cheapest_available(
        &self,
        modality: Modality,
        exclude: &[&str],
    ) -> Result<&ProviderDescriptor> {
        self.available_providers(modality)
            .into_iter()
            .find(|p| !exclude.contains(&p.name.as_str()))
            .ok_or(Error::NoneAvailable(modality))
    }

    /// The available provider one price step below `provider`.
    ///
    /// Picks the most expensive available provider of the same modality that
    /// is strictly cheaper; among equal prices the first declared wins.
    #[must_use]
    pub fn next_cheaper_available(
        &self,
        provider: &ProviderDescriptor,
    ) -> Option<&ProviderDescriptor> {
        let cheaper: Vec<_> = self
            .available_providers(provider.modality)
            .into_iter()
            .filter(|p| p.unit_cost < provider.unit_cost)
            .collect();
        let step = cheaper.last()?.unit_cost;
        cheaper.into_iter().find(|p| p.unit_cost == step)
    }

    /// Most expensive catalog entry of a modality, available or not
    #[must_use]
    pub fn most_expensive(&self, modality: Modality) -> Option<&ProviderDescriptor> {
        self.providers
            .iter()
            .filter(|p| p.modality == modality)
            .fold(None, |best: Option<&ProviderDescriptor>, p| match best {
                Some(b) if b.unit_cost >= p.unit_cost => Some(b),
                _ => Some(p),
            })
    }
}
