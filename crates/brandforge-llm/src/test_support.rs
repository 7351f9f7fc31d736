//! Shared fixtures for unit tests

use crate::catalog::{default_catalog_specs, Catalog, Modality, StaticCredentials};
use crate::router::{Selector, SelectorConfig};
use std::sync::Arc;

/// Credentials for every provider in the default catalog
pub(crate) fn all_credentials() -> StaticCredentials {
    StaticCredentials::new(
        default_catalog_specs()
            .into_iter()
            .map(|spec| spec.credential_env),
    )
}

/// Default catalog with every provider available
pub(crate) fn full_catalog() -> Catalog {
    Catalog::from_specs(
        &default_catalog_specs(),
        &all_credentials(),
        &[Modality::Text, Modality::Image],
    )
    .expect("default catalog is valid")
}

/// Selector over the full catalog with default config
pub(crate) fn default_selector() -> Selector {
    Selector::new(Arc::new(full_catalog()), SelectorConfig::default())
        .expect("default selector config is valid")
}
