//! Catalog - static registry of text and image providers
//!
//! # Module Structure
//!
//! - `descriptor`: Modality, Pricing, ProviderSpec, ProviderDescriptor
//! - `defaults`: default provider list and credential sources
//! - `registry`: Catalog lookup and availability queries

mod defaults;
mod descriptor;
mod registry;

#[cfg(test)]
mod tests;

pub use defaults::{
    default_catalog_specs, names, CredentialSource, EnvCredentials, StaticCredentials,
};
pub use descriptor::{
    Modality, Pricing, ProviderDescriptor, ProviderSpec, MAX_QUALITY, MIN_QUALITY,
};
pub use registry::Catalog;
