//! Selector configuration
//!
//! Thresholds and routing tables are business configuration and are read
//! from the application config file.

use super::rules::{ImageRoutingTable, RoutingTable};
use crate::catalog::{Catalog, Modality};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default low-credit threshold for text selection
pub const DEFAULT_LOW_CREDIT_THRESHOLD_TEXT: f64 = 50.0;

/// Default low-credit threshold for image selection
pub const DEFAULT_LOW_CREDIT_THRESHOLD_IMAGE: f64 = 10.0;

fn default_text_threshold() -> f64 {
    DEFAULT_LOW_CREDIT_THRESHOLD_TEXT
}

fn default_image_threshold() -> f64 {
    DEFAULT_LOW_CREDIT_THRESHOLD_IMAGE
}

/// Configuration for [`super::Selector`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Credits below this downgrade text requests
    #[serde(default = "default_text_threshold")]
    pub low_credit_threshold_text: f64,
    /// Credits below this downgrade image requests
    #[serde(default = "default_image_threshold")]
    pub low_credit_threshold_image: f64,
    /// Text routing table
    #[serde(default)]
    pub text_routes: RoutingTable,
    /// Image routing table
    #[serde(default)]
    pub image_routes: ImageRoutingTable,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            low_credit_threshold_text: DEFAULT_LOW_CREDIT_THRESHOLD_TEXT,
            low_credit_threshold_image: DEFAULT_LOW_CREDIT_THRESHOLD_IMAGE,
            text_routes: RoutingTable::default(),
            image_routes: ImageRoutingTable::default(),
        }
    }
}

impl SelectorConfig {
    /// Threshold for a modality
    #[must_use]
    pub fn threshold(&self, modality: Modality) -> f64 {
        match modality {
            Modality::Text => self.low_credit_threshold_text,
            Modality::Image => self.low_credit_threshold_image,
        }
    }

    /// Check thresholds and that every routed provider exists with the right modality.
    ///
    /// Routes to providers without credentials are allowed; the selector
    /// substitutes the cheapest available provider for them.
    pub fn validate(&self, catalog: &Catalog) -> Result<()> {
        for (label, value) in [
            ("low_credit_threshold_text", self.low_credit_threshold_text),
            ("low_credit_threshold_image", self.low_credit_threshold_image),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::Configuration(format!(
                    "{label} must be a non-negative number, got {value}"
                )));
            }
        }

        let routed = self
            .text_routes
            .provider_names()
            .map(|name| (name, Modality::Text))
            .chain(
                self.image_routes
                    .provider_names()
                    .map(|name| (name, Modality::Image)),
            );

        for (name, modality) in routed {
            let provider = catalog.get(name).map_err(|_| {
                Error::Configuration(format!("routing table references unknown provider {name}"))
            })?;
            if provider.modality != modality {
                return Err(Error::Configuration(format!(
                    "provider {name} is routed for {modality} but generates {}",
                    provider.modality
                )));
            }
        }

        Ok(())
    }
}
