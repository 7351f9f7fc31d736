//! Composition root
//!
//! Wires configuration, catalog, selector, usage aggregator and dispatcher.
//!
//! # Module Structure
//!
//! - `config`: AppConfig and sections
//! - `loader`: configuration loading from files and environment
//! - `providers`: catalog construction and client registration

pub mod config;
mod loader;
mod providers;

pub use self::config::AppConfig;
pub use loader::load_config;

use anyhow::{Context, Result};
use brandforge_llm::{Dispatcher, Selector, UsageAggregator};
use std::sync::Arc;

/// Fully wired routing core
pub struct App {
    pub selector: Selector,
    pub dispatcher: Dispatcher,
    pub usage: Arc<UsageAggregator>,
}

impl App {
    /// Build every component from configuration
    pub fn build(config: &AppConfig, dry_run: bool) -> Result<Self> {
        let catalog = Arc::new(providers::build_catalog(config, dry_run)?);
        let selector = Selector::new(Arc::clone(&catalog), config.router.clone())
            .context("Invalid router configuration")?;
        let usage = Arc::new(UsageAggregator::new(&catalog));
        let dispatcher =
            providers::build_dispatcher(config, catalog, Arc::clone(&usage), dry_run)?;

        Ok(Self {
            selector,
            dispatcher,
            usage,
        })
    }
}
