//! `catalog` command

use crate::app::{App, AppConfig};
use anyhow::Result;

/// Print every catalog provider with pricing and availability
pub fn run(config: &AppConfig, dry_run: bool) -> Result<()> {
    let app = App::build(config, dry_run)?;
    super::print_json(&app.selector.catalog().providers())
}
