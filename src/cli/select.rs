//! `select-text` and `select-image` commands

use super::{ImageArgs, TextArgs};
use crate::app::{App, AppConfig};
use anyhow::Result;

/// Run the text selector and print the result
pub fn text(config: &AppConfig, args: &TextArgs, dry_run: bool) -> Result<()> {
    let app = App::build(config, dry_run)?;
    let selection = app.selector.select_text_provider(
        &args.common.tier,
        &args.complexity,
        args.content_type.as_deref(),
        args.common.credits(),
        args.common.provider.as_deref(),
    )?;
    super::print_json(&selection)
}

/// Run the image selector and print the result
pub fn image(config: &AppConfig, args: &ImageArgs, dry_run: bool) -> Result<()> {
    let app = App::build(config, dry_run)?;
    let selection = app.selector.select_image_provider(
        &args.common.tier,
        &args.image_type,
        args.common.credits(),
        args.common.provider.as_deref(),
    )?;
    super::print_json(&selection)
}
