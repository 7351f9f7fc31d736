//! CLI module for BrandForge
//!
//! Operator commands, each printing JSON:
//! - `catalog`: provider list with pricing and availability
//! - `select-text` / `select-image`: run the selector without calling a vendor
//! - `generate`: select, dispatch and report usage

use clap::{Args, Parser, Subcommand};

pub mod catalog;
pub mod generate;
pub mod select;

/// BrandForge content generation routing
#[derive(Parser, Debug)]
#[command(name = "brandforge")]
#[command(about = "Cost-optimized provider routing for brand content generation")]
#[command(version)]
pub struct Cli {
    /// Treat every credential as present and use scripted clients
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the provider catalog
    Catalog,
    /// Select a text provider
    SelectText(TextArgs),
    /// Select an image provider
    SelectImage(ImageArgs),
    /// Select a provider and generate content
    Generate {
        #[command(subcommand)]
        task: GenerateTask,
        /// Print the text cost report to stderr afterwards
        #[arg(long, global = true)]
        report: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum GenerateTask {
    /// Generate copy
    Text {
        #[command(flatten)]
        selection: TextArgs,
        /// Prompt
        #[arg(long)]
        prompt: String,
        /// System instructions
        #[arg(long)]
        system: Option<String>,
        /// Max output tokens
        #[arg(long, default_value_t = 1024)]
        max_tokens: u32,
    },
    /// Generate images
    Image {
        #[command(flatten)]
        selection: ImageArgs,
        /// Prompt
        #[arg(long)]
        prompt: String,
        /// Number of images
        #[arg(long, default_value_t = 1)]
        count: u32,
    },
}

/// Shared selection arguments
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Subscription tier (free, basic, pro, agency)
    #[arg(long, default_value = "free")]
    pub tier: String,
    /// Remaining credits (unlimited when omitted)
    #[arg(long)]
    pub credits: Option<f64>,
    /// Explicit provider (agency tier only)
    #[arg(long)]
    pub provider: Option<String>,
}

/// Text selection arguments
#[derive(Args, Debug, Clone)]
pub struct TextArgs {
    #[command(flatten)]
    pub common: CommonArgs,
    /// Task complexity (simple, standard, complex)
    #[arg(long, default_value = "standard")]
    pub complexity: String,
    /// Content type, carried through for provenance
    #[arg(long)]
    pub content_type: Option<String>,
}

/// Image selection arguments
#[derive(Args, Debug, Clone)]
pub struct ImageArgs {
    #[command(flatten)]
    pub common: CommonArgs,
    /// Image type (hero, product, social, ad, thumbnail, illustration)
    #[arg(long, default_value = "")]
    pub image_type: String,
}

/// Run the CLI command
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = crate::app::load_config()?;
    let dry_run = cli.dry_run;

    match cli.command {
        Some(Commands::Catalog) => catalog::run(&config, dry_run),
        Some(Commands::SelectText(args)) => select::text(&config, &args, dry_run),
        Some(Commands::SelectImage(args)) => select::image(&config, &args, dry_run),
        Some(Commands::Generate { task, report }) => {
            generate::run(&config, task, dry_run, report).await
        }
        None => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            cmd.print_help()?;
            println!();
            Ok(())
        }
    }
}

impl CommonArgs {
    /// Credits, unlimited when not given
    pub fn credits(&self) -> f64 {
        self.credits.unwrap_or(f64::MAX)
    }
}

/// Print a value as pretty JSON on stdout
pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
