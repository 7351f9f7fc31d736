//! `generate` command

use super::GenerateTask;
use crate::app::{App, AppConfig};
use anyhow::Result;
use brandforge_llm::{CostSummary, ExecutionResult, GenerationRequest, UsageAggregator};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Serialize)]
struct GenerateOutput {
    result: ExecutionResult,
    usage: CostSummary,
}

/// Select a provider, dispatch the request and print result plus usage.
///
/// Ctrl-C cancels the in-flight vendor call.
pub async fn run(config: &AppConfig, task: GenerateTask, dry_run: bool, report: bool) -> Result<()> {
    let app = App::build(config, dry_run)?;

    let (selection, request) = match task {
        GenerateTask::Text {
            selection: args,
            prompt,
            system,
            max_tokens,
        } => {
            let selection = app.selector.select_text_provider(
                &args.common.tier,
                &args.complexity,
                args.content_type.as_deref(),
                args.common.credits(),
                args.common.provider.as_deref(),
            )?;
            let mut request = GenerationRequest::new(prompt, max_tokens);
            if let Some(system) = system {
                request = request.with_system(system);
            }
            (selection, request)
        }
        GenerateTask::Image {
            selection: args,
            prompt,
            count,
        } => {
            let selection = app.selector.select_image_provider(
                &args.common.tier,
                &args.image_type,
                args.common.credits(),
                args.common.provider.as_deref(),
            )?;
            (selection, GenerationRequest::new(prompt, count))
        }
    };

    info!(provider = %selection.provider, unit_cost = selection.unit_cost, "Provider selected");

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let result = app
        .dispatcher
        .execute_with_cancel(&selection, &request, &cancel)
        .await;
    cancel.cancel();
    let result = result?;

    if report {
        let report = app.usage.generate_report().await;
        eprintln!("{}", UsageAggregator::format_report(&report));
    }

    super::print_json(&GenerateOutput {
        result,
        usage: app.usage.get_cost_summary().await,
    })
}
