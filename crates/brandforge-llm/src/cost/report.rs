//! Cost Reporting
//!
//! This module contains the cost report and its text rendering.

use super::record::{CostSummary, ProviderPerformance, UsageRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Cost report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostReport {
    /// When report was generated
    pub generated_at: DateTime<Utc>,
    /// Aggregate cost summary
    pub summary: CostSummary,
    /// Reliability per provider
    pub performance: Vec<ProviderPerformance>,
    /// Recent records
    pub recent_records: Vec<UsageRecord>,
    /// Provider with the most attempts
    pub most_used_provider: Option<String>,
    /// Provider with the highest spend
    pub most_expensive_provider: Option<String>,
}

/// Format report as text
#[must_use]
pub fn format_report(report: &CostReport) -> String {
    let summary = &report.summary;
    let mut output = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(output, "Generation Cost Report\n");
    let _ = writeln!(
        output,
        "Generated: {}",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    let _ = writeln!(output, "\nSummary:");
    let _ = writeln!(
        output,
        "- Total Requests: {} ({} success, {} failed)",
        summary.total_requests, summary.successful_requests, summary.failed_requests
    );
    let _ = writeln!(output, "- Total Units: {}", summary.total_units);
    let _ = writeln!(output, "- Total Cost: ${:.4}", summary.total_cost);
    let _ = writeln!(output, "- Premium Baseline: ${:.4}", summary.baseline_cost);
    let _ = writeln!(
        output,
        "- Savings: ${:.4} ({:.1}%)",
        summary.total_savings, summary.savings_percentage
    );

    if let Some(provider) = &report.most_used_provider {
        let _ = writeln!(output, "- Most Used Provider: {provider}");
    }
    if let Some(provider) = &report.most_expensive_provider {
        let _ = writeln!(output, "- Most Expensive Provider: {provider}");
    }

    if !summary.provider_breakdown.is_empty() {
        let _ = writeln!(output, "\nBy Provider:");
        for (provider, breakdown) in &summary.provider_breakdown {
            let _ = writeln!(
                output,
                "- {}: {} requests, {} units, ${:.4}",
                provider, breakdown.requests, breakdown.units, breakdown.cost
            );
        }
    }

    if !report.performance.is_empty() {
        let _ = writeln!(output, "\nReliability:");
        for perf in &report.performance {
            let _ = writeln!(
                output,
                "- {}: {:.0}% success, avg {:.0}ms",
                perf.provider,
                perf.success_rate * 100.0,
                perf.avg_latency_seconds * 1000.0
            );
        }
    }

    output
}
