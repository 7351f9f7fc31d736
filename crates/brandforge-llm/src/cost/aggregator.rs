//! Usage Aggregator - append-only usage log
//!
//! Owned by the composition root and shared with the dispatcher. Appends
//! go through a single write lock; reads fold over a snapshot.

use super::record::{CostSummary, ProviderBreakdown, ProviderPerformance, UsageRecord};
use super::report::CostReport;
use crate::catalog::{Catalog, Modality, ProviderDescriptor};
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

/// Number of records included in a report
const REPORT_RECENT_RECORDS: usize = 20;

/// Usage log and cost reporting
#[derive(Debug)]
pub struct UsageAggregator {
    /// Usage records, append-only
    records: RwLock<Vec<UsageRecord>>,
    /// Record ID counter
    next_id: AtomicU64,
    /// Most expensive catalog entry per modality, the savings baseline
    baselines: HashMap<Modality, ProviderDescriptor>,
}

impl UsageAggregator {
    /// Create an empty log with savings baselines taken from `catalog`
    #[must_use]
    pub fn new(catalog: &Catalog) -> Self {
        let baselines = [Modality::Text, Modality::Image]
            .into_iter()
            .filter_map(|m| catalog.most_expensive(m).map(|p| (m, p.clone())))
            .collect();
        Self {
            records: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
            baselines,
        }
    }

    /// Append one attempt
    pub async fn record(
        &self,
        provider: &ProviderDescriptor,
        units: u64,
        cost: f64,
        success: bool,
        latency: Duration,
    ) -> UsageRecord {
        let record = UsageRecord {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            timestamp: Utc::now(),
            provider: provider.name.clone(),
            modality: provider.modality,
            units,
            cost,
            success,
            latency_seconds: latency.as_secs_f64(),
        };

        self.records.write().await.push(record.clone());
        record
    }

    /// Snapshot of all records in append order
    pub async fn records(&self) -> Vec<UsageRecord> {
        self.records.read().await.clone()
    }

    /// Number of records
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether nothing was recorded yet
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Aggregate cost summary
    pub async fn get_cost_summary(&self) -> CostSummary {
        let records = self.records.read().await;
        summarize(&records, &self.baselines)
    }

    /// Reliability per provider, sorted by name
    pub async fn provider_performance(&self) -> Vec<ProviderPerformance> {
        let records = self.records.read().await;
        performance(&records)
    }

    /// Full report: summary, performance and the latest records
    pub async fn generate_report(&self) -> CostReport {
        let records = self.records.read().await;
        let summary = summarize(&records, &self.baselines);
        let performance = performance(&records);

        let most_used_provider = summary
            .provider_breakdown
            .values()
            .max_by_key(|b| b.requests)
            .map(|b| b.provider.clone());
        let most_expensive_provider = summary
            .provider_breakdown
            .values()
            .filter(|b| b.cost > 0.0)
            .max_by(|a, b| a.cost.total_cmp(&b.cost))
            .map(|b| b.provider.clone());

        let start = records.len().saturating_sub(REPORT_RECENT_RECORDS);

        CostReport {
            generated_at: Utc::now(),
            summary,
            performance,
            recent_records: records[start..].to_vec(),
            most_used_provider,
            most_expensive_provider,
        }
    }

    /// Format report as text
    #[must_use]
    pub fn format_report(report: &CostReport) -> String {
        super::report::format_report(report)
    }
}

fn summarize(records: &[UsageRecord], baselines: &HashMap<Modality, ProviderDescriptor>) -> CostSummary {
    let mut summary = CostSummary::default();

    for record in records {
        summary.total_requests += 1;

        let breakdown = summary
            .provider_breakdown
            .entry(record.provider.clone())
            .or_insert_with(|| ProviderBreakdown {
                provider: record.provider.clone(),
                ..Default::default()
            });
        breakdown.requests += 1;

        if !record.success {
            summary.failed_requests += 1;
            continue;
        }

        breakdown.successes += 1;
        breakdown.units += record.units;
        breakdown.cost += record.cost;

        summary.successful_requests += 1;
        summary.total_units += record.units;
        summary.total_cost += record.cost;
        summary.baseline_cost += baselines
            .get(&record.modality)
            .map(|premium| premium.cost_for(record.units))
            .unwrap_or(record.cost);
    }

    summary.total_savings = summary.baseline_cost - summary.total_cost;
    if summary.baseline_cost > 0.0 {
        summary.savings_percentage = summary.total_savings / summary.baseline_cost * 100.0;
    }

    summary
}

fn performance(records: &[UsageRecord]) -> Vec<ProviderPerformance> {
    let mut by_provider: BTreeMap<&str, (ProviderPerformance, f64)> = BTreeMap::new();

    for record in records {
        let (perf, total_latency) = by_provider
            .entry(record.provider.as_str())
            .or_insert_with(|| {
                (
                    ProviderPerformance {
                        provider: record.provider.clone(),
                        ..Default::default()
                    },
                    0.0,
                )
            });
        perf.requests += 1;
        if record.success {
            perf.successes += 1;
        } else {
            perf.failures += 1;
        }
        *total_latency += record.latency_seconds;
    }

    by_provider
        .into_values()
        .map(|(mut perf, total_latency)| {
            perf.success_rate = perf.successes as f64 / perf.requests as f64;
            perf.avg_latency_seconds = total_latency / perf.requests as f64;
            perf
        })
        .collect()
}
