//! Usage Records and Statistics
//!
//! This module contains the append-only usage record and the aggregate
//! views computed from it.

use crate::catalog::Modality;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single vendor call attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    /// Record ID, unique per aggregator
    pub id: u64,
    /// Timestamp
    pub timestamp: DateTime<Utc>,
    /// Provider name
    pub provider: String,
    /// Provider modality
    pub modality: Modality,
    /// Tokens (text) or images (image); zero for failed attempts
    pub units: u64,
    /// Cost in USD; zero for failed attempts
    pub cost: f64,
    /// Was the call successful?
    pub success: bool,
    /// Wall-clock latency in seconds
    pub latency_seconds: f64,
}

/// Per-provider totals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderBreakdown {
    /// Provider name
    pub provider: String,
    /// Attempts
    pub requests: u64,
    /// Successful attempts
    pub successes: u64,
    /// Units billed
    pub units: u64,
    /// Cost in USD
    pub cost: f64,
}

/// Per-provider reliability view
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderPerformance {
    /// Provider name
    pub provider: String,
    /// Attempts
    pub requests: u64,
    /// Successful attempts
    pub successes: u64,
    /// Failed attempts
    pub failures: u64,
    /// `successes / requests`
    pub success_rate: f64,
    /// Average latency over all attempts
    pub avg_latency_seconds: f64,
}

/// Cost summary over the whole usage log
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostSummary {
    /// Total attempts
    pub total_requests: u64,
    /// Successful attempts
    pub successful_requests: u64,
    /// Failed attempts
    pub failed_requests: u64,
    /// Units billed
    pub total_units: u64,
    /// Sum of `cost` over successful records
    pub total_cost: f64,
    /// What the same units would cost on the most expensive provider of each modality
    pub baseline_cost: f64,
    /// `baseline_cost - total_cost`
    pub total_savings: f64,
    /// Savings as a percentage of the baseline
    pub savings_percentage: f64,
    /// Totals per provider
    pub provider_breakdown: BTreeMap<String, ProviderBreakdown>,
}
