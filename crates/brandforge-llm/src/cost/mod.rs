//! Cost Tracking - usage log and savings reporting
//!
//! Every vendor attempt made by the dispatcher lands here. Summaries
//! compare actual spend with what the most expensive provider of each
//! modality would have charged for the same units.
//!
//! # Module Structure
//!
//! - `record`: usage records and aggregate types
//! - `aggregator`: UsageAggregator implementation
//! - `report`: cost reports and text formatting

mod aggregator;
mod record;
mod report;


pub use aggregator::UsageAggregator;
pub use record::{CostSummary, ProviderBreakdown, ProviderPerformance, UsageRecord};
pub use report::{format_report, CostReport};
