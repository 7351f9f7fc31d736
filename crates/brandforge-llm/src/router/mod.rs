//! Router - cost-optimized provider selection
//!
//! Picks a text or image provider from subscription tier, task complexity or
//! image type, remaining credits and an optional agency override.
//!
//! ## Decision order
//!
//! 1. Routing table lookup (unknown keys fall back to defaults)
//! 2. Agency explicit override
//! 3. Low-credit downgrade, which attaches a warning
//! 4. Otherwise, an upgrade suggestion when the next tier routes higher quality
//!
//! # Module Structure
//!
//! - `types`: tiers, task keys, SelectionContext, SelectionResult
//! - `rules`: RoutingTable and ImageRoutingTable
//! - `config`: SelectorConfig (thresholds + tables)
//! - `selector`: Selector implementation

mod config;
mod rules;
mod selector;
mod types;


pub use config::{
    SelectorConfig, DEFAULT_LOW_CREDIT_THRESHOLD_IMAGE, DEFAULT_LOW_CREDIT_THRESHOLD_TEXT,
};
pub use rules::{ImageRoutes, ImageRoutingTable, RoutingTable};
pub use selector::Selector;
pub use types::{
    ImageType, LowCreditWarning, SelectionContext, SelectionResult, SubscriptionTier,
    SuggestionReason, TaskComplexity, TaskDetail, TaskKind, UpgradeSuggestion, WarningReason,
};
