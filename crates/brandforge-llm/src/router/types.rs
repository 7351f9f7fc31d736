//! Core types for provider selection
//!
//! Subscription tiers, task classification keys, and the selection
//! context/result pair exchanged with the application layer.

use crate::catalog::Modality;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Subscription Tier
// ============================================================================

/// Subscription level, ordered from cheapest plan to most expensive
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionTier {
    /// Free plan
    Free,
    /// Entry paid plan
    Basic,
    /// Professional plan
    Pro,
    /// Agency plan; may pick providers explicitly
    Agency,
}

impl SubscriptionTier {
    /// All tiers in ascending order
    pub const ALL: [SubscriptionTier; 4] = [Self::Free, Self::Basic, Self::Pro, Self::Agency];

    /// Parse a tier name; anything unrecognised is treated as `Free`
    #[must_use]
    pub fn parse_lossy(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "basic" => Self::Basic,
            "pro" => Self::Pro,
            "agency" => Self::Agency,
            _ => Self::Free,
        }
    }

    /// Next tier up, `None` for `Agency`
    #[must_use]
    pub fn successor(&self) -> Option<Self> {
        match self {
            Self::Free => Some(Self::Basic),
            Self::Basic => Some(Self::Pro),
            Self::Pro => Some(Self::Agency),
            Self::Agency => None,
        }
    }

    /// Lowercase name
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Basic => "basic",
            Self::Pro => "pro",
            Self::Agency => "agency",
        }
    }
}

impl fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Task classification
// ============================================================================

/// Complexity of a text generation task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskComplexity {
    /// Subject lines, short ad copy
    Simple,
    /// Emails, social posts
    Standard,
    /// Landing pages, long-form campaigns
    Complex,
}

impl TaskComplexity {
    /// All complexities
    pub const ALL: [TaskComplexity; 3] = [Self::Simple, Self::Standard, Self::Complex];

    /// Parse a complexity name; anything unrecognised is treated as `Standard`
    #[must_use]
    pub fn parse_lossy(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "simple" => Self::Simple,
            "complex" => Self::Complex,
            _ => Self::Standard,
        }
    }

    /// Lowercase name
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Standard => "standard",
            Self::Complex => "complex",
        }
    }
}

impl fmt::Display for TaskComplexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of marketing image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageType {
    /// Landing page hero banner
    Hero,
    /// Product shot
    Product,
    /// Social media post
    Social,
    /// Display ad creative
    Ad,
    /// Video or article thumbnail
    Thumbnail,
    /// Illustration or background art
    Illustration,
}

impl ImageType {
    /// Parse an image type; `None` means "use the tier's `all` bucket"
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "hero" => Some(Self::Hero),
            "product" => Some(Self::Product),
            "social" => Some(Self::Social),
            "ad" => Some(Self::Ad),
            "thumbnail" => Some(Self::Thumbnail),
            "illustration" => Some(Self::Illustration),
            _ => None,
        }
    }
}

/// What is being generated, with the routing key for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskKind {
    /// Text generation
    Text {
        /// Routing key
        complexity: TaskComplexity,
        /// Caller's content label (email, ad_copy, ...), carried for provenance
        content_type: Option<String>,
    },
    /// Image generation
    Image {
        /// Routing key, `None` routes to the tier's `all` bucket
        image_type: Option<ImageType>,
    },
}

impl TaskKind {
    /// Modality this task needs
    #[must_use]
    pub fn modality(&self) -> Modality {
        match self {
            Self::Text { .. } => Modality::Text,
            Self::Image { .. } => Modality::Image,
        }
    }
}

// ============================================================================
// Selection context
// ============================================================================

/// Per-request selection input, never persisted
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionContext {
    /// Caller's subscription tier
    pub tier: SubscriptionTier,
    /// Task and its routing key
    pub task: TaskKind,
    /// Remaining credits from the billing service
    pub credits_remaining: f64,
    /// Provider override, honoured for `Agency` only
    pub explicit_provider: Option<String>,
}

impl SelectionContext {
    /// Context for a text task with no credit pressure and no override
    #[must_use]
    pub fn text(tier: SubscriptionTier, complexity: TaskComplexity) -> Self {
        Self {
            tier,
            task: TaskKind::Text {
                complexity,
                content_type: None,
            },
            credits_remaining: f64::MAX,
            explicit_provider: None,
        }
    }

    /// Context for an image task with no credit pressure and no override
    #[must_use]
    pub fn image(tier: SubscriptionTier, image_type: Option<ImageType>) -> Self {
        Self {
            tier,
            task: TaskKind::Image { image_type },
            credits_remaining: f64::MAX,
            explicit_provider: None,
        }
    }

    /// Set remaining credits; negative or NaN values count as zero
    #[must_use]
    pub fn with_credits(mut self, credits_remaining: f64) -> Self {
        self.credits_remaining = if credits_remaining.is_nan() {
            0.0
        } else {
            credits_remaining.max(0.0)
        };
        self
    }

    /// Set the explicit provider override
    #[must_use]
    pub fn with_explicit_provider(mut self, provider: impl Into<String>) -> Self {
        self.explicit_provider = Some(provider.into());
        self
    }

    /// Set the content type label (text tasks only)
    #[must_use]
    pub fn with_content_type(mut self, value: impl Into<String>) -> Self {
        if let TaskKind::Text { content_type, .. } = &mut self.task {
            *content_type = Some(value.into());
        }
        self
    }
}

// ============================================================================
// Selection result
// ============================================================================

/// Why a warning was attached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WarningReason {
    /// Credits below the modality threshold forced a cheaper provider
    LowCredits,
}

/// Why a suggestion was attached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SuggestionReason {
    /// The next tier routes this task to a better provider
    UpgradeAvailable,
}

/// Credit exhaustion forced a downgrade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LowCreditWarning {
    /// Always `LOW_CREDITS`
    pub reason: WarningReason,
    /// Provider before the downgrade
    pub original_provider: String,
    /// Provider after the downgrade (may equal the original if nothing is cheaper)
    pub downgraded_provider: String,
    /// Quality lost, `original - downgraded`
    pub quality_delta: i16,
    /// Credits at decision time
    pub credits_remaining: f64,
    /// Threshold that triggered the downgrade
    pub threshold: f64,
    /// Human-readable summary
    pub message: String,
}

/// Upgrading the plan would unlock a better provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeSuggestion {
    /// Always `UPGRADE_AVAILABLE`
    pub reason: SuggestionReason,
    /// Caller's tier
    pub current_tier: SubscriptionTier,
    /// Next tier up
    pub recommended_tier: SubscriptionTier,
    /// Provider chosen now
    pub current_provider: String,
    /// Provider the next tier would use
    pub upgrade_provider: String,
    /// Quality gained, `upgrade - current`
    pub quality_delta: i16,
    /// Human-readable summary
    pub message: String,
}

/// Modality-specific part of a selection result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskDetail {
    /// Text selection
    Text {
        /// Complexity used for routing
        complexity: TaskComplexity,
        /// Caller's content label
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content_type: Option<String>,
        /// Input price of the chosen provider
        input_cost_per_1m: f64,
        /// Output price of the chosen provider
        output_cost_per_1m: f64,
    },
    /// Image selection
    Image {
        /// Image type used for routing (`null` means the `all` bucket)
        image_type: Option<ImageType>,
        /// Per-image price of the chosen provider
        cost_per_image: f64,
    },
}

/// Outcome of provider selection, returned to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionResult {
    /// Chosen provider name
    pub provider: String,
    /// Modality of the chosen provider
    pub modality: Modality,
    /// Quality copied from the descriptor
    pub quality: u8,
    /// Unit cost copied from the descriptor
    pub unit_cost: f64,
    /// Caller's tier after normalisation
    pub tier: SubscriptionTier,
    /// Modality-specific detail
    #[serde(flatten)]
    pub detail: TaskDetail,
    /// Low-credit downgrade warning
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<LowCreditWarning>,
    /// Tier upgrade suggestion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<UpgradeSuggestion>,
}
