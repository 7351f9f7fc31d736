//! Provider selector
//!
//! Pure decision logic from a [`SelectionContext`] to a [`SelectionResult`].
//! No I/O and no interior mutability: identical inputs give identical outputs.

use super::config::SelectorConfig;
use super::types::{
    ImageType, LowCreditWarning, SelectionContext, SelectionResult, SubscriptionTier,
    SuggestionReason, TaskComplexity, TaskDetail, TaskKind, UpgradeSuggestion, WarningReason,
};
use crate::catalog::{Catalog, Modality, ProviderDescriptor};
use crate::error::Result;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Cost-aware provider selector
#[derive(Debug, Clone)]
pub struct Selector {
    catalog: Arc<Catalog>,
    config: SelectorConfig,
}

impl Selector {
    /// Create a selector, validating the config against the catalog
    pub fn new(catalog: Arc<Catalog>, config: SelectorConfig) -> Result<Self> {
        config.validate(&catalog)?;
        Ok(Self { catalog, config })
    }

    /// Catalog backing this selector
    #[must_use]
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Selector configuration
    #[must_use]
    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    /// Select a text provider from raw request fields.
    ///
    /// Unknown tier strings become `free`, unknown complexities become
    /// `standard`.
    pub fn select_text_provider(
        &self,
        tier: &str,
        complexity: &str,
        content_type: Option<&str>,
        credits_remaining: f64,
        user_preference: Option<&str>,
    ) -> Result<SelectionResult> {
        let mut ctx = SelectionContext::text(
            SubscriptionTier::parse_lossy(tier),
            TaskComplexity::parse_lossy(complexity),
        )
        .with_credits(credits_remaining);
        if let Some(content_type) = content_type {
            ctx = ctx.with_content_type(content_type);
        }
        if let Some(provider) = user_preference {
            ctx = ctx.with_explicit_provider(provider);
        }
        self.select(&ctx)
    }

    /// Select an image provider from raw request fields.
    ///
    /// Unknown image types route to the tier's `all` bucket.
    pub fn select_image_provider(
        &self,
        tier: &str,
        image_type: &str,
        credits_remaining: f64,
        user_preference: Option<&str>,
    ) -> Result<SelectionResult> {
        let mut ctx = SelectionContext::image(
            SubscriptionTier::parse_lossy(tier),
            ImageType::parse(image_type),
        )
        .with_credits(credits_remaining);
        if let Some(provider) = user_preference {
            ctx = ctx.with_explicit_provider(provider);
        }
        self.select(&ctx)
    }

    /// Select a provider for a typed context
    #[instrument(skip(self, ctx), fields(tier = %ctx.tier, modality = %ctx.task.modality()))]
    pub fn select(&self, ctx: &SelectionContext) -> Result<SelectionResult> {
        let modality = ctx.task.modality();

        let routed = self.route(ctx.tier, &ctx.task);
        let base = match self.explicit_override(ctx) {
            Some(explicit) => explicit,
            None => self.routable(routed, modality)?,
        };

        let (resolved, warning) = if self.is_low_credit(ctx) {
            let target = self.downgrade_target(base)?;
            let warning = low_credit_warning(base, target, ctx, self.config.threshold(modality));
            info!(
                original = %base.name,
                downgraded = %target.name,
                credits = ctx.credits_remaining,
                "Low credits, downgrading provider"
            );
            (target, Some(warning))
        } else {
            (base, None)
        };

        let suggestion = match warning {
            Some(_) => None,
            None => self.upgrade_suggestion(ctx, resolved)?,
        };

        debug!(
            provider = %resolved.name,
            quality = resolved.quality,
            unit_cost = resolved.unit_cost,
            "Selected provider"
        );

        Ok(SelectionResult {
            provider: resolved.name.clone(),
            modality,
            quality: resolved.quality,
            unit_cost: resolved.unit_cost,
            tier: ctx.tier,
            detail: task_detail(&ctx.task, resolved),
            warning,
            suggestion,
        })
    }

    /// Routing table entry for a tier and task
    fn route(&self, tier: SubscriptionTier, task: &TaskKind) -> Option<&str> {
        match task {
            TaskKind::Text { complexity, .. } => self.config.text_routes.resolve(tier, *complexity),
            TaskKind::Image { image_type } => self.config.image_routes.resolve(tier, *image_type),
        }
    }

    /// The routed provider if it can serve, else the cheapest available one
    fn routable(&self, routed: Option<&str>, modality: Modality) -> Result<&ProviderDescriptor> {
        if let Some(name) = routed {
            if let Ok(provider) = self.catalog.get(name) {
                if provider.credential_present && provider.modality == modality {
                    return Ok(provider);
                }
            }
            debug!(provider = name, "Routed provider unavailable, using cheapest");
        }
        self.catalog.cheapest_available(modality, &[])
    }

    /// Agency override, ignored when the provider cannot serve the request
    fn explicit_override(&self, ctx: &SelectionContext) -> Option<&ProviderDescriptor> {
        if ctx.tier != SubscriptionTier::Agency {
            return None;
        }
        let name = ctx.explicit_provider.as_deref()?;
        match self.catalog.get(name) {
            Ok(p) if p.credential_present && p.modality == ctx.task.modality() => Some(p),
            _ => {
                debug!(provider = name, "Ignoring explicit provider");
                None
            }
        }
    }

    fn is_low_credit(&self, ctx: &SelectionContext) -> bool {
        ctx.tier != SubscriptionTier::Free
            && ctx.credits_remaining < self.config.threshold(ctx.task.modality())
    }

    /// Text steps down one price level; image drops to the cheapest provider
    fn downgrade_target<'a>(&'a self, base: &'a ProviderDescriptor) -> Result<&'a ProviderDescriptor> {
        match base.modality {
            Modality::Text => Ok(self.catalog.next_cheaper_available(base).unwrap_or(base)),
            Modality::Image => {
                let cheapest = self.catalog.cheapest_available(Modality::Image, &[])?;
                if cheapest.unit_cost < base.unit_cost {
                    Ok(cheapest)
                } else {
                    Ok(base)
                }
            }
        }
    }

    fn upgrade_suggestion(
        &self,
        ctx: &SelectionContext,
        resolved: &ProviderDescriptor,
    ) -> Result<Option<UpgradeSuggestion>> {
        let Some(next_tier) = ctx.tier.successor() else {
            return Ok(None);
        };
        let upgrade = self.routable(self.route(next_tier, &ctx.task), resolved.modality)?;
        if upgrade.quality <= resolved.quality {
            return Ok(None);
        }

        let quality_delta = i16::from(upgrade.quality) - i16::from(resolved.quality);
        Ok(Some(UpgradeSuggestion {
            reason: SuggestionReason::UpgradeAvailable,
            current_tier: ctx.tier,
            recommended_tier: next_tier,
            current_provider: resolved.name.clone(),
            upgrade_provider: upgrade.name.clone(),
            quality_delta,
            message: format!(
                "Upgrade to {next_tier} to use {} (+{quality_delta} quality)",
                upgrade.name
            ),
        }))
    }
}

fn low_credit_warning(
    original: &ProviderDescriptor,
    target: &ProviderDescriptor,
    ctx: &SelectionContext,
    threshold: f64,
) -> LowCreditWarning {
    let message = if original.name == target.name {
        format!(
            "Low credits ({:.0} remaining), {} is already the cheapest option",
            ctx.credits_remaining, original.name
        )
    } else {
        format!(
            "Low credits ({:.0} remaining), switched from {} to {}",
            ctx.credits_remaining, original.name, target.name
        )
    };
    LowCreditWarning {
        reason: WarningReason::LowCredits,
        original_provider: original.name.clone(),
        downgraded_provider: target.name.clone(),
        quality_delta: i16::from(original.quality) - i16::from(target.quality),
        credits_remaining: ctx.credits_remaining,
        threshold,
        message,
    }
}

fn task_detail(task: &TaskKind, provider: &ProviderDescriptor) -> TaskDetail {
    match task {
        TaskKind::Text {
            complexity,
            content_type,
        } => TaskDetail::Text {
            complexity: *complexity,
            content_type: content_type.clone(),
            input_cost_per_1m: provider.input_cost_per_1m().unwrap_or_default(),
            output_cost_per_1m: provider.output_cost_per_1m().unwrap_or_default(),
        },
        TaskKind::Image { image_type } => TaskDetail::Image {
            image_type: *image_type,
            cost_per_image: provider.unit_cost,
        },
    }
}
