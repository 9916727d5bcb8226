//! Entitlement checks
//!
//! Pure comparisons between a tier's configured limits and a usage count.

use serde::Serialize;

use crate::domain::entities::{
    features_of, Allowance, CountedFeature, FeatureKey, FlagFeature, Limit, PlanTier,
};
use crate::error::CatalogError;

/// Outcome of comparing a usage count against a plan limit.
///
/// `limit` and `remaining` are either both `Unlimited` or both `Bounded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitDecision {
    pub can_create: bool,
    pub limit: Limit,
    pub remaining: Limit,
    /// False when the tier does not include the feature at all
    pub enabled: bool,
}

impl LimitDecision {
    fn disabled() -> Self {
        Self {
            can_create: false,
            limit: Limit::Bounded(0),
            remaining: Limit::Bounded(0),
            enabled: false,
        }
    }

    fn unlimited() -> Self {
        Self {
            can_create: true,
            limit: Limit::Unlimited,
            remaining: Limit::Unlimited,
            enabled: true,
        }
    }

    fn bounded(limit: u32, current: u64) -> Self {
        let limit_wide = u64::from(limit);
        let remaining = limit_wide.saturating_sub(current);
        Self {
            can_create: current < limit_wide,
            limit: Limit::Bounded(limit),
            remaining: Limit::Bounded(u32::try_from(remaining).unwrap_or(limit)),
            enabled: true,
        }
    }

    /// Concrete remaining quota, `None` when unlimited
    pub fn remaining_bound(&self) -> Option<u32> {
        self.remaining.bound()
    }
}

/// Check a usage count against a counted feature. Never fails; negative
/// counts are treated as zero.
pub fn check_count(tier: PlanTier, feature: CountedFeature, current: i64) -> LimitDecision {
    let current = current.max(0) as u64;
    let decision = match features_of(tier).allowance(feature) {
        Allowance::Disabled => LimitDecision::disabled(),
        Allowance::Enabled(Limit::Unlimited) => LimitDecision::unlimited(),
        Allowance::Enabled(Limit::Bounded(limit)) => LimitDecision::bounded(limit, current),
    };
    tracing::debug!(
        %tier,
        feature = %feature.key(),
        current,
        can_create = decision.can_create,
        "Checked count limit"
    );
    decision
}

/// Whether a boolean feature is on for a tier
pub fn check_flag(tier: PlanTier, feature: FlagFeature) -> bool {
    features_of(tier).flag(feature)
}

/// String-keyed `check_count` for callers holding wire names
pub fn check_count_by_key(
    tier: PlanTier,
    key: &str,
    current: i64,
) -> Result<LimitDecision, CatalogError> {
    let key: FeatureKey = key.parse()?;
    if let Some(counted) = key.counted() {
        return Ok(check_count(tier, counted, current));
    }
    // A flag used as a count: off means disabled, on means nothing to count
    match key.flag() {
        Some(flag) if !check_flag(tier, flag) => Ok(LimitDecision::disabled()),
        Some(_) => Ok(LimitDecision::unlimited()),
        None => Err(CatalogError::NotCountable(key.to_string())),
    }
}

/// String-keyed `check_flag`
pub fn check_flag_by_key(tier: PlanTier, key: &str) -> Result<bool, CatalogError> {
    let key: FeatureKey = key.parse()?;
    key.flag()
        .map(|flag| check_flag(tier, flag))
        .ok_or_else(|| CatalogError::NotAFlag(key.to_string()))
}

pub fn check_project_limit(tier: PlanTier, current: i64) -> LimitDecision {
    check_count(tier, CountedFeature::Projects, current)
}

pub fn check_domain_limit(tier: PlanTier, current: i64) -> LimitDecision {
    check_count(tier, CountedFeature::CustomDomains, current)
}
