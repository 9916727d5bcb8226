//! Plan catalog handlers
//!
//! Read-only endpoints exposing tiers, their features and prices.

use axum::{extract::Path, Json};
use serde::Serialize;

use crate::domain::entities::{features_of, pricing_of, PlanFeatures, PlanPricing, PlanTier};
use crate::error::AppError;

/// One row of the catalog
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResponse {
    pub tier: PlanTier,
    pub name: &'static str,
    pub features: &'static PlanFeatures,
    pub pricing: PlanPricing,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upgrade_to: Option<PlanTier>,
}

impl From<PlanTier> for PlanResponse {
    fn from(tier: PlanTier) -> Self {
        Self {
            tier,
            name: tier.display_name(),
            features: features_of(tier),
            pricing: pricing_of(tier),
            upgrade_to: tier.upgrade_target(),
        }
    }
}

/// GET /plans
pub async fn list_plans() -> Json<Vec<PlanResponse>> {
    Json(PlanTier::ALL.into_iter().map(PlanResponse::from).collect())
}

/// GET /plans/:tier
pub async fn get_plan(Path(tier): Path<String>) -> Result<Json<PlanResponse>, AppError> {
    let tier: PlanTier = tier.parse()?;
    Ok(Json(PlanResponse::from(tier)))
}
