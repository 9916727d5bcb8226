//! Entitlement handlers
//!
//! Quota checks the frontend runs before creating projects or attaching
//! custom domains.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use super::blocking;
use crate::app::{check_count_by_key, LimitDecision, LimitGate};
use crate::domain::entities::{DomainName, PlanTier};
use crate::error::AppError;
use crate::AppState;

/// Request body for a raw limit check
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckRequest {
    pub plan: String,
    /// Feature key as it appears in the catalog, e.g. `maxProjects`
    pub feature: String,
    #[serde(default)]
    pub current_count: i64,
}

/// Request body for gating a create action
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GateRequest {
    /// Defaults to the signed-in user's plan
    #[serde(default)]
    pub plan: Option<String>,
    #[serde(default)]
    pub current_count: i64,
}

/// Request body for gating a new custom domain
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainGateRequest {
    #[serde(default)]
    pub plan: Option<String>,
    #[serde(default)]
    pub current_count: i64,
    /// Domain about to be attached; validated before the quota check
    #[serde(default)]
    pub domain: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GateResponse {
    pub plan: PlanTier,
    #[serde(flatten)]
    pub gate: LimitGate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<DomainName>,
}

fn parse_plan(raw: &str) -> Result<PlanTier, AppError> {
    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("Unknown plan '{}'", raw)))
}

/// Explicit plan from the request, else the cached profile's tier
async fn resolve_plan(state: &AppState, raw: Option<&str>) -> Result<PlanTier, AppError> {
    match raw {
        Some(raw) => parse_plan(raw),
        None => {
            let store = state.store.clone();
            blocking(move || Ok(store.plan())).await
        }
    }
}

/// POST /entitlements/check
pub async fn check_limit(Json(request): Json<CheckRequest>) -> Result<Json<LimitDecision>, AppError> {
    let plan = parse_plan(&request.plan)?;
    let decision = check_count_by_key(plan, &request.feature, request.current_count)?;
    Ok(Json(decision))
}

/// POST /entitlements/projects
pub async fn gate_project(
    State(state): State<AppState>,
    Json(request): Json<GateRequest>,
) -> Result<Json<GateResponse>, AppError> {
    let plan = resolve_plan(&state, request.plan.as_deref()).await?;
    let gate = state.presenter.present_project_limit(plan, request.current_count);

    Ok(Json(GateResponse {
        plan,
        gate,
        domain: None,
    }))
}

/// POST /entitlements/domains
pub async fn gate_domain(
    State(state): State<AppState>,
    Json(request): Json<DomainGateRequest>,
) -> Result<Json<GateResponse>, AppError> {
    let domain = request
        .domain
        .as_deref()
        .map(DomainName::parse)
        .transpose()?;
    let plan = resolve_plan(&state, request.plan.as_deref()).await?;
    let gate = state.presenter.present_domain_limit(plan, request.current_count);

    Ok(Json(GateResponse { plan, gate, domain }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_check_request() {
        let json = r#"{"plan": "pro", "feature": "maxProjects", "currentCount": 4}"#;
        let request: CheckRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.plan, "pro");
        assert_eq!(request.feature, "maxProjects");
        assert_eq!(request.current_count, 4);
    }

    #[test]
    fn parse_gate_request_defaults() {
        let request: GateRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.plan, None);
        assert_eq!(request.current_count, 0);
    }

    #[test]
    fn parse_plan_rejects_unknown() {
        assert_eq!(parse_plan("Pro").unwrap(), PlanTier::Pro);
        assert!(matches!(parse_plan("gold"), Err(AppError::BadRequest(_))));
    }
}
