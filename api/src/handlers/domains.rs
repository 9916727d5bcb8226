//! Custom domain handlers

use axum::Json;
use serde::{Deserialize, Serialize};

use crate::domain::entities::DomainName;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct ValidateDomainRequest {
    pub domain: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateDomainResponse {
    pub domain: DomainName,
    pub apex: String,
    pub is_subdomain: bool,
}

/// POST /domains/validate
///
/// Normalise a domain name. Invalid names are rejected with 400.
pub async fn validate_domain(
    Json(request): Json<ValidateDomainRequest>,
) -> Result<Json<ValidateDomainResponse>, AppError> {
    let domain = DomainName::parse(&request.domain)?;

    Ok(Json(ValidateDomainResponse {
        apex: domain.apex().to_string(),
        is_subdomain: domain.is_subdomain(),
        domain,
    }))
}
