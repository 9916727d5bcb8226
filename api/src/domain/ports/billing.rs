//! Billing provider port trait
//!
//! The dashboard only ever learns a tier from billing. Checkout and payment
//! methods live entirely on the provider's side.

use async_trait::async_trait;

use crate::domain::entities::PlanTier;
use crate::error::BackendError;

/// Port trait for the billing/backing API
#[async_trait]
pub trait BillingProvider: Send + Sync {
    /// Attach the signed-in user to subsequent calls
    fn begin_session(&self, user_id: &str);

    /// Drop the signed-in user
    fn end_session(&self);

    /// Tier the current session's workspace is billed on
    async fn fetch_plan(&self) -> Result<PlanTier, BackendError>;
}
