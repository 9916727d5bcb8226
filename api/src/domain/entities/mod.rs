//! Domain entities
//!
//! Pure domain models representing core business concepts.

pub mod custom_domain;
pub mod plan;
pub mod user_profile;

pub use custom_domain::DomainName;
pub use plan::{
    features_of, pricing_of, Allowance, CountedFeature, FeatureKey, FeatureValue, FlagFeature,
    Limit, PlanFeatures, PlanPricing, PlanTier,
};
pub use user_profile::{ProfilePatch, UserProfile};
