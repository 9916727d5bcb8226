//! Plan catalog
//!
//! Static mapping from plan tier to feature limits and prices.

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Subscription tier a workspace is billed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    #[default]
    Free,
    Pro,
    Enterprise,
}

impl PlanTier {
    /// All tiers, cheapest first
    pub const ALL: [PlanTier; 3] = [PlanTier::Free, PlanTier::Pro, PlanTier::Enterprise];

    /// Human-readable tier name used in notifications
    pub fn display_name(&self) -> &'static str {
        match self {
            PlanTier::Free => "Free",
            PlanTier::Pro => "Pro",
            PlanTier::Enterprise => "Enterprise",
        }
    }

    /// The tier a user on this plan would upgrade to, if any
    pub fn upgrade_target(&self) -> Option<PlanTier> {
        match self {
            PlanTier::Free => Some(PlanTier::Pro),
            PlanTier::Pro => Some(PlanTier::Enterprise),
            PlanTier::Enterprise => None,
        }
    }
}

impl std::fmt::Display for PlanTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanTier::Free => write!(f, "free"),
            PlanTier::Pro => write!(f, "pro"),
            PlanTier::Enterprise => write!(f, "enterprise"),
        }
    }
}

impl std::str::FromStr for PlanTier {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "free" => Ok(PlanTier::Free),
            "pro" => Ok(PlanTier::Pro),
            "enterprise" => Ok(PlanTier::Enterprise),
            _ => Err(CatalogError::UnknownTier(s.to_string())),
        }
    }
}

/// A numeric quota. On the wire `-1` stands for `Unlimited`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum Limit {
    Unlimited,
    Bounded(u32),
}

impl Limit {
    pub const UNLIMITED_WIRE: i64 = -1;

    pub fn is_unlimited(&self) -> bool {
        matches!(self, Limit::Unlimited)
    }

    /// The concrete bound, or `None` when unlimited
    pub fn bound(&self) -> Option<u32> {
        match self {
            Limit::Unlimited => None,
            Limit::Bounded(n) => Some(*n),
        }
    }
}

impl From<Limit> for i64 {
    fn from(limit: Limit) -> Self {
        match limit {
            Limit::Unlimited => Limit::UNLIMITED_WIRE,
            Limit::Bounded(n) => i64::from(n),
        }
    }
}

impl TryFrom<i64> for Limit {
    type Error = CatalogError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value == Limit::UNLIMITED_WIRE {
            return Ok(Limit::Unlimited);
        }
        u32::try_from(value)
            .map(Limit::Bounded)
            .map_err(|_| CatalogError::InvalidLimit(value))
    }
}

impl std::fmt::Display for Limit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Limit::Unlimited => write!(f, "unlimited"),
            Limit::Bounded(n) => write!(f, "{}", n),
        }
    }
}

/// Whether a counted feature is available on a tier, and how much of it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Allowance {
    /// The tier does not include the feature at all
    Disabled,
    Enabled(Limit),
}

/// Every key a plan row carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FeatureKey {
    MaxProjects,
    MaxDeployments,
    CustomDomainsLimit,
    Collaborators,
    BuildMinutes,
    CustomDomains,
    PrioritySupport,
    AdvancedSecurity,
    Analytics,
    Bandwidth,
    Storage,
}

impl FeatureKey {
    pub const ALL: [FeatureKey; 11] = [
        FeatureKey::MaxProjects,
        FeatureKey::MaxDeployments,
        FeatureKey::CustomDomainsLimit,
        FeatureKey::Collaborators,
        FeatureKey::BuildMinutes,
        FeatureKey::CustomDomains,
        FeatureKey::PrioritySupport,
        FeatureKey::AdvancedSecurity,
        FeatureKey::Analytics,
        FeatureKey::Bandwidth,
        FeatureKey::Storage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureKey::MaxProjects => "maxProjects",
            FeatureKey::MaxDeployments => "maxDeployments",
            FeatureKey::CustomDomainsLimit => "customDomainsLimit",
            FeatureKey::Collaborators => "collaborators",
            FeatureKey::BuildMinutes => "buildMinutes",
            FeatureKey::CustomDomains => "customDomains",
            FeatureKey::PrioritySupport => "prioritySupport",
            FeatureKey::AdvancedSecurity => "advancedSecurity",
            FeatureKey::Analytics => "analytics",
            FeatureKey::Bandwidth => "bandwidth",
            FeatureKey::Storage => "storage",
        }
    }

    /// The counted feature behind this key, if it is numeric
    pub fn counted(&self) -> Option<CountedFeature> {
        match self {
            FeatureKey::MaxProjects => Some(CountedFeature::Projects),
            FeatureKey::MaxDeployments => Some(CountedFeature::Deployments),
            FeatureKey::CustomDomainsLimit => Some(CountedFeature::CustomDomains),
            FeatureKey::Collaborators => Some(CountedFeature::Collaborators),
            FeatureKey::BuildMinutes => Some(CountedFeature::BuildMinutes),
            _ => None,
        }
    }

    /// The flag behind this key, if it is boolean
    pub fn flag(&self) -> Option<FlagFeature> {
        match self {
            FeatureKey::CustomDomains => Some(FlagFeature::CustomDomains),
            FeatureKey::PrioritySupport => Some(FlagFeature::PrioritySupport),
            FeatureKey::AdvancedSecurity => Some(FlagFeature::AdvancedSecurity),
            FeatureKey::Analytics => Some(FlagFeature::Analytics),
            _ => None,
        }
    }
}

impl std::fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FeatureKey {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FeatureKey::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CatalogError::UnknownFeature(s.to_string()))
    }
}

/// Numeric features checked against a usage count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CountedFeature {
    Projects,
    Deployments,
    CustomDomains,
    Collaborators,
    BuildMinutes,
}

impl CountedFeature {
    pub fn key(&self) -> FeatureKey {
        match self {
            CountedFeature::Projects => FeatureKey::MaxProjects,
            CountedFeature::Deployments => FeatureKey::MaxDeployments,
            CountedFeature::CustomDomains => FeatureKey::CustomDomainsLimit,
            CountedFeature::Collaborators => FeatureKey::Collaborators,
            CountedFeature::BuildMinutes => FeatureKey::BuildMinutes,
        }
    }

    /// Flag that must be on for this count to apply at all
    pub fn gate(&self) -> Option<FlagFeature> {
        match self {
            CountedFeature::CustomDomains => Some(FlagFeature::CustomDomains),
            _ => None,
        }
    }

    /// Plural noun used in user-facing messages
    pub fn noun(&self) -> &'static str {
        match self {
            CountedFeature::Projects => "projects",
            CountedFeature::Deployments => "deployments",
            CountedFeature::CustomDomains => "custom domains",
            CountedFeature::Collaborators => "collaborators",
            CountedFeature::BuildMinutes => "build minutes",
        }
    }
}

/// Boolean features
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagFeature {
    CustomDomains,
    PrioritySupport,
    AdvancedSecurity,
    Analytics,
}

impl FlagFeature {
    pub fn key(&self) -> FeatureKey {
        match self {
            FlagFeature::CustomDomains => FeatureKey::CustomDomains,
            FlagFeature::PrioritySupport => FeatureKey::PrioritySupport,
            FlagFeature::AdvancedSecurity => FeatureKey::AdvancedSecurity,
            FlagFeature::Analytics => FeatureKey::Analytics,
        }
    }
}

/// A single cell of the catalog table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Limit(Limit),
    Flag(bool),
    Text(&'static str),
}

/// Limits and feature flags attached to a plan tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanFeatures {
    pub max_projects: Limit,
    pub max_deployments: Limit,
    pub custom_domains: bool,
    pub custom_domains_limit: Limit,
    pub collaborators: Limit,
    pub build_minutes: Limit,
    pub priority_support: bool,
    pub advanced_security: bool,
    pub analytics: bool,
    pub bandwidth: &'static str,
    pub storage: &'static str,
}

impl PlanFeatures {
    /// Look up any feature by key. Total over `FeatureKey::ALL`.
    pub fn value(&self, key: FeatureKey) -> FeatureValue {
        match key {
            FeatureKey::MaxProjects => FeatureValue::Limit(self.max_projects),
            FeatureKey::MaxDeployments => FeatureValue::Limit(self.max_deployments),
            FeatureKey::CustomDomainsLimit => FeatureValue::Limit(self.custom_domains_limit),
            FeatureKey::Collaborators => FeatureValue::Limit(self.collaborators),
            FeatureKey::BuildMinutes => FeatureValue::Limit(self.build_minutes),
            FeatureKey::CustomDomains => FeatureValue::Flag(self.custom_domains),
            FeatureKey::PrioritySupport => FeatureValue::Flag(self.priority_support),
            FeatureKey::AdvancedSecurity => FeatureValue::Flag(self.advanced_security),
            FeatureKey::Analytics => FeatureValue::Flag(self.analytics),
            FeatureKey::Bandwidth => FeatureValue::Text(self.bandwidth),
            FeatureKey::Storage => FeatureValue::Text(self.storage),
        }
    }

    pub fn flag(&self, feature: FlagFeature) -> bool {
        match feature {
            FlagFeature::CustomDomains => self.custom_domains,
            FlagFeature::PrioritySupport => self.priority_support,
            FlagFeature::AdvancedSecurity => self.advanced_security,
            FlagFeature::Analytics => self.analytics,
        }
    }

    pub fn limit(&self, feature: CountedFeature) -> Limit {
        match feature {
            CountedFeature::Projects => self.max_projects,
            CountedFeature::Deployments => self.max_deployments,
            CountedFeature::CustomDomains => self.custom_domains_limit,
            CountedFeature::Collaborators => self.collaborators,
            CountedFeature::BuildMinutes => self.build_minutes,
        }
    }

    /// Configured allowance for a counted feature, honouring its gating flag
    pub fn allowance(&self, feature: CountedFeature) -> Allowance {
        match feature.gate() {
            Some(gate) if !self.flag(gate) => Allowance::Disabled,
            _ => Allowance::Enabled(self.limit(feature)),
        }
    }
}

/// Price of a tier in minor units. `None` means custom pricing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanPricing {
    pub monthly_cents: Option<u32>,
    pub yearly_cents: Option<u32>,
}

static FREE_FEATURES: PlanFeatures = PlanFeatures {
    max_projects: Limit::Bounded(1),
    max_deployments: Limit::Bounded(10),
    custom_domains: false,
    custom_domains_limit: Limit::Bounded(0),
    collaborators: Limit::Bounded(1),
    build_minutes: Limit::Bounded(100),
    priority_support: false,
    advanced_security: false,
    analytics: false,
    bandwidth: "10 GB",
    storage: "1 GB",
};

static PRO_FEATURES: PlanFeatures = PlanFeatures {
    max_projects: Limit::Unlimited,
    max_deployments: Limit::Unlimited,
    custom_domains: true,
    custom_domains_limit: Limit::Bounded(10),
    collaborators: Limit::Bounded(10),
    build_minutes: Limit::Bounded(3000),
    priority_support: true,
    advanced_security: false,
    analytics: true,
    bandwidth: "100 GB",
    storage: "10 GB",
};

static ENTERPRISE_FEATURES: PlanFeatures = PlanFeatures {
    max_projects: Limit::Unlimited,
    max_deployments: Limit::Unlimited,
    custom_domains: true,
    custom_domains_limit: Limit::Unlimited,
    collaborators: Limit::Unlimited,
    build_minutes: Limit::Unlimited,
    priority_support: true,
    advanced_security: true,
    analytics: true,
    bandwidth: "Unlimited",
    storage: "Unlimited",
};

/// Feature row for a tier
pub fn features_of(tier: PlanTier) -> &'static PlanFeatures {
    match tier {
        PlanTier::Free => &FREE_FEATURES,
        PlanTier::Pro => &PRO_FEATURES,
        PlanTier::Enterprise => &ENTERPRISE_FEATURES,
    }
}

/// Price row for a tier
pub fn pricing_of(tier: PlanTier) -> PlanPricing {
    match tier {
        PlanTier::Free => PlanPricing {
            monthly_cents: Some(0),
            yearly_cents: Some(0),
        },
        PlanTier::Pro => PlanPricing {
            monthly_cents: Some(2_000),
            yearly_cents: Some(20_000),
        },
        PlanTier::Enterprise => PlanPricing {
            monthly_cents: None,
            yearly_cents: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_tier_has_every_feature_key() {
        for tier in PlanTier::ALL {
            let features = features_of(tier);
            for key in FeatureKey::ALL {
                let value = features.value(key);
                match (key.counted(), key.flag()) {
                    (Some(_), _) => assert!(matches!(value, FeatureValue::Limit(_)), "{tier}/{key}"),
                    (_, Some(_)) => assert!(matches!(value, FeatureValue::Flag(_)), "{tier}/{key}"),
                    _ => assert!(matches!(value, FeatureValue::Text(_)), "{tier}/{key}"),
                }
            }
        }
    }

    #[test]
    fn serialized_rows_carry_every_key() {
        for tier in PlanTier::ALL {
            let json = serde_json::to_value(features_of(tier)).unwrap();
            let object = json.as_object().unwrap();
            assert_eq!(object.len(), FeatureKey::ALL.len());
            for key in FeatureKey::ALL {
                assert!(object.contains_key(key.as_str()), "{tier} missing {key}");
            }
        }
    }

    #[test]
    fn free_tier_row() {
        let free = features_of(PlanTier::Free);
        assert_eq!(free.max_projects, Limit::Bounded(1));
        assert!(!free.custom_domains);
        assert_eq!(free.allowance(CountedFeature::CustomDomains), Allowance::Disabled);
        assert_eq!(
            free.allowance(CountedFeature::Projects),
            Allowance::Enabled(Limit::Bounded(1))
        );
    }

    #[test]
    fn pro_tier_has_unlimited_projects() {
        let pro = features_of(PlanTier::Pro);
        assert_eq!(pro.max_projects, Limit::Unlimited);
        assert_eq!(
            pro.allowance(CountedFeature::CustomDomains),
            Allowance::Enabled(Limit::Bounded(10))
        );
    }

    #[test]
    fn enterprise_has_every_flag() {
        let enterprise = features_of(PlanTier::Enterprise);
        for flag in [
            FlagFeature::CustomDomains,
            FlagFeature::PrioritySupport,
            FlagFeature::AdvancedSecurity,
            FlagFeature::Analytics,
        ] {
            assert!(enterprise.flag(flag));
        }
    }

    #[test]
    fn pricing_increases_with_tier() {
        assert_eq!(pricing_of(PlanTier::Free).monthly_cents, Some(0));
        assert_eq!(pricing_of(PlanTier::Pro).monthly_cents, Some(2_000));
        assert_eq!(pricing_of(PlanTier::Enterprise).monthly_cents, None);
    }

    #[test]
    fn limit_wire_format() {
        assert_eq!(serde_json::to_string(&Limit::Unlimited).unwrap(), "-1");
        assert_eq!(serde_json::to_string(&Limit::Bounded(5)).unwrap(), "5");
        assert_eq!(serde_json::from_str::<Limit>("-1").unwrap(), Limit::Unlimited);
        assert_eq!(serde_json::from_str::<Limit>("3").unwrap(), Limit::Bounded(3));
        assert!(serde_json::from_str::<Limit>("-2").is_err());
    }

    #[test]
    fn tier_display() {
        assert_eq!(PlanTier::Free.to_string(), "free");
        assert_eq!(PlanTier::Pro.to_string(), "pro");
        assert_eq!(PlanTier::Enterprise.to_string(), "enterprise");
    }

    #[test]
    fn tier_from_str() {
        assert_eq!("free".parse::<PlanTier>().unwrap(), PlanTier::Free);
        assert_eq!("PRO".parse::<PlanTier>().unwrap(), PlanTier::Pro);
        assert_eq!(" Enterprise ".parse::<PlanTier>().unwrap(), PlanTier::Enterprise);
        assert_eq!(
            "gold".parse::<PlanTier>(),
            Err(CatalogError::UnknownTier("gold".to_string()))
        );
    }

    #[test]
    fn upgrade_targets() {
        assert_eq!(PlanTier::Free.upgrade_target(), Some(PlanTier::Pro));
        assert_eq!(PlanTier::Pro.upgrade_target(), Some(PlanTier::Enterprise));
        assert_eq!(PlanTier::Enterprise.upgrade_target(), None);
    }

    #[test]
    fn feature_key_from_str() {
        assert_eq!("maxProjects".parse::<FeatureKey>().unwrap(), FeatureKey::MaxProjects);
        assert_eq!(
            "customdomainslimit".parse::<FeatureKey>().unwrap(),
            FeatureKey::CustomDomainsLimit
        );
        assert!("teleport".parse::<FeatureKey>().is_err());
    }
}
