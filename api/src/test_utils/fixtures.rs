//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.

use chrono::{TimeZone, Utc};
use serde_json::Map;

use crate::domain::entities::{PlanTier, UserProfile};

/// A fully populated profile on the Pro plan
pub fn test_profile() -> UserProfile {
    UserProfile {
        name: "Ada Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        avatar: Some("avatars/ada.png".to_string()),
        bio: "Writes programs for engines that do not exist yet".to_string(),
        location: "London".to_string(),
        company: "Analytical Engines".to_string(),
        website: "https://ada.dev".to_string(),
        joined_at: Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()),
        plan: PlanTier::Pro,
        extra: Map::new(),
    }
}

/// `test_profile` on a different tier
pub fn test_profile_on(plan: PlanTier) -> UserProfile {
    UserProfile {
        plan,
        ..test_profile()
    }
}
