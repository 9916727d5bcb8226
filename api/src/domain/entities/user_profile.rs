//! User profile domain entity
//!
//! The signed-in user's profile as cached on the client and persisted to
//! local storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::plan::PlanTier;

/// Profile of the current dashboard user
///
/// Fields missing from persisted data fall back to the defaults below.
/// Keys this version does not know about are kept in `extra` and written
/// back untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub bio: String,
    pub location: String,
    pub company: String,
    pub website: String,
    #[serde(rename = "joinDate")]
    pub joined_at: Option<DateTime<Utc>>,
    pub plan: PlanTier,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: "New User".to_string(),
            email: String::new(),
            avatar: None,
            bio: String::new(),
            location: String::new(),
            company: String::new(),
            website: String::new(),
            joined_at: None,
            plan: PlanTier::Free,
            extra: Map::new(),
        }
    }
}

impl UserProfile {
    /// Shallow-merge a patch: provided keys replace, the rest are retained
    pub fn apply(&mut self, patch: ProfilePatch) {
        let ProfilePatch {
            name,
            email,
            avatar,
            bio,
            location,
            company,
            website,
            joined_at,
            plan,
            extra,
        } = patch;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(email) = email {
            self.email = email;
        }
        if let Some(avatar) = avatar {
            self.avatar = avatar;
        }
        if let Some(bio) = bio {
            self.bio = bio;
        }
        if let Some(location) = location {
            self.location = location;
        }
        if let Some(company) = company {
            self.company = company;
        }
        if let Some(website) = website {
            self.website = website;
        }
        if let Some(joined_at) = joined_at {
            self.joined_at = joined_at;
        }
        if let Some(plan) = plan {
            self.plan = plan;
        }
        self.extra.extend(extra);
    }
}

/// A key that is present with `null` becomes `Some(None)`; an absent key
/// stays `None` through `#[serde(default)]`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Partial profile update
///
/// `avatar` and `joinDate` are nullable on the profile, so a patch can
/// clear them: `Some(None)` replaces the stored value with nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub avatar: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(
        rename = "joinDate",
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub joined_at: Option<Option<DateTime<Utc>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<PlanTier>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProfilePatch {
    pub fn bio(bio: impl Into<String>) -> Self {
        Self {
            bio: Some(bio.into()),
            ..Default::default()
        }
    }

    pub fn avatar(avatar: impl Into<String>) -> Self {
        Self {
            avatar: Some(Some(avatar.into())),
            ..Default::default()
        }
    }

    pub fn plan(plan: PlanTier) -> Self {
        Self {
            plan: Some(plan),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_profile() -> UserProfile {
        UserProfile {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            avatar: Some("avatars/ada.png".to_string()),
            bio: "old bio".to_string(),
            location: "London".to_string(),
            company: "Analytical Engines".to_string(),
            website: "https://ada.dev".to_string(),
            joined_at: None,
            plan: PlanTier::Pro,
            extra: Map::new(),
        }
    }

    #[test]
    fn apply_replaces_only_provided_keys() {
        let mut profile = filled_profile();
        profile.apply(ProfilePatch::bio("new bio"));

        let mut expected = filled_profile();
        expected.bio = "new bio".to_string();
        assert_eq!(profile, expected);
    }

    #[test]
    fn apply_empty_patch_is_noop() {
        let mut profile = filled_profile();
        profile.apply(ProfilePatch::default());
        assert_eq!(profile, filled_profile());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let profile: UserProfile = serde_json::from_str(r#"{"name":"Grace"}"#).unwrap();
        assert_eq!(profile.name, "Grace");
        assert_eq!(profile.plan, PlanTier::Free);
        assert_eq!(profile.avatar, None);
        assert!(profile.extra.is_empty());
    }

    #[test]
    fn unknown_fields_are_preserved() {
        let json = r#"{"name":"Grace","theme":"dark","notifications":{"email":true}}"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.extra.get("theme"), Some(&Value::from("dark")));

        let written = serde_json::to_value(&profile).unwrap();
        assert_eq!(written["theme"], "dark");
        assert_eq!(written["notifications"]["email"], true);
    }

    #[test]
    fn join_date_uses_wire_name() {
        let profile: UserProfile =
            serde_json::from_str(r#"{"joinDate":"2024-03-01T12:00:00Z"}"#).unwrap();
        assert!(profile.joined_at.is_some());
        let written = serde_json::to_value(&profile).unwrap();
        assert!(written.get("joinDate").is_some());
        assert!(written.get("joinedAt").is_none());
    }

    #[test]
    fn patch_from_json_collects_extras() {
        let patch: ProfilePatch =
            serde_json::from_str(r#"{"bio":"hi","timezone":"UTC"}"#).unwrap();
        assert_eq!(patch.bio.as_deref(), Some("hi"));
        assert_eq!(patch.extra.get("timezone"), Some(&Value::from("UTC")));

        let mut profile = filled_profile();
        profile.apply(patch);
        assert_eq!(profile.extra.get("timezone"), Some(&Value::from("UTC")));
    }

    #[test]
    fn null_clears_nullable_fields() {
        let mut profile = filled_profile();
        profile.joined_at = Some(Utc::now());

        let patch: ProfilePatch =
            serde_json::from_str(r#"{"avatar": null, "joinDate": null}"#).unwrap();
        assert_eq!(patch.avatar, Some(None));
        assert_eq!(patch.joined_at, Some(None));

        profile.apply(patch);
        assert_eq!(profile.avatar, None);
        assert_eq!(profile.joined_at, None);
        assert_eq!(profile.name, "Ada Lovelace");
    }

    #[test]
    fn absent_nullable_fields_are_retained() {
        let patch: ProfilePatch = serde_json::from_str(r#"{"bio": "hi"}"#).unwrap();
        assert_eq!(patch.avatar, None);
        assert_eq!(patch.joined_at, None);

        let mut profile = filled_profile();
        profile.apply(patch);
        assert_eq!(profile.avatar.as_deref(), Some("avatars/ada.png"));
    }

    #[test]
    fn patch_serializes_cleared_avatar_as_null() {
        let patch = ProfilePatch {
            avatar: Some(None),
            ..Default::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert!(json["avatar"].is_null());
        assert!(json.as_object().unwrap().contains_key("avatar"));
    }
}
