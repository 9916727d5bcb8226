//! Limit notifications
//!
//! Turns entitlement decisions into block / warn / proceed outcomes and
//! raises the matching user-facing alert.

use std::sync::Arc;

use serde::Serialize;

use crate::app::entitlements::{check_count, LimitDecision};
use crate::domain::entities::{CountedFeature, PlanTier};
use crate::domain::ports::{CallToAction, Notification, Notifier, Severity};

/// Remaining-quota levels at or below which a warning is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarningThresholds {
    pub projects: u32,
    pub domains: u32,
}

impl Default for WarningThresholds {
    fn default() -> Self {
        Self {
            projects: 1,
            domains: 2,
        }
    }
}

/// What the caller should do with the action it asked about.
///
/// Callers branch on `is_blocked`, not on whether a notification exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum LimitGate {
    #[serde(rename = "block")]
    Blocked {
        decision: LimitDecision,
        notification: Notification,
    },
    #[serde(rename = "warn")]
    Warned {
        decision: LimitDecision,
        notification: Notification,
    },
    Proceed { decision: LimitDecision },
}

impl LimitGate {
    pub fn is_blocked(&self) -> bool {
        matches!(self, LimitGate::Blocked { .. })
    }

    pub fn should_proceed(&self) -> bool {
        !self.is_blocked()
    }

    pub fn decision(&self) -> &LimitDecision {
        match self {
            LimitGate::Blocked { decision, .. }
            | LimitGate::Warned { decision, .. }
            | LimitGate::Proceed { decision } => decision,
        }
    }

    pub fn notification(&self) -> Option<&Notification> {
        match self {
            LimitGate::Blocked { notification, .. } | LimitGate::Warned { notification, .. } => {
                Some(notification)
            }
            LimitGate::Proceed { .. } => None,
        }
    }
}

/// Route of the billing page, preselecting the next tier when there is one
pub fn upgrade_route(tier: PlanTier) -> String {
    match tier.upgrade_target() {
        Some(target) => format!("/billing?plan={}", target),
        None => "/billing".to_string(),
    }
}

fn upgrade_action(tier: PlanTier) -> CallToAction {
    let label = match tier.upgrade_target() {
        Some(target) => format!("Upgrade to {}", target.display_name()),
        None => "Manage plan".to_string(),
    };
    CallToAction {
        label,
        route: upgrade_route(tier),
    }
}

fn singular(feature: CountedFeature) -> &'static str {
    match feature {
        CountedFeature::Projects => "project",
        CountedFeature::Deployments => "deployment",
        CountedFeature::CustomDomains => "custom domain",
        CountedFeature::Collaborators => "collaborator",
        CountedFeature::BuildMinutes => "build minute",
    }
}

fn noun(feature: CountedFeature, count: u32) -> &'static str {
    if count == 1 {
        singular(feature)
    } else {
        feature.noun()
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Presents limit decisions to the user through a `Notifier`
pub struct NotificationPresenter<N>
where
    N: Notifier,
{
    notifier: Arc<N>,
    thresholds: WarningThresholds,
}

impl<N> NotificationPresenter<N>
where
    N: Notifier,
{
    pub fn new(notifier: Arc<N>) -> Self {
        Self {
            notifier,
            thresholds: WarningThresholds::default(),
        }
    }

    pub fn with_thresholds(mut self, thresholds: WarningThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Gate creating another project
    pub fn present_project_limit(&self, tier: PlanTier, current: i64) -> LimitGate {
        self.present_count_limit(tier, CountedFeature::Projects, current, self.thresholds.projects)
    }

    /// Gate attaching another custom domain
    pub fn present_domain_limit(&self, tier: PlanTier, current: i64) -> LimitGate {
        self.present_count_limit(
            tier,
            CountedFeature::CustomDomains,
            current,
            self.thresholds.domains,
        )
    }

    pub fn present_count_limit(
        &self,
        tier: PlanTier,
        feature: CountedFeature,
        current: i64,
        threshold: u32,
    ) -> LimitGate {
        let decision = check_count(tier, feature, current);

        if !decision.can_create {
            let notification = self.blocking_notification(tier, feature, &decision);
            self.notifier.notify(&notification);
            return LimitGate::Blocked {
                decision,
                notification,
            };
        }

        match decision.remaining_bound() {
            Some(remaining) if remaining <= threshold => {
                let notification = Notification {
                    severity: Severity::Warning,
                    title: format!("{} limit almost reached", capitalize(singular(feature))),
                    message: format!(
                        "You have {} {} remaining on the {} plan.",
                        remaining,
                        noun(feature, remaining),
                        tier.display_name()
                    ),
                    action: Some(upgrade_action(tier)),
                };
                self.notifier.notify(&notification);
                LimitGate::Warned {
                    decision,
                    notification,
                }
            }
            _ => LimitGate::Proceed { decision },
        }
    }

    fn blocking_notification(
        &self,
        tier: PlanTier,
        feature: CountedFeature,
        decision: &LimitDecision,
    ) -> Notification {
        let message = if !decision.enabled {
            let upsell = match tier.upgrade_target() {
                Some(target) => format!(" Upgrade to {} to add them.", target.display_name()),
                None => String::new(),
            };
            format!(
                "{} are not available on the {} plan.{}",
                capitalize(feature.noun()),
                tier.display_name(),
                upsell
            )
        } else {
            let limit = decision.limit.bound().unwrap_or_default();
            format!(
                "You've reached the limit of {} {} on the {} plan. Upgrade to create more.",
                limit,
                noun(feature, limit),
                tier.display_name()
            )
        };

        Notification {
            severity: Severity::Blocking,
            title: format!("{} limit reached", capitalize(singular(feature))),
            message,
            action: Some(upgrade_action(tier)),
        }
    }

    /// Generic alert for failures the user cannot act on
    pub fn present_unexpected_error(&self, context: &str) -> Notification {
        let notification = Notification {
            severity: Severity::Warning,
            title: "Something went wrong".to_string(),
            message: format!("We couldn't {}. Please try again.", context),
            action: None,
        };
        self.notifier.notify(&notification);
        notification
    }
}
