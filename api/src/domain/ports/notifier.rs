//! Notifier port trait
//!
//! Where user-facing alerts (toasts) are delivered.

use serde::Serialize;

/// How an alert affects the action that raised it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The action was refused
    Blocking,
    /// The action went ahead
    Warning,
}

/// Button attached to a notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallToAction {
    pub label: String,
    /// Dashboard route the button navigates to
    pub route: String,
}

/// A user-facing alert
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub severity: Severity,
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<CallToAction>,
}

/// Port trait for notification delivery
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification);
}
