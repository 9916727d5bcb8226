//! Notifier that writes alerts to the tracing log
//!
//! The HTTP surface returns notifications in the response body for the
//! frontend to render; this adapter only records that they were raised.

use crate::domain::ports::{Notification, Notifier, Severity};

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: &Notification) {
        let route = notification.action.as_ref().map(|a| a.route.as_str());
        match notification.severity {
            Severity::Blocking => tracing::info!(
                title = %notification.title,
                route,
                "Blocked: {}",
                notification.message
            ),
            Severity::Warning => tracing::debug!(
                title = %notification.title,
                route,
                "Warned: {}",
                notification.message
            ),
        }
    }
}
