//! Mock implementations of port traits
//!
//! In-memory implementations that record what they were asked to do so
//! tests can verify behavior.

use async_trait::async_trait;
use std::sync::{Arc, Mutex, RwLock};

use crate::app::StoreEvent;
use crate::domain::entities::PlanTier;
use crate::domain::ports::{BillingProvider, Notification, Notifier};
use crate::error::BackendError;

// ============================================================================
// Recording Notifier
// ============================================================================

#[derive(Default)]
pub struct RecordingNotifier {
    sent: RwLock<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.read().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) {
        self.sent.write().unwrap().push(notification.clone());
    }
}

// ============================================================================
// Store Event Log
// ============================================================================

/// Collects store events delivered to its handlers
#[derive(Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<StoreEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handler(&self) -> impl Fn(&StoreEvent) + Send + Sync + 'static {
        let events = self.events.clone();
        move |event| events.lock().unwrap().push(event.clone())
    }

    pub fn events(&self) -> Vec<StoreEvent> {
        self.events.lock().unwrap().clone()
    }
}

// ============================================================================
// Mock Billing Provider
// ============================================================================

/// Billing provider that answers with a fixed tier, or fails with a fixed
/// HTTP status
#[derive(Default)]
pub struct MockBillingProvider {
    plan: RwLock<Option<PlanTier>>,
    failure_status: RwLock<Option<u16>>,
    session: RwLock<Option<String>>,
}

impl MockBillingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_plan(self, plan: PlanTier) -> Self {
        *self.plan.write().unwrap() = Some(plan);
        self
    }

    pub fn failing_with(self, status: u16) -> Self {
        *self.failure_status.write().unwrap() = Some(status);
        self
    }

    pub fn session(&self) -> Option<String> {
        self.session.read().unwrap().clone()
    }
}

#[async_trait]
impl BillingProvider for MockBillingProvider {
    fn begin_session(&self, user_id: &str) {
        *self.session.write().unwrap() = Some(user_id.to_string());
    }

    fn end_session(&self) {
        *self.session.write().unwrap() = None;
    }

    async fn fetch_plan(&self) -> Result<PlanTier, BackendError> {
        if let Some(status) = *self.failure_status.read().unwrap() {
            return Err(BackendError::Api {
                status,
                code: None,
                message: "mock failure".to_string(),
            });
        }
        let plan = *self.plan.read().unwrap();
        plan.ok_or_else(|| BackendError::Api {
            status: 404,
            code: Some("PGRST116".to_string()),
            message: "no subscription".to_string(),
        })
    }
}
