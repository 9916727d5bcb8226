//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities, ports, and external systems.

pub mod entitlements;
pub mod limit_notifications;
pub mod user_data_hooks;
pub mod user_data_store;

pub use entitlements::{
    check_count, check_count_by_key, check_domain_limit, check_flag, check_flag_by_key,
    check_project_limit, LimitDecision,
};
pub use limit_notifications::{LimitGate, NotificationPresenter, WarningThresholds};
pub use user_data_hooks::UserDataHook;
pub use user_data_store::{
    EventKind, SessionEvent, StoreEvent, Subscription, SubscriptionId, UserDataStore, STORAGE_KEY,
};
