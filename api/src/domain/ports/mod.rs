//! Domain ports (traits)
//!
//! Port traits define interfaces that the domain layer requires.
//! Adapters provide concrete implementations of these traits.

pub mod billing;
pub mod notifier;
pub mod storage;

pub use billing::BillingProvider;
pub use notifier::{CallToAction, Notification, Notifier, Severity};
pub use storage::ProfileStorage;
