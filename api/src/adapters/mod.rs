//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod backend;
pub mod notifier;
pub mod storage;

pub use backend::BackendClient;
pub use notifier::TracingNotifier;
pub use storage::{FileProfileStorage, InMemoryProfileStorage};
