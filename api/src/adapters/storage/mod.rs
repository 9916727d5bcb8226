//! Profile storage adapters
//!
//! Implementations of `ProfileStorage` backed by the filesystem or memory.

pub mod file;
pub mod memory;

pub use file::FileProfileStorage;
pub use memory::InMemoryProfileStorage;
