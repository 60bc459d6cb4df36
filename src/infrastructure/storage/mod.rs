//! [`crate::domain::repositories::CredentialStorage`] implementations.
//!
//! - [`FileStorage`] - JSON file, survives restarts
//! - [`MemoryStorage`] - process-local map, for tests and embedding

pub mod file_storage;
pub mod memory_storage;

pub use file_storage::FileStorage;
pub use memory_storage::MemoryStorage;
