//! Durable key-value store backing the token store.

use crate::error::AppError;

/// Persistent string key-value storage.
///
/// The token store writes the session credentials through this trait so they
/// survive process restarts. Implementations are synchronous; the stored
/// values are small and written rarely.
///
/// # Implementations
///
/// - [`crate::infrastructure::storage::FileStorage`] - JSON file on disk
/// - [`crate::infrastructure::storage::MemoryStorage`] - In-process, non-durable
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/storage_file.rs`
#[cfg_attr(test, mockall::automock)]
pub trait CredentialStorage: Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, AppError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] if the backing store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), AppError>;

    /// Removes `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] if the backing store cannot be written.
    fn remove(&self, key: &str) -> Result<(), AppError>;
}
