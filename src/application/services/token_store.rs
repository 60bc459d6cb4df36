//! Session credential register backed by durable storage.

use std::sync::{Arc, PoisonError, RwLock};

use crate::domain::entities::CredentialPair;
use crate::domain::repositories::CredentialStorage;
use crate::error::AppError;

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub const EXPIRES_IN_KEY: &str = "expires_in";

/// Holds the current [`CredentialPair`].
///
/// Reads are served from an in-memory copy; `set` and `clear` write through
/// to the [`CredentialStorage`] so the session survives restarts. The
/// in-memory copy is updated even when persisting fails, and the storage
/// error is returned to the caller.
pub struct TokenStore {
    storage: Arc<dyn CredentialStorage>,
    current: RwLock<Option<CredentialPair>>,
}

impl TokenStore {
    /// Opens the store and loads any persisted pair.
    ///
    /// A partial pair (one token without the other) is treated as empty.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] if the backing store cannot be read.
    pub fn open(storage: Arc<dyn CredentialStorage>) -> Result<Self, AppError> {
        let current = load(storage.as_ref())?;
        if current.is_some() {
            tracing::debug!("Restored persisted session credentials");
        }

        Ok(Self {
            storage,
            current: RwLock::new(current),
        })
    }

    pub fn get(&self) -> Option<CredentialPair> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.get().map(|pair| pair.access_token)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.get().map(|pair| pair.refresh_token)
    }

    pub fn is_authenticated(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Replaces the current pair and persists it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] if the pair cannot be persisted.
    pub fn set(&self, pair: CredentialPair) -> Result<(), AppError> {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(pair.clone());

        self.storage.set(ACCESS_TOKEN_KEY, &pair.access_token)?;
        self.storage.set(REFRESH_TOKEN_KEY, &pair.refresh_token)?;
        match pair.expires_in {
            Some(secs) => self.storage.set(EXPIRES_IN_KEY, &secs.to_string()),
            None => self.storage.remove(EXPIRES_IN_KEY),
        }
    }

    /// Installs a renewed access token, keeping the refresh token unless a
    /// rotated one is given.
    ///
    /// Returns the resulting pair.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::AuthRejected`] if there is no session to renew,
    /// or [`AppError::Storage`] if the pair cannot be persisted.
    pub fn replace_access(
        &self,
        access_token: impl Into<String>,
        refresh_token: Option<String>,
        expires_in: Option<u64>,
    ) -> Result<CredentialPair, AppError> {
        let current = self
            .get()
            .ok_or_else(|| AppError::auth_rejected("No session to renew"))?;
        let renewed = current.renewed(access_token, refresh_token, expires_in);
        self.set(renewed.clone())?;
        Ok(renewed)
    }

    /// Drops the current pair from memory and from durable storage.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] if the persisted keys cannot be removed.
    pub fn clear(&self) -> Result<(), AppError> {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = None;

        self.storage.remove(ACCESS_TOKEN_KEY)?;
        self.storage.remove(REFRESH_TOKEN_KEY)?;
        self.storage.remove(EXPIRES_IN_KEY)
    }
}

fn load(storage: &dyn CredentialStorage) -> Result<Option<CredentialPair>, AppError> {
    let access = storage.get(ACCESS_TOKEN_KEY)?;
    let refresh = storage.get(REFRESH_TOKEN_KEY)?;

    match (access, refresh) {
        (Some(access), Some(refresh)) => {
            let expires_in = storage
                .get(EXPIRES_IN_KEY)?
                .and_then(|raw| raw.parse::<u64>().ok());
            Ok(Some(CredentialPair::new(access, refresh, expires_in)))
        }
        (None, None) => Ok(None),
        _ => {
            tracing::warn!("Persisted credentials are incomplete, ignoring them");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockCredentialStorage;

    fn empty_storage() -> MockCredentialStorage {
        let mut storage = MockCredentialStorage::new();
        storage.expect_get().returning(|_| Ok(None));
        storage
    }

    #[test]
    fn test_open_restores_persisted_pair() {
        let mut storage = MockCredentialStorage::new();
        storage
            .expect_get()
            .withf(|key| key == ACCESS_TOKEN_KEY)
            .returning(|_| Ok(Some("access".to_string())));
        storage
            .expect_get()
            .withf(|key| key == REFRESH_TOKEN_KEY)
            .returning(|_| Ok(Some("refresh".to_string())));
        storage
            .expect_get()
            .withf(|key| key == EXPIRES_IN_KEY)
            .returning(|_| Ok(Some("3600".to_string())));

        let store = TokenStore::open(Arc::new(storage)).unwrap();

        assert_eq!(
            store.get(),
            Some(CredentialPair::new("access", "refresh", Some(3600)))
        );
        assert!(store.is_authenticated());
    }

    #[test]
    fn test_open_ignores_partial_pair() {
        let mut storage = MockCredentialStorage::new();
        storage
            .expect_get()
            .withf(|key| key == ACCESS_TOKEN_KEY)
            .returning(|_| Ok(Some("access".to_string())));
        storage
            .expect_get()
            .withf(|key| key == REFRESH_TOKEN_KEY)
            .returning(|_| Ok(None));

        let store = TokenStore::open(Arc::new(storage)).unwrap();

        assert!(store.get().is_none());
    }

    #[test]
    fn test_open_propagates_storage_error() {
        let mut storage = MockCredentialStorage::new();
        storage
            .expect_get()
            .returning(|_| Err(AppError::storage("disk unavailable")));

        let result = TokenStore::open(Arc::new(storage));

        assert!(matches!(result, Err(AppError::Storage { .. })));
    }

    #[test]
    fn test_set_writes_through() {
        let mut storage = empty_storage();
        storage
            .expect_set()
            .withf(|key, value| key == ACCESS_TOKEN_KEY && value == "a")
            .times(1)
            .returning(|_, _| Ok(()));
        storage
            .expect_set()
            .withf(|key, value| key == REFRESH_TOKEN_KEY && value == "r")
            .times(1)
            .returning(|_, _| Ok(()));
        storage
            .expect_remove()
            .withf(|key| key == EXPIRES_IN_KEY)
            .times(1)
            .returning(|_| Ok(()));

        let store = TokenStore::open(Arc::new(storage)).unwrap();
        store.set(CredentialPair::new("a", "r", None)).unwrap();

        assert_eq!(store.access_token().as_deref(), Some("a"));
        assert_eq!(store.refresh_token().as_deref(), Some("r"));
    }

    #[test]
    fn test_replace_access_keeps_refresh_token() {
        let mut storage = empty_storage();
        storage.expect_set().returning(|_, _| Ok(()));
        storage.expect_remove().returning(|_| Ok(()));

        let store = TokenStore::open(Arc::new(storage)).unwrap();
        store.set(CredentialPair::new("old", "r", None)).unwrap();

        let renewed = store.replace_access("new", None, None).unwrap();

        assert_eq!(renewed, CredentialPair::new("new", "r", None));
        assert_eq!(store.access_token().as_deref(), Some("new"));
    }

    #[test]
    fn test_replace_access_without_session() {
        let store = TokenStore::open(Arc::new(empty_storage())).unwrap();

        let result = store.replace_access("new", None, None);

        assert!(matches!(result, Err(AppError::AuthRejected { .. })));
    }

    #[test]
    fn test_clear_removes_every_key() {
        let mut storage = empty_storage();
        storage.expect_set().returning(|_, _| Ok(()));
        storage.expect_remove().times(1 + 3).returning(|_| Ok(()));

        let store = TokenStore::open(Arc::new(storage)).unwrap();
        store.set(CredentialPair::new("a", "r", None)).unwrap();
        store.clear().unwrap();

        assert!(store.get().is_none());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_clear_drops_memory_even_if_storage_fails() {
        let mut storage = empty_storage();
        storage.expect_set().returning(|_, _| Ok(()));
        storage
            .expect_remove()
            .returning(|_| Err(AppError::storage("read-only")));

        let store = TokenStore::open(Arc::new(storage)).unwrap();
        let _ = store.set(CredentialPair::new("a", "r", None));

        assert!(store.clear().is_err());
        assert!(store.get().is_none());
    }
}
