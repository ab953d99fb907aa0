//! Session gate: login state and PIN-confirmed deletion.
//!
//! The gate keeps a single authenticated flag, restored at startup from a
//! durable slot. Deletion is confirmed with a second, independent PIN and
//! does not depend on being logged in.

use crate::person::PersonId;
use crate::storage::{KeyValueStore, StorageError};
use crate::store::{RecordStore, StoreError};
use sha2::{Digest, Sha256};
use std::fmt;
use subtle::ConstantTimeEq;
use thiserror::Error;
use tracing::{info, warn};

/// Default storage key for the authenticated flag.
pub const AUTH_KEY: &str = "family-album-auth";

/// Value written to the auth slot while logged in.
const AUTH_FLAG: &str = "true";

/// Default PIN accepted by [`SessionGate::login`].
pub const DEFAULT_LOGIN_PIN: &str = "1122";

/// Default PIN accepted by [`SessionGate::confirm_delete`].
pub const DEFAULT_DELETE_PIN: &str = "1213";

/// Errors from gate operations.
///
/// The PIN variants carry the message shown to the user.
#[derive(Debug, Error)]
pub enum GateError {
    #[error("Invalid PIN.")]
    InvalidPin,

    #[error("Incorrect PIN. Deletion cancelled.")]
    IncorrectDeletePin,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Something that can decide whether a presented secret is acceptable.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, candidate: &str) -> bool;
}

/// A PIN held in memory and compared in constant time.
#[derive(Clone)]
pub struct StaticPin(String);

impl StaticPin {
    pub fn new(pin: impl Into<String>) -> Self {
        Self(pin.into())
    }
}

impl CredentialVerifier for StaticPin {
    fn verify(&self, candidate: &str) -> bool {
        self.0.as_bytes().ct_eq(candidate.as_bytes()).into()
    }
}

impl fmt::Debug for StaticPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StaticPin(..)")
    }
}

/// A PIN known only by its SHA-256 digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashedPin {
    digest: [u8; 32],
}

impl HashedPin {
    /// Hash a plaintext PIN.
    pub fn from_pin(pin: &str) -> Self {
        Self {
            digest: Sha256::digest(pin.as_bytes()).into(),
        }
    }

    /// Use a precomputed digest.
    pub fn from_digest(digest: [u8; 32]) -> Self {
        Self { digest }
    }

    pub fn digest(&self) -> &[u8; 32] {
        &self.digest
    }
}

impl CredentialVerifier for HashedPin {
    fn verify(&self, candidate: &str) -> bool {
        let candidate: [u8; 32] = Sha256::digest(candidate.as_bytes()).into();
        self.digest[..].ct_eq(&candidate[..]).into()
    }
}

/// Login state plus the delete-confirmation check.
pub struct SessionGate<S> {
    storage: S,
    key: String,
    authenticated: bool,
    login_verifier: Box<dyn CredentialVerifier>,
    delete_verifier: Box<dyn CredentialVerifier>,
}

impl<S: KeyValueStore> SessionGate<S> {
    /// Create a gate with the default key and PINs.
    pub fn new(storage: S) -> Self {
        Self::with_verifiers(
            storage,
            AUTH_KEY,
            StaticPin::new(DEFAULT_LOGIN_PIN),
            StaticPin::new(DEFAULT_DELETE_PIN),
        )
    }

    /// Create a gate with custom verifiers.
    ///
    /// The initial state is logged in iff the auth slot holds a non-empty value.
    pub fn with_verifiers(
        storage: S,
        key: impl Into<String>,
        login_verifier: impl CredentialVerifier + 'static,
        delete_verifier: impl CredentialVerifier + 'static,
    ) -> Self {
        let key = key.into();
        let authenticated = match storage.read(&key) {
            Ok(flag) => flag.is_some_and(|v| !v.is_empty()),
            Err(e) => {
                warn!(key = %key, error = %e, "failed to read auth flag");
                false
            }
        };

        Self {
            storage,
            key,
            authenticated,
            login_verifier: Box::new(login_verifier),
            delete_verifier: Box::new(delete_verifier),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Log in with `pin`.
    ///
    /// On success the durable flag is written before the state changes, so a
    /// failed write leaves the gate logged out.
    pub fn login(&mut self, pin: &str) -> Result<(), GateError> {
        if !self.login_verifier.verify(pin) {
            warn!("login rejected");
            return Err(GateError::InvalidPin);
        }

        self.storage.write(&self.key, AUTH_FLAG)?;
        self.authenticated = true;
        info!("logged in");
        Ok(())
    }

    /// Log out and clear the durable flag.
    ///
    /// The in-memory state is cleared even if removing the flag fails.
    pub fn logout(&mut self) -> Result<(), GateError> {
        self.authenticated = false;
        self.storage.remove(&self.key)?;
        info!("logged out");
        Ok(())
    }

    /// Delete `id` from `store` if `pin` is the delete PIN.
    ///
    /// Returns whether a record was removed; an unknown id with a correct PIN
    /// is not an error.
    pub fn confirm_delete<T: KeyValueStore>(
        &self,
        store: &mut RecordStore<T>,
        id: &PersonId,
        pin: &str,
    ) -> Result<bool, GateError> {
        if !self.delete_verifier.verify(pin) {
            warn!(id = %id, "deletion rejected");
            return Err(GateError::IncorrectDeletePin);
        }
        Ok(store.delete(id)?)
    }

    /// The storage key holding the auth flag.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl<S> fmt::Debug for SessionGate<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionGate")
            .field("key", &self.key)
            .field("authenticated", &self.authenticated)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::person::PersonDraft;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_static_pin() {
        let pin = StaticPin::new("1122");
        assert!(pin.verify("1122"));
        assert!(!pin.verify("112"));
        assert!(!pin.verify("11220"));
        assert!(!pin.verify(""));
        assert_eq!(format!("{pin:?}"), "StaticPin(..)");
    }

    #[test]
    fn test_hashed_pin() {
        let pin = HashedPin::from_pin("1213");
        assert!(pin.verify("1213"));
        assert!(!pin.verify("1122"));
        assert_eq!(HashedPin::from_digest(*pin.digest()), pin);
    }

    #[test]
    fn test_initial_state_follows_flag() {
        let storage = MemoryStorage::new();
        assert!(!SessionGate::new(storage.clone()).is_authenticated());

        storage.write(AUTH_KEY, "").unwrap();
        assert!(!SessionGate::new(storage.clone()).is_authenticated());

        storage.write(AUTH_KEY, "true").unwrap();
        assert!(SessionGate::new(storage).is_authenticated());
    }

    #[test]
    fn test_login_logout() {
        let storage = MemoryStorage::new();
        let mut gate = SessionGate::new(storage.clone());

        let err = gate.login("0000").unwrap_err();
        assert_eq!(err.to_string(), "Invalid PIN.");
        assert!(!gate.is_authenticated());
        assert!(!storage.contains(AUTH_KEY));

        gate.login("1122").unwrap();
        assert!(gate.is_authenticated());
        assert_eq!(storage.read(AUTH_KEY).unwrap().as_deref(), Some("true"));

        gate.logout().unwrap();
        assert!(!gate.is_authenticated());
        assert!(!storage.contains(AUTH_KEY));
    }

    #[test]
    fn test_login_write_failure_stays_logged_out() {
        let storage = MemoryStorage::with_quota(0);
        let mut gate = SessionGate::new(storage);

        assert!(matches!(gate.login("1122"), Err(GateError::Storage(_))));
        assert!(!gate.is_authenticated());
    }

    #[test]
    fn test_confirm_delete_independent_of_login() {
        let storage = MemoryStorage::new();
        let mut store = RecordStore::new(storage.clone());
        let gate = SessionGate::new(storage);
        let id = store.save(PersonDraft::new("Ana", "x"), None).unwrap();

        let err = gate.confirm_delete(&mut store, &id, "1122").unwrap_err();
        assert_eq!(err.to_string(), "Incorrect PIN. Deletion cancelled.");
        assert!(store.contains(&id));

        assert!(!gate.is_authenticated());
        assert!(gate.confirm_delete(&mut store, &id, "1213").unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn test_custom_verifiers() {
        let storage = MemoryStorage::new();
        let mut gate = SessionGate::with_verifiers(
            storage.clone(),
            "custom-auth",
            HashedPin::from_pin("9999"),
            StaticPin::new("8888"),
        );

        assert!(gate.login("1122").is_err());
        gate.login("9999").unwrap();
        assert!(storage.contains("custom-auth"));
        assert!(!storage.contains(AUTH_KEY));
    }
}
