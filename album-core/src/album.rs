//! Album - the primary public API for a UI layer.
//!
//! Wraps the record store, session gate and configuration into a single
//! handle. Record operations require a logged-in session, matching an app
//! whose whole album sits behind the login screen.

use crate::config::AlbumConfig;
use crate::gate::{GateError, SessionGate, StaticPin};
use crate::person::{Person, PersonDraft, PersonId};
use crate::photo::{DataUrlResolver, PhotoError, PhotoResolver};
use crate::storage::{FileStorage, KeyValueStore};
use crate::store::{RecordStore, StoreError};
use std::path::Path;
use thiserror::Error;

/// Errors from Album operations.
#[derive(Debug, Error)]
pub enum AlbumError {
    #[error("Not logged in")]
    NotAuthenticated,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Gate(#[from] GateError),

    #[error("Photo error: {0}")]
    Photo(#[from] PhotoError),
}

/// A family album: people, login state and delete confirmation.
pub struct Album<S> {
    config: AlbumConfig,
    store: RecordStore<S>,
    gate: SessionGate<S>,
}

impl Album<FileStorage> {
    /// Open the album stored under `config.data_dir`.
    pub fn open(config: AlbumConfig) -> Self {
        let storage = FileStorage::new(&config.data_dir);
        Self::with_storage(config, storage)
    }
}

impl<S: KeyValueStore + Clone> Album<S> {
    /// Open an album over any storage. Records and login state are restored
    /// from it immediately.
    pub fn with_storage(config: AlbumConfig, storage: S) -> Self {
        let store = RecordStore::open(storage.clone(), &config.data_key);
        let gate = SessionGate::with_verifiers(
            storage,
            &config.auth_key,
            StaticPin::new(config.login_pin.clone()),
            StaticPin::new(config.delete_pin.clone()),
        );

        Self {
            config,
            store,
            gate,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.gate.is_authenticated()
    }

    /// Log in. A wrong PIN yields an error displaying "Invalid PIN.".
    pub fn login(&mut self, pin: &str) -> Result<(), AlbumError> {
        Ok(self.gate.login(pin)?)
    }

    pub fn logout(&mut self) -> Result<(), AlbumError> {
        Ok(self.gate.logout()?)
    }

    /// Create (`id` is `None` or unknown) or update a person.
    pub fn save_person(
        &mut self,
        draft: PersonDraft,
        id: Option<&PersonId>,
    ) -> Result<PersonId, AlbumError> {
        self.require_login()?;
        Ok(self.store.save(draft, id)?)
    }

    /// Delete a person after checking the delete PIN.
    pub fn delete_person(&mut self, id: &PersonId, pin: &str) -> Result<bool, AlbumError> {
        self.require_login()?;
        Ok(self.gate.confirm_delete(&mut self.store, id, pin)?)
    }

    /// Search by name, notes or profession.
    pub fn search(&self, term: &str) -> Result<Vec<&Person>, AlbumError> {
        self.require_login()?;
        Ok(self.store.search(term))
    }

    /// Everyone, in name order.
    pub fn people(&self) -> Result<&[Person], AlbumError> {
        self.require_login()?;
        Ok(self.store.people())
    }

    pub fn get(&self, id: &PersonId) -> Result<Option<&Person>, AlbumError> {
        self.require_login()?;
        Ok(self.store.get(id))
    }

    /// Re-read records from storage, discarding in-memory state.
    pub fn reload(&mut self) -> Result<&[Person], AlbumError> {
        self.require_login()?;
        Ok(self.store.load())
    }

    /// Resolve an image file into a photo URL suitable for [`PersonDraft`].
    ///
    /// Works while logged out: it reads only the given file and never touches
    /// album records.
    pub async fn resolve_photo(&self, path: impl AsRef<Path>) -> Result<String, AlbumError> {
        Ok(DataUrlResolver::new().resolve(path.as_ref()).await?)
    }

    pub fn config(&self) -> &AlbumConfig {
        &self.config
    }

    /// Direct access to the record store.
    ///
    /// Bypasses the login check.
    pub fn store(&self) -> &RecordStore<S> {
        &self.store
    }

    pub fn gate(&self) -> &SessionGate<S> {
        &self.gate
    }

    fn require_login(&self) -> Result<(), AlbumError> {
        if self.gate.is_authenticated() {
            Ok(())
        } else {
            Err(AlbumError::NotAuthenticated)
        }
    }
}
