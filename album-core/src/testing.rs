//! Testing utilities for the album.
//!
//! This module provides tools for integration testing:
//! - `TestHarness` for scripted album scenarios over in-memory storage
//! - Sample drafts with realistic field values
//! - Assertion helpers for verifying album state

use crate::album::Album;
use crate::config::AlbumConfig;
use crate::person::{Person, PersonDraft, PersonId, Status};
use crate::storage::{KeyValueStore, MemoryStorage};
use crate::store::RecordStore;

/// A tiny valid photo payload for drafts that need one.
pub const SAMPLE_PHOTO: &str = "data:image/gif;base64,R0lGODlhAQABAAAAACw=";

/// Create a draft with only the required fields filled in.
pub fn sample_draft(name: &str) -> PersonDraft {
    PersonDraft::new(name, SAMPLE_PHOTO)
}

/// Create a fully populated draft.
pub fn detailed_draft(name: &str, profession: &str, notes: &str) -> PersonDraft {
    PersonDraft::new(name, SAMPLE_PHOTO)
        .with_birthday("1950-04-12")
        .with_status(Status::Alive)
        .with_profession(profession)
        .with_notes(notes)
}

/// Test harness for running album scenarios.
///
/// The harness starts logged in over fresh in-memory storage. The storage
/// handle is kept so tests can reopen the album or inspect raw slots.
pub struct TestHarness {
    /// The album under test.
    pub album: Album<MemoryStorage>,
    /// Shared handle to the album's storage.
    pub storage: MemoryStorage,
}

impl TestHarness {
    /// Create a logged-in harness with default configuration.
    pub fn new() -> Self {
        Self::with_config(AlbumConfig::default())
    }

    /// Create a logged-in harness with a custom configuration.
    pub fn with_config(config: AlbumConfig) -> Self {
        let storage = MemoryStorage::new();
        let login_pin = config.login_pin.clone();
        let mut album = Album::with_storage(config, storage.clone());
        album
            .login(&login_pin)
            .expect("harness login should succeed");

        Self { album, storage }
    }

    /// Add a person with only the required fields.
    pub fn add(&mut self, name: &str) -> PersonId {
        self.album
            .save_person(sample_draft(name), None)
            .expect("harness save should succeed")
    }

    /// Update an existing person.
    pub fn update(&mut self, id: &PersonId, draft: PersonDraft) -> PersonId {
        self.album
            .save_person(draft, Some(id))
            .expect("harness update should succeed")
    }

    /// Names of everyone in the album, in stored order.
    pub fn names(&self) -> Vec<String> {
        self.album
            .store()
            .people()
            .iter()
            .map(|p| p.name.clone())
            .collect()
    }

    /// Names matching a search term.
    pub fn search_names(&self, term: &str) -> Vec<String> {
        self.album
            .store()
            .search(term)
            .into_iter()
            .map(|p| p.name.clone())
            .collect()
    }

    /// Find a person by exact name.
    pub fn find(&self, name: &str) -> Option<&Person> {
        self.album.store().people().iter().find(|p| p.name == name)
    }

    /// Raw contents of the data slot.
    pub fn raw_data(&self) -> Option<String> {
        let key = &self.album.config().data_key;
        self.storage.read(key).ok().flatten()
    }

    /// Open a second album over the same storage, as after a restart.
    pub fn reopen(&self) -> Album<MemoryStorage> {
        Album::with_storage(self.album.config().clone(), self.storage.clone())
    }

    /// Load a bare record store over the same storage.
    pub fn reload_store(&self) -> RecordStore<MemoryStorage> {
        RecordStore::open(self.storage.clone(), &self.album.config().data_key)
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert the people are sorted by case-insensitive name.
#[track_caller]
pub fn assert_sorted(people: &[Person]) {
    for pair in people.windows(2) {
        let (a, b) = (pair[0].name.to_lowercase(), pair[1].name.to_lowercase());
        assert!(a <= b, "Expected '{}' to sort before '{}'", pair[0].name, pair[1].name);
    }
}

/// Assert no two people share an id.
#[track_caller]
pub fn assert_unique_ids(people: &[Person]) {
    let mut ids: Vec<_> = people.iter().map(|p| &p.id).collect();
    ids.sort();
    let before = ids.len();
    ids.dedup();
    assert_eq!(before, ids.len(), "Expected all person ids to be unique");
}

/// Assert the album holds exactly these names, in order.
#[track_caller]
pub fn assert_names(harness: &TestHarness, expected: &[&str]) {
    let actual = harness.names();
    assert_eq!(actual, expected, "Expected names {expected:?}, got {actual:?}");
}
