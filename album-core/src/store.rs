//! The record store: the album's people, kept sorted and mirrored to storage.

use crate::person::{Person, PersonDraft, PersonId, ValidationError};
use crate::storage::{KeyValueStore, StorageError};
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Default storage key for the serialized collection.
pub const DATA_KEY: &str = "family-album-data";

/// Errors from record store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// In-memory collection of people mirrored to one durable slot.
///
/// Every successful mutation rewrites the whole slot before it becomes
/// visible in memory. If the write fails the collection is left as it was.
#[derive(Debug)]
pub struct RecordStore<S> {
    storage: S,
    key: String,
    people: Vec<Person>,
}

impl<S: KeyValueStore> RecordStore<S> {
    /// Create an empty store over `storage` using the default key.
    ///
    /// Nothing is read until [`load`](Self::load) is called.
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, DATA_KEY)
    }

    /// Create an empty store using a custom key.
    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            people: Vec::new(),
        }
    }

    /// Create a store and load whatever the slot holds.
    pub fn open(storage: S, key: impl Into<String>) -> Self {
        let mut store = Self::with_key(storage, key);
        store.load();
        store
    }

    /// Replace the in-memory collection with the slot's contents.
    ///
    /// A missing or unreadable slot, or one that is not a JSON array, yields
    /// an empty collection. Individual records that fail to decode are
    /// dropped and the rest are kept. Later records repeating an earlier id
    /// are dropped too.
    pub fn load(&mut self) -> &[Person] {
        self.people = match self.storage.read(&self.key) {
            Ok(Some(content)) => match serde_json::from_str::<Vec<Value>>(&content) {
                Ok(entries) => dedup_ids(decode_entries(entries)),
                Err(e) => {
                    warn!(key = %self.key, error = %e, "discarding unparsable album data");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(key = %self.key, error = %e, "failed to read album data");
                Vec::new()
            }
        };
        debug!(count = self.people.len(), "loaded album");
        &self.people
    }

    /// Create or update a person.
    ///
    /// With `existing_id` naming a stored record, that record's fields are
    /// replaced and its id kept. Otherwise a new record with a fresh id is
    /// appended. Either way the collection is re-sorted by name and
    /// persisted. Returns the saved record's id.
    pub fn save(
        &mut self,
        draft: PersonDraft,
        existing_id: Option<&PersonId>,
    ) -> Result<PersonId, StoreError> {
        draft.validate()?;

        let mut next = self.people.clone();
        let existing = existing_id.and_then(|id| next.iter_mut().find(|p| &p.id == id));

        let id = match existing {
            Some(person) => {
                person.apply(draft);
                info!(id = %person.id, "updated person");
                person.id.clone()
            }
            None => {
                let id = self.fresh_id();
                next.push(Person::from_draft(id.clone(), draft));
                info!(id = %id, "created person");
                id
            }
        };

        sort_by_name(&mut next);
        self.commit(next)?;
        Ok(id)
    }

    /// Remove the person with `id`. Returns whether a record was removed.
    ///
    /// An unknown id is a no-op and performs no write.
    pub fn delete(&mut self, id: &PersonId) -> Result<bool, StoreError> {
        if !self.contains(id) {
            debug!(id = %id, "delete of unknown id ignored");
            return Ok(false);
        }

        let next: Vec<Person> = self.people.iter().filter(|p| &p.id != id).cloned().collect();
        self.commit(next)?;
        info!(id = %id, "deleted person");
        Ok(true)
    }

    /// People whose name, notes or profession contain `term`, ignoring case.
    ///
    /// An empty term returns everyone. Results keep the collection's order.
    pub fn search(&self, term: &str) -> Vec<&Person> {
        if term.is_empty() {
            return self.people.iter().collect();
        }

        let term = term.to_lowercase();
        let results: Vec<&Person> = self
            .people
            .iter()
            .filter(|p| p.matches_lowercase(&term))
            .collect();
        debug!(term = %term, matches = results.len(), "searched album");
        results
    }

    /// All people in name order.
    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn get(&self, id: &PersonId) -> Option<&Person> {
        self.people.iter().find(|p| &p.id == id)
    }

    pub fn contains(&self, id: &PersonId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    /// The storage key this store writes to.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Serialize the collection as it is stored.
    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string(&self.people)?)
    }

    fn fresh_id(&self) -> PersonId {
        loop {
            let id = PersonId::new();
            if !self.contains(&id) {
                return id;
            }
        }
    }

    fn commit(&mut self, next: Vec<Person>) -> Result<(), StoreError> {
        let content = serde_json::to_string(&next)?;
        self.storage.write(&self.key, &content)?;
        debug!(key = %self.key, count = next.len(), bytes = content.len(), "persisted album");
        self.people = next;
        Ok(())
    }
}

/// Stable sort by case-insensitive name.
fn sort_by_name(people: &mut [Person]) {
    people.sort_by_cached_key(Person::sort_key);
}

fn decode_entries(entries: Vec<Value>) -> Vec<Person> {
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value::<Person>(entry) {
            Ok(person) => Some(person),
            Err(e) => {
                warn!(index, error = %e, "dropping undecodable record");
                None
            }
        })
        .collect()
}

fn dedup_ids(people: Vec<Person>) -> Vec<Person> {
    let mut seen = HashSet::new();
    people
        .into_iter()
        .filter(|p| {
            let fresh = seen.insert(p.id.clone());
            if !fresh {
                warn!(id = %p.id, "dropping record with duplicate id");
            }
            fresh
        })
        .collect()
}
