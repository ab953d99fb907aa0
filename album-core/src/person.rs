//! Person records stored in the album.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Base URL of the generated-avatar service used when a record has no photo.
const AVATAR_SERVICE_URL: &str = "https://ui-avatars.com/api/";

/// Avatar size used by card layouts.
pub const CARD_AVATAR_SIZE: u32 = 400;

/// Avatar size used by gallery layouts.
pub const GALLERY_AVATAR_SIZE: u32 = 500;

/// Unique identifier for a person record.
///
/// New ids are UUID v4 strings. Ids read back from storage are kept verbatim,
/// so records written by other tools still load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(String);

impl PersonId {
    /// Create a new unique person ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PersonId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PersonId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for PersonId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Whether a family member is living.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Alive,
    Deceased,
}

impl Status {
    /// Get the display label for this status.
    pub fn label(&self) -> &'static str {
        match self {
            Status::Alive => "Alive",
            Status::Deceased => "Deceased",
        }
    }
}

/// Reasons a draft cannot be saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Name is required.")]
    MissingName,

    #[error("Photo is required.")]
    MissingPhoto,
}

/// A family member's stored profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub birthday: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: Status,
    #[serde(default, deserialize_with = "null_as_default")]
    pub photo_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub notes: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub profession: String,
}

/// Treat an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Person {
    /// Build a record from a draft, assigning the given id.
    pub fn from_draft(id: PersonId, draft: PersonDraft) -> Self {
        let mut person = Self {
            id,
            name: String::new(),
            birthday: String::new(),
            status: Status::Alive,
            photo_url: String::new(),
            notes: String::new(),
            profession: String::new(),
        };
        person.apply(draft);
        person
    }

    /// Replace every field except the id.
    pub fn apply(&mut self, draft: PersonDraft) {
        self.name = draft.name;
        self.birthday = draft.birthday;
        self.status = draft.status;
        self.photo_url = draft.photo_url;
        self.notes = draft.notes;
        self.profession = draft.profession.trim().to_string();
    }

    /// Copy the editable fields back into a draft, e.g. to prefill an edit form.
    pub fn to_draft(&self) -> PersonDraft {
        PersonDraft {
            name: self.name.clone(),
            birthday: self.birthday.clone(),
            status: self.status,
            photo_url: self.photo_url.clone(),
            notes: self.notes.clone(),
            profession: self.profession.clone(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.status == Status::Alive
    }

    /// Photo to render, falling back to a generated avatar when none is stored.
    pub fn display_photo_url(&self, size: u32) -> String {
        if self.photo_url.is_empty() {
            placeholder_avatar_url(&self.name, size)
        } else {
            self.photo_url.clone()
        }
    }

    /// Sort key: names compare case-insensitively.
    pub(crate) fn sort_key(&self) -> String {
        self.name.to_lowercase()
    }

    /// Check whether name, notes or profession contain an already-lowercased term.
    pub(crate) fn matches_lowercase(&self, term: &str) -> bool {
        self.name.to_lowercase().contains(term)
            || self.notes.to_lowercase().contains(term)
            || self.profession.to_lowercase().contains(term)
    }
}

/// Caller-supplied fields for creating or updating a person.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonDraft {
    pub name: String,
    pub birthday: String,
    pub status: Status,
    pub photo_url: String,
    pub notes: String,
    pub profession: String,
}

impl PersonDraft {
    /// Start a draft with the two required fields.
    pub fn new(name: impl Into<String>, photo_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            photo_url: photo_url.into(),
            ..Self::default()
        }
    }

    pub fn with_birthday(mut self, birthday: impl Into<String>) -> Self {
        self.birthday = birthday.into();
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn with_profession(mut self, profession: impl Into<String>) -> Self {
        self.profession = profession.into();
        self
    }

    /// Check the fields every persisted record must carry.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }
        if self.photo_url.is_empty() {
            return Err(ValidationError::MissingPhoto);
        }
        Ok(())
    }
}

/// Generated avatar URL for a name, used when no photo is available.
pub fn placeholder_avatar_url(name: &str, size: u32) -> String {
    format!(
        "{AVATAR_SERVICE_URL}?name={}&background=random&size={size}",
        urlencoding::encode(name)
    )
}
