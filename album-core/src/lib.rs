//! Family album core: person records, persistence and PIN-gated sessions.
//!
//! This crate provides:
//! - A record store kept sorted by name and mirrored to durable storage
//! - Case-insensitive search over names, notes and professions
//! - A session gate with login and delete-confirmation PINs
//! - Photo file resolution into embeddable `data:` URLs
//!
//! # Quick Start
//!
//! ```ignore
//! use album_core::{Album, AlbumConfig, PersonDraft};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut album = Album::open(AlbumConfig::from_env());
//!     album.login("1122")?;
//!
//!     let id = album.save_person(PersonDraft::new("Ana", "https://example.com/ana.jpg"), None)?;
//!     for person in album.search("ana")? {
//!         println!("{} ({})", person.name, person.status.label());
//!     }
//!
//!     album.delete_person(&id, "1213")?;
//!     Ok(())
//! }
//! ```

pub mod album;
pub mod config;
pub mod gate;
pub mod person;
pub mod photo;
pub mod storage;
pub mod store;
pub mod testing;

// Primary public API
pub use album::{Album, AlbumError};
pub use config::AlbumConfig;
pub use gate::{CredentialVerifier, GateError, HashedPin, SessionGate, StaticPin};
pub use person::{Person, PersonDraft, PersonId, Status, ValidationError};
pub use photo::{DataUrlResolver, PhotoError, PhotoResolver};
pub use storage::{FileStorage, KeyValueStore, MemoryStorage, StorageError};
pub use store::{RecordStore, StoreError};
pub use testing::TestHarness;
