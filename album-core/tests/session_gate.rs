//! Tests for login state and PIN-confirmed deletion.

use album_core::gate::{AUTH_KEY, DEFAULT_DELETE_PIN, DEFAULT_LOGIN_PIN};
use album_core::testing::sample_draft;
use album_core::{
    Album, AlbumConfig, AlbumError, GateError, HashedPin, KeyValueStore, MemoryStorage,
    RecordStore, SessionGate, StaticPin,
};

#[test]
fn test_login_with_correct_pin() {
    let mut gate = SessionGate::new(MemoryStorage::new());
    assert!(!gate.is_authenticated());

    gate.login("1122").unwrap();
    assert!(gate.is_authenticated());
}

#[test]
fn test_login_with_wrong_pin() {
    let mut gate = SessionGate::new(MemoryStorage::new());

    let err = gate.login("0000").unwrap_err();
    assert!(matches!(err, GateError::InvalidPin));
    assert_eq!(err.to_string(), "Invalid PIN.");
    assert!(!gate.is_authenticated());
}

#[test]
fn test_no_lockout_after_failures() {
    let mut gate = SessionGate::new(MemoryStorage::new());
    for _ in 0..20 {
        assert!(gate.login("9999").is_err());
    }
    gate.login(DEFAULT_LOGIN_PIN).unwrap();
    assert!(gate.is_authenticated());
}

#[test]
fn test_delete_pin_does_not_log_in() {
    let mut gate = SessionGate::new(MemoryStorage::new());
    assert!(gate.login(DEFAULT_DELETE_PIN).is_err());
    assert!(!gate.is_authenticated());
}

#[test]
fn test_login_survives_restart_until_logout() {
    let storage = MemoryStorage::new();

    let mut gate = SessionGate::new(storage.clone());
    gate.login("1122").unwrap();
    assert_eq!(storage.read(AUTH_KEY).unwrap().as_deref(), Some("true"));

    let mut restarted = SessionGate::new(storage.clone());
    assert!(restarted.is_authenticated());

    restarted.logout().unwrap();
    assert_eq!(storage.read(AUTH_KEY).unwrap(), None);
    assert!(!SessionGate::new(storage).is_authenticated());
}

#[test]
fn test_logout_when_logged_out() {
    let mut gate = SessionGate::new(MemoryStorage::new());
    gate.logout().unwrap();
    assert!(!gate.is_authenticated());
}

#[test]
fn test_confirm_delete_with_correct_pin() {
    let storage = MemoryStorage::new();
    let mut store = RecordStore::new(storage.clone());
    let gate = SessionGate::new(storage);
    let id = store.save(sample_draft("Ana"), None).unwrap();

    assert!(gate.confirm_delete(&mut store, &id, "1213").unwrap());
    assert!(store.get(&id).is_none());
}

#[test]
fn test_confirm_delete_with_wrong_pin() {
    let storage = MemoryStorage::new();
    let mut store = RecordStore::new(storage.clone());
    let gate = SessionGate::new(storage);
    let id = store.save(sample_draft("Ana"), None).unwrap();

    let err = gate.confirm_delete(&mut store, &id, "0000").unwrap_err();
    assert_eq!(err.to_string(), "Incorrect PIN. Deletion cancelled.");
    assert!(store.get(&id).is_some());

    // The login PIN is not the delete PIN.
    assert!(gate.confirm_delete(&mut store, &id, "1122").is_err());
    assert!(store.get(&id).is_some());
}

#[test]
fn test_hashed_verifiers() {
    let storage = MemoryStorage::new();
    let mut store = RecordStore::new(storage.clone());
    let mut gate = SessionGate::with_verifiers(
        storage,
        AUTH_KEY,
        HashedPin::from_pin("246810"),
        StaticPin::new("1357"),
    );
    let id = store.save(sample_draft("Ana"), None).unwrap();

    assert!(gate.login("1122").is_err());
    gate.login("246810").unwrap();

    assert!(gate.confirm_delete(&mut store, &id, "1213").is_err());
    assert!(gate.confirm_delete(&mut store, &id, "1357").unwrap());
}

#[test]
fn test_album_locks_records_after_logout() {
    let storage = MemoryStorage::new();
    let mut album = Album::with_storage(AlbumConfig::default(), storage);
    album.login("1122").unwrap();
    let id = album.save_person(sample_draft("Ana"), None).unwrap();

    album.logout().unwrap();
    assert!(matches!(album.get(&id), Err(AlbumError::NotAuthenticated)));
    assert!(matches!(
        album.delete_person(&id, "1213"),
        Err(AlbumError::NotAuthenticated)
    ));

    // The record is untouched underneath.
    assert_eq!(album.store().len(), 1);
}
