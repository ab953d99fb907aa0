//! Album configuration.

use crate::gate::{AUTH_KEY, DEFAULT_DELETE_PIN, DEFAULT_LOGIN_PIN};
use crate::store::DATA_KEY;
use std::path::PathBuf;

/// Environment variable overriding the data directory.
pub const ENV_DATA_DIR: &str = "ALBUM_DATA_DIR";

/// Environment variable overriding the login PIN.
pub const ENV_LOGIN_PIN: &str = "ALBUM_LOGIN_PIN";

/// Environment variable overriding the delete PIN.
pub const ENV_DELETE_PIN: &str = "ALBUM_DELETE_PIN";

/// Directory used when nothing else is configured.
const DEFAULT_DATA_DIR: &str = "album_data";

/// Configuration for opening an album.
#[derive(Clone)]
pub struct AlbumConfig {
    /// Directory holding slot files when file storage is used.
    pub data_dir: PathBuf,

    /// Storage key of the record collection.
    pub data_key: String,

    /// Storage key of the authenticated flag.
    pub auth_key: String,

    /// PIN required to log in.
    pub login_pin: String,

    /// PIN required to confirm a deletion.
    pub delete_pin: String,
}

impl AlbumConfig {
    /// Create a config rooted at `data_dir` with default keys and PINs.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            data_key: DATA_KEY.to_string(),
            auth_key: AUTH_KEY.to_string(),
            login_pin: DEFAULT_LOGIN_PIN.to_string(),
            delete_pin: DEFAULT_DELETE_PIN.to_string(),
        }
    }

    /// Build a config from the environment, loading `.env` if present.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    ///
    /// Unset or empty variables keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).filter(|v| !v.is_empty());

        let data_dir = var(ENV_DATA_DIR).unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());
        let mut config = Self::new(data_dir);
        if let Some(pin) = var(ENV_LOGIN_PIN) {
            config.login_pin = pin;
        }
        if let Some(pin) = var(ENV_DELETE_PIN) {
            config.delete_pin = pin;
        }
        config
    }

    /// Set the storage key for records.
    pub fn with_data_key(mut self, key: impl Into<String>) -> Self {
        self.data_key = key.into();
        self
    }

    /// Set the storage key for the auth flag.
    pub fn with_auth_key(mut self, key: impl Into<String>) -> Self {
        self.auth_key = key.into();
        self
    }

    /// Set the login PIN.
    pub fn with_login_pin(mut self, pin: impl Into<String>) -> Self {
        self.login_pin = pin.into();
        self
    }

    /// Set the delete PIN.
    pub fn with_delete_pin(mut self, pin: impl Into<String>) -> Self {
        self.delete_pin = pin.into();
        self
    }
}

impl Default for AlbumConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR)
    }
}

// PINs stay out of debug output.
impl std::fmt::Debug for AlbumConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlbumConfig")
            .field("data_dir", &self.data_dir)
            .field("data_key", &self.data_key)
            .field("auth_key", &self.auth_key)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AlbumConfig::default();
        assert_eq!(config.data_key, "family-album-data");
        assert_eq!(config.auth_key, "family-album-auth");
        assert_eq!(config.login_pin, "1122");
        assert_eq!(config.delete_pin, "1213");
        assert_eq!(config.data_dir, PathBuf::from("album_data"));
    }

    #[test]
    fn test_builder() {
        let config = AlbumConfig::new("/tmp/album")
            .with_data_key("people")
            .with_auth_key("auth")
            .with_login_pin("4321")
            .with_delete_pin("8765");

        assert_eq!(config.data_dir, PathBuf::from("/tmp/album"));
        assert_eq!(config.data_key, "people");
        assert_eq!(config.auth_key, "auth");
        assert_eq!(config.login_pin, "4321");
        assert_eq!(config.delete_pin, "8765");
    }

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, &str> = [
            (ENV_DATA_DIR, "/srv/album"),
            (ENV_LOGIN_PIN, "2468"),
            (ENV_DELETE_PIN, ""),
        ]
        .into_iter()
        .collect();

        let config = AlbumConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string()));
        assert_eq!(config.data_dir, PathBuf::from("/srv/album"));
        assert_eq!(config.login_pin, "2468");
        assert_eq!(config.delete_pin, DEFAULT_DELETE_PIN);
    }

    #[test]
    fn test_debug_hides_pins() {
        let debug = format!("{:?}", AlbumConfig::default().with_login_pin("5555"));
        assert!(!debug.contains("5555"));
        assert!(debug.contains("family-album-data"));
    }
}
