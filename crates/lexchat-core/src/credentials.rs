//! In-memory holder for the Gemini API key with write-through persistence.

use std::path::PathBuf;

use crate::config::Config;

/// The active API key for this session.
///
/// Reads always come from memory, so a failed write never makes `get`
/// lag behind `set`. The config path is carried explicitly rather than
/// resolved globally; the app owns exactly one store and is its only
/// writer.
pub struct ApiKeyStore {
    key: String,
    config_path: PathBuf,
}

impl ApiKeyStore {
    pub fn new(key: impl Into<String>, config_path: PathBuf) -> Self {
        Self {
            key: key.into(),
            config_path,
        }
    }

    pub fn get(&self) -> &str {
        &self.key
    }

    pub fn is_present(&self) -> bool {
        !self.key.is_empty()
    }

    /// Replace the key and write it through to the config file.
    ///
    /// The in-memory value is updated even when the write fails; the
    /// failure is logged and otherwise ignored.
    pub fn set(&mut self, key: impl Into<String>) {
        self.key = key.into();

        let mut config = Config::load_from(&self.config_path).unwrap_or_else(|_| Config::new());
        config.api_key = Some(self.key.clone());
        if let Err(err) = config.save_to(&self.config_path) {
            log::warn!(
                "failed to persist API key to {}: {:#}",
                self.config_path.display(),
                err
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_is_immediate() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ApiKeyStore::new("", dir.path().join("config.json"));
        assert!(!store.is_present());

        store.set("test-key");
        assert_eq!(store.get(), "test-key");
        assert!(store.is_present());
    }

    #[test]
    fn set_writes_through_to_the_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut store = ApiKeyStore::new("old", path.clone());

        store.set("new-key");

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("new-key"));
    }

    #[test]
    fn set_preserves_other_config_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = Config::new();
        config.model = Some("gemini-1.5-pro".to_string());
        config.save_to(&path).unwrap();

        let mut store = ApiKeyStore::new("", path.clone());
        store.set("test-key");

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.model.as_deref(), Some("gemini-1.5-pro"));
        assert_eq!(reloaded.api_key.as_deref(), Some("test-key"));
    }

    #[test]
    fn memory_updates_even_when_the_write_fails() {
        let dir = tempfile::tempdir().unwrap();
        // Parent of the config path is a regular file, so the write can't succeed
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        let mut store = ApiKeyStore::new("", blocker.join("config.json"));
        store.set("test-key");
        assert_eq!(store.get(), "test-key");
    }
}
