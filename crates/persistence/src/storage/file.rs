//! File-based KeyValueStore implementation.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::BackendError;
use crate::storage::KeyValueStore;

const EXTENSION: &str = "kv";

/// File-based implementation of KeyValueStore.
///
/// Each key is stored as its own file in `base_dir`.
///
/// # File Format
///
/// Values are written verbatim to `{hex(key)}.kv`. Hex-encoding the key
/// keeps namespaced keys such as `bubblepop:player` valid file names on
/// every platform and lets [`keys`](KeyValueStore::keys) recover them.
/// Writes go to a `.tmp` sibling first and are moved into place with a
/// rename, so a crash never leaves a half-written value behind.
pub struct FileKeyValueStore {
    base_dir: PathBuf,
}

impl FileKeyValueStore {
    /// Create a store rooted at `base_dir`, creating the directory if needed.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self, BackendError> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get the path to a key's file.
    fn key_path(&self, key: &str) -> PathBuf {
        self.base_dir
            .join(format!("{}.{EXTENSION}", hex::encode(key.as_bytes())))
    }

    /// Recover a key from one of this store's file names.
    fn key_from_path(path: &Path) -> Option<String> {
        if path.extension()?.to_str()? != EXTENSION {
            return None;
        }
        let stem = path.file_stem()?.to_str()?;
        let bytes = hex::decode(stem).ok()?;
        String::from_utf8(bytes).ok()
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        match fs::read_to_string(self.key_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(BackendError::Io(e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), BackendError> {
        let path = self.key_path(key);
        let temp_path = path.with_extension(format!("{EXTENSION}.tmp"));

        fs::write(&temp_path, value)?;
        fs::rename(&temp_path, &path)?;

        tracing::trace!("Wrote {} ({} bytes) to {}", key, value.len(), path.display());

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), BackendError> {
        match fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BackendError::Io(e)),
        }
    }

    fn clear(&self) -> Result<(), BackendError> {
        for key in self.keys()? {
            self.remove(&key)?;
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, BackendError> {
        let mut keys = Vec::new();

        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            if let Some(key) = Self::key_from_path(&path) {
                keys.push(key);
            }
        }

        keys.sort_unstable();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, FileKeyValueStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(temp_dir.path()).unwrap();
        (temp_dir, store)
    }

    #[test]
    fn test_set_and_get() {
        let (_temp, store) = setup();

        store.set("bubblepop:player", r#"{"level":1}"#).unwrap();

        assert_eq!(
            store.get("bubblepop:player").unwrap().as_deref(),
            Some(r#"{"level":1}"#)
        );
        assert_eq!(store.get("bubblepop:settings").unwrap(), None);
    }

    #[test]
    fn test_values_survive_reopen() {
        let (temp, store) = setup();
        store.set("bubblepop:version", "1.0.0").unwrap();
        drop(store);

        let reopened = FileKeyValueStore::new(temp.path()).unwrap();
        assert_eq!(
            reopened.get("bubblepop:version").unwrap().as_deref(),
            Some("1.0.0")
        );
    }

    #[test]
    fn test_keys_ignore_foreign_files() {
        let (temp, store) = setup();
        store.set("b", "2").unwrap();
        store.set("a", "1").unwrap();
        fs::write(temp.path().join("notes.txt"), "hello").unwrap();

        assert_eq!(store.keys().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_remove_and_clear() {
        let (_temp, store) = setup();
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();

        store.remove("a").unwrap();
        store.remove("a").unwrap();
        assert_eq!(store.keys().unwrap(), vec!["b"]);

        store.clear().unwrap();
        assert!(store.keys().unwrap().is_empty());
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let (temp, store) = setup();
        store.set("a", "1").unwrap();

        let leftovers = fs::read_dir(temp.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().to_string_lossy().ends_with(".tmp"))
            .count();
        assert_eq!(leftovers, 0);
    }
}
