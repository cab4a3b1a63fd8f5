use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{Result, TrackerError};
use crate::repository::traits::KeyValueStore;

const STORAGE_FILE_NAME: &str = "storage.json";

/// Key-value store backed by a single JSON object on disk.
#[derive(Clone, Debug)]
pub struct FileKeyValueStore {
    file_path: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(base_dir: &Path) -> Result<Self> {
        fs::create_dir_all(base_dir)?;
        let path = base_dir.join(STORAGE_FILE_NAME);

        if !path.exists() {
            let store = FileKeyValueStore { file_path: path };
            store.write_entries(&BTreeMap::new())?;
            return Ok(store);
        }

        Ok(FileKeyValueStore { file_path: path })
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>> {
        let file = File::open(&self.file_path)?;
        let reader = BufReader::new(file);
        let entries = serde_json::from_reader(reader).map_err(|e| {
            TrackerError::MalformedPersistedState(format!(
                "{}: {}",
                self.file_path.display(),
                e
            ))
        })?;
        Ok(entries)
    }

    fn temp_path(&self) -> PathBuf {
        self.file_path.with_extension("json.tmp")
    }

    /// Writes the map beside the store, then renames it over the store.
    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let temp_path = self.temp_path();
        let file = File::create(&temp_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, entries)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
        drop(writer);
        fs::rename(&temp_path, &self.file_path)?;
        Ok(())
    }

    /// Overwrites the store with an empty map without reading it first.
    pub fn reset(&self) -> Result<()> {
        self.write_entries(&BTreeMap::new())?;
        warn!(path = %self.file_path.display(), "reset key-value store");
        Ok(())
    }

    /// Removes `key`, resetting the whole store if the file can't be parsed.
    pub fn discard(&self, key: &str) -> Result<()> {
        match self.remove(key) {
            Err(TrackerError::MalformedPersistedState(msg)) => {
                warn!(key, error = %msg, "store unreadable, discarding all entries");
                self.reset()
            }
            other => other,
        }
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let mut entries = self.read_entries()?;
        Ok(entries.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.read_entries()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)?;
        debug!(key, bytes = value.len(), "stored value");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.read_entries()?;
        if entries.remove(key).is_some() {
            self.write_entries(&entries)?;
            debug!(key, "removed value");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_new_creates_empty_file() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let store = FileKeyValueStore::new(temp_dir.path())?;
        assert!(store.path().exists());
        assert_eq!(store.get("anything")?, None);
        Ok(())
    }

    #[test]
    fn test_set_get_remove() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let store = FileKeyValueStore::new(temp_dir.path())?;

        store.set("theme", "dark")?;
        store.set("energyUsageData", "{}")?;
        assert_eq!(store.get("theme")?.as_deref(), Some("dark"));

        // A second handle sees what the first one wrote.
        let reopened = FileKeyValueStore::new(temp_dir.path())?;
        assert_eq!(reopened.get("energyUsageData")?.as_deref(), Some("{}"));

        reopened.remove("theme")?;
        assert_eq!(store.get("theme")?, None);
        Ok(())
    }

    #[test]
    fn test_corrupt_file_is_reported() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let store = FileKeyValueStore::new(temp_dir.path())?;
        fs::write(store.path(), "not json")?;

        let err = store.get("theme").unwrap_err();
        assert!(matches!(err, TrackerError::MalformedPersistedState(_)));
        Ok(())
    }

    #[test]
    fn test_discard_recovers_truncated_file() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let store = FileKeyValueStore::new(temp_dir.path())?;
        fs::write(store.path(), "{truncated")?;
        assert!(store.remove("energyUsageData").is_err());

        store.discard("energyUsageData")?;
        assert_eq!(store.get("energyUsageData")?, None);
        store.set("theme", "light")?;
        assert_eq!(store.get("theme")?.as_deref(), Some("light"));
        Ok(())
    }

    #[test]
    fn test_discard_keeps_other_keys_when_readable() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let store = FileKeyValueStore::new(temp_dir.path())?;
        store.set("theme", "dark")?;
        store.set("energyUsageData", "{broken")?;

        store.discard("energyUsageData")?;
        assert_eq!(store.get("energyUsageData")?, None);
        assert_eq!(store.get("theme")?.as_deref(), Some("dark"));
        Ok(())
    }

    #[test]
    fn test_write_leaves_no_temp_file() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let store = FileKeyValueStore::new(temp_dir.path())?;
        store.set("theme", "dark")?;

        assert!(!store.temp_path().exists());
        let names: Vec<_> = fs::read_dir(temp_dir.path())?
            .map(|entry| entry.map(|e| e.file_name()))
            .collect::<std::io::Result<_>>()?;
        assert_eq!(names, vec![std::ffi::OsString::from("storage.json")]);
        Ok(())
    }
}
