use anyhow::Context;
use knights_tour_core::{KeyValueStore, StorageError};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const FILE_KEY: &str = "<store file>";

/// Key-value store persisted as one JSON object of string values.
///
/// The whole file is read once on open and rewritten on every `set`.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Opens the store at `path`. A missing file is an empty store; an unreadable one is
    /// replaced on the next write.
    pub fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let entries = match fs::read(&path) {
            Ok(raw) => serde_json::from_slice(&raw).unwrap_or_else(|err| {
                log::warn!("ignoring malformed store {}: {}", path.display(), err);
                BTreeMap::new()
            }),
            Err(err) if err.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                return Err(err).with_context(|| format!("failed to read {}", path.display()));
            }
        };
        log::debug!("opened store {} ({} keys)", path.display(), entries.len());
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(&self.entries).map_err(|source| {
            StorageError::Serialize {
                key: FILE_KEY,
                source,
            }
        })?;

        let staging = self.path.with_extension("json.tmp");
        let written = fs::write(&staging, raw).and_then(|()| fs::rename(&staging, &self.path));
        if let Err(err) = written {
            if let Err(cleanup) = fs::remove_file(&staging) {
                log::debug!("could not remove {}: {}", staging.display(), cleanup);
            }
            return Err(err.into());
        }
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        let previous = self.entries.insert(key.to_owned(), value);
        if let Err(err) = self.flush() {
            match previous {
                Some(previous) => self.entries.insert(key.to_owned(), previous),
                None => self.entries.remove(key),
            };
            return Err(err);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use knights_tour_core::{BoardSize, Settings, Stored, StoredOrDefault};

    #[test]
    fn missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("absent.json")).unwrap();

        assert_eq!(store.get("anything"), None);
    }

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let mut store = FileStore::open(&path).unwrap();
        store.set("greeting", "hello".to_owned()).unwrap();
        store.set("greeting", "hi".to_owned()).unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("greeting").as_deref(), Some("hi"));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn malformed_file_starts_empty_and_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "not json at all").unwrap();

        let mut store = FileStore::open(&path).unwrap();
        assert_eq!(store.get("key"), None);

        store.set("key", "value".to_owned()).unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        assert_eq!(
            serde_json::from_str::<BTreeMap<String, String>>(&raw).unwrap(),
            BTreeMap::from([("key".to_owned(), "value".to_owned())])
        );
    }

    #[test]
    fn non_utf8_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, [0xff, 0xfe, 0x00, 0x7b]).unwrap();

        let mut store = FileStore::open(&path).unwrap();
        assert_eq!(store.get("key"), None);

        store.set("key", "value".to_owned()).unwrap();
        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("key").as_deref(), Some("value"));
    }

    #[test]
    fn failed_write_keeps_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        // a directory where the file should be makes the final rename fail
        let path = dir.path().join("store.json");
        fs::create_dir(&path).unwrap();
        let mut store = FileStore {
            path: path.clone(),
            entries: BTreeMap::from([("key".to_owned(), "old".to_owned())]),
        };

        assert!(store.set("key", "new".to_owned()).is_err());
        assert_eq!(store.get("key").as_deref(), Some("old"));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn settings_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let settings = Settings {
            board_size: BoardSize::new(8).unwrap(),
        };

        settings.save(&mut FileStore::open(&path).unwrap()).unwrap();

        assert_eq!(
            Settings::load_or_default(&FileStore::open(&path).unwrap()),
            settings
        );
    }
}
