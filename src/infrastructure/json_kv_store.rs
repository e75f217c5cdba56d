//! Session key-value store persisted as a flat JSON object

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use crate::ports::KeyValueStore;

/// Key-value store backed by one JSON file
///
/// The whole map is read and rewritten on every change; a missing file is an
/// empty store.
pub struct JsonKeyValueStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonKeyValueStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<BTreeMap<String, String>> {
        let exists = fs::try_exists(&self.path)
            .await
            .with_context(|| format!("failed to check {}", self.path.display()))?;
        if !exists {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", self.path.display()))
    }

    async fn save(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let content = serde_json::to_string_pretty(entries)?;
        write_atomically(&self.path, content.as_bytes()).await
    }
}

impl KeyValueStore for JsonKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load().await?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await?;
        debug!("session storage: {} = {}", key, value);
        entries.insert(key.to_string(), value);
        self.save(&entries).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await?;
        if entries.remove(key).is_some() {
            debug!("session storage: removed {}", key);
            self.save(&entries).await?;
        }
        Ok(())
    }
}

/// Write to a sibling temp file, then rename over the target
pub(crate) async fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, bytes)
        .await
        .with_context(|| format!("failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .await
        .with_context(|| format!("failed to replace {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, NamedTempFile};

    #[tokio::test]
    async fn test_set_get_delete_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sessao.json");

        let store = JsonKeyValueStore::new(&path);
        assert_eq!(store.get("agua_last_index_Janeiro/2025").await.unwrap(), None);
        store
            .set("agua_last_index_Janeiro/2025", "7".to_string())
            .await
            .unwrap();

        let reopened = JsonKeyValueStore::new(&path);
        assert_eq!(
            reopened.get("agua_last_index_Janeiro/2025").await.unwrap(),
            Some("7".to_string())
        );

        reopened.delete("agua_last_index_Janeiro/2025").await.unwrap();
        assert_eq!(store.get("agua_last_index_Janeiro/2025").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "not json").unwrap();

        let store = JsonKeyValueStore::new(file.path());
        assert!(store.get("any").await.is_err());
        assert!(store.set("any", "1".to_string()).await.is_err());
        assert_eq!(std::fs::read_to_string(file.path()).unwrap(), "not json");
    }

    #[tokio::test]
    async fn test_failed_existence_check_does_not_wipe_entries() {
        let file = NamedTempFile::new().unwrap();
        let store = JsonKeyValueStore::new(file.path().join("sessao.json"));

        assert!(store.get("agua_last_index_Janeiro/2025").await.is_err());
        assert!(store
            .set("agua_last_index_Janeiro/2025", "3".to_string())
            .await
            .is_err());
    }
}
