use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use hb_core::ports::ConfigStorePort;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

pub const DEFAULT_STATE_FILE: &str = "state.json";

const CURRENT_STATE_VERSION: u32 = 1;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StateFile {
    #[serde(default)]
    version: u32,
    #[serde(default)]
    values: BTreeMap<String, bool>,
}

/// JSON file backed [`ConfigStorePort`].
///
/// Every write rewrites the whole file through a temp file + rename, so a
/// crash leaves either the previous or the new contents on disk.
pub struct FileConfigStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Store located at `base_dir/state.json`.
    pub fn with_defaults(base_dir: impl AsRef<Path>) -> Self {
        Self::new(base_dir.as_ref().join(DEFAULT_STATE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .await
                .with_context(|| format!("create state dir failed: {}", dir.display()))?;
        }
        Ok(())
    }

    async fn read_state(&self) -> Result<StateFile> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(StateFile::default());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("read state failed: {}", self.path.display()))
            }
        };

        if content.trim().is_empty() {
            return Ok(StateFile::default());
        }

        serde_json::from_str(&content)
            .with_context(|| format!("parse state failed: {}", self.path.display()))
    }

    async fn atomic_write(&self, state: &StateFile) -> Result<()> {
        self.ensure_parent_dir().await?;

        let content = serde_json::to_string_pretty(state).context("serialize state failed")?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, content)
            .await
            .with_context(|| format!("write temp state failed: {}", tmp_path.display()))?;

        fs::rename(&tmp_path, &self.path).await.with_context(|| {
            format!(
                "rename temp state to target failed: {} -> {}",
                tmp_path.display(),
                self.path.display()
            )
        })?;

        Ok(())
    }
}

#[async_trait]
impl ConfigStorePort for FileConfigStore {
    async fn get_bool(&self, key: &str) -> Result<bool> {
        let state = self.read_state().await?;
        Ok(state.values.get(key).copied().unwrap_or(false))
    }

    async fn set_bool(&self, key: &str, value: bool) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut state = self.read_state().await?;
        if state.values.get(key) == Some(&value) && state.version == CURRENT_STATE_VERSION {
            return Ok(());
        }

        state.version = CURRENT_STATE_VERSION;
        state.values.insert(key.to_string(), value);
        self.atomic_write(&state).await?;
        debug!(key, value, path = %self.path.display(), "state flag written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hb_core::keys;
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_file_reads_false() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileConfigStore::new(temp_dir.path().join("missing.json"));

        assert!(!store.get_bool(keys::BOOT_LOCAL_ENABLED).await.unwrap());
    }

    #[tokio::test]
    async fn values_survive_a_new_store_instance() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("state.json");

        let store = FileConfigStore::new(&path);
        store
            .set_bool(keys::GRANT_PERMISSION_PENDING, true)
            .await
            .unwrap();
        drop(store);

        let reopened = FileConfigStore::new(&path);
        assert!(reopened
            .get_bool(keys::GRANT_PERMISSION_PENDING)
            .await
            .unwrap());
        assert!(!reopened.get_bool(keys::BOOT_LOCAL_ENABLED).await.unwrap());
    }

    #[tokio::test]
    async fn write_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileConfigStore::with_defaults(temp_dir.path());

        store.set_bool(keys::BOOT_WIRELESS_ENABLED, true).await.unwrap();

        assert!(store.path().exists());
        assert!(!store.path().with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn empty_file_reads_false() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.json");
        fs::write(&path, "").await.unwrap();

        let store = FileConfigStore::new(path);
        assert!(!store.get_bool(keys::BOOT_LOCAL_ENABLED).await.unwrap());
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("corrupt.json");
        fs::write(&path, "{not json").await.unwrap();

        let store = FileConfigStore::new(path);
        let err = store.get_bool(keys::BOOT_LOCAL_ENABLED).await.unwrap_err();
        assert!(err.to_string().contains("parse state failed"));
    }

    #[tokio::test]
    async fn concurrent_writes_keep_every_key() {
        let temp_dir = TempDir::new().unwrap();
        let store = std::sync::Arc::new(FileConfigStore::with_defaults(temp_dir.path()));

        let mut tasks = Vec::new();
        for key in keys::ALL {
            let store = std::sync::Arc::clone(&store);
            tasks.push(tokio::spawn(async move { store.set_bool(key, true).await }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        for key in keys::ALL {
            assert!(store.get_bool(key).await.unwrap(), "{key} lost");
        }
    }
}
