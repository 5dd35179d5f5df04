use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use hb_core::ports::ConfigStorePort;

/// Process-local store. Values are lost on exit.
#[derive(Default)]
pub struct InMemoryConfigStore {
    values: Mutex<BTreeMap<String, bool>>,
}

impl InMemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with initial values.
    pub fn with_values<'a>(values: impl IntoIterator<Item = (&'a str, bool)>) -> Self {
        let store = Self::new();
        {
            let mut guard = store.lock();
            for (key, value) in values {
                guard.insert(key.to_string(), value);
            }
        }
        store
    }

    /// Copy of every stored value.
    pub fn snapshot(&self) -> BTreeMap<String, bool> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, bool>> {
        self.values.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl ConfigStorePort for InMemoryConfigStore {
    async fn get_bool(&self, key: &str) -> anyhow::Result<bool> {
        Ok(self.lock().get(key).copied().unwrap_or(false))
    }

    async fn set_bool(&self, key: &str, value: bool) -> anyhow::Result<()> {
        self.lock().insert(key.to_string(), value);
        Ok(())
    }
}
