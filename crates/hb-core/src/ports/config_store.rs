use async_trait::async_trait;

use crate::boot::BootFlags;
use crate::keys;

/// Durable device-local key/value store.
///
/// Values survive process restarts and are never synced across devices.
/// Reading a key that was never written yields `false`.
#[async_trait]
pub trait ConfigStorePort: Send + Sync {
    async fn get_bool(&self, key: &str) -> anyhow::Result<bool>;
    async fn set_bool(&self, key: &str, value: bool) -> anyhow::Result<()>;
}

/// Read the persisted boot flags.
pub async fn load_boot_flags(store: &dyn ConfigStorePort) -> anyhow::Result<BootFlags> {
    Ok(BootFlags {
        local: store.get_bool(keys::BOOT_LOCAL_ENABLED).await?,
        wireless: store.get_bool(keys::BOOT_WIRELESS_ENABLED).await?,
    })
}

#[cfg(test)]
mockall::mock! {
    pub ConfigStore {}

    #[async_trait]
    impl ConfigStorePort for ConfigStore {
        async fn get_bool(&self, key: &str) -> anyhow::Result<bool>;
        async fn set_bool(&self, key: &str, value: bool) -> anyhow::Result<()>;
    }
}
