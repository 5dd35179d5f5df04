//! Configuration domain models

pub mod app_config;

pub use app_config::{
    AppConfig, BootstrapConfig, GrantConfig, StorageConfig, ToolsConfig, MIN_POLL_INTERVAL,
};
