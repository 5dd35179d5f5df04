//! Configuration loading.
//!
//! Pure data loading: whatever the file says is taken as-is. Sections and
//! fields missing from the file keep their defaults.

use std::path::Path;

use anyhow::Context;
use hb_core::config::AppConfig;
use hb_platform::AppDirs;

/// Load configuration from a TOML file. A missing file yields defaults.
pub fn load_config(config_path: &Path) -> anyhow::Result<AppConfig> {
    let content = match std::fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(AppConfig::default());
        }
        Err(err) => {
            return Err(err).with_context(|| {
                format!("Failed to read config file: {}", config_path.display())
            })
        }
    };
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", config_path.display()))
}

/// Fill storage paths left empty in the file from the per-user dirs.
pub fn with_default_paths(mut config: AppConfig, dirs: &AppDirs) -> AppConfig {
    if config.storage.state_file.as_os_str().is_empty() {
        config.storage.state_file = dirs.state_file();
    }
    if config.storage.log_dir.as_os_str().is_empty() {
        config.storage.log_dir = dirs.log_dir();
    }
    config
}
