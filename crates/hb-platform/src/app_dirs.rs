use std::path::PathBuf;

const APP_DIR_NAME: &str = "helperboot";
const PROFILE_ENV: &str = "HELPERBOOT_PROFILE";

fn resolved_app_dir_name() -> String {
    match std::env::var(PROFILE_ENV) {
        Ok(profile) if !profile.is_empty() => format!("{APP_DIR_NAME}-{profile}"),
        _ => APP_DIR_NAME.to_string(),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppDirsError {
    #[error("data local dir unavailable")]
    DataLocalDirUnavailable,

    #[error("config dir unavailable")]
    ConfigDirUnavailable,
}

/// Per-user application directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDirs {
    /// State file and logs live here.
    pub app_data_root: PathBuf,
    /// `config.toml` lives here.
    pub app_config_root: PathBuf,
}

impl AppDirs {
    pub fn state_file(&self) -> PathBuf {
        self.app_data_root.join("state.json")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.app_data_root.join("logs")
    }

    pub fn config_file(&self) -> PathBuf {
        self.app_config_root.join("config.toml")
    }
}

pub struct DirsAppDirsAdapter {
    base_override: Option<PathBuf>,
}

impl DirsAppDirsAdapter {
    pub fn new() -> Self {
        Self {
            base_override: None,
        }
    }

    /// Resolve every directory under `base` instead of the system dirs.
    pub fn with_base_dir(base: PathBuf) -> Self {
        Self {
            base_override: Some(base),
        }
    }

    /// `<data-local>/helperboot[-profile]` and `<config>/helperboot[-profile]`.
    ///
    /// `HELPERBOOT_PROFILE` isolates side-by-side installations.
    pub fn get_app_dirs(&self) -> Result<AppDirs, AppDirsError> {
        let base_data = self
            .base_override
            .clone()
            .or_else(dirs::data_local_dir)
            .ok_or(AppDirsError::DataLocalDirUnavailable)?;
        let base_config = self
            .base_override
            .clone()
            .or_else(dirs::config_dir)
            .ok_or(AppDirsError::ConfigDirUnavailable)?;
        let app_dir_name = resolved_app_dir_name();

        Ok(AppDirs {
            app_data_root: base_data.join(&app_dir_name),
            app_config_root: base_config.join(&app_dir_name),
        })
    }
}

impl Default for DirsAppDirsAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static PROFILE_ENV_LOCK: Mutex<()> = Mutex::new(());

    fn with_profile<T>(value: Option<&str>, f: impl FnOnce() -> T) -> T {
        let _guard = PROFILE_ENV_LOCK.lock().unwrap();
        let previous = std::env::var(PROFILE_ENV).ok();

        match value {
            Some(profile) => std::env::set_var(PROFILE_ENV, profile),
            None => std::env::remove_var(PROFILE_ENV),
        }

        let result = f();

        match previous {
            Some(profile) => std::env::set_var(PROFILE_ENV, profile),
            None => std::env::remove_var(PROFILE_ENV),
        }

        result
    }

    #[test]
    fn adapter_appends_app_dir_name() {
        with_profile(None, || {
            let adapter = DirsAppDirsAdapter::with_base_dir(PathBuf::from("/tmp"));
            let dirs = adapter.get_app_dirs().unwrap();
            assert_eq!(dirs.app_data_root, PathBuf::from("/tmp/helperboot"));
            assert_eq!(dirs.state_file(), PathBuf::from("/tmp/helperboot/state.json"));
            assert_eq!(dirs.config_file(), PathBuf::from("/tmp/helperboot/config.toml"));
        });
    }

    #[test]
    fn profiles_get_separate_dirs() {
        let dirs_a = with_profile(Some("a"), || {
            DirsAppDirsAdapter::with_base_dir(PathBuf::from("/tmp"))
                .get_app_dirs()
                .unwrap()
        });
        let dirs_b = with_profile(Some("b"), || {
            DirsAppDirsAdapter::with_base_dir(PathBuf::from("/tmp"))
                .get_app_dirs()
                .unwrap()
        });

        assert_eq!(dirs_a.app_data_root, PathBuf::from("/tmp/helperboot-a"));
        assert_eq!(dirs_b.app_data_root, PathBuf::from("/tmp/helperboot-b"));
        assert_ne!(dirs_a.log_dir(), dirs_b.log_dir());
    }
}
