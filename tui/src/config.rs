//! Layered configuration: defaults, optional TOML file, then `GYMTRACK__*`
//! environment variables.

use std::path::{Path, PathBuf};

use color_eyre::eyre::WrapErr;
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

const APP_DIR: &str = "gymtrack";
const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1/";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub log: LogConfig,
    pub notifications: NotificationConfig,
}

impl AppConfig {
    /// Loads from `<config_dir>/gymtrack/config.toml` if present.
    pub fn load() -> color_eyre::Result<Self> {
        let file = dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"));
        Self::load_from(file.as_deref())
    }

    pub fn load_from(file: Option<&Path>) -> color_eyre::Result<Self> {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(APP_DIR);

        let mut builder = Config::builder()
            .set_default("api.base_url", DEFAULT_BASE_URL)?
            .set_default("api.timeout_secs", DEFAULT_TIMEOUT_SECS)?
            .set_default("storage.path", path_default(&data_dir.join("storage.json")))?
            .set_default("log.path", path_default(&data_dir.join("gymtrack.log")))?
            .set_default("notifications.enabled", true)?;

        if let Some(path) = file {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
        }

        let mut config: AppConfig = builder
            .add_source(
                Environment::with_prefix("GYMTRACK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .wrap_err("failed to load config")?
            .try_deserialize()
            .wrap_err("failed to parse config")?;

        // Relative joins drop the last segment unless the base ends in '/'.
        if !config.api.base_url.ends_with('/') {
            config.api.base_url.push('/');
        }
        Ok(config)
    }
}

fn path_default(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_apply_without_file() {
        let config = AppConfig::load_from(None).unwrap();
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(config.notifications.enabled);
        assert!(config.storage.path.ends_with("storage.json"));
    }

    #[test]
    fn file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[api]\nbase_url = \"https://gym.example.com/api/v1\"\n\n[notifications]\nenabled = false"
        )
        .unwrap();

        let config = AppConfig::load_from(Some(file.path())).unwrap();
        assert_eq!(config.api.base_url, "https://gym.example.com/api/v1/");
        assert!(!config.notifications.enabled);
        assert_eq!(config.api.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
    }
}
