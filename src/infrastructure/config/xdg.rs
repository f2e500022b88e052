//! TOML config file under the XDG config directory

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use crate::application::ports::ConfigStore;
use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;

/// `$XDG_CONFIG_HOME/voice-recorder/config.toml` (or the platform equivalent)
pub struct XdgConfigStore {
    path: PathBuf,
}

impl XdgConfigStore {
    pub fn new() -> Self {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("~/.config"));
        Self {
            path: base.join("voice-recorder").join("config.toml"),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn parse_toml(content: &str) -> Result<AppConfig, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

impl Default for XdgConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigStore for XdgConfigStore {
    async fn load(&self) -> Result<AppConfig, ConfigError> {
        match fs::read_to_string(&self.path).await {
            Ok(content) => Self::parse_toml(&content),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(AppConfig::empty()),
            Err(e) => Err(ConfigError::ReadError(e.to_string())),
        }
    }

    async fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        let write_err = |e: std::io::Error| ConfigError::WriteError(e.to_string());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await.map_err(write_err)?;
        }
        let content =
            toml::to_string_pretty(config).map_err(|e| ConfigError::WriteError(e.to_string()))?;
        fs::write(&self.path, content).await.map_err(write_err)?;

        debug!(path = %self.path.display(), "config saved");
        Ok(())
    }

    fn path(&self) -> PathBuf {
        self.path.clone()
    }

    fn exists(&self) -> bool {
        self.path.exists()
    }

    async fn init(&self) -> Result<(), ConfigError> {
        if self.exists() {
            return Err(ConfigError::AlreadyExists(
                self.path.display().to_string(),
            ));
        }
        self.save(&AppConfig::defaults()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_path_is_xdg() {
        let store = XdgConfigStore::new();
        let path = store.path();
        assert!(path.to_string_lossy().contains("voice-recorder"));
        assert!(path.to_string_lossy().ends_with("config.toml"));
    }

    #[test]
    fn custom_path() {
        let store = XdgConfigStore::with_path("/custom/path/config.toml");
        assert_eq!(store.path(), PathBuf::from("/custom/path/config.toml"));
    }

    #[test]
    fn parse_toml_flat_format() {
        let content = r#"
data_dir = "/srv/voice"
input_device = "USB Mic"
max_duration = "30m"
"#;

        let config = XdgConfigStore::parse_toml(content).unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/srv/voice")));
        assert_eq!(config.input_device, Some("USB Mic".to_string()));
        assert_eq!(config.max_duration, Some("30m".to_string()));
    }

    #[test]
    fn parse_toml_rejects_garbage() {
        assert!(matches!(
            XdgConfigStore::parse_toml("data_dir = ["),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[tokio::test]
    async fn load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = XdgConfigStore::with_path(dir.path().join("config.toml"));
        assert_eq!(store.load().await.unwrap(), AppConfig::empty());
    }

    #[tokio::test]
    async fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = XdgConfigStore::with_path(dir.path().join("nested/config.toml"));
        let config = AppConfig {
            input_device: Some("USB Mic".to_string()),
            max_duration: Some("5m".to_string()),
            ..Default::default()
        };

        store.save(&config).await.unwrap();
        assert_eq!(store.load().await.unwrap(), config);
    }

    #[tokio::test]
    async fn init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let store = XdgConfigStore::with_path(dir.path().join("config.toml"));

        store.init().await.unwrap();
        assert!(store.exists());
        assert!(matches!(
            store.init().await,
            Err(ConfigError::AlreadyExists(_))
        ));
    }
}
