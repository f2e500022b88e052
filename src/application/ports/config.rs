//! Configuration file port

use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;

/// Where the app configuration file lives and how it is read back
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Read the file. A missing file yields [`AppConfig::empty`].
    async fn load(&self) -> Result<AppConfig, ConfigError>;

    /// Replace the file contents, creating parent directories
    async fn save(&self, config: &AppConfig) -> Result<(), ConfigError>;

    fn path(&self) -> PathBuf;

    fn exists(&self) -> bool;

    /// Write [`AppConfig::defaults`]; `AlreadyExists` if a file is present
    async fn init(&self) -> Result<(), ConfigError>;
}
