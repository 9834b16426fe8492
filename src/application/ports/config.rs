//! Configuration port interface

use async_trait::async_trait;
use std::path::PathBuf;
use tracing::warn;

use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;

/// Port for configuration storage
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Load configuration from storage.
    /// A missing file yields an empty config.
    async fn load(&self) -> Result<AppConfig, ConfigError>;

    /// Save configuration to storage.
    async fn save(&self, config: &AppConfig) -> Result<(), ConfigError>;

    /// Get the configuration file path.
    fn path(&self) -> PathBuf;

    /// Check if configuration file exists.
    fn exists(&self) -> bool;

    /// Write a config file with defaults. Fails if the file already exists.
    async fn init(&self) -> Result<(), ConfigError>;

    /// Defaults overlaid with the stored file. An unreadable file is
    /// logged and ignored so the daemon can still start.
    async fn load_merged(&self) -> AppConfig {
        match self.load().await {
            Ok(file) => AppConfig::defaults().merge(file),
            Err(e) => {
                warn!(path = %self.path().display(), error = %e, "ignoring config file");
                AppConfig::defaults()
            }
        }
    }
}
