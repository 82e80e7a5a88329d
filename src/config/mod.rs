//! Configuration management for ossmirror

pub mod schema;

pub use schema::Config;

use crate::error::{MirrorError, MirrorResult};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a config manager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Load and validate the configuration file
    pub async fn load(&self) -> MirrorResult<Config> {
        self.load_from_file(&self.config_path).await
    }

    /// Load configuration from a specific file
    pub async fn load_from_file(&self, path: &Path) -> MirrorResult<Config> {
        let content = fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                MirrorError::ConfigNotFound(path.to_path_buf())
            } else {
                MirrorError::ConfigRead {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;

        let config: Config =
            serde_json::from_str(&content).map_err(|e| MirrorError::ConfigInvalid {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        if let Some(field) = config.missing_field() {
            return Err(MirrorError::ConfigInvalid {
                path: path.to_path_buf(),
                reason: format!("field `{}` must not be empty", field),
            });
        }

        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}
