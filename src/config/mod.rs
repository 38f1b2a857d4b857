//! Configuration management for mvnbox

pub mod schema;

pub use schema::Config;

use crate::error::{MvnboxError, MvnboxResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// File name of the project-local override
pub const LOCAL_CONFIG_FILE: &str = ".mvnbox.toml";

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a config manager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mvnbox")
            .join("config.toml")
    }

    /// Walk up from `start` looking for a `.mvnbox.toml`
    pub fn find_local_config(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(LOCAL_CONFIG_FILE))
            .find(|candidate| candidate.is_file())
    }

    /// Load configuration, falling back to defaults if the file does not exist
    pub async fn load(&self) -> MvnboxResult<Config> {
        self.load_merged(None).await
    }

    /// Load the global configuration with an optional local file merged on top
    pub async fn load_merged(&self, local: Option<&Path>) -> MvnboxResult<Config> {
        let mut merged = if self.config_path.exists() {
            read_toml(&self.config_path).await?
        } else {
            debug!("Config file not found, using defaults");
            toml::Value::Table(toml::map::Map::new())
        };

        let mut source = self.config_path.clone();
        if let Some(path) = local {
            debug!("Merging local config: {}", path.display());
            merge_toml_value(&mut merged, read_toml(path).await?);
            source = path.to_path_buf();
        }

        let config: Config =
            merged
                .try_into()
                .map_err(|e: toml::de::Error| MvnboxError::ConfigInvalid {
                    path: source.clone(),
                    reason: e.to_string(),
                })?;

        config
            .validate()
            .map_err(|reason| MvnboxError::ConfigInvalid {
                path: source,
                reason,
            })?;

        Ok(config)
    }

    /// Save configuration to file
    pub async fn save(&self, config: &Config) -> MvnboxResult<()> {
        self.ensure_config_dir().await?;

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, content).await.map_err(|e| {
            MvnboxError::io(
                format!("writing config to {}", self.config_path.display()),
                e,
            )
        })?;

        info!("Configuration saved to {}", self.config_path.display());
        Ok(())
    }

    /// Ensure the config directory exists
    async fn ensure_config_dir(&self) -> MvnboxResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| MvnboxError::ConfigDirCreate {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }
        Ok(())
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Read a TOML file into an untyped value tree
pub async fn read_toml(path: &Path) -> MvnboxResult<toml::Value> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| MvnboxError::io(format!("reading config from {}", path.display()), e))?;

    content
        .parse()
        .map_err(|e: toml::de::Error| MvnboxError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

/// Deep-merge `overlay` into `base`. Tables merge key by key, anything else
/// in the overlay replaces the base value.
pub fn merge_toml_value(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_toml_value(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}
