//! Configuration schema for mvnbox
//!
//! Global configuration is stored at `~/.config/mvnbox/config.toml`.
//! A project-local `.mvnbox.toml` overrides individual keys.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default Maven image (tag part of the reference)
pub const DEFAULT_IMAGE: &str = "maven:3.9.9-eclipse-temurin-23-alpine";

/// Content digest the default image is pinned to
pub const DEFAULT_DIGEST: &str =
    "sha256:0e5e89100c3c1a0841ff67e0c1632b9b983e94ee5a9b1f758125d9e43c66856f";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Container engine selection
    pub runtime: RuntimeConfig,

    /// Build image
    pub image: ImageConfig,

    /// Dependency cache volume
    pub cache: CacheConfig,

    /// Build container settings
    pub container: ContainerConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Container engine selection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// "auto", "podman" or "docker"
    pub engine: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            engine: "auto".to_string(),
        }
    }
}

/// Build image settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Image name and tag
    pub name: String,

    /// Content digest (`sha256:<hex>`). Empty means unpinned.
    pub digest: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_IMAGE.to_string(),
            digest: DEFAULT_DIGEST.to_string(),
        }
    }
}

impl ImageConfig {
    /// Full image reference used for `run`
    pub fn reference(&self) -> String {
        if self.digest.is_empty() {
            self.name.clone()
        } else {
            format!("{}@{}", self.name, self.digest)
        }
    }

    /// Whether the image is referenced by digest
    pub fn is_pinned(&self) -> bool {
        !self.digest.is_empty()
    }
}

/// Check a digest has the `sha256:<64 lowercase hex>` form.
pub fn is_valid_digest(digest: &str) -> bool {
    match digest.strip_prefix("sha256:") {
        Some(hex) => {
            hex.len() == 64
                && hex
                    .chars()
                    .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        }
        None => false,
    }
}

/// Dependency cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Mount the cache volume into build containers (default: true)
    pub enabled: bool,

    /// Named volume holding the local Maven repository
    pub volume: String,

    /// Mount point inside the container
    pub mount_path: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: "maven-m2".to_string(),
            mount_path: "/root/.m2".to_string(),
        }
    }
}

/// Build container configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// Working directory inside container, also where sources are mounted
    pub workdir: String,

    /// Network mode (engine default when unset)
    pub network: Option<String>,

    /// User to run steps as, e.g. "1000:1000" (image default when unset).
    /// Under rootful Docker, files written to the mounted sources are owned
    /// by this user.
    pub user: Option<String>,

    /// Environment variables to set
    pub env: BTreeMap<String, String>,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            workdir: "/src".to_string(),
            network: None,
            user: None,
            env: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Check values that serde cannot
    pub fn validate(&self) -> Result<(), String> {
        if self.image.name.trim().is_empty() {
            return Err("image.name must not be empty".to_string());
        }
        if self.image.name.contains('@') {
            return Err("image.name must not contain a digest; use image.digest".to_string());
        }
        if !self.image.digest.is_empty() && !is_valid_digest(&self.image.digest) {
            return Err(format!(
                "image.digest must look like sha256:<64 hex chars>, got '{}'",
                self.image.digest
            ));
        }
        if !matches!(self.general.log_format.as_str(), "text" | "json") {
            return Err(format!(
                "general.log_format must be text or json, got '{}'",
                self.general.log_format
            ));
        }
        if !self.container.workdir.starts_with('/') {
            return Err("container.workdir must be an absolute path".to_string());
        }
        if matches!(self.container.user.as_deref(), Some(user) if user.trim().is_empty()) {
            return Err("container.user must not be empty when set".to_string());
        }
        if self.cache.enabled && self.cache.volume.trim().is_empty() {
            return Err("cache.volume must not be empty when the cache is enabled".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[image]"));
        assert!(toml.contains("[cache]"));
    }

    #[test]
    fn config_deserializes_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.cache.volume, "maven-m2");
        assert_eq!(config.container.workdir, "/src");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_deserializes_partial() {
        let toml = r#"
            [cache]
            volume = "shared-m2"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.cache.volume, "shared-m2");
        assert_eq!(config.cache.mount_path, "/root/.m2");
        assert_eq!(config.image.name, DEFAULT_IMAGE);
    }

    #[test]
    fn default_reference_is_pinned() {
        let image = ImageConfig::default();
        assert!(image.is_pinned());
        assert_eq!(
            image.reference(),
            concat!(
                "maven:3.9.9-eclipse-temurin-23-alpine@",
                "sha256:0e5e89100c3c1a0841ff67e0c1632b9b983e94ee5a9b1f758125d9e43c66856f"
            )
        );
    }

    #[test]
    fn unpinned_reference_is_the_name() {
        let image = ImageConfig {
            name: "maven:3-eclipse-temurin-21".to_string(),
            digest: String::new(),
        };
        assert!(!image.is_pinned());
        assert_eq!(image.reference(), "maven:3-eclipse-temurin-21");
    }

    #[test]
    fn digest_validation() {
        assert!(is_valid_digest(DEFAULT_DIGEST));
        assert!(!is_valid_digest("sha256:abc"));
        assert!(!is_valid_digest("md5:0e5e89100c3c1a0841ff67e0c1632b9b"));
        assert!(!is_valid_digest(&DEFAULT_DIGEST.to_uppercase()));
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = Config::default();
        config.image.digest = "latest".to_string();
        assert!(config.validate().unwrap_err().contains("image.digest"));

        let mut config = Config::default();
        config.image.name = "maven@sha256:abc".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.container.workdir = "src".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.general.log_format = "xml".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.container.user = Some(" ".to_string());
        assert!(config.validate().unwrap_err().contains("container.user"));
    }

    #[test]
    fn container_user_is_optional() {
        let config: Config = toml::from_str("[container]\nuser = \"1000:1000\"\n").unwrap();
        assert_eq!(config.container.user.as_deref(), Some("1000:1000"));
        assert!(Config::default().container.user.is_none());
    }
}
