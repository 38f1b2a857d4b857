//! Cache volume management
//!
//! Describes the named volume that holds the local Maven repository and
//! creates it on first use.

use crate::config::schema::CacheConfig;
use crate::error::MvnboxResult;
use crate::orchestration::{ContainerRuntime, VolumeInfo};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::{debug, info};

/// Volume label keys used to track cache metadata
pub mod labels {
    /// Marks volume as an mvnbox cache
    pub const MVNBOX_CACHE: &str = "io.mvnbox.cache";
    /// Creation timestamp (RFC3339)
    pub const CREATED_AT: &str = "io.mvnbox.cache.created_at";
}

/// Information about the cache volume
#[derive(Debug, Clone)]
pub struct CacheVolume {
    /// Volume name
    pub name: String,
    /// When the volume was created, if known
    pub created_at: Option<DateTime<Utc>>,
    /// Whether the volume carries the mvnbox label
    pub managed: bool,
    /// Host path backing the volume
    pub mountpoint: Option<String>,
}

impl CacheVolume {
    /// Create a new cache volume record
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            created_at: Some(Utc::now()),
            managed: true,
            mountpoint: None,
        }
    }

    /// Generate labels for volume creation
    pub fn labels(&self) -> HashMap<String, String> {
        let mut labels = HashMap::new();
        labels.insert(labels::MVNBOX_CACHE.to_string(), "true".to_string());
        if let Some(created_at) = self.created_at {
            labels.insert(labels::CREATED_AT.to_string(), created_at.to_rfc3339());
        }
        labels
    }

    /// Build from what the engine reports.
    ///
    /// Volumes created outside mvnbox are still usable as a cache; they are
    /// reported as unmanaged and fall back to the engine's creation time.
    pub fn from_info(info: &VolumeInfo) -> Self {
        let managed = info.labels.get(labels::MVNBOX_CACHE).map(String::as_str) == Some("true");

        let created_at = info
            .labels
            .get(labels::CREATED_AT)
            .or(info.created_at.as_ref())
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        Self {
            name: info.name.clone(),
            created_at,
            managed,
            mountpoint: info.mountpoint.clone(),
        }
    }
}

/// Cache mount specification for container creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheMount {
    /// Volume name
    pub volume_name: String,
    /// Mount path inside container
    pub container_path: String,
}

impl CacheMount {
    /// Mount described by configuration, `None` when caching is disabled
    pub fn from_config(config: &CacheConfig) -> Option<Self> {
        config.enabled.then(|| Self {
            volume_name: config.volume.clone(),
            container_path: config.mount_path.clone(),
        })
    }

    /// Generate the volume mount string for the engine
    pub fn volume_arg(&self) -> String {
        format!("{}:{}", self.volume_name, self.container_path)
    }
}

/// Make sure the cache volume exists, creating it with labels if needed.
///
/// Returns `true` when the volume was created by this call.
pub async fn ensure_cache_volume(
    runtime: &dyn ContainerRuntime,
    mount: &CacheMount,
) -> MvnboxResult<bool> {
    if runtime.volume_inspect(&mount.volume_name).await?.is_some() {
        debug!("Cache volume {} exists", mount.volume_name);
        return Ok(false);
    }

    let volume = CacheVolume::new(&mount.volume_name);
    runtime.volume_create(&volume.name, &volume.labels()).await?;
    info!("Created cache volume {}", volume.name);
    Ok(true)
}
