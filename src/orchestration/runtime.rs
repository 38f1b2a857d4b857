//! Container runtime abstraction
//!
//! Provides a trait for the container operations a build needs, so the
//! Maven pipeline does not care whether Podman or Docker runs it.

use crate::error::MvnboxResult;
use crate::orchestration::container::ContainerConfig;
use async_trait::async_trait;
use std::collections::HashMap;

/// Information about a named volume
#[derive(Debug, Clone, Default)]
pub struct VolumeInfo {
    /// Volume name
    pub name: String,
    /// Labels attached at creation
    pub labels: HashMap<String, String>,
    /// Host path backing the volume, if the engine reports one
    pub mountpoint: Option<String>,
    /// Creation time as reported by the engine
    pub created_at: Option<String>,
}

/// Captured result of a container command
#[derive(Debug, Clone, Default)]
pub struct ExecOutput {
    /// Exit code of the command (-1 if killed by a signal)
    pub code: i32,
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
}

impl ExecOutput {
    /// Whether the command exited with status 0
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Abstract container runtime interface
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// Check if the engine binary is installed
    async fn is_available(&self) -> MvnboxResult<bool>;

    /// Ensure the engine can run containers (daemon up, rootless set up, ...)
    async fn ensure_ready(&self) -> MvnboxResult<()>;

    /// Engine version string
    async fn version(&self) -> MvnboxResult<String>;

    /// Check if an image is present locally
    async fn image_exists(&self, image: &str) -> MvnboxResult<bool>;

    /// Pull an image
    async fn pull(&self, image: &str) -> MvnboxResult<()>;

    /// Start a long-lived container for a pipeline. Returns its ID.
    async fn start(&self, config: &ContainerConfig) -> MvnboxResult<String>;

    /// Run a command in a started container with output attached to the
    /// terminal. Returns the exit code of the command.
    async fn exec(
        &self,
        container: &str,
        workdir: &str,
        command: &[String],
    ) -> MvnboxResult<i32>;

    /// Run a command in a started container and capture its output
    async fn exec_captured(
        &self,
        container: &str,
        workdir: &str,
        command: &[String],
    ) -> MvnboxResult<ExecOutput>;

    /// Force-remove a container
    async fn remove(&self, container: &str) -> MvnboxResult<()>;

    /// Create a named volume with labels
    async fn volume_create(&self, name: &str, labels: &HashMap<String, String>)
        -> MvnboxResult<()>;

    /// Inspect a named volume, `None` if it does not exist
    async fn volume_inspect(&self, name: &str) -> MvnboxResult<Option<VolumeInfo>>;

    /// Remove a named volume
    async fn volume_remove(&self, name: &str) -> MvnboxResult<()>;

    /// Get the human-readable runtime name for display
    fn runtime_name(&self) -> &'static str;
}
