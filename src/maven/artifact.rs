//! Build artifacts produced inside the container

use crate::error::{MvnboxError, MvnboxResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

/// A file produced by the build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Path relative to the project directory (e.g. `target/app-1.0.jar`)
    pub relative_path: String,
    /// Same file seen through the source mount on the host
    pub host_path: PathBuf,
}

impl Artifact {
    /// Locate an artifact under the host source directory
    pub fn locate(sources: &Path, relative_path: &str) -> MvnboxResult<Self> {
        let host_path = sources.join(relative_path);
        if !host_path.is_file() {
            return Err(MvnboxError::ArtifactNotFound(host_path));
        }

        Ok(Self {
            relative_path: relative_path.to_string(),
            host_path,
        })
    }

    /// File name without directories
    pub fn file_name(&self) -> &str {
        self.relative_path
            .rsplit('/')
            .next()
            .unwrap_or(&self.relative_path)
    }

    /// Copy the artifact to `dest`. A directory destination keeps the file name.
    pub async fn copy_to(&self, dest: &Path) -> MvnboxResult<PathBuf> {
        let target = if dest.is_dir() {
            dest.join(self.file_name())
        } else {
            dest.to_path_buf()
        };

        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| MvnboxError::io(format!("creating {}", parent.display()), e))?;
        }

        fs::copy(&self.host_path, &target).await.map_err(|e| {
            MvnboxError::io(
                format!(
                    "copying {} to {}",
                    self.host_path.display(),
                    target.display()
                ),
                e,
            )
        })?;

        info!("Copied {} to {}", self.file_name(), target.display());
        Ok(target)
    }
}
