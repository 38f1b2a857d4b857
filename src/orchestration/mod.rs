//! Orchestration module for container runtimes
//!
//! Drives the container engine (Podman or Docker) through its CLI:
//! - `ContainerConfig` describes the container a pipeline runs in
//! - `ContainerRuntime` is the seam the build pipeline talks to
//! - `create_runtime` picks the installed engine

mod cli_runtime;
mod container;
mod factory;
#[cfg(test)]
pub(crate) mod mock;
mod runtime;

pub use cli_runtime::CliRuntime;
pub use container::{BindMount, ContainerConfig};
pub use factory::{create_runtime, resolve_engine, Engine};
pub use runtime::{ContainerRuntime, ExecOutput, VolumeInfo};

use tracing::{debug, warn};

/// Force-remove a pipeline container. Failures are logged, not returned,
/// so cleanup never masks the error that triggered it.
pub async fn remove_container(runtime: &dyn ContainerRuntime, container: &str) {
    debug!("Removing container {}", container);
    if let Err(e) = runtime.remove(container).await {
        warn!("Failed to remove container {}: {}", container, e);
    }
}

/// Max number of output lines to include in error messages.
const ERROR_TAIL_LINES: usize = 20;

/// Extract the useful tail of command output for error diagnostics.
///
/// Combines stdout and stderr, then returns the last `ERROR_TAIL_LINES`
/// non-empty lines.
pub(crate) fn error_tail(stdout: &str, stderr: &str) -> String {
    let lines: Vec<&str> = stdout
        .lines()
        .chain(stderr.lines())
        .filter(|line| !line.trim().is_empty())
        .collect();
    let start = lines.len().saturating_sub(ERROR_TAIL_LINES);
    lines[start..].join("\n")
}
