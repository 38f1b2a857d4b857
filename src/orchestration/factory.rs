//! Runtime factory for selecting a container engine
//!
//! Resolves the configured engine (or probes for one) and instantiates
//! the matching runtime.

use crate::config::schema::RuntimeConfig;
use crate::error::{MvnboxError, MvnboxResult};
use crate::orchestration::cli_runtime::CliRuntime;
use crate::orchestration::runtime::ContainerRuntime;
use std::fmt;
use tracing::debug;

/// Supported container engines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engine {
    /// Podman (rootless or rootful)
    Podman,
    /// Docker
    Docker,
}

impl Engine {
    /// Engines in auto-detection order
    pub const ALL: [Engine; 2] = [Engine::Podman, Engine::Docker];

    /// Binary to execute
    pub fn binary(&self) -> &'static str {
        match self {
            Engine::Podman => "podman",
            Engine::Docker => "docker",
        }
    }

    /// Get a human-readable engine name
    pub fn name(&self) -> &'static str {
        match self {
            Engine::Podman => "Podman",
            Engine::Docker => "Docker",
        }
    }

    /// Parse a configured engine. `auto` yields `None`.
    pub fn parse(value: &str) -> MvnboxResult<Option<Engine>> {
        match value.trim().to_lowercase().as_str() {
            "" | "auto" => Ok(None),
            "podman" => Ok(Some(Engine::Podman)),
            "docker" => Ok(Some(Engine::Docker)),
            other => Err(MvnboxError::UnknownEngine(other.to_string())),
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.binary())
    }
}

/// Pick the engine to use, probing installed binaries for `auto`
pub async fn resolve_engine(config: &RuntimeConfig) -> MvnboxResult<Engine> {
    if let Some(engine) = Engine::parse(&config.engine)? {
        if !CliRuntime::new(engine).is_available().await? {
            return Err(MvnboxError::RuntimeNotReady {
                engine: engine.name().to_string(),
                reason: format!("'{}' is not on PATH", engine.binary()),
            });
        }
        return Ok(engine);
    }

    for engine in Engine::ALL {
        if CliRuntime::new(engine).is_available().await? {
            debug!("Detected container engine: {}", engine.name());
            return Ok(engine);
        }
    }

    Err(MvnboxError::RuntimeNotFound)
}

/// Create a container runtime for the configured engine
pub async fn create_runtime(config: &RuntimeConfig) -> MvnboxResult<Box<dyn ContainerRuntime>> {
    let engine = resolve_engine(config).await?;
    Ok(Box::new(CliRuntime::new(engine)))
}
