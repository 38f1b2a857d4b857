//! Error types for mvnbox
//!
//! All modules use `MvnboxResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for mvnbox operations
pub type MvnboxResult<T> = Result<T, MvnboxError>;

/// All errors that can occur in mvnbox
#[derive(Error, Debug)]
pub enum MvnboxError {
    // Environment errors
    #[error("No container engine found. Install Podman or Docker")]
    RuntimeNotFound,

    #[error("{engine} is not usable: {reason}")]
    RuntimeNotReady { engine: String, reason: String },

    #[error("Unknown container engine: {0}. Expected auto, podman or docker")]
    UnknownEngine(String),

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Container errors
    #[error("Container failed to start: {0}")]
    ContainerStart(String),

    #[error("Container command failed: {command}, exit code: {code}")]
    ContainerCommand { command: String, code: i32 },

    #[error("Image pull failed: {image}: {reason}")]
    ImagePull { image: String, reason: String },

    #[error("Interrupted")]
    Interrupted,

    // Cache errors
    #[error("Failed to create cache volume {name}: {reason}")]
    CacheVolumeCreate { name: String, reason: String },

    // Build errors
    #[error("No source directory mounted")]
    NoSources,

    #[error("Source directory not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("Could not evaluate {expression}: {reason}")]
    MavenMetadata { expression: String, reason: String },

    #[error("Artifact not found: {0}")]
    ArtifactNotFound(PathBuf),

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command execution error: {command}, stderr: {stderr}")]
    CommandExecution { command: String, stderr: String },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("{0}")]
    User(String),
}

impl MvnboxError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Create a command execution error
    pub fn command_exec(command: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::CommandExecution {
            command: command.into(),
            stderr: stderr.into(),
        }
    }

    /// Process exit code to report for this error.
    ///
    /// A failed build step passes through the exit code of the command
    /// that ran in the container, so `mvnbox test` fails the way `mvn test`
    /// does. Everything else is a plain failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::ContainerCommand { code, .. } if (1..=255).contains(code) => *code as u8,
            Self::Interrupted => 130,
            _ => 1,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::RuntimeNotFound => Some("Install Podman (https://podman.io) or Docker"),
            Self::RuntimeNotReady { .. } => Some("Run: mvnbox status"),
            Self::UnknownEngine(_) => Some("Run: mvnbox config set runtime.engine auto"),
            Self::NoSources => Some("Pass the project directory with --sources"),
            Self::ArtifactNotFound(_) => {
                Some("Check that the project packaging is jar and finalName is not overridden")
            }
            _ => None,
        }
    }
}
