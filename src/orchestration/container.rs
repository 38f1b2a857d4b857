//! Build container description
//!
//! A pipeline runs in one long-lived container. `start_args` renders the
//! `run -d` invocation that keeps it alive and `exec_args` the command for
//! each step. Podman and Docker accept the same flags used here.

use std::collections::BTreeMap;
use std::path::PathBuf;

/// Keeps the pipeline container running between steps
pub const KEEPALIVE_COMMAND: [&str; 3] = ["tail", "-f", "/dev/null"];

/// A host directory bind-mounted into the container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindMount {
    pub source: PathBuf,
    pub target: String,
}

impl BindMount {
    /// Value for `--mount`. Unlike `-v`, fields are keyed, so a `:` in the
    /// host path is kept intact.
    pub fn mount_arg(&self) -> String {
        format!(
            "type=bind,source={},target={}",
            self.source.display(),
            self.target
        )
    }
}

/// Container configuration for a build pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerConfig {
    /// Image reference (`name@digest` when pinned)
    pub image: String,
    /// Container name
    pub name: Option<String>,
    /// Working directory inside the container
    pub workdir: String,
    /// Named volume mounts (`volume:target`)
    pub volumes: Vec<String>,
    /// Host directories
    pub binds: Vec<BindMount>,
    /// Environment variables
    pub env: BTreeMap<String, String>,
    /// Network mode (engine default when `None`)
    pub network: Option<String>,
    /// `--user` value (image default when `None`)
    pub user: Option<String>,
}

impl ContainerConfig {
    /// Create a config for an image with a working directory
    pub fn new(image: impl Into<String>, workdir: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            name: None,
            workdir: workdir.into(),
            volumes: Vec::new(),
            binds: Vec::new(),
            env: BTreeMap::new(),
            network: None,
            user: None,
        }
    }

    /// Build the argument list for `<engine> run -d` starting the pipeline
    /// container
    pub fn start_args(&self) -> Vec<String> {
        let mut args = vec!["run".to_string(), "-d".to_string(), "--rm".to_string()];

        if let Some(ref name) = self.name {
            args.push("--name".to_string());
            args.push(name.clone());
        }

        args.push("-w".to_string());
        args.push(self.workdir.clone());

        if let Some(ref network) = self.network {
            args.push("--network".to_string());
            args.push(network.clone());
        }

        if let Some(ref user) = self.user {
            args.push("--user".to_string());
            args.push(user.clone());
        }

        for v in &self.volumes {
            args.push("-v".to_string());
            args.push(v.clone());
        }

        for bind in &self.binds {
            args.push("--mount".to_string());
            args.push(bind.mount_arg());
        }

        for (k, v) in &self.env {
            args.push("-e".to_string());
            args.push(format!("{}={}", k, v));
        }

        args.push(self.image.clone());
        args.extend(KEEPALIVE_COMMAND.iter().map(|s| s.to_string()));
        args
    }
}

/// Build the argument list for `<engine> exec` running one step
pub fn exec_args(container: &str, workdir: &str, command: &[String]) -> Vec<String> {
    let mut args = vec![
        "exec".to_string(),
        "-w".to_string(),
        workdir.to_string(),
        container.to_string(),
    ];
    args.extend(command.iter().cloned());
    args
}
