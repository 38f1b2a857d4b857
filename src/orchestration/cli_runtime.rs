//! Container runtime backed by an engine CLI
//!
//! Implements the ContainerRuntime trait by executing `podman` or `docker`
//! directly. Both accept the same subcommands for everything used here.

use crate::error::{MvnboxError, MvnboxResult};
use crate::orchestration::container::{exec_args, ContainerConfig};
use crate::orchestration::factory::Engine;
use crate::orchestration::runtime::{ContainerRuntime, ExecOutput, VolumeInfo};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

/// Container runtime that shells out to an engine binary
pub struct CliRuntime {
    engine: Engine,
}

/// Subset of `volume inspect` output
#[derive(Debug, Deserialize)]
struct RawVolume {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Labels", default)]
    labels: Option<HashMap<String, String>>,
    #[serde(rename = "Mountpoint", default)]
    mountpoint: Option<String>,
    #[serde(rename = "CreatedAt", default)]
    created_at: Option<String>,
}

impl CliRuntime {
    /// Create a runtime for the given engine
    pub fn new(engine: Engine) -> Self {
        Self { engine }
    }

    fn command(&self) -> Command {
        Command::new(self.engine.binary())
    }

    fn describe(&self, args: &[&str]) -> String {
        format!("{} {}", self.engine.binary(), args.join(" "))
    }

    /// Execute an engine command and return the output
    async fn output(&self, args: &[&str]) -> MvnboxResult<std::process::Output> {
        debug!("Executing: {}", self.describe(args));

        self.command()
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| MvnboxError::command_failed(self.describe(args), e))
    }
}

/// Whether engine stderr reports a missing object
fn is_not_found(stderr: &str) -> bool {
    let stderr = stderr.to_lowercase();
    stderr.contains("no such") || stderr.contains("not found") || stderr.contains("not known")
}

/// Parse `volume inspect` JSON (an array, even for one volume)
pub(crate) fn parse_volume_inspect(stdout: &str) -> MvnboxResult<Option<VolumeInfo>> {
    if stdout.trim().is_empty() {
        return Ok(None);
    }

    let volumes: Vec<RawVolume> = serde_json::from_str(stdout)?;

    Ok(volumes.into_iter().next().map(|raw| VolumeInfo {
        name: raw.name,
        labels: raw.labels.unwrap_or_default(),
        mountpoint: raw.mountpoint.filter(|m| !m.is_empty()),
        created_at: raw.created_at,
    }))
}

#[async_trait]
impl ContainerRuntime for CliRuntime {
    async fn is_available(&self) -> MvnboxResult<bool> {
        Ok(self
            .command()
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false))
    }

    async fn ensure_ready(&self) -> MvnboxResult<()> {
        if !self.is_available().await? {
            return Err(MvnboxError::RuntimeNotFound);
        }

        let output = self.output(&["info"]).await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MvnboxError::RuntimeNotReady {
                engine: self.engine.name().to_string(),
                reason: stderr.trim().to_string(),
            });
        }

        Ok(())
    }

    async fn version(&self) -> MvnboxResult<String> {
        let output = self.output(&["--version"]).await?;
        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(MvnboxError::command_exec(self.describe(&["--version"]), stderr))
        }
    }

    async fn image_exists(&self, image: &str) -> MvnboxResult<bool> {
        let output = self.output(&["image", "inspect", image]).await?;
        Ok(output.status.success())
    }

    async fn pull(&self, image: &str) -> MvnboxResult<()> {
        info!("Pulling image: {}", image);

        let output = self.output(&["pull", image]).await?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(MvnboxError::ImagePull {
                image: image.to_string(),
                reason: stderr.trim().to_string(),
            })
        }
    }

    async fn start(&self, config: &ContainerConfig) -> MvnboxResult<String> {
        let args = config.start_args();
        let args: Vec<&str> = args.iter().map(String::as_str).collect();

        let output = self.output(&args).await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MvnboxError::ContainerStart(stderr.trim().to_string()));
        }

        let id = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if id.is_empty() {
            return Err(MvnboxError::ContainerStart(format!(
                "{} run did not report a container ID",
                self.engine.binary()
            )));
        }
        debug!("Started container {}", id);
        Ok(id)
    }

    async fn exec(
        &self,
        container: &str,
        workdir: &str,
        command: &[String],
    ) -> MvnboxResult<i32> {
        let args = exec_args(container, workdir, command);
        debug!("Executing in {}: {:?}", container, command);

        let mut child = self
            .command()
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| MvnboxError::command_failed(self.describe(&["exec"]), e))?;

        tokio::select! {
            status = child.wait() => {
                let status = status
                    .map_err(|e| MvnboxError::command_failed(self.describe(&["exec"]), e))?;
                Ok(status.code().unwrap_or(-1))
            }
            _ = tokio::signal::ctrl_c() => Err(MvnboxError::Interrupted),
        }
    }

    async fn exec_captured(
        &self,
        container: &str,
        workdir: &str,
        command: &[String],
    ) -> MvnboxResult<ExecOutput> {
        let args = exec_args(container, workdir, command);
        debug!("Executing in {} (captured): {:?}", container, command);

        let output = self
            .command()
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        tokio::select! {
            output = output => {
                let output = output
                    .map_err(|e| MvnboxError::command_failed(self.describe(&["exec"]), e))?;
                Ok(ExecOutput {
                    code: output.status.code().unwrap_or(-1),
                    stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                    stderr: String::from_utf8_lossy(&output.stderr).to_string(),
                })
            }
            _ = tokio::signal::ctrl_c() => Err(MvnboxError::Interrupted),
        }
    }

    async fn remove(&self, container: &str) -> MvnboxResult<()> {
        debug!("Removing container: {}", container);

        let output = self.output(&["rm", "-f", container]).await?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if is_not_found(&stderr) {
                Ok(())
            } else {
                Err(MvnboxError::command_exec(self.describe(&["rm"]), stderr))
            }
        }
    }

    async fn volume_create(
        &self,
        name: &str,
        labels: &HashMap<String, String>,
    ) -> MvnboxResult<()> {
        debug!("Creating volume: {}", name);

        let label_strings: Vec<String> =
            labels.iter().map(|(k, v)| format!("{}={}", k, v)).collect();

        let mut args = vec!["volume", "create"];
        for label in &label_strings {
            args.push("--label");
            args.push(label);
        }
        args.push(name);

        let output = self.output(&args).await?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(MvnboxError::CacheVolumeCreate {
                name: name.to_string(),
                reason: stderr.trim().to_string(),
            })
        }
    }

    async fn volume_inspect(&self, name: &str) -> MvnboxResult<Option<VolumeInfo>> {
        let output = self.output(&["volume", "inspect", name]).await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if is_not_found(&stderr) {
                return Ok(None);
            }
            return Err(MvnboxError::command_exec(
                self.describe(&["volume", "inspect"]),
                stderr,
            ));
        }

        parse_volume_inspect(&String::from_utf8_lossy(&output.stdout))
    }

    async fn volume_remove(&self, name: &str) -> MvnboxResult<()> {
        debug!("Removing volume: {}", name);

        let output = self.output(&["volume", "rm", name]).await?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if is_not_found(&stderr) {
                Ok(())
            } else {
                Err(MvnboxError::command_exec(
                    self.describe(&["volume", "rm"]),
                    stderr,
                ))
            }
        }
    }

    fn runtime_name(&self) -> &'static str {
        self.engine.name()
    }
}
