//! In-memory runtime that records what the pipeline asks for

use crate::error::{MvnboxError, MvnboxResult};
use crate::orchestration::container::ContainerConfig;
use crate::orchestration::runtime::{ContainerRuntime, ExecOutput, VolumeInfo};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// One command executed through the mock
#[derive(Debug, Clone)]
pub(crate) struct RecordedExec {
    pub container: String,
    pub workdir: String,
    pub command: Vec<String>,
    pub captured: bool,
}

#[derive(Default)]
pub(crate) struct MockRuntime {
    pub started: Mutex<Vec<ContainerConfig>>,
    pub execs: Mutex<Vec<RecordedExec>>,
    pub removed: Mutex<Vec<String>>,
    pub volumes: Mutex<HashMap<String, VolumeInfo>>,
    pub images: Mutex<Vec<String>>,
    pub pulled: Mutex<Vec<String>>,
    /// `(needle, output)`: captured commands containing the needle
    pub responses: Mutex<Vec<(String, ExecOutput)>>,
    /// `(needle, code)`: attached commands containing the needle
    pub failures: Mutex<Vec<(String, i32)>>,
    /// Commands containing one of these behave as if Ctrl-C was pressed
    pub interrupts: Mutex<Vec<String>>,
    pub remove_fails: bool,
}

impl MockRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(self, image: &str) -> Self {
        self.images.lock().unwrap().push(image.to_string());
        self
    }

    pub fn respond(self, needle: &str, stdout: &str) -> Self {
        self.respond_output(
            needle,
            ExecOutput {
                code: 0,
                stdout: stdout.to_string(),
                stderr: String::new(),
            },
        )
    }

    pub fn respond_output(self, needle: &str, output: ExecOutput) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push((needle.to_string(), output));
        self
    }

    pub fn fail(self, needle: &str, code: i32) -> Self {
        self.failures
            .lock()
            .unwrap()
            .push((needle.to_string(), code));
        self
    }

    pub fn interrupt(self, needle: &str) -> Self {
        self.interrupts.lock().unwrap().push(needle.to_string());
        self
    }

    pub fn fail_remove(mut self) -> Self {
        self.remove_fails = true;
        self
    }

    pub fn execs(&self) -> Vec<RecordedExec> {
        self.execs.lock().unwrap().clone()
    }

    pub fn commands(&self) -> Vec<String> {
        self.execs().iter().map(|e| e.command.join(" ")).collect()
    }

    pub fn started(&self) -> Vec<ContainerConfig> {
        self.started.lock().unwrap().clone()
    }

    pub fn removed(&self) -> Vec<String> {
        self.removed.lock().unwrap().clone()
    }

    fn record(
        &self,
        container: &str,
        workdir: &str,
        command: &[String],
        captured: bool,
    ) -> MvnboxResult<String> {
        self.execs.lock().unwrap().push(RecordedExec {
            container: container.to_string(),
            workdir: workdir.to_string(),
            command: command.to_vec(),
            captured,
        });
        let line = command.join(" ");
        if self
            .interrupts
            .lock()
            .unwrap()
            .iter()
            .any(|needle| line.contains(needle.as_str()))
        {
            return Err(MvnboxError::Interrupted);
        }
        Ok(line)
    }
}

#[async_trait]
impl ContainerRuntime for MockRuntime {
    async fn is_available(&self) -> MvnboxResult<bool> {
        Ok(true)
    }

    async fn ensure_ready(&self) -> MvnboxResult<()> {
        Ok(())
    }

    async fn version(&self) -> MvnboxResult<String> {
        Ok("mock 1.0".to_string())
    }

    async fn image_exists(&self, image: &str) -> MvnboxResult<bool> {
        Ok(self.images.lock().unwrap().iter().any(|i| i == image))
    }

    async fn pull(&self, image: &str) -> MvnboxResult<()> {
        self.pulled.lock().unwrap().push(image.to_string());
        self.images.lock().unwrap().push(image.to_string());
        Ok(())
    }

    async fn start(&self, config: &ContainerConfig) -> MvnboxResult<String> {
        let mut started = self.started.lock().unwrap();
        started.push(config.clone());
        Ok(format!("mock-{}", started.len()))
    }

    async fn exec(
        &self,
        container: &str,
        workdir: &str,
        command: &[String],
    ) -> MvnboxResult<i32> {
        let line = self.record(container, workdir, command, false)?;
        let code = self
            .failures
            .lock()
            .unwrap()
            .iter()
            .find(|(needle, _)| line.contains(needle.as_str()))
            .map(|(_, code)| *code)
            .unwrap_or(0);
        Ok(code)
    }

    async fn exec_captured(
        &self,
        container: &str,
        workdir: &str,
        command: &[String],
    ) -> MvnboxResult<ExecOutput> {
        let line = self.record(container, workdir, command, true)?;
        Ok(self
            .responses
            .lock()
            .unwrap()
            .iter()
            .find(|(needle, _)| line.contains(needle.as_str()))
            .map(|(_, output)| output.clone())
            .unwrap_or_default())
    }

    async fn remove(&self, container: &str) -> MvnboxResult<()> {
        if self.remove_fails {
            return Err(MvnboxError::command_exec("mock rm", "daemon went away"));
        }
        self.removed.lock().unwrap().push(container.to_string());
        Ok(())
    }

    async fn volume_create(
        &self,
        name: &str,
        labels: &HashMap<String, String>,
    ) -> MvnboxResult<()> {
        let mut volumes = self.volumes.lock().unwrap();
        if volumes.contains_key(name) {
            return Err(MvnboxError::CacheVolumeCreate {
                name: name.to_string(),
                reason: "volume already exists".to_string(),
            });
        }
        volumes.insert(
            name.to_string(),
            VolumeInfo {
                name: name.to_string(),
                labels: labels.clone(),
                mountpoint: None,
                created_at: None,
            },
        );
        Ok(())
    }

    async fn volume_inspect(&self, name: &str) -> MvnboxResult<Option<VolumeInfo>> {
        Ok(self.volumes.lock().unwrap().get(name).cloned())
    }

    async fn volume_remove(&self, name: &str) -> MvnboxResult<()> {
        self.volumes.lock().unwrap().remove(name);
        Ok(())
    }

    fn runtime_name(&self) -> &'static str {
        "Mock"
    }
}
