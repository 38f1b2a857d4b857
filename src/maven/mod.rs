//! Maven build environment
//!
//! A `Maven` value describes a containerized build: the pinned image, the
//! dependency cache mount, the working directory and an optional source
//! mount. Commands are queued as steps and executed in order by `run()`.
//!
//! All steps and evaluations of one `Maven` run in the same container, so
//! whatever a step leaves in the container filesystem is visible to the
//! next one. The container is started on the first `run()` and removed by
//! `stop()`, or as soon as a step fails or is interrupted.
//!
//! ```rust,ignore
//! let mut maven = Maven::new(runtime, &config, Some(Path::new(".")))?;
//! maven.clean().pkg();
//! let result = maven.jar().await;
//! maven.stop().await;
//! let jar = result?;
//! ```

pub mod artifact;
pub mod coordinates;

pub use artifact::Artifact;
pub use coordinates::Coordinates;

use crate::cache::{ensure_cache_volume, CacheMount};
use crate::config::Config;
use crate::error::{MvnboxError, MvnboxResult};
use crate::orchestration::{
    error_tail, remove_container, BindMount, ContainerConfig, ContainerRuntime,
};
use coordinates::{
    evaluate_command, parse_evaluate_output, ARTIFACT_ID_EXPRESSION, VERSION_EXPRESSION,
};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Maven binary inside the image
const MVN: &str = "mvn";

/// Lifecycle phases exposed as first-class commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Clean,
    Package,
    Install,
    Test,
}

impl Phase {
    /// Phase name as Maven spells it
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Clean => "clean",
            Phase::Package => "package",
            Phase::Install => "install",
            Phase::Test => "test",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A queued command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub command: Vec<String>,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.command.join(" "))
    }
}

/// A containerized Maven build environment
pub struct Maven {
    runtime: Arc<dyn ContainerRuntime>,
    image: String,
    cache: Option<CacheMount>,
    workdir: String,
    network: Option<String>,
    user: Option<String>,
    env: BTreeMap<String, String>,
    sources: Option<PathBuf>,
    steps: Vec<Step>,
    prepared: bool,
    container: Option<String>,
}

impl Maven {
    /// Create a build environment from configuration, optionally mounting sources
    pub fn new(
        runtime: Arc<dyn ContainerRuntime>,
        config: &Config,
        sources: Option<&Path>,
    ) -> MvnboxResult<Self> {
        if !config.image.is_pinned() {
            warn!(
                "Image {} is not pinned to a digest; builds may not be reproducible",
                config.image.name
            );
        }

        let mut maven = Self {
            runtime,
            image: config.image.reference(),
            cache: CacheMount::from_config(&config.cache),
            workdir: config.container.workdir.clone(),
            network: config.container.network.clone(),
            user: config.container.user.clone(),
            env: config.container.env.clone(),
            sources: None,
            steps: Vec::new(),
            prepared: false,
            container: None,
        };

        if let Some(dir) = sources {
            maven.with_sources(dir)?;
        }

        Ok(maven)
    }

    /// Mount a source directory at the working directory
    pub fn with_sources(&mut self, dir: &Path) -> MvnboxResult<&mut Self> {
        let canonical = dir
            .canonicalize()
            .map_err(|_| MvnboxError::SourceNotFound(dir.to_path_buf()))?;
        if !canonical.is_dir() {
            return Err(MvnboxError::SourceNotFound(dir.to_path_buf()));
        }
        // `--mount` separates its fields with commas
        if canonical.to_string_lossy().contains(',') {
            return Err(MvnboxError::User(format!(
                "Cannot mount {}: paths containing ',' are not supported",
                canonical.display()
            )));
        }

        debug!("Mounting sources {} at {}", canonical.display(), self.workdir);
        self.sources = Some(canonical);
        Ok(self)
    }

    /// Queue `mvn <args>`
    pub fn with_mvn_exec<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let command = std::iter::once(MVN.to_string())
            .chain(args.into_iter().map(Into::into))
            .collect();
        self.steps.push(Step { command });
        self
    }

    /// Queue an arbitrary command
    pub fn with_exec<I, S>(&mut self, command: I) -> MvnboxResult<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let command: Vec<String> = command.into_iter().map(Into::into).collect();
        if command.is_empty() {
            return Err(MvnboxError::User("exec needs a command to run".to_string()));
        }
        self.steps.push(Step { command });
        Ok(self)
    }

    /// Queue a lifecycle phase
    pub fn phase(&mut self, phase: Phase) -> &mut Self {
        self.with_mvn_exec([phase.as_str()])
    }

    /// Queue `mvn package`
    pub fn pkg(&mut self) -> &mut Self {
        self.phase(Phase::Package)
    }

    /// Queue `mvn clean`
    pub fn clean(&mut self) -> &mut Self {
        self.phase(Phase::Clean)
    }

    /// Queue `mvn install`
    pub fn install(&mut self) -> &mut Self {
        self.phase(Phase::Install)
    }

    /// Queue `mvn test`
    pub fn test(&mut self) -> &mut Self {
        self.phase(Phase::Test)
    }

    /// Pending steps
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Mounted source directory on the host
    pub fn sources(&self) -> Option<&Path> {
        self.sources.as_deref()
    }

    /// Image reference every step runs in
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Make the image and cache volume available. Idempotent.
    pub async fn prepare(&mut self) -> MvnboxResult<()> {
        if self.prepared {
            return Ok(());
        }

        if !self.runtime.image_exists(&self.image).await? {
            self.runtime.pull(&self.image).await?;
        }

        if let Some(ref mount) = self.cache {
            ensure_cache_volume(self.runtime.as_ref(), mount).await?;
        }

        self.prepared = true;
        Ok(())
    }

    /// Configuration of the pipeline container
    pub fn container_config(&self) -> ContainerConfig {
        let mut config = ContainerConfig::new(&self.image, &self.workdir);
        config.name = Some(container_name());
        config.network = self.network.clone();
        config.user = self.user.clone();
        config.env = self.env.clone();

        if let Some(ref mount) = self.cache {
            config.volumes.push(mount.volume_arg());
        }
        if let Some(ref sources) = self.sources {
            config.binds.push(BindMount {
                source: sources.clone(),
                target: self.workdir.clone(),
            });
        }

        config
    }

    /// The running pipeline container, started on first use
    async fn ensure_container(&mut self) -> MvnboxResult<String> {
        if let Some(ref id) = self.container {
            return Ok(id.clone());
        }

        self.prepare().await?;
        let config = self.container_config();
        let id = self.runtime.start(&config).await?;
        info!("Started build container {}", config.name.as_deref().unwrap_or(&id));
        self.container = Some(id.clone());
        Ok(id)
    }

    /// Remove the pipeline container, if one is running. Idempotent.
    pub async fn stop(&mut self) {
        if let Some(id) = self.container.take() {
            remove_container(self.runtime.as_ref(), &id).await;
        }
    }

    /// Execute pending steps in order, stopping at the first failure.
    ///
    /// The queue is emptied whether or not every step succeeds. On failure
    /// the container is removed.
    pub async fn run(&mut self) -> MvnboxResult<()> {
        if self.steps.is_empty() {
            return Ok(());
        }

        let steps = std::mem::take(&mut self.steps);
        let result = self.run_steps(steps).await;
        if result.is_err() {
            self.stop().await;
        }
        result
    }

    async fn run_steps(&mut self, steps: Vec<Step>) -> MvnboxResult<()> {
        let container = self.ensure_container().await?;

        let total = steps.len();
        for (i, step) in steps.into_iter().enumerate() {
            info!("[{}/{}] {}", i + 1, total, step);

            let code = self
                .runtime
                .exec(&container, &self.workdir, &step.command)
                .await?;
            if code != 0 {
                return Err(MvnboxError::ContainerCommand {
                    command: step.to_string(),
                    code,
                });
            }
        }

        Ok(())
    }

    /// Ask Maven for a single expression, after running pending steps
    pub async fn evaluate(&mut self, expression: &str) -> MvnboxResult<String> {
        self.run().await?;

        let result = self.evaluate_in_container(expression).await;
        if result.is_err() {
            self.stop().await;
        }
        result
    }

    async fn evaluate_in_container(&mut self, expression: &str) -> MvnboxResult<String> {
        let container = self.ensure_container().await?;
        let output = self
            .runtime
            .exec_captured(&container, &self.workdir, &evaluate_command(expression))
            .await?;

        if !output.success() {
            return Err(MvnboxError::MavenMetadata {
                expression: expression.to_string(),
                reason: format!(
                    "exit code {}\n{}",
                    output.code,
                    error_tail(&output.stdout, &output.stderr)
                ),
            });
        }

        let value = parse_evaluate_output(expression, &output.stdout)?;
        debug!("{} = {}", expression, value);
        Ok(value)
    }

    /// The project's artifactId and version
    pub async fn coordinates(&mut self) -> MvnboxResult<Coordinates> {
        let artifact_id = self.evaluate(ARTIFACT_ID_EXPRESSION).await?;
        let version = self.evaluate(VERSION_EXPRESSION).await?;
        Ok(Coordinates {
            artifact_id,
            version,
        })
    }

    /// Jar path relative to the project directory
    pub async fn jar_file_name(&mut self) -> MvnboxResult<String> {
        Ok(self.coordinates().await?.jar_file_name())
    }

    /// Package the project and return the produced jar
    pub async fn jar(&mut self) -> MvnboxResult<Artifact> {
        let sources = self.sources.clone().ok_or(MvnboxError::NoSources)?;

        self.pkg();
        let file_name = self.jar_file_name().await?;
        Artifact::locate(&sources, &file_name)
    }
}

/// Unique name for a pipeline container
fn container_name() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("mvnbox-{}", &id[..12])
}
