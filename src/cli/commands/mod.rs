//! CLI command implementations

pub mod build;
pub mod cache;
pub mod completions;
pub mod config;
pub mod exec;
pub mod jar;
pub mod status;

pub use build::execute as build;
pub use cache::execute as cache;
pub use completions::execute as completions;
pub use config::execute as config;
pub use exec::{execute_exec as exec, execute_mvn as mvn};
pub use jar::execute as jar;
pub use status::execute as status;

use crate::cli::args::EnvironmentArgs;
use crate::config::Config;
use crate::error::{MvnboxError, MvnboxResult};
use crate::maven::Maven;
use crate::orchestration::{create_runtime, ContainerRuntime};
use crate::ui::{TaskSpinner, UiContext};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Layer command-line flags over the loaded configuration
pub(crate) fn apply_overrides(config: &Config, environment: &EnvironmentArgs) -> Config {
    let mut config = config.clone();
    for (key, value) in &environment.env {
        config.container.env.insert(key.clone(), value.clone());
    }
    if let Some(ref network) = environment.network {
        config.container.network = Some(network.clone());
    }
    config
}

/// Source directory from `--sources`, or the current directory
pub(crate) fn resolve_sources(environment: &EnvironmentArgs) -> MvnboxResult<PathBuf> {
    let dir = match environment.sources {
        Some(ref path) => path.clone(),
        None => std::env::current_dir()
            .map_err(|e| MvnboxError::io("getting current directory", e))?,
    };

    if !dir.is_dir() {
        return Err(MvnboxError::SourceNotFound(dir));
    }
    Ok(dir)
}

/// Detect the engine, pull the image, create the cache and mount sources
pub(crate) async fn open_maven(
    environment: &EnvironmentArgs,
    config: &Config,
) -> MvnboxResult<Maven> {
    let config = apply_overrides(config, environment);
    let sources = resolve_sources(environment)?;
    debug!("Project directory: {}", sources.display());

    let ctx = UiContext::detect();
    let mut spinner = TaskSpinner::new(&ctx);
    spinner.start("Detecting container engine...");

    let prepared = async {
        let runtime: Arc<dyn ContainerRuntime> = create_runtime(&config.runtime).await?.into();

        spinner.start(&format!("Checking {}...", runtime.runtime_name()));
        runtime.ensure_ready().await?;

        let mut maven = Maven::new(runtime, &config, Some(&sources))?;
        spinner.start(&format!("Preparing {}...", maven.image()));
        maven.prepare().await?;
        Ok::<_, MvnboxError>(maven)
    }
    .await;

    match prepared {
        Ok(maven) => {
            spinner.stop("Build environment ready");
            Ok(maven)
        }
        Err(e) => {
            spinner.stop_error("Build environment not available");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn overrides_extend_env_and_replace_network() {
        let mut config = Config::default();
        config
            .container
            .env
            .insert("MAVEN_OPTS".to_string(), "-Xmx512m".to_string());

        let environment = EnvironmentArgs {
            sources: None,
            env: vec![("MAVEN_OPTS".to_string(), "-Xmx2g".to_string())],
            network: Some("none".to_string()),
        };

        let merged = apply_overrides(&config, &environment);
        assert_eq!(merged.container.env.get("MAVEN_OPTS").unwrap(), "-Xmx2g");
        assert_eq!(merged.container.network.as_deref(), Some("none"));
    }

    #[test]
    fn resolve_sources_rejects_missing_directory() {
        let temp = TempDir::new().unwrap();
        let environment = EnvironmentArgs {
            sources: Some(temp.path().join("missing")),
            ..EnvironmentArgs::default()
        };
        assert!(matches!(
            resolve_sources(&environment),
            Err(MvnboxError::SourceNotFound(_))
        ));
    }

    #[test]
    fn resolve_sources_accepts_directory() {
        let temp = TempDir::new().unwrap();
        let environment = EnvironmentArgs {
            sources: Some(temp.path().to_path_buf()),
            ..EnvironmentArgs::default()
        };
        assert_eq!(resolve_sources(&environment).unwrap(), temp.path());
    }
}
