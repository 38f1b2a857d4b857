//! Jar command - package the project and retrieve the artifact

use super::open_maven;
use crate::cli::args::JarArgs;
use crate::config::Config;
use crate::error::MvnboxResult;
use console::style;

/// Execute the jar command
///
/// The jar path is printed on stdout by itself so the command can be used
/// in scripts; everything else goes to stderr.
pub async fn execute(args: JarArgs, config: &Config) -> MvnboxResult<()> {
    let mut maven = open_maven(&args.environment, config).await?;

    if args.clean {
        maven.clean();
    }
    let artifact = maven.jar().await;
    maven.stop().await;
    let artifact = artifact?;

    let path = match args.output {
        Some(ref dest) => artifact.copy_to(dest).await?,
        None => artifact.host_path.clone(),
    };

    eprintln!(
        "{} Built {}",
        style("✓").green(),
        style(artifact.file_name()).cyan()
    );
    println!("{}", path.display());
    Ok(())
}
