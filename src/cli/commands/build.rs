//! Lifecycle commands - package, install, test, clean

use super::open_maven;
use crate::cli::args::BuildArgs;
use crate::config::Config;
use crate::error::MvnboxResult;
use crate::maven::{Maven, Phase};
use console::style;

/// Execute a lifecycle command
pub async fn execute(phase: Phase, args: BuildArgs, config: &Config) -> MvnboxResult<()> {
    let mut maven = open_maven(&args.environment, config).await?;

    queue_phase(&mut maven, phase, args.clean, args.maven_args);
    let result = maven.run().await;
    maven.stop().await;
    result?;

    eprintln!("{} mvn {} finished", style("✓").green(), phase);
    Ok(())
}

/// Queue the phase, with an optional clean first and extra Maven arguments
fn queue_phase(maven: &mut Maven, phase: Phase, clean: bool, maven_args: Vec<String>) {
    if clean && phase != Phase::Clean {
        maven.clean();
    }

    if !maven_args.is_empty() {
        maven.with_mvn_exec(std::iter::once(phase.as_str().to_string()).chain(maven_args));
        return;
    }

    match phase {
        Phase::Package => maven.pkg(),
        Phase::Install => maven.install(),
        Phase::Test => maven.test(),
        Phase::Clean => maven.clean(),
    };
}
