//! mvn and exec commands - pass-through invocations

use super::open_maven;
use crate::cli::args::ExecArgs;
use crate::config::Config;
use crate::error::MvnboxResult;

/// Run `mvn <args>` in the build container
pub async fn execute_mvn(args: ExecArgs, config: &Config) -> MvnboxResult<()> {
    let mut maven = open_maven(&args.environment, config).await?;
    maven.with_mvn_exec(args.command);
    let result = maven.run().await;
    maven.stop().await;
    result
}

/// Run an arbitrary command in the build container
pub async fn execute_exec(args: ExecArgs, config: &Config) -> MvnboxResult<()> {
    let mut maven = open_maven(&args.environment, config).await?;
    maven.with_exec(args.command)?;
    let result = maven.run().await;
    maven.stop().await;
    result
}
