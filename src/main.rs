//! mvnbox - Maven builds in pinned, cached containers
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use mvnbox::cli::{commands, Cli, Commands};
use mvnbox::config::{Config, ConfigManager};
use mvnbox::error::{MvnboxError, MvnboxResult};
use mvnbox::maven::Phase;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::from(e.exit_code())
        }
    }
}

/// Initialize logging: 0 = warn, 1 = info, 2+ = debug. `RUST_LOG` wins.
fn init_logging(verbose: u8, config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("mvnbox=warn"),
        1 => EnvFilter::new("mvnbox=info"),
        _ => EnvFilter::new("mvnbox=debug"),
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if config.general.log_format == "json" {
        builder.json().init();
    } else {
        builder.without_time().init();
    }
}

async fn run() -> MvnboxResult<()> {
    let cli = Cli::parse();

    // Completions don't need config loading
    if let Commands::Completions(args) = cli.command {
        commands::completions(args);
        return Ok(());
    }

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };

    let local_config_path = if cli.no_local {
        None
    } else {
        let cwd = std::env::current_dir()
            .map_err(|e| MvnboxError::io("getting current directory", e))?;
        ConfigManager::find_local_config(&cwd)
    };

    let config = config_manager
        .load_merged(local_config_path.as_deref())
        .await?;

    init_logging(cli.verbose, &config);
    match local_config_path {
        Some(ref path) => debug!("Using local config: {}", path.display()),
        None if cli.no_local => debug!("Local config discovery disabled (--no-local)"),
        None => {}
    }

    match cli.command {
        Commands::Completions(_) => unreachable!("Completions handled above"),
        Commands::Package(args) => commands::build(Phase::Package, args, &config).await,
        Commands::Install(args) => commands::build(Phase::Install, args, &config).await,
        Commands::Test(args) => commands::build(Phase::Test, args, &config).await,
        Commands::Clean(args) => commands::build(Phase::Clean, args, &config).await,
        Commands::Mvn(args) => commands::mvn(args, &config).await,
        Commands::Exec(args) => commands::exec(args, &config).await,
        Commands::Jar(args) => commands::jar(args, &config).await,
        Commands::Cache(args) => commands::cache(args, &config).await,
        Commands::Config(args) => commands::config(args, &config, &config_manager).await,
        Commands::Status => commands::status(&config).await,
    }
}
