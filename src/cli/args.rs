//! CLI argument definitions using clap derive

use clap::{ArgAction, Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// mvnbox - Maven builds in pinned, cached containers
///
/// Runs Maven inside a digest-pinned image with the local repository kept
/// in a persistent volume and the project mounted as the working directory.
#[derive(Parser, Debug)]
#[command(name = "mvnbox")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "MVNBOX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Skip local .mvnbox.toml discovery
    #[arg(long, global = true)]
    pub no_local: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run mvn package
    Package(BuildArgs),

    /// Run mvn install
    Install(BuildArgs),

    /// Run mvn test
    Test(BuildArgs),

    /// Run mvn clean
    Clean(BuildArgs),

    /// Run mvn with arbitrary arguments
    Mvn(ExecArgs),

    /// Run an arbitrary command in the build container
    Exec(ExecArgs),

    /// Package the project and retrieve the jar
    Jar(JarArgs),

    /// Manage the dependency cache volume
    Cache(CacheArgs),

    /// Show or edit configuration
    Config(ConfigArgs),

    /// Check container engine, image and cache
    Status,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Options shared by every command that starts build containers
#[derive(Args, Debug, Default, Clone)]
pub struct EnvironmentArgs {
    /// Project directory to mount (defaults to current directory)
    #[arg(short, long)]
    pub sources: Option<PathBuf>,

    /// Additional environment variables (KEY=VALUE)
    #[arg(short, long, value_parser = parse_env_var)]
    pub env: Vec<(String, String)>,

    /// Network mode for build containers (e.g. none, host)
    #[arg(long)]
    pub network: Option<String>,
}

/// Arguments for lifecycle commands
#[derive(Args, Debug)]
pub struct BuildArgs {
    #[command(flatten)]
    pub environment: EnvironmentArgs,

    /// Run mvn clean first
    #[arg(long)]
    pub clean: bool,

    /// Extra arguments passed to mvn after the phase
    #[arg(last = true)]
    pub maven_args: Vec<String>,
}

/// Arguments for mvn / exec
#[derive(Args, Debug)]
pub struct ExecArgs {
    #[command(flatten)]
    pub environment: EnvironmentArgs,

    /// Command line to run
    #[arg(last = true, required = true)]
    pub command: Vec<String>,
}

/// Arguments for the jar command
#[derive(Args, Debug)]
pub struct JarArgs {
    #[command(flatten)]
    pub environment: EnvironmentArgs,

    /// Run mvn clean before packaging
    #[arg(long)]
    pub clean: bool,

    /// Copy the jar to this file or directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the cache command
#[derive(Args, Debug)]
pub struct CacheArgs {
    /// Subcommand for cache
    #[command(subcommand)]
    pub action: CacheAction,
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// Show the cache volume
    Info,

    /// Remove the cache volume
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., cache.volume)
        key: String,
        /// Value to set
        value: String,
        /// Write to project-local .mvnbox.toml instead of global config
        #[arg(long)]
        local: bool,
    },
}

/// Arguments for the completions command
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}

/// Parse environment variable in KEY=VALUE format
fn parse_env_var(s: &str) -> Result<(String, String), String> {
    let pos = s
        .find('=')
        .ok_or_else(|| format!("invalid KEY=VALUE format: no '=' found in '{s}'"))?;
    if pos == 0 {
        return Err(format!("invalid KEY=VALUE format: empty key in '{s}'"));
    }
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}
