//! Config command - show or edit configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{merge_toml_value, read_toml, Config, ConfigManager, LOCAL_CONFIG_FILE};
use crate::error::{MvnboxError, MvnboxResult};
use crate::ui::{self, UiContext};
use std::path::Path;
use tokio::fs;

/// Keys accepted by `config set`
const VALID_KEYS: [&str; 11] = [
    "general.log_format",
    "runtime.engine",
    "image.name",
    "image.digest",
    "cache.enabled",
    "cache.volume",
    "cache.mount_path",
    "container.workdir",
    "container.network",
    "container.user",
    "container.env.<NAME>",
];

/// Execute the config command
pub async fn execute(
    args: ConfigArgs,
    config: &Config,
    manager: &ConfigManager,
) -> MvnboxResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_config(config)?,
        Some(ConfigAction::Path) => println!("{}", manager.path().display()),
        Some(ConfigAction::Init { force }) => init_config(manager, force).await?,
        Some(ConfigAction::Set { key, value, local }) => {
            let path = if local {
                std::env::current_dir()
                    .map_err(|e| MvnboxError::io("getting current directory", e))?
                    .join(LOCAL_CONFIG_FILE)
            } else {
                manager.path().to_path_buf()
            };
            set_value(&path, &key, &value).await?;
            ui::step_ok(
                &UiContext::detect(),
                &format!("Set {} = {} in {}", key, value, path.display()),
            );
        }
    }

    Ok(())
}

fn show_config(config: &Config) -> MvnboxResult<()> {
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

async fn init_config(manager: &ConfigManager, force: bool) -> MvnboxResult<()> {
    let ctx = UiContext::detect();
    let path = manager.path();

    if path.exists() && !force {
        ui::step_warn(
            &ctx,
            &format!(
                "Config already exists at {} - use --force to overwrite",
                path.display()
            ),
        );
        return Ok(());
    }

    manager.save(&Config::default()).await?;
    ui::step_ok(&ctx, &format!("Configuration initialized at {}", path.display()));

    Ok(())
}

/// Validate that a config key is one we recognise.
fn validate_config_key(key: &str) -> MvnboxResult<()> {
    let parts: Vec<&str> = key.split('.').collect();
    match parts.as_slice() {
        ["general", "log_format"]
        | ["runtime", "engine"]
        | ["image", "name" | "digest"]
        | ["cache", "enabled" | "volume" | "mount_path"]
        | ["container", "workdir" | "network" | "user"] => Ok(()),
        ["container", "env", name] if !name.is_empty() => Ok(()),
        _ => Err(MvnboxError::User(format!(
            "Unknown config key: {}. Valid keys: {}",
            key,
            VALID_KEYS.join(", ")
        ))),
    }
}

/// Convert a command-line value into the TOML type the key expects
fn parse_value(key: &str, value: &str) -> MvnboxResult<toml::Value> {
    if key == "cache.enabled" {
        return match value.to_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(toml::Value::Boolean(true)),
            "false" | "0" | "no" => Ok(toml::Value::Boolean(false)),
            _ => Err(MvnboxError::User(format!(
                "Invalid boolean value: {}. Use true/false",
                value
            ))),
        };
    }
    Ok(toml::Value::String(value.to_string()))
}

/// Build a nested table holding just `key = value`
fn single_key_table(key: &str, value: toml::Value) -> toml::Value {
    key.rsplit('.').fold(value, |inner, part| {
        let mut table = toml::map::Map::new();
        table.insert(part.to_string(), inner);
        toml::Value::Table(table)
    })
}

/// Set one key in a config file, keeping every other key as written
async fn set_value(path: &Path, key: &str, value: &str) -> MvnboxResult<()> {
    validate_config_key(key)?;

    let mut doc = if path.exists() {
        read_toml(path).await?
    } else {
        toml::Value::Table(toml::map::Map::new())
    };
    merge_toml_value(&mut doc, single_key_table(key, parse_value(key, value)?));

    // Refuse to write something the loader would reject
    let check: Config = doc
        .clone()
        .try_into()
        .map_err(|e: toml::de::Error| MvnboxError::User(e.to_string()))?;
    check.validate().map_err(MvnboxError::User)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| MvnboxError::io(format!("creating {}", parent.display()), e))?;
    }
    let content = toml::to_string_pretty(&doc)?;
    fs::write(path, content)
        .await
        .map_err(|e| MvnboxError::io(format!("writing {}", path.display()), e))?;

    Ok(())
}
