//! Cache command - inspect or clear the dependency cache volume

use crate::cache::CacheVolume;
use crate::cli::args::{CacheAction, CacheArgs};
use crate::config::Config;
use crate::error::MvnboxResult;
use crate::orchestration::{create_runtime, ContainerRuntime};
use crate::ui::{self, UiContext};
use tracing::debug;

/// Execute the cache command
pub async fn execute(args: CacheArgs, config: &Config) -> MvnboxResult<()> {
    let runtime = create_runtime(&config.runtime).await?;
    runtime.ensure_ready().await?;
    let ctx = UiContext::detect();

    match args.action {
        CacheAction::Info => show_info(&ctx, &*runtime, config).await,
        CacheAction::Clear { yes } => {
            clear_cache(&ctx.with_auto_yes(yes), &*runtime, config).await
        }
    }
}

/// Show the cache volume and where it is mounted
async fn show_info(
    ctx: &UiContext,
    runtime: &dyn ContainerRuntime,
    config: &Config,
) -> MvnboxResult<()> {
    let name = &config.cache.volume;

    ui::key_value(ctx, "Volume", name);
    ui::key_value(ctx, "Mount path", &config.cache.mount_path);
    ui::key_value(ctx, "Engine", runtime.runtime_name());
    if !config.cache.enabled {
        ui::step_warn(ctx, "Caching is disabled (cache.enabled = false)");
    }

    match runtime.volume_inspect(name).await? {
        Some(info) => {
            let volume = CacheVolume::from_info(&info);
            let created = volume
                .created_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "unknown".to_string());
            ui::key_value(ctx, "Created", &created);
            if let Some(ref mountpoint) = volume.mountpoint {
                ui::key_value(ctx, "Host path", mountpoint);
            }
            if !volume.managed {
                ui::remark(ctx, "Volume was not created by mvnbox");
            }
        }
        None => ui::remark(ctx, "Not created yet; the first build creates it"),
    }

    Ok(())
}

/// Remove the cache volume after confirmation
async fn clear_cache(
    ctx: &UiContext,
    runtime: &dyn ContainerRuntime,
    config: &Config,
) -> MvnboxResult<()> {
    let name = &config.cache.volume;

    if runtime.volume_inspect(name).await?.is_none() {
        ui::step_ok(ctx, &format!("Cache volume {} does not exist", name));
        return Ok(());
    }

    let prompt = format!("Remove cache volume {}? Dependencies will be downloaded again", name);
    if !ui::confirm(ctx, &prompt, false).await? {
        ui::remark(ctx, "Aborted (use --yes to skip the prompt)");
        return Ok(());
    }

    debug!("Removing cache volume: {}", name);
    runtime.volume_remove(name).await?;
    ui::step_ok(ctx, &format!("Removed cache volume {}", name));

    Ok(())
}
