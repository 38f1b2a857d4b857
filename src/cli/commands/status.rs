//! Status command - check container engine, image and cache

use crate::cache::CacheVolume;
use crate::config::Config;
use crate::error::MvnboxResult;
use crate::orchestration::{resolve_engine, CliRuntime, ContainerRuntime, Engine};
use console::{style, Emoji};

static CHECK: Emoji<'_, '_> = Emoji("✓ ", "[OK] ");
static CROSS: Emoji<'_, '_> = Emoji("✗ ", "[FAIL] ");
static WARN: Emoji<'_, '_> = Emoji("⚠ ", "[WARN] ");

/// Execute the status command
pub async fn execute(config: &Config) -> MvnboxResult<()> {
    println!("{}", style("mvnbox status").bold().cyan());

    println!();
    println!("{}", style("Container engines:").bold());
    for engine in Engine::ALL {
        check_engine(engine).await;
    }

    println!();
    println!("{}", style("Selected engine:").bold());
    let engine = match resolve_engine(&config.runtime).await {
        Ok(engine) => engine,
        Err(e) => {
            println!("  {} {}", CROSS, style(&e).red());
            if let Some(hint) = e.hint() {
                println!("    {}", style(hint).dim());
            }
            print_summary(false);
            return Ok(());
        }
    };

    let runtime = CliRuntime::new(engine);
    let mut all_ok = match runtime.ensure_ready().await {
        Ok(()) => {
            println!("  {} {} (engine = {})", CHECK, engine.name(), config.runtime.engine);
            true
        }
        Err(e) => {
            println!("  {} {}", CROSS, style(e).red());
            false
        }
    };

    if all_ok {
        all_ok &= check_image(&runtime, config).await;
        check_cache(&runtime, config).await;
    }

    print_summary(all_ok);
    Ok(())
}

fn print_summary(all_ok: bool) {
    println!();
    if all_ok {
        println!("{}", style("Ready to build").green().bold());
    } else {
        println!(
            "{}",
            style("Some checks failed - see above for details").yellow().bold()
        );
    }
}

async fn check_engine(engine: Engine) {
    let runtime = CliRuntime::new(engine);
    match runtime.version().await {
        Ok(version) => println!("  {} {}: {}", CHECK, engine.name(), version),
        Err(_) => println!(
            "  {} {}: {}",
            WARN,
            engine.name(),
            style("not installed").dim()
        ),
    }
}

async fn check_image(runtime: &dyn ContainerRuntime, config: &Config) -> bool {
    println!();
    println!("{}", style("Build image:").bold());

    let reference = config.image.reference();
    println!("  {} {}", CHECK, reference);

    if !config.image.is_pinned() {
        println!(
            "  {} {} - set image.digest for reproducible builds",
            WARN,
            style("Not pinned to a digest").yellow()
        );
    }

    match runtime.image_exists(&reference).await {
        Ok(true) => {
            println!("  {} {}", CHECK, style("Present locally").green());
            true
        }
        Ok(false) => {
            println!(
                "  {} {} - pulled on first build",
                WARN,
                style("Not pulled yet").yellow()
            );
            true
        }
        Err(e) => {
            println!("  {} {} - {}", CROSS, style("Error checking image").red(), e);
            false
        }
    }
}

async fn check_cache(runtime: &dyn ContainerRuntime, config: &Config) {
    println!();
    println!("{}", style("Dependency cache:").bold());

    if !config.cache.enabled {
        println!("  {} {}", WARN, style("Disabled").yellow());
        return;
    }

    match runtime.volume_inspect(&config.cache.volume).await {
        Ok(Some(info)) => {
            let volume = CacheVolume::from_info(&info);
            println!(
                "  {} {} mounted at {}",
                CHECK, volume.name, config.cache.mount_path
            );
        }
        Ok(None) => println!(
            "  {} {} - created on first build",
            WARN,
            style(format!("{} does not exist yet", config.cache.volume)).yellow()
        ),
        Err(e) => println!("  {} {} - {}", CROSS, style("Error inspecting cache").red(), e),
    }
}
