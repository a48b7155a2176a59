//! snakeshot - scripted snake-duel recorder and visual divergence reporter
//!
//! Main entry point for the snakeshot CLI.

mod adapters;
mod cli;
mod cmd_compare;
mod cmd_play;

use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use snakeshot_config::{Config, ConfigLoader, ConfigValidator};

use adapters::BoxError;
use cli::{Cli, Commands};

/// Initialize tracing with console and file output.
///
/// Log files are written to ~/.snakeshot/logs/ with daily rotation.
fn init_tracing() -> Result<(), BoxError> {
    let log_dir = adapters::snakeshot_dir().join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("snakeshot")
        .filename_suffix("log")
        .max_log_files(30)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // The guard flushes the file writer on drop; keep it for the whole run.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_ansi(true))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

/// Load the config and reject it if validation finds errors.
fn load_config(path: &Path) -> Result<Config, BoxError> {
    let config = ConfigLoader::load(path)?;
    for warning in ConfigValidator::validate(&config).into_result()? {
        warn!("Config {}: {}", warning.path, warning.message);
    }
    Ok(config)
}

/// Print every validation finding; fail if any is an error.
fn check_config(path: &Path) -> Result<(), BoxError> {
    let config = ConfigLoader::load(path)?;
    let result = ConfigValidator::validate(&config);

    for error in &result.errors {
        println!("error:   {}: {}", error.path, error.message);
    }
    for warning in &result.warnings {
        println!("warning: {}: {}", warning.path, warning.message);
    }

    if !result.is_valid() {
        return Err(format!("{} has {} error(s)", path.display(), result.errors.len()).into());
    }
    println!(
        "{} is valid ({} player(s), {} warning(s))",
        path.display(),
        config.players.len(),
        result.warnings.len()
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    init_tracing()?;

    let cli = Cli::parse();
    info!("Using config {}", cli.config.display());

    match cli.command {
        Commands::Play { player } => {
            let config = Arc::new(load_config(&cli.config)?);
            cmd_play::handle_play_command(config, &player).await
        }
        Commands::Duel => {
            let config = Arc::new(load_config(&cli.config)?);
            cmd_play::handle_duel_command(config).await
        }
        Commands::Compare { dir_a, dir_b } => {
            let config = load_config(&cli.config)?;
            let dirs = dir_a.zip(dir_b);
            cmd_compare::handle_compare_command(&config, dirs).await
        }
        Commands::ConfigCheck => check_config(&cli.config),
    }
}
