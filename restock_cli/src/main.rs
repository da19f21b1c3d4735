#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
mod cli;
mod commands;
mod error_fmt;

use std::path::Path;

use clap::Parser;
use eyre::{Result, WrapErr};
use restock_config::Config;
use restock_core::{JsonFileStore, Monitor, MonitorCfg};
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, prelude::*};

use crate::cli::{Cli, DEFAULT_CONFIG, FILE_GUARD, JSON_MODE};
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};

fn main() {
    let _ = color_eyre::install();
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);

    if let Err(e) = run(cli) {
        if JSON_MODE.get().copied().unwrap_or(false) {
            println!("{}", format_error_json(&e));
        } else {
            eprintln!("{}", humanize(&e));
        }
        std::process::exit(exit_code_for_error(&e));
    }
}

fn run(cli: Cli) -> Result<()> {
    let cfg = load_config(cli.config.as_deref())?;
    init_tracing(cli.json, cli.log_level.as_deref(), &cfg.logging)?;
    tracing::debug!(?cfg, "configuration loaded");

    let monitor = build_monitor(&cfg)?;
    commands::dispatch(&monitor, cli.cmd, cli.json)
}

/// Explicit path must exist; the default path is optional.
fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(p) => restock_config::load_file(p),
        None => {
            let p = Path::new(DEFAULT_CONFIG);
            if p.exists() {
                restock_config::load_file(p)
            } else {
                Ok(Config::default())
            }
        }
    }
}

/// Console layer on stderr plus an optional JSON file layer.
///
/// Filter precedence: `RUST_LOG`, then `--log-level`, then `[logging] level`, then `info`.
fn init_tracing(
    json: bool,
    cli_level: Option<&str>,
    logging: &restock_config::Logging,
) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(f) => f,
        Err(_) => {
            let level = cli_level.or(logging.level.as_deref()).unwrap_or("info");
            EnvFilter::try_new(level).wrap_err_with(|| format!("invalid log level {level:?}"))?
        }
    };

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();
    if json {
        layers.push(fmt::layer().json().with_writer(std::io::stderr).boxed());
    } else {
        layers.push(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .boxed(),
        );
    }

    if let Some(file) = logging.file.as_deref() {
        let path = Path::new(file);
        let dir = path
            .parent()
            .filter(|d| !d.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let name = path
            .file_name()
            .ok_or_else(|| eyre::eyre!("logging.file has no file name: {file}"))?;
        let appender = match logging.rotation.as_deref().unwrap_or("never") {
            "daily" => tracing_appender::rolling::daily(dir, name),
            "hourly" => tracing_appender::rolling::hourly(dir, name),
            _ => tracing_appender::rolling::never(dir, name),
        };
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = FILE_GUARD.set(guard);
        layers.push(
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer)
                .boxed(),
        );
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| eyre::eyre!("init logging: {e}"))
}

fn build_monitor(cfg: &Config) -> Result<Monitor> {
    let monitor = Monitor::builder()
        .with_config(MonitorCfg::from(cfg))
        .with_store(JsonFileStore::new(cfg.storage.record_path.clone()))
        .with_source_opt(open_source(cfg))
        .build()?;
    if !monitor.has_device() {
        tracing::warn!("no sensor detected; readings will report no_device");
    }
    Ok(monitor)
}

#[cfg(feature = "hardware")]
fn open_source(cfg: &Config) -> Option<restock_hardware::SerialLineSource> {
    restock_hardware::SerialLineSource::try_open(
        &cfg.serial.port,
        cfg.serial.baud,
        std::time::Duration::from_millis(cfg.serial.read_timeout_ms),
    )
}

#[cfg(not(feature = "hardware"))]
fn open_source(_cfg: &Config) -> Option<restock_hardware::SimulatedSource> {
    restock_hardware::SimulatedSource::from_env()
}
