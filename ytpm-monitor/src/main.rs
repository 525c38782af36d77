//! ytpm-monitor - Main entry point
//!
//! Resolves configuration, installs logging and runs the selected mode.

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;

use ytpm_common::config::{locate_config, MonitorConfig};
use ytpm_monitor::cli::{Args, Mode};
use ytpm_monitor::logging::init_tracing;
use ytpm_monitor::Monitor;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let (config_path, toml_config) =
        locate_config(args.config.as_deref()).context("Failed to load config file")?;
    let config = MonitorConfig::resolve(&args.overrides(), &toml_config);

    init_tracing(&config.logging).context("Failed to initialize logging")?;

    info!("Starting ytpm-monitor v{}", env!("CARGO_PKG_VERSION"));
    match &config_path {
        Some(path) => info!("Config file: {}", path.display()),
        None => info!("No config file, using environment and defaults"),
    }

    match args.mode {
        Mode::ShowConfig => {
            show_config(&config, config_path.as_deref());
            Ok(())
        }
        Mode::Inspect => {
            config.validate_source().context("Invalid configuration")?;
            let monitor = Monitor::from_config(&config).context("Failed to set up monitor")?;
            let snapshot = monitor.inspect().await.context("Failed to build snapshot")?;

            println!(
                "{} ({}): {} entries, showing {}",
                snapshot.playlist_title,
                snapshot.playlist_id,
                snapshot.total_entry_count,
                snapshot.len()
            );
            for entry in &snapshot.entries {
                println!(
                    "{:>3}. [{:<10}] {}\n     {}",
                    entry.position,
                    entry.tier.to_string(),
                    entry.title,
                    entry.url
                );
            }
            Ok(())
        }
        Mode::Once => {
            let monitor = build_monitor(&config)?;
            monitor.run_once().await.context("Check failed")?;
            Ok(())
        }
        Mode::Monitor => {
            let monitor = build_monitor(&config)?;
            let checks = monitor.run_scheduled(shutdown_signal()).await;
            info!("Monitor shutdown complete ({} checks)", checks);
            Ok(())
        }
        Mode::TestEmail => {
            let monitor = build_monitor(&config)?;
            monitor
                .send_test_notification()
                .await
                .context("Test notification failed")?;
            Ok(())
        }
    }
}

fn build_monitor(config: &MonitorConfig) -> Result<Monitor> {
    config.validate().context("Invalid configuration")?;
    info!("{}", config.summary().trim_end());
    Monitor::from_config(config).context("Failed to set up monitor")
}

fn show_config(config: &MonitorConfig, path: Option<&std::path::Path>) {
    match path {
        Some(p) => println!("Config file: {}", p.display()),
        None => println!("Config file: (none)"),
    }
    print!("{}", config.summary());
    match config.validate() {
        Ok(()) => println!("Status: valid"),
        Err(e) => println!("Status: invalid ({})", e),
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
