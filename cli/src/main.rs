//! Smart parking: CLI launcher
//!
//! Headless parking service suitable for a systemd unit, a container or a
//! gate PC.
//!
//! ```sh
//! # Run with default config (~/.config/smart-parking/config.toml)
//! parking-cli
//!
//! # Custom config path, different port
//! parking-cli --config /etc/smart-parking/config.toml --port 9090
//!
//! # Validate config without starting
//! parking-cli --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use smart_parking::config::AppConfig;
use smart_parking::server::{init_tracing, ServerHandle};

/// Smart parking: slot allocation and fees for a multi-area lot.
#[derive(Parser, Debug)]
#[command(
    name = "parking-cli",
    version,
    about = "Parking slot allocation service",
    long_about = "Smart parking REST service: hash-based slot placement with \
                  overflow areas, hourly fees and receipts.\n\n\
                  Default config: ~/.config/smart-parking/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "PARKING_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listen address.
    #[arg(long)]
    host: Option<String>,

    /// Override the listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Keep receipts in memory instead of writing ticket files.
    #[arg(long)]
    memory_receipts: bool,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli
        .config
        .unwrap_or_else(smart_parking::default_config_path);

    let mut config = match AppConfig::load(&config_path) {
        Ok(cfg) => cfg,
        Err(e) if cli.check => {
            eprintln!("Configuration is invalid: {}", e);
            eprintln!("   Config file : {}", config_path.display());
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!(
                "Failed to load config from {}: {}. Using defaults.",
                config_path.display(),
                e
            );
            AppConfig::default()
        }
    };

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    init_tracing(&config);
    info!("Configuration loaded from {}", config_path.display());

    if let Some(host) = cli.host {
        info!("CLI override: host = {}", host);
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        info!("CLI override: port = {}", port);
        config.server.port = port;
    }
    if cli.memory_receipts {
        info!("CLI override: receipts kept in memory");
        config.receipts.sink = smart_parking::config::ReceiptSinkKind::Memory;
    }

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        println!("Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   API address : {}", config.server.address());
        println!("   Log level   : {}", config.logging.level);
        println!("   Currency    : {}", config.parking.currency_symbol);
        for area in &config.parking.areas {
            println!("   Area {}      : {} slots", area.code, area.capacity);
        }
        println!(
            "   Receipts    : {:?} {}",
            config.receipts.sink,
            config.receipts.directory.display()
        );
        return Ok(());
    }

    // ── Start server ───────────────────────────────────────────
    let handle = match ServerHandle::start(config).await {
        Ok(handle) => handle,
        Err(e) => {
            error!("Failed to start: {}", e);
            return Err(e);
        }
    };

    handle.install_signal_handler();
    info!("Press Ctrl+C to shut down gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
