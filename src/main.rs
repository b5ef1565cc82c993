//! Freight billing server
//!
//! ```sh
//! # Default config (~/.config/freight-billing/config.toml)
//! freight-billing
//!
//! # Custom config, port override
//! freight-billing --config /etc/freight-billing/config.toml --api-port 9000
//!
//! # Validate config without starting
//! freight-billing --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use freight_billing::config::{default_config_path, AppConfig, ConfigError, CONFIG_ENV};
use freight_billing::server::{init_tracing, ServerHandle, ServerOptions};

/// Rate table, pricing, invoicing and payment ledger for a shipping back-office.
#[derive(Parser, Debug)]
#[command(name = "freight-billing", version, about)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = CONFIG_ENV)]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(long)]
    api_port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration and exit.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);

    let loaded = AppConfig::load(&config_path);
    let mut config = match &loaded {
        Ok(cfg) => cfg.clone(),
        Err(_) => AppConfig::default(),
    };
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    init_tracing(&config.logging);

    match loaded {
        Ok(_) => info!("Configuration loaded from {}", config_path.display()),
        Err(ConfigError::NotFound(path)) => {
            info!("No config at {}; using defaults", path.display())
        }
        Err(e) => {
            error!("Failed to load config from {}: {}", config_path.display(), e);
            if cli.check {
                return Err(e.into());
            }
            error!("Using default configuration.");
        }
    }

    if let Some(port) = cli.api_port {
        info!("CLI override: api_port = {}", port);
        config.server.api_port = port;
    }

    if cli.check {
        config.validate()?;
        println!("Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   API address : {}", config.api_address());
        println!("   Database    : {}", config.database.url);
        println!("   Currency    : {}", config.billing.currency);
        println!("   Log level   : {}", config.logging.level);
        return Ok(());
    }

    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
    })
    .await?;
    handle.install_signal_handler();
    info!("Press Ctrl+C to shut down gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;
    Ok(())
}
