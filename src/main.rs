//! Catalog service CLI
//!
//! ```sh
//! # Run with default config (~/.config/catalog-service/config.toml)
//! catalog-service
//!
//! # Custom config path and port
//! catalog-service --config /etc/catalog-service/config.toml --port 8080
//!
//! # Validate config without starting
//! catalog-service --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use catalog_api::config::AppConfig;
use catalog_api::server::{init_tracing, ServerHandle, ServerOptions};

/// Users and productos CRUD API.
#[derive(Parser, Debug)]
#[command(
    name = "catalog-service",
    version,
    about = "Users and productos CRUD API",
    long_about = "REST API serving an in-memory user store and a database-backed \
                  product catalog.\n\n\
                  Default config: ~/.config/catalog-service/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "CATALOG_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli.config.unwrap_or_else(catalog_api::default_config_path);

    let mut config = AppConfig::load(&config_path)?;
    config.apply_env()?;

    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        println!("Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   Mode        : {}", config.mode);
        println!("   Address     : {}", config.listen_address());
        println!("   Database    : {}", config.database.url);
        println!("   CORS        : {}", config.cors.allowed_origins.join(", "));
        println!("   Log level   : {}", config.logging.level);
        return Ok(());
    }

    init_tracing(&config);
    info!("Configuration loaded from {}", config_path.display());

    // ── Start server ───────────────────────────────────────────
    let handle = match ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
    })
    .await
    {
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
