//! Hotel Booking - CLI Server
//!
//! Headless REST API server suitable for deployment as a systemd service,
//! Docker container, or standalone process.
//!
//! ```sh
//! # Run with default config (~/.config/hotel-booking/config.toml)
//! hotel-booking
//!
//! # Custom config path
//! hotel-booking --config /etc/hotel-booking/config.toml
//!
//! # Override port
//! hotel-booking --api-port 8080
//!
//! # Validate config without starting
//! hotel-booking --check
//! ```

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::{error, info, warn};

use hotel_booking::config::{AppConfig, ConfigError};
use hotel_booking::server::{init_tracing, ServerHandle, ServerOptions};

/// Hotel Booking - REST API for hotels, rooms and reservations.
#[derive(Parser, Debug)]
#[command(
    name = "hotel-booking",
    version,
    about = "REST API server for hotel, room and reservation management",
    long_about = "Hotel Booking - REST API server with JWT authentication, \
                  Swagger UI and Prometheus metrics.\n\n\
                  Default config: ~/.config/hotel-booking/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "HOTEL_BOOKING_CONFIG")]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(long)]
    api_port: Option<u16>,

    /// Override the database URL.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,

    /// Skip creating the default admin user.
    #[arg(long)]
    no_admin: bool,
}

/// Config from `path`, or the defaults plus the load error.
fn load_config(path: &Path) -> (AppConfig, Option<ConfigError>) {
    match AppConfig::load(path) {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    }
}

/// Plain-text logging at `level` for runs without a usable config file.
fn init_fallback_tracing(level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(level))
        .try_init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli
        .config
        .unwrap_or_else(hotel_booking::default_config_path);

    let (mut config, load_error) = load_config(&config_path);

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(port) = cli.api_port {
        config.server.api_port = port;
    }
    if let Some(ref url) = cli.database_url {
        config.database.url = url.clone();
    }

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        if let Some(e) = load_error {
            eprintln!("Configuration is invalid: {}", e);
            return Err(e.into());
        }
        println!("Configuration is valid");
        println!("   Config file   : {}", config_path.display());
        println!("   API address   : {}:{}", config.server.api_host, config.server.api_port);
        println!("   Database      : {}", config.database.connection_url());
        println!("   Log level     : {}", config.logging.level);
        println!(
            "   Notifications : {}",
            if config.notifications.enabled { "enabled" } else { "disabled" }
        );
        return Ok(());
    }

    match load_error {
        None => {
            init_tracing(&config);
            info!("Configuration loaded from {}", config_path.display());
        }
        Some(e) => {
            init_fallback_tracing(&config.logging.level);
            error!("Failed to load config from {}: {}", config_path.display(), e);
            warn!("Using default configuration.");
        }
    }

    // ── Start server ───────────────────────────────────────────
    let handle = match ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
        create_default_admin: !cli.no_admin,
    })
    .await
    {
        Ok(handle) => handle,
        Err(e) => {
            error!("Failed to start server: {}", e);
            return Err(e);
        }
    };

    // Install OS signal handlers (SIGTERM, SIGINT)
    handle.install_signal_handler();

    info!("Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn unreadable_config_falls_back_to_defaults() {
        let path = std::env::temp_dir().join(format!("hotel-booking-cli-{}.toml", std::process::id()));
        std::fs::write(&path, "[server\napi_port = ").unwrap();

        let (config, error) = load_config(&path);
        let _ = std::fs::remove_file(&path);

        assert!(matches!(error, Some(ConfigError::Parse { .. })));
        assert_eq!(config.server.api_port, AppConfig::default().server.api_port);
    }

    #[test]
    fn fallback_tracing_installs_a_global_subscriber() {
        init_fallback_tracing("debug");
        assert!(tracing::dispatcher::has_been_set());
    }
}
