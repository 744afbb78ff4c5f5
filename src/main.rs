// Taskdeck Server entrypoint
//!
//! Usage: `taskdeck-server [config.toml]`

use anyhow::Result;
use log::{info, warn};
use std::env;
use std::path::PathBuf;
use taskdeck_server::lifecycle::{self, ConfigSource, DEFAULT_CONFIG_PATH};
use taskdeck_server::logging;

#[actix_web::main]
async fn main() -> Result<()> {
    let config_path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let (config, source) = match lifecycle::load_config(&config_path) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("FATAL: Failed to load {}: {}", config_path.display(), e);
            std::process::exit(1);
        }
    };

    // Logging before any other side effects
    logging::init_logging(&config.logging)?;

    info!("Taskdeck Server v{}", env!("CARGO_PKG_VERSION"));
    match &source {
        ConfigSource::File(path) => info!("Loaded config from: {}", path.display()),
        ConfigSource::Defaults(path) => {
            warn!("Config file {} not found, using defaults", path.display())
        }
    }
    info!("Host: {}  Port: {}", config.server.host, config.server.port);

    let app_context = lifecycle::bootstrap(config.clone());
    lifecycle::run(&config, app_context).await
}
