//! Server lifecycle helpers.
//!
//! Loading configuration, building the shared [`AppContext`], wiring the
//! actix application, and running the HTTP server until Ctrl+C.

use crate::middleware;
use actix_web::{web, App, HttpServer};
use anyhow::Result;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use taskdeck_api::{configure_routes, AppContext, InMemoryRateLimitStore};
use taskdeck_auth::InMemoryUserRepository;
use taskdeck_commons::{Clock, SystemClock};
use taskdeck_configs::ServerConfig;
use taskdeck_core::InMemoryTaskRepository;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Where the running configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults(PathBuf),
}

/// Load `path`, or fall back to built-in defaults (plus environment
/// overrides) when the file does not exist. A file that exists but fails to
/// parse or validate is an error.
pub fn load_config(path: &Path) -> Result<(ServerConfig, ConfigSource)> {
    if path.exists() {
        let config = ServerConfig::from_file(path)?;
        return Ok((config, ConfigSource::File(path.to_path_buf())));
    }

    let mut config = ServerConfig::default();
    config.apply_env_overrides()?;
    config.finalize()?;
    Ok((config, ConfigSource::Defaults(path.to_path_buf())))
}

/// Build the shared application state with in-memory stores.
pub fn bootstrap(config: ServerConfig) -> web::Data<AppContext> {
    bootstrap_with_clock(config, Arc::new(SystemClock))
}

/// [`bootstrap`] with an injected clock.
pub fn bootstrap_with_clock(config: ServerConfig, clock: Arc<dyn Clock>) -> web::Data<AppContext> {
    let app_context = AppContext::new(
        Arc::new(config),
        clock,
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(InMemoryTaskRepository::new()),
        Arc::new(InMemoryRateLimitStore::new()),
    );
    web::Data::new(app_context)
}

/// Register app data and routes. Middleware is applied by the caller with
/// `App::wrap`, see [`run`].
pub fn configure_app(app_context: web::Data<AppContext>) -> impl Fn(&mut web::ServiceConfig) + Clone {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(app_context.token_data()).app_data(app_context.clone());
        configure_routes(cfg);
    }
}

fn worker_count(config: &ServerConfig) -> usize {
    if config.server.workers == 0 {
        num_cpus::get()
    } else {
        config.server.workers
    }
}

/// Start the HTTP server and wait for it to stop.
pub async fn run(config: &ServerConfig, app_context: web::Data<AppContext>) -> Result<()> {
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let workers = worker_count(config);
    info!("Starting HTTP server on {}", bind_addr);
    info!(
        "Server config: workers={}, keepalive={}s, rate_limit={}/{}s ({}), protected={} -> {}",
        workers,
        config.server.keepalive_seconds,
        config.rate_limit.max_requests,
        config.rate_limit.window_seconds,
        if config.rate_limit.enabled { "enabled" } else { "disabled" },
        config.edge.protected_prefix,
        config.edge.login_path,
    );
    if !config.rate_limit.enabled {
        warn!("Rate limiting is DISABLED");
    }
    if !config.auth.cookie_secure {
        warn!("Auth cookies are sent without the Secure flag");
    }

    let cors_settings = config.security.cors.clone();
    let app_context_for_handler = app_context.clone();

    let server = HttpServer::new(move || {
        App::new()
            .wrap(middleware::build_cors_from_config(&cors_settings))
            .wrap(middleware::request_logger())
            .wrap(app_context_for_handler.edge_middleware())
            .configure(configure_app(app_context_for_handler.clone()))
    })
    .bind(&bind_addr)?
    .workers(workers)
    .keep_alive(Duration::from_secs(config.server.keepalive_seconds))
    .disable_signals()
    .run();

    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    tokio::select! {
        result = server_task => {
            match result {
                Ok(Err(e)) => log::error!("Server stopped with error: {}", e),
                Err(e) => log::error!("Server task failed: {}", e),
                Ok(Ok(())) => {}
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
            server_handle.stop(true).await;
            debug!(
                "Graceful shutdown complete ({} rate-limit buckets dropped)",
                app_context.limiter().tracked_clients()
            );
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
