use anyhow::{Context, Result};
use std::time::Duration;
use tokio::signal;
use tracing::{info, warn};

use apartment_api::{app, config, jobs, middleware, services};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = config::Config::load().context("Failed to load configuration")?;

    middleware::logging::init_logging(&config.logging)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.server.environment,
        "Starting apartment manager API"
    );

    middleware::init_metrics().context("Failed to install Prometheus recorder")?;

    let db_config: persistence::db::DatabaseConfig = (&config.database).into();
    let pool = persistence::db::create_pool(&db_config)
        .await
        .context("Failed to create database pool")?;

    info!("Running database migrations...");
    persistence::db::run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;
    info!("Migrations completed");

    services::bootstrap_secretary(&pool, &config.bootstrap)
        .await
        .context("Failed to bootstrap secretary")?;

    let mut scheduler = jobs::build_scheduler(pool.clone(), &config.jobs);
    if config.jobs.enabled {
        scheduler.start();
    } else {
        warn!("Background jobs disabled by configuration");
    }

    let addr = config.socket_addr().context("Invalid server address")?;
    let app = app::create_app(config, pool.clone()).context("Failed to load JWT keys")?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    scheduler.shutdown();
    scheduler.wait_for_shutdown(Duration::from_secs(10)).await;
    pool.close().await;
    info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
