//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, migrations, worker spawning, and the Axum
//! server lifecycle including graceful shutdown.

use crate::config::Config;
use crate::domain::click_worker::{ClickRecorder, run_click_worker};
use crate::infrastructure::geoip;
use crate::infrastructure::persistence::{PgClickRepository, PgUrlRepository};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Upper bound on how long queued clicks may take to flush at shutdown.
const WORKER_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Builds the connection pool from the `DB_*` pool settings.
///
/// # Errors
///
/// Returns an error if the database cannot be reached.
pub async fn connect_pool(config: &Config) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")
}

/// Applies the embedded migrations.
///
/// # Errors
///
/// Returns an error if a migration fails.
pub async fn migrate(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to run database migrations")
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - GeoIP locator (or null fallback)
/// - Background click worker
/// - Axum HTTP server
///
/// On SIGINT or SIGTERM the server stops accepting connections and finishes
/// in-flight requests. The click queue is then closed and drained, and the
/// pool is closed last.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_pool(&config).await?;
    tracing::info!("Connected to database");

    migrate(&pool).await?;
    tracing::info!("Migrations applied");

    let pool_arc = Arc::new(pool.clone());
    let url_repository = Arc::new(PgUrlRepository::new(pool_arc.clone()));
    let click_repository = Arc::new(PgClickRepository::new(pool_arc));

    let geo = geoip::from_config(config.geoip_db_path.as_deref());

    let (click_tx, click_rx) = mpsc::channel(config.click_queue_capacity);

    let recorder = Arc::new(ClickRecorder::new(
        url_repository.clone(),
        click_repository.clone(),
        geo,
    ));
    let worker = tokio::spawn(run_click_worker(
        click_rx,
        recorder,
        config.click_worker_concurrency,
    ));
    tracing::info!(
        concurrency = config.click_worker_concurrency,
        "Click worker started"
    );

    let state = AppState::new(
        url_repository,
        click_repository,
        click_tx,
        config.base_url.clone(),
        config.behind_proxy,
    );

    let app = app_router(state, config.rate_limit)?;

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    // The router owns the only sender; once serve returns and drops it the
    // worker sees a closed channel.
    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("HTTP server stopped, draining click queue");
    match tokio::time::timeout(WORKER_DRAIN_TIMEOUT, worker).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::error!("Click worker panicked: {}", e),
        Err(_) => tracing::warn!(
            "Click queue did not drain within {}s, pending clicks are lost",
            WORKER_DRAIN_TIMEOUT.as_secs()
        ),
    }

    pool.close().await;
    tracing::info!("Database pool closed");

    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
