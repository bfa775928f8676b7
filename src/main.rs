use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use raceboard::logging::{init_tracing, shutdown_tracer};
use raceboard::metrics::{init_metrics, metrics_app};
use raceboard::router::init_router;
use raceboard::state::{AppState, Settings};
use raceboard_config::ServerConfig;
use raceboard_db::{AuthStore, PgStore, init_db_pool};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing().context("failed to initialize logging")?;

    let server = ServerConfig::from_env();
    let settings = Settings::from_env();
    if std::env::var("JWT_SECRET").is_err() {
        warn!("JWT_SECRET is not set, using the development secret");
    }

    let database_url = server
        .database_url
        .clone()
        .context("DATABASE_URL must be set")?;
    let pool = init_db_pool(&database_url, server.database_max_connections)
        .await
        .context("failed to connect to database")?;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("failed to run migrations")?;

    let store: Arc<dyn AuthStore> = Arc::new(PgStore::new(pool));
    let state = AppState::new(store, settings);

    if let Some(handle) = init_metrics().context("failed to install metrics recorder")? {
        let metrics_listener = TcpListener::bind(&server.metrics_addr)
            .await
            .with_context(|| format!("failed to bind metrics listener {}", server.metrics_addr))?;
        info!(addr = %server.metrics_addr, "Metrics listening");
        tokio::spawn(async move {
            if let Err(e) = axum::serve(metrics_listener, metrics_app(handle)).await {
                error!(error = %e, "Metrics server stopped");
            }
        });
    }

    let app = init_router(state);
    let listener = TcpListener::bind(&server.addr)
        .await
        .with_context(|| format!("failed to bind {}", server.addr))?;
    info!(addr = %server.addr, "Raceboard API listening");
    info!("Swagger UI at /swagger-ui, Scalar at /scalar");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

    shutdown_tracer();
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
