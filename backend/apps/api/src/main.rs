//! API Server Entry Point
//!
//! Loads configuration, connects to Postgres, runs migrations and serves
//! the composed router. Startup failures are `anyhow` errors; request
//! errors are rendered by each feature crate.

mod app;
mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use auth::PgAuthRepository;
use catalog::PgCatalogRepository;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,catalog=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let server_config = ServerConfig::from_env()?;
    let auth_config = Arc::new(config::auth_config_from_env()?);
    tracing::debug!(?server_config, ?auth_config, "Configuration loaded");

    let pool = PgPoolOptions::new()
        .max_connections(server_config.max_connections)
        .connect_with(server_config.database.connect_options()?)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Connected to database");

    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let app = app::build_router(
        Arc::new(PgAuthRepository::new(pool.clone())),
        Arc::new(PgCatalogRepository::new(pool)),
        auth_config,
    )
    .layer(TraceLayer::new_for_http())
    .layer(app::cors_layer(&server_config.frontend_origins));

    let addr = SocketAddr::from(([0, 0, 0, 0], server_config.port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
