// ABOUTME: Server binary for the Meal Calorie API
// ABOUTME: Wires config, logging, database, cache, and routes, then serves
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Meal Calorie API Server Binary
//!
//! Starts the HTTP API with user authentication, the shared cache, and the
//! USDA search client. Every shared handle is constructed here and injected
//! through `ServerContext`.

use anyhow::Result;
use clap::Parser;
use mealcal_server::{
    auth::AuthManager,
    cache::Cache,
    config::environment::ServerConfig,
    context::ServerContext,
    database::Database,
    external::usda_client::UsdaClient,
    logging, routes,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "mealcal-server")]
#[command(about = "Meal Calorie API - USDA-backed calorie lookups with user accounts")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    logging::init_from_env()?;

    info!("Starting Meal Calorie API");
    info!("{}", config.summary());

    let database = Database::new(&config.database.url).await?;
    info!("Database initialized: {}", config.database.url);

    let cache = Cache::from_config(config.cache.clone()).await?;
    info!("Cache backend: {}", cache.backend_name());

    if config.usda.api_key.is_empty() {
        warn!("USDA_API_KEY is not set; calorie lookups will fail upstream");
    }
    let usda_client = UsdaClient::new(config.usda.clone())?;

    let auth_manager = AuthManager::new(
        config.auth.secret_key.as_bytes().to_vec(),
        config.auth.token_expiry_minutes,
    );

    let addr: SocketAddr = format!("{}:{}", config.host, config.http_port)
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid listen address: {e}"))?;

    let ctx = Arc::new(ServerContext::new(
        Arc::new(config),
        Arc::new(database),
        cache,
        Arc::new(auth_manager),
        Arc::new(usda_client),
    ));

    let app = routes::router(ctx);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to install Ctrl+C handler: {e}");
        // Fall through: without a signal handler the server runs until killed
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
