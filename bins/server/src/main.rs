//! Recibo API Server
//!
//! Main entry point for the Recibo backend service.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use recibo_api::{AppState, create_router};
use recibo_core::receipt::{ReceiptStore, ReceiptStoreConfig};
use recibo_db::connect;
use recibo_shared::{AppConfig, JwtService, jwt::JwtConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recibo=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Connect to database
    let db = connect(&config.database.url).await?;
    info!("Connected to database");

    // Create JWT service
    let jwt_service = JwtService::new(JwtConfig {
        secret: config.jwt.secret.clone(),
        token_expires_hours: config.jwt.token_expires_hours,
    });

    // Upload areas must exist before the store mounts them
    std::fs::create_dir_all(&config.uploads.staging_dir)?;
    std::fs::create_dir_all(&config.uploads.receipts_dir)?;

    let receipts = ReceiptStore::from_config(ReceiptStoreConfig::new(
        &config.uploads.staging_dir,
        &config.uploads.receipts_dir,
    ))?;
    info!(
        staging = %config.uploads.staging_dir,
        receipts = %config.uploads.receipts_dir,
        "Receipt store configured"
    );

    // Create application state
    let state = AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(jwt_service),
        receipts: Arc::new(receipts),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
