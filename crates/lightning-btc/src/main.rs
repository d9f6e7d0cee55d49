//! Standalone Lightning BTC plugin server.
//!
//! Mounts the plugin routes under the configured prefix and derives the
//! caller identity from request headers.

use std::sync::Arc;

use axum::middleware;
use axum::Router;
use ledger::Database;
use lightning_btc::{attach_identity, Config, IdentityDefaults, PluginState};
use lnbits_client::{LnbitsClient, LnbitsConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, mount = %config.mount_path, "Starting Lightning BTC plugin");

    // Connect to ledger
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    // Build gateway client
    let gateway = LnbitsClient::new(
        LnbitsConfig::new(&config.lnbits_url).with_timeout(config.lnbits_timeout),
    )?;
    info!(
        lnbits = %config.lnbits_url,
        default_invoice_key = config.default_invoice_key.is_some(),
        tenancy = ?config.tenancy,
        "Lightning BTC plugin initialized"
    );

    // Build plugin state
    let state = PluginState::new(db.clone(), Arc::new(gateway))
        .with_tenancy(config.tenancy)
        .with_static_dir(&config.static_dir);

    let defaults = IdentityDefaults {
        user_id: config.default_user_id.clone(),
        wallet_id: config.default_wallet_id.clone(),
        invoice_key: config.default_invoice_key.clone(),
    };

    // Build router
    let app = Router::new()
        .nest(&config.mount_path, lightning_btc::router(state))
        .layer(middleware::from_fn_with_state(defaults, attach_identity));

    // Start server
    info!(addr = %config.addr, "Lightning BTC plugin listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Lightning BTC plugin stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
    }
}
