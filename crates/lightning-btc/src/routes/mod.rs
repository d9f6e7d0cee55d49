//! Route handlers for the plugin.

pub mod health;
pub mod invoice;
pub mod transactions;

use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeFile;

use crate::state::PluginState;

/// Build the plugin router.
///
/// Routes are relative; the host nests the router under its own prefix and
/// is responsible for attaching an [`Identity`](crate::Identity) to each request.
pub fn router(state: PluginState) -> Router {
    let index = ServeFile::new(state.static_dir.join("index.html"));

    Router::new()
        // Plugin page
        .route_service("/", index)
        // Health check
        .route("/health", get(health::health))
        // API endpoints
        .route("/create-invoice", post(invoice::create_invoice))
        .route("/pay-invoice", post(invoice::pay_invoice))
        .route("/balance", get(invoice::balance))
        .route("/transactions", get(transactions::list_transactions))
        .with_state(state)
}
