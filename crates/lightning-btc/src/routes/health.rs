//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::PluginState;

#[derive(Serialize)]
pub struct Health {
    pub status: String,
    pub gateway: String,
    pub transactions: Option<i64>,
}

/// Reports whether the ledger is reachable. The gateway is not called.
pub async fn health(State(state): State<PluginState>) -> Json<Health> {
    let transactions = ledger::transaction::count_transactions(state.workflow.db().pool()).await;

    let status = match &transactions {
        Ok(_) => "ok",
        Err(err) => {
            tracing::warn!("Ledger health check failed: {}", err);
            "degraded"
        }
    };

    Json(Health {
        status: status.to_string(),
        gateway: state.workflow.gateway().name().to_string(),
        transactions: transactions.ok(),
    })
}
