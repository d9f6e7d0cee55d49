//! Transaction history route.

use axum::extract::State;
use axum::Json;
use ledger::Transaction;

use crate::error::Result;
use crate::identity::Identity;
use crate::state::PluginState;

/// List recorded transactions visible to the caller.
pub async fn list_transactions(
    State(state): State<PluginState>,
    identity: Identity,
) -> Result<Json<Vec<Transaction>>> {
    let transactions = state.workflow.list_transactions(&identity).await?;
    Ok(Json(transactions))
}
