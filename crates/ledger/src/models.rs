//! Ledger models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Name of the ledger table, fixed by the migration.
pub const TRANSACTIONS_TABLE: &str = "lightning_btc_plugin_transactions";

/// A single invoice creation or outbound payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Auto-incrementing ID.
    pub id: i64,
    /// User that made the request.
    pub user_id: String,
    /// Wallet that owns the payment.
    pub wallet_id: String,
    /// Payment hash returned by the gateway. Unique across the ledger.
    pub txid: String,
    /// Amount in satoshis. `None` for outbound payments.
    pub amount: Option<i64>,
    /// Free-text memo.
    pub description: Option<String>,
    /// Invoice key the gateway call was made with.
    pub invoice_key_used: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

/// Fields supplied when recording a new transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub user_id: String,
    pub wallet_id: String,
    pub txid: String,
    pub amount: Option<i64>,
    pub description: Option<String>,
    pub invoice_key_used: String,
}

/// Which rows a listing returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListScope<'a> {
    /// Every row in the ledger.
    All,
    /// Only rows recorded for this user.
    User(&'a str),
}
