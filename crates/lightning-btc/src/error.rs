//! Error types for the plugin.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ledger::DatabaseError;
use lnbits_client::GatewayError;
use thiserror::Error;

use crate::validation::ValidationError;

/// Plugin operation an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CreateInvoice,
    PayInvoice,
    ListTransactions,
    GetBalance,
}

impl Operation {
    /// Operation name used in log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::CreateInvoice => "create_invoice",
            Operation::PayInvoice => "pay_invoice",
            Operation::ListTransactions => "list_transactions",
            Operation::GetBalance => "get_balance",
        }
    }

    /// Fixed message returned to the caller when the operation fails server-side.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Operation::CreateInvoice => "Error creating invoice.",
            Operation::PayInvoice => "Error paying invoice.",
            Operation::ListTransactions => "Error fetching transactions.",
            Operation::GetBalance => "Error fetching balance.",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while serving a plugin request.
#[derive(Debug, Error)]
pub enum PluginError {
    /// The host attached no identity to the request.
    #[error("request carries no identity context")]
    MissingIdentity,

    /// The identity has no invoice key.
    #[error("{operation}: no invoice key available")]
    MissingCredential { operation: Operation },

    /// Request body failed validation.
    #[error("{operation}: {reason}")]
    InvalidRequest {
        operation: Operation,
        reason: ValidationError,
    },

    /// The payment gateway call failed. Nothing was recorded.
    #[error("{operation}: gateway error: {source}")]
    Gateway {
        operation: Operation,
        #[source]
        source: GatewayError,
    },

    /// The gateway call succeeded but the ledger row could not be written.
    #[error("{operation}: ledger write failed: {source}")]
    LedgerWrite {
        operation: Operation,
        #[source]
        source: DatabaseError,
    },

    /// The ledger could not be read.
    #[error("{operation}: ledger read failed: {source}")]
    LedgerRead {
        operation: Operation,
        #[source]
        source: DatabaseError,
    },
}

impl PluginError {
    /// HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            PluginError::MissingIdentity => StatusCode::UNAUTHORIZED,
            PluginError::MissingCredential { .. } | PluginError::InvalidRequest { .. } => {
                StatusCode::BAD_REQUEST
            }
            PluginError::Gateway { .. }
            | PluginError::LedgerWrite { .. }
            | PluginError::LedgerRead { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Fixed message shown to the caller. Never includes error detail.
    pub fn public_message(&self) -> &'static str {
        match self {
            PluginError::MissingIdentity => "Missing identity context.",
            PluginError::MissingCredential { .. } => "Missing invoice key.",
            PluginError::InvalidRequest { .. } => "Invalid request.",
            PluginError::Gateway { operation, .. }
            | PluginError::LedgerWrite { operation, .. }
            | PluginError::LedgerRead { operation, .. } => operation.failure_message(),
        }
    }
}

impl IntoResponse for PluginError {
    fn into_response(self) -> Response {
        match &self {
            PluginError::MissingIdentity => {
                tracing::warn!("Request without identity context");
            }
            PluginError::MissingCredential { operation } => {
                tracing::warn!(operation = %operation, "Missing invoice key");
            }
            PluginError::InvalidRequest { operation, reason } => {
                tracing::warn!(operation = %operation, reason = %reason, "Invalid request");
            }
            PluginError::Gateway { operation, source } => {
                tracing::error!(
                    operation = %operation,
                    remote_body = source.remote_body().unwrap_or(""),
                    "Gateway error: {}",
                    source
                );
            }
            PluginError::LedgerWrite { operation, source } => {
                tracing::error!(operation = %operation, "Ledger write error: {}", source);
            }
            PluginError::LedgerRead { operation, source } => {
                tracing::error!(operation = %operation, "Ledger read error: {}", source);
            }
        }

        let body = serde_json::json!({
            "error": self.public_message()
        });

        (self.status(), Json(body)).into_response()
    }
}

/// Result type for plugin operations.
pub type Result<T> = std::result::Result<T, PluginError>;
