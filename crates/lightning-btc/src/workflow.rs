//! Invoice workflow and query surface.
//!
//! Each money-moving operation is a two-step sequence: call the gateway, then
//! record the result in the ledger. Nothing is written before the gateway
//! succeeds, so a gateway failure leaves the ledger untouched. A ledger
//! failure after a successful gateway call is reported as a server error and
//! is not compensated; the payment hash is logged so it can be reconciled by
//! hand.

use std::sync::Arc;

use ledger::{transaction, Database, ListScope, NewTransaction, Transaction};
use lnbits_client::PaymentGateway;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::config::Tenancy;
use crate::error::{Operation, PluginError, Result};
use crate::identity::Identity;
use crate::validation;

/// Description recorded for outbound payments.
pub const PAYMENT_DESCRIPTION: &str = "Payment made";

/// Body of `POST /create-invoice`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInvoiceRequest {
    /// Amount in satoshis.
    pub amount: i64,
    /// Invoice memo.
    #[serde(default)]
    pub memo: String,
}

/// Response of `POST /create-invoice`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateInvoiceResponse {
    pub payment_request: String,
    pub payment_hash: String,
}

/// Body of `POST /pay-invoice`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayInvoiceRequest {
    pub bolt11: String,
}

/// Response of `POST /pay-invoice`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayInvoiceResponse {
    pub payment_hash: String,
}

/// Response of `GET /balance`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub balance: i64,
}

/// Orchestrates gateway calls and ledger writes.
#[derive(Clone)]
pub struct InvoiceWorkflow {
    db: Database,
    gateway: Arc<dyn PaymentGateway>,
    tenancy: Tenancy,
}

impl InvoiceWorkflow {
    /// Create a workflow over a ledger and a gateway.
    pub fn new(db: Database, gateway: Arc<dyn PaymentGateway>, tenancy: Tenancy) -> Self {
        Self {
            db,
            gateway,
            tenancy,
        }
    }

    /// Use a different listing scope.
    pub fn with_tenancy(mut self, tenancy: Tenancy) -> Self {
        self.tenancy = tenancy;
        self
    }

    /// Ledger handle.
    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Payment gateway handle.
    pub fn gateway(&self) -> Arc<dyn PaymentGateway> {
        Arc::clone(&self.gateway)
    }

    /// Listing scope in effect.
    pub fn tenancy(&self) -> Tenancy {
        self.tenancy
    }

    /// Create an invoice and record it.
    pub async fn create_invoice(
        &self,
        identity: &Identity,
        request: CreateInvoiceRequest,
    ) -> Result<CreateInvoiceResponse> {
        let operation = Operation::CreateInvoice;
        let invoice_key = identity.invoice_key(operation)?;

        validation::validate_amount(request.amount)
            .and_then(|_| validation::validate_memo(&request.memo))
            .map_err(|reason| PluginError::InvalidRequest { operation, reason })?;

        let invoice = self
            .gateway
            .create_invoice(invoice_key, request.amount, &request.memo)
            .await
            .map_err(|source| PluginError::Gateway { operation, source })?;

        let description = Some(request.memo).filter(|memo| !memo.is_empty());
        self.record(
            operation,
            NewTransaction {
                user_id: identity.user_id.clone(),
                wallet_id: identity.wallet_id.clone(),
                txid: invoice.payment_hash.clone(),
                amount: Some(request.amount),
                description,
                invoice_key_used: invoice_key.to_string(),
            },
        )
        .await?;

        info!(
            user_id = %identity.user_id,
            txid = %invoice.payment_hash,
            amount = request.amount,
            "Invoice created"
        );

        Ok(CreateInvoiceResponse {
            payment_request: invoice.payment_request,
            payment_hash: invoice.payment_hash,
        })
    }

    /// Pay a BOLT11 invoice and record the payment.
    ///
    /// The paid amount is not looked up, so the ledger row has no amount.
    pub async fn pay_invoice(
        &self,
        identity: &Identity,
        request: PayInvoiceRequest,
    ) -> Result<PayInvoiceResponse> {
        let operation = Operation::PayInvoice;
        let invoice_key = identity.invoice_key(operation)?;

        let bolt11 = validation::normalize_bolt11(&request.bolt11)
            .map_err(|reason| PluginError::InvalidRequest { operation, reason })?;

        let paid = self
            .gateway
            .pay_invoice(invoice_key, &bolt11)
            .await
            .map_err(|source| PluginError::Gateway { operation, source })?;

        self.record(
            operation,
            NewTransaction {
                user_id: identity.user_id.clone(),
                wallet_id: identity.wallet_id.clone(),
                txid: paid.payment_hash.clone(),
                amount: None,
                description: Some(PAYMENT_DESCRIPTION.to_string()),
                invoice_key_used: invoice_key.to_string(),
            },
        )
        .await?;

        info!(
            user_id = %identity.user_id,
            txid = %paid.payment_hash,
            "Invoice paid"
        );

        Ok(PayInvoiceResponse {
            payment_hash: paid.payment_hash,
        })
    }

    /// List ledger rows visible to the caller.
    pub async fn list_transactions(&self, identity: &Identity) -> Result<Vec<Transaction>> {
        let scope = match self.tenancy {
            Tenancy::PerUser => ListScope::User(&identity.user_id),
            Tenancy::Shared => ListScope::All,
        };

        transaction::list_transactions(self.db.pool(), scope)
            .await
            .map_err(|source| PluginError::LedgerRead {
                operation: Operation::ListTransactions,
                source,
            })
    }

    /// Fetch the live wallet balance for the caller's key.
    pub async fn get_balance(&self, identity: &Identity) -> Result<BalanceResponse> {
        let operation = Operation::GetBalance;
        let invoice_key = identity.invoice_key(operation)?;

        let wallet = self
            .gateway
            .get_balance(invoice_key)
            .await
            .map_err(|source| PluginError::Gateway { operation, source })?;

        Ok(BalanceResponse {
            balance: wallet.balance,
        })
    }

    async fn record(&self, operation: Operation, new: NewTransaction) -> Result<Transaction> {
        transaction::insert_transaction(self.db.pool(), &new)
            .await
            .map_err(|source| {
                error!(
                    operation = %operation,
                    txid = %new.txid,
                    user_id = %new.user_id,
                    "Gateway call succeeded but the ledger row was not written"
                );
                PluginError::LedgerWrite { operation, source }
            })
    }
}
