//! Request and response bodies for the LNbits payments API.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/v1/payments` for an incoming invoice.
#[derive(Debug, Clone, Serialize)]
pub struct CreateInvoiceParams<'a> {
    /// Always `false` for invoice creation.
    pub out: bool,
    /// Amount in satoshis.
    pub amount: i64,
    /// Invoice memo.
    pub memo: &'a str,
}

/// Body of `POST /api/v1/payments` for an outgoing payment.
#[derive(Debug, Clone, Serialize)]
pub struct PayInvoiceParams<'a> {
    /// Always `true` for payments.
    pub out: bool,
    /// BOLT11 invoice to pay.
    pub bolt11: &'a str,
}

/// A newly created invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedInvoice {
    /// BOLT11 payment request to hand to the payer.
    pub payment_request: String,
    /// Payment hash identifying the invoice.
    pub payment_hash: String,
}

/// Result of paying an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaidInvoice {
    /// Payment hash of the settled payment.
    pub payment_hash: String,
}

/// Wallet balance as reported by LNbits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletBalance {
    /// Balance in millisatoshis.
    pub balance: i64,
}
