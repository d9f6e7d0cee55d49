//! The PaymentGateway trait definition.

use async_trait::async_trait;

use crate::error::GatewayError;
use crate::types::{CreatedInvoice, PaidInvoice, WalletBalance};

/// A remote wallet that can issue invoices, pay them and report a balance.
///
/// Every call carries the tenant's invoice key; implementations hold no
/// credential of their own. None of the operations retry. Paying the same
/// invoice twice is only prevented if the remote wallet refuses it.
///
/// This trait is object-safe and can be used as `Arc<dyn PaymentGateway>`.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create an invoice for `amount` satoshis.
    async fn create_invoice(
        &self,
        invoice_key: &str,
        amount: i64,
        memo: &str,
    ) -> Result<CreatedInvoice, GatewayError>;

    /// Pay a BOLT11 invoice.
    async fn pay_invoice(&self, invoice_key: &str, bolt11: &str)
        -> Result<PaidInvoice, GatewayError>;

    /// Fetch the wallet balance.
    async fn get_balance(&self, invoice_key: &str) -> Result<WalletBalance, GatewayError>;

    /// Get a human-readable name for this gateway.
    fn name(&self) -> &str;
}
