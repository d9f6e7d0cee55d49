//! Recording payment gateway for tests and local development.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lnbits_client::{CreatedInvoice, GatewayError, PaidInvoice, PaymentGateway, WalletBalance};

/// A call received by [`MockGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    CreateInvoice {
        invoice_key: String,
        amount: i64,
        memo: String,
    },
    PayInvoice {
        invoice_key: String,
        bolt11: String,
    },
    GetBalance {
        invoice_key: String,
    },
}

#[derive(Debug, Default)]
struct MockState {
    calls: Vec<GatewayCall>,
    hashes: VecDeque<String>,
    counter: u64,
    balance: i64,
    failure: Option<(u16, String)>,
}

/// A gateway that records every call and answers from canned data.
///
/// Payment hashes are taken from a queue set with [`MockGateway::with_hashes`]
/// and fall back to `hash-<n>`.
#[derive(Debug, Clone, Default)]
pub struct MockGateway {
    state: Arc<Mutex<MockState>>,
}

impl MockGateway {
    /// Create a gateway that succeeds with generated hashes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue payment hashes to hand out in order.
    pub fn with_hashes<I, H>(self, hashes: I) -> Self
    where
        I: IntoIterator<Item = H>,
        H: Into<String>,
    {
        self.lock().hashes.extend(hashes.into_iter().map(Into::into));
        self
    }

    /// Set the balance reported by `get_balance`.
    pub fn with_balance(self, balance: i64) -> Self {
        self.lock().balance = balance;
        self
    }

    /// Make every call fail with the given HTTP status and body.
    pub fn failing(self, status: u16, body: impl Into<String>) -> Self {
        self.lock().failure = Some((status, body.into()));
        self
    }

    /// Calls received so far.
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.lock().calls.clone()
    }

    /// Number of calls received so far.
    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, call: GatewayCall) -> Result<String, GatewayError> {
        let mut state = self.lock();
        state.calls.push(call);

        if let Some((status, body)) = &state.failure {
            return Err(GatewayError::Status {
                status: *status,
                body: body.clone(),
            });
        }

        state.counter += 1;
        let counter = state.counter;
        Ok(state
            .hashes
            .pop_front()
            .unwrap_or_else(|| format!("hash-{}", counter)))
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn create_invoice(
        &self,
        invoice_key: &str,
        amount: i64,
        memo: &str,
    ) -> Result<CreatedInvoice, GatewayError> {
        let payment_hash = self.record(GatewayCall::CreateInvoice {
            invoice_key: invoice_key.to_string(),
            amount,
            memo: memo.to_string(),
        })?;

        Ok(CreatedInvoice {
            payment_request: format!("lnbc{}n1mock{}", amount, payment_hash),
            payment_hash,
        })
    }

    async fn pay_invoice(
        &self,
        invoice_key: &str,
        bolt11: &str,
    ) -> Result<PaidInvoice, GatewayError> {
        let payment_hash = self.record(GatewayCall::PayInvoice {
            invoice_key: invoice_key.to_string(),
            bolt11: bolt11.to_string(),
        })?;

        Ok(PaidInvoice { payment_hash })
    }

    async fn get_balance(&self, invoice_key: &str) -> Result<WalletBalance, GatewayError> {
        self.record(GatewayCall::GetBalance {
            invoice_key: invoice_key.to_string(),
        })?;

        Ok(WalletBalance {
            balance: self.lock().balance,
        })
    }

    fn name(&self) -> &str {
        "MockGateway"
    }
}
