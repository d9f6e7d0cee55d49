//! LNbits HTTP client.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::LnbitsConfig;
use crate::error::GatewayError;
use crate::gateway::PaymentGateway;
use crate::types::{
    CreateInvoiceParams, CreatedInvoice, PaidInvoice, PayInvoiceParams, WalletBalance,
};

/// Header LNbits reads the wallet key from.
pub const API_KEY_HEADER: &str = "X-Api-Key";

/// Client for the LNbits wallet API.
#[derive(Clone)]
pub struct LnbitsClient {
    http: Client,
    config: LnbitsConfig,
}

impl LnbitsClient {
    /// Build a client for the configured LNbits instance.
    pub fn new(config: LnbitsConfig) -> Result<Self, GatewayError> {
        if config.base_url.is_empty() {
            return Err(GatewayError::Config("base_url is empty".to_string()));
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(GatewayError::Http)?;

        Ok(Self { http, config })
    }

    /// Get the configuration.
    pub fn config(&self) -> &LnbitsConfig {
        &self.config
    }

    /// Attach the credential header and send, mapping non-2xx to an error.
    ///
    /// `.json()` on the builder already sets `Content-Type`.
    async fn send<R: DeserializeOwned>(
        &self,
        operation: &str,
        request: RequestBuilder,
        invoice_key: &str,
    ) -> Result<R, GatewayError> {
        let response = request
            .header(API_KEY_HEADER, invoice_key)
            .send()
            .await
            .map_err(GatewayError::Http)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(operation, status = status.as_u16(), body = %body, "LNbits request failed");
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(GatewayError::Http)?;
        serde_json::from_str::<R>(&body).map_err(|source| {
            warn!(operation, body = %body, "Undecodable LNbits response");
            GatewayError::Decode { body, source }
        })
    }
}

#[async_trait]
impl PaymentGateway for LnbitsClient {
    async fn create_invoice(
        &self,
        invoice_key: &str,
        amount: i64,
        memo: &str,
    ) -> Result<CreatedInvoice, GatewayError> {
        let url = self.config.payments_url();
        debug!(amount, "Creating invoice: {}", url);

        let params = CreateInvoiceParams {
            out: false,
            amount,
            memo,
        };
        self.send("create_invoice", self.http.post(&url).json(&params), invoice_key)
            .await
    }

    async fn pay_invoice(
        &self,
        invoice_key: &str,
        bolt11: &str,
    ) -> Result<PaidInvoice, GatewayError> {
        let url = self.config.payments_url();
        debug!("Paying invoice: {}", url);

        let params = PayInvoiceParams { out: true, bolt11 };
        self.send("pay_invoice", self.http.post(&url).json(&params), invoice_key)
            .await
    }

    async fn get_balance(&self, invoice_key: &str) -> Result<WalletBalance, GatewayError> {
        let url = self.config.wallet_url();
        debug!("Fetching balance: {}", url);

        self.send("get_balance", self.http.get(&url), invoice_key)
            .await
    }

    fn name(&self) -> &str {
        "LNbits"
    }
}

impl std::fmt::Debug for LnbitsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LnbitsClient")
            .field("config", &self.config)
            .finish()
    }
}
