//! Configuration types for lnbits-client.

use std::time::Duration;

/// Default LNbits instance used by the original plugin deployment.
pub const DEFAULT_BASE_URL: &str = "https://legend.lnbits.com";

/// Default upper bound on a single gateway request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for connecting to an LNbits instance.
#[derive(Debug, Clone)]
pub struct LnbitsConfig {
    /// Base URL of the LNbits server (e.g., "https://legend.lnbits.com").
    pub base_url: String,
    /// Timeout applied to every request.
    pub timeout: Duration,
}

impl LnbitsConfig {
    /// Create a new configuration with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the payments endpoint URL (invoice creation and payment).
    pub fn payments_url(&self) -> String {
        format!("{}/api/v1/payments", self.base_url)
    }

    /// Get the wallet details endpoint URL (balance).
    pub fn wallet_url(&self) -> String {
        format!("{}/api/v1/wallet", self.base_url)
    }
}

impl Default for LnbitsConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
