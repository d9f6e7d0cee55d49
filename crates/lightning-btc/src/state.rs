//! Plugin state shared across handlers.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ledger::Database;
use lnbits_client::PaymentGateway;

use crate::config::Tenancy;
use crate::workflow::InvoiceWorkflow;

/// Shared plugin state.
#[derive(Clone)]
pub struct PluginState {
    /// Invoice workflow and query surface.
    pub workflow: InvoiceWorkflow,
    /// Directory holding the plugin's `index.html`.
    pub static_dir: PathBuf,
}

impl PluginState {
    /// Create plugin state from the host's ledger handle and a gateway.
    pub fn new(db: Database, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self {
            workflow: InvoiceWorkflow::new(db, gateway, Tenancy::default()),
            static_dir: PathBuf::from("static"),
        }
    }

    /// Set the transaction listing scope.
    pub fn with_tenancy(mut self, tenancy: Tenancy) -> Self {
        self.workflow = self.workflow.with_tenancy(tenancy);
        self
    }

    /// Set the directory the plugin page is served from.
    pub fn with_static_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.static_dir = dir.as_ref().to_path_buf();
        self
    }
}
