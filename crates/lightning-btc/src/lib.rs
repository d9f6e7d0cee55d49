//! Lightning BTC plugin.
//!
//! Exposes HTTP endpoints for creating and paying Lightning invoices through
//! an LNbits wallet and records every successful call in a SQLite ledger.
//! The plugin is a plain axum [`Router`](axum::Router) that a host nests
//! under its own prefix. The host hands over a migrated [`ledger::Database`]
//! and attaches an [`Identity`] to every request.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use axum::Router;
//! use lightning_btc::{router, PluginState, Tenancy};
//! use lnbits_client::{LnbitsClient, LnbitsConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = ledger::Database::connect("sqlite:host.db?mode=rwc").await?;
//! db.migrate().await?;
//!
//! let gateway = Arc::new(LnbitsClient::new(LnbitsConfig::default())?);
//! let state = PluginState::new(db, gateway).with_tenancy(Tenancy::PerUser);
//!
//! // The host's auth middleware must insert a `lightning_btc::Identity`.
//! let app: Router = Router::new().nest("/lightning-btc", router(state));
//! # let _ = app;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod identity;
pub mod mock;
pub mod routes;
pub mod state;
pub mod validation;
pub mod workflow;

pub use config::{Config, ConfigError, Tenancy};
pub use error::{Operation, PluginError, Result};
pub use identity::{attach_identity, Identity, IdentityDefaults};
pub use routes::router;
pub use state::PluginState;
pub use workflow::{
    BalanceResponse, CreateInvoiceRequest, CreateInvoiceResponse, InvoiceWorkflow,
    PayInvoiceRequest, PayInvoiceResponse, PAYMENT_DESCRIPTION,
};
