//! LNbits wallet API client.
//!
//! This crate provides the [`PaymentGateway`] trait used by the Lightning BTC
//! plugin and an implementation backed by the LNbits REST API:
//!
//! - Creating invoices (`POST /api/v1/payments` with `out: false`)
//! - Paying BOLT11 invoices (`POST /api/v1/payments` with `out: true`)
//! - Reading the wallet balance (`GET /api/v1/wallet`)
//!
//! # Example
//!
//! ```no_run
//! use lnbits_client::{LnbitsClient, LnbitsConfig, PaymentGateway};
//!
//! # async fn example() -> Result<(), lnbits_client::GatewayError> {
//! let client = LnbitsClient::new(LnbitsConfig::default())?;
//!
//! let invoice = client.create_invoice("invoice-key", 1000, "coffee").await?;
//! println!("Pay: {}", invoice.payment_request);
//!
//! let balance = client.get_balance("invoice-key").await?;
//! println!("Balance: {} msat", balance.balance);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod gateway;
pub mod types;

pub use client::{LnbitsClient, API_KEY_HEADER};
pub use config::LnbitsConfig;
pub use error::GatewayError;
pub use gateway::PaymentGateway;
pub use types::*;
