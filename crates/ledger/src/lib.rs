//! SQLite transaction ledger for the Lightning BTC plugin.
//!
//! Every successful invoice creation or outbound payment is recorded as one
//! row keyed by the payment hash the gateway returned. The schema is a
//! versioned, reversible SQLx migration embedded at build time.
//!
//! # Example
//!
//! ```no_run
//! use ledger::{transaction, Database, NewTransaction};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("sqlite:lightning_btc.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     let record = transaction::insert_transaction(
//!         db.pool(),
//!         &NewTransaction {
//!             user_id: "u1".to_string(),
//!             wallet_id: "w1".to_string(),
//!             txid: "abc123".to_string(),
//!             amount: Some(1000),
//!             description: Some("coffee".to_string()),
//!             invoice_key_used: "k1".to_string(),
//!         },
//!     )
//!     .await?;
//!     println!("recorded #{}", record.id);
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod models;
pub mod transaction;

pub use error::{DatabaseError, Result};
pub use models::{ListScope, NewTransaction, Transaction, TRANSACTIONS_TABLE};

use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Ledger connection wrapper, shared by every request handler.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    const DEFAULT_POOL_SIZE: u32 = 10;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    ///
    /// ```no_run
    /// # async fn example() -> ledger::Result<()> {
    /// let db = ledger::Database::connect("sqlite:data/lightning_btc.db?mode=rwc").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    ///
    /// In-memory databases should use a pool size of 1 so every query sees
    /// the same connection.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to ledger database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Apply pending `up` migrations.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running ledger migrations...");

        MIGRATOR.run(&self.pool).await?;

        tracing::info!("Ledger migrations complete");
        Ok(())
    }

    /// Apply every `down` migration, dropping the ledger table.
    pub async fn revert(&self) -> Result<()> {
        tracing::warn!("Reverting ledger migrations");

        MIGRATOR.undo(&self.pool, 0).await?;

        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
