//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use lnbits_client::config::DEFAULT_BASE_URL;

/// How transaction listings are scoped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tenancy {
    /// Each caller only sees the rows recorded under their user ID.
    #[default]
    PerUser,
    /// Every caller sees the whole ledger.
    Shared,
}

impl FromStr for Tenancy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "per-user" | "per_user" | "user" => Ok(Tenancy::PerUser),
            "shared" | "global" => Ok(Tenancy::Shared),
            other => Err(ConfigError::InvalidTenancy(other.to_string())),
        }
    }
}

/// Standalone plugin server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// LNbits base URL.
    pub lnbits_url: String,
    /// Timeout for each LNbits request.
    pub lnbits_timeout: Duration,
    /// Invoice key used when a request carries none.
    pub default_invoice_key: Option<String>,
    /// User ID assigned to requests without an `X-User-Id` header.
    pub default_user_id: String,
    /// Wallet ID assigned to requests without an `X-Wallet-Id` header.
    pub default_wallet_id: String,
    /// Path prefix the plugin routes are nested under.
    pub mount_path: String,
    /// Directory holding the plugin's `index.html`.
    pub static_dir: PathBuf,
    /// Transaction listing scope.
    pub tenancy: Tenancy,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `PLUGIN_ADDR` | Server bind address | `127.0.0.1:8789` |
    /// | `SQLITE_PATH` | SQLite database URL | `sqlite:lightning_btc.db?mode=rwc` |
    /// | `LNBITS_URL` | LNbits base URL | `https://legend.lnbits.com` |
    /// | `LNBITS_TIMEOUT_SECS` | Gateway request timeout | `30` |
    /// | `LNBITS_INVOICE_KEY` | Fallback invoice key | (unset) |
    /// | `PLUGIN_DEFAULT_USER` | Fallback user ID | `default` |
    /// | `PLUGIN_DEFAULT_WALLET` | Fallback wallet ID | `default` |
    /// | `PLUGIN_MOUNT_PATH` | Route prefix | `/lightning-btc` |
    /// | `PLUGIN_STATIC_DIR` | Static page directory | `static` |
    /// | `PLUGIN_TENANCY` | `per-user` or `shared` | `per-user` |
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("PLUGIN_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8789".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url = env::var("SQLITE_PATH")
            .unwrap_or_else(|_| "sqlite:lightning_btc.db?mode=rwc".to_string());

        let lnbits_url = env::var("LNBITS_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let lnbits_timeout = match env::var("LNBITS_TIMEOUT_SECS") {
            Ok(value) => {
                let secs: u64 = value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidTimeout(value.clone()))?;
                if secs == 0 {
                    return Err(ConfigError::InvalidTimeout(value));
                }
                Duration::from_secs(secs)
            }
            Err(_) => lnbits_client::config::DEFAULT_TIMEOUT,
        };

        let default_invoice_key = env::var("LNBITS_INVOICE_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        let default_user_id =
            env::var("PLUGIN_DEFAULT_USER").unwrap_or_else(|_| "default".to_string());
        let default_wallet_id =
            env::var("PLUGIN_DEFAULT_WALLET").unwrap_or_else(|_| "default".to_string());

        let mount_path = normalize_mount_path(
            &env::var("PLUGIN_MOUNT_PATH").unwrap_or_else(|_| "/lightning-btc".to_string()),
        )?;

        let static_dir = PathBuf::from(
            env::var("PLUGIN_STATIC_DIR").unwrap_or_else(|_| "static".to_string()),
        );

        let tenancy = match env::var("PLUGIN_TENANCY") {
            Ok(value) => value.parse()?,
            Err(_) => Tenancy::default(),
        };

        Ok(Self {
            addr,
            database_url,
            lnbits_url,
            lnbits_timeout,
            default_invoice_key,
            default_user_id,
            default_wallet_id,
            mount_path,
            static_dir,
            tenancy,
        })
    }
}

/// Ensure the mount path starts with `/` and has no trailing slash.
fn normalize_mount_path(path: &str) -> Result<String, ConfigError> {
    let trimmed = path.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ConfigError::InvalidMountPath(path.to_string()));
    }
    if trimmed.starts_with('/') {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("/{}", trimmed))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid PLUGIN_ADDR format")]
    InvalidAddr,

    #[error("Invalid LNBITS_TIMEOUT_SECS: {0}")]
    InvalidTimeout(String),

    #[error("Invalid PLUGIN_MOUNT_PATH: {0:?}")]
    InvalidMountPath(String),

    #[error("Invalid PLUGIN_TENANCY: {0} (expected per-user or shared)")]
    InvalidTenancy(String),
}
