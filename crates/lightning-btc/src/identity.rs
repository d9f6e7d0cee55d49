//! Per-request identity supplied by the host application.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use serde::{Deserialize, Serialize};

use crate::error::{Operation, PluginError};

/// Header carrying the caller's user ID in standalone mode.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the caller's wallet ID in standalone mode.
pub const WALLET_ID_HEADER: &str = "x-wallet-id";
/// Header carrying the caller's LNbits invoice key in standalone mode.
pub const INVOICE_KEY_HEADER: &str = "x-api-key";

/// The authenticated caller. Hosts insert one into the request extensions
/// before the plugin routes run.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: String,
    pub wallet_id: String,
    pub invoice_key: Option<String>,
}

impl Identity {
    /// Create an identity with an invoice key.
    pub fn new(
        user_id: impl Into<String>,
        wallet_id: impl Into<String>,
        invoice_key: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            wallet_id: wallet_id.into(),
            invoice_key: Some(invoice_key.into()),
        }
    }

    /// Create an identity that has no invoice key.
    pub fn without_key(user_id: impl Into<String>, wallet_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            wallet_id: wallet_id.into(),
            invoice_key: None,
        }
    }

    /// The invoice key, or `MissingCredential` when absent or blank.
    pub fn invoice_key(&self, operation: Operation) -> Result<&str, PluginError> {
        match self.invoice_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(PluginError::MissingCredential { operation }),
        }
    }
}

// Keys stay out of logs.
impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("user_id", &self.user_id)
            .field("wallet_id", &self.wallet_id)
            .field("has_invoice_key", &self.invoice_key.is_some())
            .finish()
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = PluginError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .ok_or(PluginError::MissingIdentity)
    }
}

/// Fallback values for the header identity middleware.
#[derive(Clone, Default)]
pub struct IdentityDefaults {
    pub user_id: String,
    pub wallet_id: String,
    pub invoice_key: Option<String>,
}

/// Build an [`Identity`] from request headers, falling back to the
/// configured defaults. Used when the plugin runs without a host.
pub fn identity_from_headers(headers: &HeaderMap, defaults: &IdentityDefaults) -> Identity {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    };

    Identity {
        user_id: header(USER_ID_HEADER).unwrap_or_else(|| defaults.user_id.clone()),
        wallet_id: header(WALLET_ID_HEADER).unwrap_or_else(|| defaults.wallet_id.clone()),
        invoice_key: header(INVOICE_KEY_HEADER).or_else(|| defaults.invoice_key.clone()),
    }
}

/// Middleware attaching a header-derived [`Identity`] to every request.
///
/// Install with `axum::middleware::from_fn_with_state(defaults, attach_identity)`.
pub async fn attach_identity(
    State(defaults): State<IdentityDefaults>,
    mut request: Request,
    next: Next,
) -> Response {
    let identity = identity_from_headers(request.headers(), &defaults);
    request.extensions_mut().insert(identity);
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_invoice_key_present() {
        let identity = Identity::new("u1", "w1", "k1");
        assert_eq!(identity.invoice_key(Operation::CreateInvoice).unwrap(), "k1");
    }

    #[test]
    fn test_invoice_key_missing_or_blank() {
        let identity = Identity::without_key("u1", "w1");
        assert!(matches!(
            identity.invoice_key(Operation::PayInvoice),
            Err(PluginError::MissingCredential {
                operation: Operation::PayInvoice
            })
        ));

        let blank = Identity::new("u1", "w1", "   ");
        assert!(blank.invoice_key(Operation::GetBalance).is_err());
    }

    #[test]
    fn test_debug_hides_invoice_key() {
        let identity = Identity::new("u1", "w1", "secret-key");
        let debug = format!("{:?}", identity);
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("u1"));
    }

    #[test]
    fn test_identity_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_static("alice"));
        headers.insert(INVOICE_KEY_HEADER, HeaderValue::from_static("k-alice"));

        let defaults = IdentityDefaults {
            user_id: "default".to_string(),
            wallet_id: "default-wallet".to_string(),
            invoice_key: Some("k-default".to_string()),
        };

        let identity = identity_from_headers(&headers, &defaults);
        assert_eq!(identity.user_id, "alice");
        assert_eq!(identity.wallet_id, "default-wallet");
        assert_eq!(identity.invoice_key.as_deref(), Some("k-alice"));

        let fallback = identity_from_headers(&HeaderMap::new(), &defaults);
        assert_eq!(fallback.user_id, "default");
        assert_eq!(fallback.invoice_key.as_deref(), Some("k-default"));
    }
}
