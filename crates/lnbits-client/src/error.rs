//! Error types for lnbits-client.

use thiserror::Error;

/// Errors that can occur when calling the LNbits API.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport failure or timeout.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// LNbits answered 2xx with a body that did not match the expected shape.
    #[error("Undecodable LNbits response: {source}")]
    Decode {
        body: String,
        #[source]
        source: serde_json::Error,
    },

    /// LNbits answered with a non-success status.
    #[error("LNbits returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Invalid client configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl GatewayError {
    /// Remote response body, when LNbits sent one.
    pub fn remote_body(&self) -> Option<&str> {
        match self {
            GatewayError::Status { body, .. } | GatewayError::Decode { body, .. }
                if !body.is_empty() =>
            {
                Some(body)
            }
            _ => None,
        }
    }
}
