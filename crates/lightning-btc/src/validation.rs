//! Input validation for invoice and payment requests.

use std::fmt;

/// Validation error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Negative invoice amount.
    NegativeAmount(i64),
    /// Invalid BOLT11 invoice format.
    InvalidBolt11(String),
    /// Value too long.
    TooLong { field: String, max: usize, actual: usize },
    /// Empty value where one is required.
    Empty(String),
    /// Request body could not be decoded.
    MalformedBody(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NegativeAmount(amount) => {
                write!(f, "amount must not be negative (got {})", amount)
            }
            ValidationError::InvalidBolt11(msg) => write!(f, "Invalid BOLT11 invoice: {}", msg),
            ValidationError::TooLong { field, max, actual } => {
                write!(f, "{} is too long ({} chars, max {})", field, actual, max)
            }
            ValidationError::Empty(field) => write!(f, "{} cannot be empty", field),
            ValidationError::MalformedBody(detail) => write!(f, "malformed body: {}", detail),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Maximum invoice description length in bytes (BOLT11 `d` field).
pub const MAX_MEMO_LENGTH: usize = 639;

/// Maximum accepted BOLT11 invoice length.
pub const MAX_BOLT11_LENGTH: usize = 2048;

/// URI scheme wallets sometimes prepend to invoices.
const LIGHTNING_URI_PREFIX: &str = "lightning:";

/// Bech32 data-part alphabet.
const BECH32_CHARSET: &str = "qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// Validate an invoice amount in satoshis.
pub fn validate_amount(amount: i64) -> Result<(), ValidationError> {
    if amount < 0 {
        return Err(ValidationError::NegativeAmount(amount));
    }
    Ok(())
}

/// Validate an invoice memo.
pub fn validate_memo(memo: &str) -> Result<(), ValidationError> {
    if memo.len() > MAX_MEMO_LENGTH {
        return Err(ValidationError::TooLong {
            field: "memo".to_string(),
            max: MAX_MEMO_LENGTH,
            actual: memo.len(),
        });
    }
    Ok(())
}

/// Validate a BOLT11 invoice and return it in canonical lowercase form.
///
/// Checks that:
/// - An optional `lightning:` prefix is stripped
/// - The human-readable part starts with `ln`
/// - The data part after the last `1` is bech32 encoded and at least as long
///   as a checksum
///
/// The signature and checksum are not verified; LNbits rejects invoices that
/// fail those.
pub fn normalize_bolt11(bolt11: &str) -> Result<String, ValidationError> {
    let mut invoice = bolt11.trim().to_lowercase();
    if let Some(rest) = invoice.strip_prefix(LIGHTNING_URI_PREFIX) {
        invoice = rest.to_string();
    }

    if invoice.is_empty() {
        return Err(ValidationError::Empty("bolt11".to_string()));
    }

    if invoice.len() > MAX_BOLT11_LENGTH {
        return Err(ValidationError::TooLong {
            field: "bolt11".to_string(),
            max: MAX_BOLT11_LENGTH,
            actual: invoice.len(),
        });
    }

    if !invoice.starts_with("ln") {
        return Err(ValidationError::InvalidBolt11(
            "must start with 'ln'".to_string(),
        ));
    }

    let Some(separator) = invoice.rfind('1') else {
        return Err(ValidationError::InvalidBolt11(
            "missing '1' separator".to_string(),
        ));
    };

    let (hrp, data) = (&invoice[..separator], &invoice[separator + 1..]);

    if !hrp.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::InvalidBolt11(
            "invalid characters in prefix".to_string(),
        ));
    }

    for c in data.chars() {
        if !BECH32_CHARSET.contains(c) {
            return Err(ValidationError::InvalidBolt11(format!(
                "invalid character '{}' (must be bech32 encoded)",
                c
            )));
        }
    }

    // Checksum alone is six characters.
    if data.len() < 6 {
        return Err(ValidationError::InvalidBolt11(
            "invoice is too short".to_string(),
        ));
    }

    Ok(invoice)
}
