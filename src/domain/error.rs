//! Domain error types
//!
//! Pure business-rule failures, independent of the web and storage layers.

use rust_decimal::Decimal;
use thiserror::Error;

use super::Currency;

/// Business rule violations raised by the ledger and the services.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Currency is outside the catalog, or outside the account's currency set.
    #[error("Currency {code} is not supported by this account")]
    UnsupportedCurrency { code: String },

    /// Outbound amount exceeds the current balance for that currency.
    #[error("Insufficient balance: account has {available} {currency}, but the transaction requires {required} {currency}")]
    InsufficientBalance {
        currency: Currency,
        required: Decimal,
        available: Decimal,
    },

    /// Amount failed defensive validation (zero, negative, malformed).
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

impl DomainError {
    pub fn unsupported_currency(code: impl Into<String>) -> Self {
        Self::UnsupportedCurrency { code: code.into() }
    }

    pub fn insufficient_balance(
        currency: Currency,
        required: Decimal,
        available: Decimal,
    ) -> Self {
        Self::InsufficientBalance {
            currency,
            required,
            available,
        }
    }
}
