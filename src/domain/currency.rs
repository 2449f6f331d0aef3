//! Currency catalog
//!
//! The closed set of currencies the service supports. Codes outside this set
//! are rejected at the serde boundary, so an unknown currency cannot reach
//! the ledger as anything other than a raw string.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A supported currency code.
///
/// GBP is the reference currency and the default for new accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Gbp,
    Usd,
    Eur,
    Btc,
    Cny,
    Jpy,
}

/// Every supported currency, reference currency first.
pub const CATALOG: [Currency; 6] = [
    Currency::Gbp,
    Currency::Usd,
    Currency::Eur,
    Currency::Btc,
    Currency::Cny,
    Currency::Jpy,
];

impl Currency {
    /// The ISO-style uppercase code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Gbp => "GBP",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Btc => "BTC",
            Currency::Cny => "CNY",
            Currency::Jpy => "JPY",
        }
    }

    /// Membership test for raw codes arriving from untyped input.
    pub fn is_supported(code: &str) -> bool {
        Currency::from_str(code).is_ok()
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::Gbp
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Currency {
    type Err = super::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GBP" => Ok(Currency::Gbp),
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            "BTC" => Ok(Currency::Btc),
            "CNY" => Ok(Currency::Cny),
            "JPY" => Ok(Currency::Jpy),
            other => Err(super::DomainError::UnsupportedCurrency {
                code: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_membership() {
        assert!(Currency::is_supported("GBP"));
        assert!(Currency::is_supported("JPY"));
        assert!(!Currency::is_supported("XRP"));
        assert!(!Currency::is_supported("usd"));
    }

    #[test]
    fn test_round_trip() {
        for currency in CATALOG {
            let parsed: Currency = currency.as_str().parse().unwrap();
            assert_eq!(parsed, currency);
        }
    }

    #[test]
    fn test_serde_uses_code() {
        let json = serde_json::to_string(&Currency::Usd).unwrap();
        assert_eq!(json, r#""USD""#);

        let parsed: Currency = serde_json::from_str(r#""BTC""#).unwrap();
        assert_eq!(parsed, Currency::Btc);

        assert!(serde_json::from_str::<Currency>(r#""XAU""#).is_err());
    }

    #[test]
    fn test_default_is_reference_currency() {
        assert_eq!(Currency::default(), Currency::Gbp);
    }
}
