//! Command definitions
//!
//! Plain data payloads the core operations accept, independent of the
//! transport that produced them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Currency, TransactionKind};

/// Payload for account creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccount {
    pub customer_id: String,
    pub account_number: String,
    pub currencies: Vec<Currency>,
    /// Optional opening balances; currencies without an entry start at zero.
    #[serde(default)]
    pub balances: Option<BTreeMap<Currency, Decimal>>,
}

impl CreateAccount {
    pub fn new(
        customer_id: impl Into<String>,
        account_number: impl Into<String>,
        currencies: Vec<Currency>,
    ) -> Self {
        Self {
            customer_id: customer_id.into(),
            account_number: account_number.into(),
            currencies,
            balances: None,
        }
    }

    pub fn with_balances(mut self, balances: BTreeMap<Currency, Decimal>) -> Self {
        self.balances = Some(balances);
        self
    }
}

/// Partial payload for account updates. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAccount {
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub account_number: Option<String>,
    #[serde(default)]
    pub currencies: Option<Vec<Currency>>,
    /// When present, replaces the balance map after currency reconciliation;
    /// entries are validated against the effective currency set.
    #[serde(default)]
    pub balances: Option<BTreeMap<Currency, Decimal>>,
}

impl UpdateAccount {
    pub fn currencies(currencies: Vec<Currency>) -> Self {
        Self {
            currencies: Some(currencies),
            ..Self::default()
        }
    }
}

/// Payload for posting one transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostTransaction {
    pub account_id: Uuid,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub currency: Currency,
    pub amount: Decimal,
    /// System-assigned at posting time unless supplied.
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

impl PostTransaction {
    pub fn new(
        account_id: Uuid,
        kind: TransactionKind,
        currency: Currency,
        amount: Decimal,
    ) -> Self {
        Self {
            account_id,
            kind,
            currency,
            amount,
            date: None,
        }
    }

    pub fn on_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }
}

/// Date-range and pagination parameters for the transaction listing.
/// Non-positive `skip`/`limit` mean "no skip" / "no limit".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListTransactions {
    #[serde(default)]
    pub skip: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub to: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_create_account_builder() {
        let cmd = CreateAccount::new("cust-1", "ACC-1", vec![Currency::Usd]);
        assert_eq!(cmd.customer_id, "cust-1");
        assert_eq!(cmd.account_number, "ACC-1");
        assert!(cmd.balances.is_none());

        let cmd = cmd.with_balances(BTreeMap::from([(Currency::Usd, dec!(25))]));
        assert_eq!(cmd.balances.unwrap()[&Currency::Usd], dec!(25));
    }

    #[test]
    fn test_update_account_defaults_to_no_changes() {
        let cmd = UpdateAccount::default();
        assert!(cmd.customer_id.is_none());
        assert!(cmd.account_number.is_none());
        assert!(cmd.currencies.is_none());
        assert!(cmd.balances.is_none());
    }

    #[test]
    fn test_post_transaction_deserializes_type_field() {
        let json = serde_json::json!({
            "account_id": Uuid::new_v4(),
            "type": "OUTBOUND",
            "currency": "EUR",
            "amount": "12.50",
        });

        let cmd: PostTransaction = serde_json::from_value(json).unwrap();
        assert_eq!(cmd.kind, TransactionKind::Outbound);
        assert_eq!(cmd.currency, Currency::Eur);
        assert_eq!(cmd.amount, dec!(12.50));
        assert!(cmd.date.is_none());
    }
}
