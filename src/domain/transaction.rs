//! Transaction record
//!
//! An append-only fact describing one balance movement against an account.
//! Transactions are never updated or deleted after creation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Amount, Currency};

/// Direction of a transaction: inbound increases the balance, outbound
/// decreases it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionKind {
    Inbound,
    Outbound,
}

impl TransactionKind {
    /// Signed delta this kind applies to a balance.
    pub fn signed(&self, amount: Decimal) -> Decimal {
        match self {
            TransactionKind::Inbound => amount,
            TransactionKind::Outbound => -amount,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Inbound => "INBOUND",
            TransactionKind::Outbound => "OUTBOUND",
        }
    }
}

/// One posted transaction. Correlated to its account by id; the account holds
/// no back-reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub account_id: Uuid,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub currency: Currency,
    pub amount: Decimal,
    pub date: DateTime<Utc>,
}

impl Transaction {
    /// Build a new transaction record. The date is system-assigned unless the
    /// caller supplied one.
    pub fn post(
        account_id: Uuid,
        kind: TransactionKind,
        currency: Currency,
        amount: Amount,
        date: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id,
            kind,
            currency,
            amount: amount.value(),
            date: date.unwrap_or_else(Utc::now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_signed_delta() {
        assert_eq!(TransactionKind::Inbound.signed(dec!(50)), dec!(50));
        assert_eq!(TransactionKind::Outbound.signed(dec!(50)), dec!(-50));
    }

    #[test]
    fn test_kind_serde_uses_wire_names() {
        let json = serde_json::to_string(&TransactionKind::Inbound).unwrap();
        assert_eq!(json, r#""INBOUND""#);

        let parsed: TransactionKind = serde_json::from_str(r#""OUTBOUND""#).unwrap();
        assert_eq!(parsed, TransactionKind::Outbound);
    }

    #[test]
    fn test_transaction_serializes_kind_as_type() {
        let amount = Amount::new(dec!(10)).unwrap();
        let tx = Transaction::post(
            Uuid::new_v4(),
            TransactionKind::Inbound,
            Currency::Usd,
            amount,
            None,
        );

        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["type"], "INBOUND");
        assert_eq!(json["currency"], "USD");
    }

    #[test]
    fn test_post_assigns_date_when_absent() {
        let amount = Amount::new(dec!(1)).unwrap();
        let explicit = Utc::now() - chrono::Duration::days(3);

        let tx = Transaction::post(
            Uuid::new_v4(),
            TransactionKind::Inbound,
            Currency::Gbp,
            amount,
            Some(explicit),
        );
        assert_eq!(tx.date, explicit);

        let tx = Transaction::post(
            Uuid::new_v4(),
            TransactionKind::Inbound,
            Currency::Gbp,
            amount,
            None,
        );
        assert!(tx.date > explicit);
    }
}
