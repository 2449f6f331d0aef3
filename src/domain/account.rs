//! Account record
//!
//! A customer account holding one balance per declared currency. Accounts are
//! created once and mutated only through currency-set updates and transaction
//! posting; they are never deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{BalanceSheet, Currency};

/// A customer account.
///
/// `customer_id` and `account_number` are unique across all accounts,
/// enforced by the store. `balances` always holds exactly the keys listed in
/// `currencies` after any successful mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub customer_id: String,
    pub account_number: String,
    /// Ordered set of currencies this account may hold.
    pub currencies: Vec<Currency>,
    pub balances: BalanceSheet,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account with zeroed balances for every currency.
    pub fn new(
        customer_id: impl Into<String>,
        account_number: impl Into<String>,
        currencies: Vec<Currency>,
    ) -> Self {
        let now = Utc::now();
        let balances = BalanceSheet::initialize(&currencies);

        Self {
            id: Uuid::new_v4(),
            customer_id: customer_id.into(),
            account_number: account_number.into(),
            currencies,
            balances,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the account currently holds this currency.
    pub fn holds(&self, currency: Currency) -> bool {
        self.currencies.contains(&currency)
    }
}

/// Deduplicate a currency list while preserving first-seen order.
pub(crate) fn dedup_currencies(currencies: Vec<Currency>) -> Vec<Currency> {
    let mut seen = Vec::with_capacity(currencies.len());
    for currency in currencies {
        if !seen.contains(&currency) {
            seen.push(currency);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    use crate::domain::Currency::{Eur, Usd};

    #[test]
    fn test_new_account_invariant() {
        let account = Account::new("cust-1", "ACC-0001", vec![Usd, Eur]);

        assert!(account.balances.matches(&account.currencies));
        assert_eq!(account.balances.get(Usd), Decimal::ZERO);
        assert_eq!(account.balances.get(Eur), Decimal::ZERO);
        assert!(account.holds(Usd));
        assert!(!account.holds(Currency::Btc));
    }

    #[test]
    fn test_dedup_preserves_order() {
        let deduped = dedup_currencies(vec![Eur, Usd, Eur, Usd]);
        assert_eq!(deduped, vec![Eur, Usd]);
    }
}
