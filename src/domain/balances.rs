//! Balance ledger
//!
//! Keeps an account's per-currency balances synchronized with its declared
//! currency set. A `BalanceSheet` is a value: every operation returns a new
//! sheet and leaves the input untouched, so a half-applied mutation can never
//! be observed and the caller commits the next sheet explicitly.
//!
//! Invariant maintained here: after `initialize` or `reconcile`, the sheet's
//! key set equals the currency set it was built against.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Currency, DomainError};

/// Per-currency balances for one account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BalanceSheet(BTreeMap<Currency, Decimal>);

impl BalanceSheet {
    /// A sheet with every given currency at zero. Called once at account
    /// creation.
    pub fn initialize(currencies: &[Currency]) -> Self {
        Self(currencies.iter().map(|c| (*c, Decimal::ZERO)).collect())
    }

    /// Synchronize the sheet with a new currency set: currencies no longer in
    /// the set are dropped (their balance, zero or not, is discarded),
    /// currencies new to the set are added at zero, and currencies in both
    /// keep their balance. Idempotent.
    pub fn reconcile(&self, new_currencies: &[Currency]) -> Self {
        let mut next = BTreeMap::new();
        for currency in new_currencies {
            let balance = self.0.get(currency).copied().unwrap_or(Decimal::ZERO);
            next.insert(*currency, balance);
        }
        Self(next)
    }

    /// Add a signed amount (positive for inbound, negative for outbound) to
    /// the balance for `currency`, defaulting an absent prior balance to zero.
    ///
    /// Errors with `UnsupportedCurrency` when `currency` is not in the
    /// account's currency set. Does not enforce non-negativity: sufficient
    /// funds are the transaction poster's check, made before this call.
    pub fn apply_delta(
        &self,
        currencies: &[Currency],
        currency: Currency,
        delta: Decimal,
    ) -> Result<Self, DomainError> {
        if !currencies.contains(&currency) {
            return Err(DomainError::unsupported_currency(currency.as_str()));
        }

        let mut next = self.0.clone();
        let balance = next.entry(currency).or_insert(Decimal::ZERO);
        *balance += delta;
        Ok(Self(next))
    }

    /// Replace the balance for one currency. Pure value operation; callers
    /// validate membership and sign before using this.
    pub fn with_balance(&self, currency: Currency, amount: Decimal) -> Self {
        let mut next = self.0.clone();
        next.insert(currency, amount);
        Self(next)
    }

    /// Current balance for a currency, zero when the currency is not held.
    pub fn get(&self, currency: Currency) -> Decimal {
        self.0.get(&currency).copied().unwrap_or(Decimal::ZERO)
    }

    /// True when the sheet's key set equals the given currency set.
    pub fn matches(&self, currencies: &[Currency]) -> bool {
        self.0.len() == currencies.len() && currencies.iter().all(|c| self.0.contains_key(c))
    }

    /// Currencies holding a non-zero balance that would be discarded by
    /// reconciling against `new_currencies`.
    pub fn discarded_by(&self, new_currencies: &[Currency]) -> Vec<(Currency, Decimal)> {
        self.0
            .iter()
            .filter(|(currency, balance)| {
                !new_currencies.contains(currency) && **balance != Decimal::ZERO
            })
            .map(|(currency, balance)| (*currency, *balance))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Currency, &Decimal)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    use crate::domain::Currency::{Eur, Gbp, Usd};

    #[test]
    fn test_initialize_zeroes_every_currency() {
        let sheet = BalanceSheet::initialize(&[Usd, Eur]);
        assert_eq!(sheet.len(), 2);
        assert_eq!(sheet.get(Usd), Decimal::ZERO);
        assert_eq!(sheet.get(Eur), Decimal::ZERO);
        assert!(sheet.matches(&[Usd, Eur]));
    }

    #[test]
    fn test_reconcile_adds_and_removes() {
        let sheet = BalanceSheet::initialize(&[Usd]).with_balance(Usd, dec!(50));

        let widened = sheet.reconcile(&[Usd, Eur]);
        assert_eq!(widened.get(Usd), dec!(50));
        assert_eq!(widened.get(Eur), Decimal::ZERO);
        assert!(widened.matches(&[Usd, Eur]));

        // shrinking discards the USD balance, including its non-zero amount
        let narrowed = widened.reconcile(&[Eur]);
        assert_eq!(narrowed.len(), 1);
        assert_eq!(narrowed.get(Eur), Decimal::ZERO);
        assert_eq!(narrowed.get(Usd), Decimal::ZERO);
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let sheet = BalanceSheet::initialize(&[Usd, Gbp]).with_balance(Gbp, dec!(12.5));

        let once = sheet.reconcile(&[Gbp, Eur]);
        let twice = once.reconcile(&[Gbp, Eur]);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_apply_delta_inbound_and_outbound() {
        let currencies = [Usd];
        let sheet = BalanceSheet::initialize(&currencies);

        let sheet = sheet.apply_delta(&currencies, Usd, dec!(50)).unwrap();
        assert_eq!(sheet.get(Usd), dec!(50));

        let sheet = sheet.apply_delta(&currencies, Usd, dec!(-20)).unwrap();
        assert_eq!(sheet.get(Usd), dec!(30));
    }

    #[test]
    fn test_apply_delta_defaults_missing_balance_to_zero() {
        let currencies = [Usd, Eur];
        // sheet deliberately missing the EUR key
        let sheet = BalanceSheet::initialize(&[Usd]);

        let sheet = sheet.apply_delta(&currencies, Eur, dec!(5)).unwrap();
        assert_eq!(sheet.get(Eur), dec!(5));
    }

    #[test]
    fn test_apply_delta_rejects_unheld_currency() {
        let sheet = BalanceSheet::initialize(&[Usd]);
        let result = sheet.apply_delta(&[Usd], Eur, dec!(10));
        assert!(matches!(
            result,
            Err(DomainError::UnsupportedCurrency { .. })
        ));
    }

    #[test]
    fn test_apply_delta_leaves_input_untouched() {
        let currencies = [Usd];
        let sheet = BalanceSheet::initialize(&currencies);
        let _next = sheet.apply_delta(&currencies, Usd, dec!(99)).unwrap();
        assert_eq!(sheet.get(Usd), Decimal::ZERO);
    }

    #[test]
    fn test_discarded_by_reports_lost_balances() {
        let sheet = BalanceSheet::initialize(&[Usd, Eur]).with_balance(Usd, dec!(50));

        let discarded = sheet.discarded_by(&[Eur]);
        assert_eq!(discarded, vec![(Usd, dec!(50))]);

        // zero balances are dropped silently, not reported
        assert!(sheet.discarded_by(&[Usd]).is_empty());
    }
}
