//! Account lifecycle service
//!
//! Creates, retrieves and updates accounts, delegating balance-shape
//! maintenance to the balance ledger. `get` is the single lookup path every
//! other core operation goes through, so each mutation starts from the
//! current persisted state.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::{
    dedup_currencies, Account, BalanceSheet, Currency, DomainError, LedgerEvent,
};
use crate::error::{AppError, AppResult};
use crate::events::EventPublisher;
use crate::locks::AccountLocks;
use crate::store::AccountStore;

use super::{CreateAccount, UpdateAccount};

/// Account lifecycle manager.
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn AccountStore>,
    publisher: Arc<dyn EventPublisher>,
    locks: AccountLocks,
}

impl AccountService {
    pub fn new(
        store: Arc<dyn AccountStore>,
        publisher: Arc<dyn EventPublisher>,
        locks: AccountLocks,
    ) -> Self {
        Self {
            store,
            publisher,
            locks,
        }
    }

    /// Create a new account with zeroed (or supplied opening) balances and
    /// emit `AccountCreated`. Uniqueness of `customer_id`/`account_number` is
    /// the store's constraint, surfaced as `DuplicateKey`.
    pub async fn create(&self, command: CreateAccount) -> AppResult<Account> {
        if command.customer_id.is_empty() {
            return Err(AppError::InvalidInput(
                "customer_id must not be empty".to_string(),
            ));
        }
        if command.account_number.is_empty() {
            return Err(AppError::InvalidInput(
                "account_number must not be empty".to_string(),
            ));
        }

        let currencies = dedup_currencies(command.currencies);
        if currencies.is_empty() {
            return Err(AppError::InvalidInput(
                "currencies must not be empty".to_string(),
            ));
        }

        let mut account = Account::new(command.customer_id, command.account_number, currencies);
        if let Some(opening) = &command.balances {
            account.balances = build_balances(&account.currencies, opening)?;
        }

        self.store.insert(&account).await?;
        self.publisher
            .publish(LedgerEvent::account_created(&account))
            .await?;

        tracing::info!(
            account_id = %account.id,
            customer_id = %account.customer_id,
            "account created"
        );
        Ok(account)
    }

    /// Fetch an account by id. Fails with `AccountNotFound` on a miss.
    pub async fn get(&self, id: Uuid) -> AppResult<Account> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(AppError::AccountNotFound(id))
    }

    /// Apply a partial update. A changed currency set reconciles the balance
    /// map before anything else; fields absent from the command are left
    /// untouched. Emits `AccountUpdated` after the save commits.
    pub async fn update(&self, id: Uuid, command: UpdateAccount) -> AppResult<Account> {
        let _guard = self.locks.acquire(id).await;

        let mut account = self.get(id).await?;

        if let Some(currencies) = command.currencies {
            let currencies = dedup_currencies(currencies);
            if currencies.is_empty() {
                return Err(AppError::InvalidInput(
                    "currencies must not be empty".to_string(),
                ));
            }

            for (currency, balance) in account.balances.discarded_by(&currencies) {
                tracing::warn!(
                    account_id = %account.id,
                    currency = %currency,
                    balance = %balance,
                    "discarding non-zero balance for removed currency"
                );
            }

            account.balances = account.balances.reconcile(&currencies);
            account.currencies = currencies;
        }

        if let Some(balances) = &command.balances {
            account.balances = build_balances(&account.currencies, balances)?;
        }

        if let Some(customer_id) = command.customer_id {
            account.customer_id = customer_id;
        }
        if let Some(account_number) = command.account_number {
            account.account_number = account_number;
        }

        account.updated_at = Utc::now();
        self.store.save(&account).await?;
        self.publisher
            .publish(LedgerEvent::account_updated(&account))
            .await?;

        tracing::info!(account_id = %account.id, "account updated");
        Ok(account)
    }
}

/// Build a balance sheet from supplied entries: every entry must name a held
/// currency and carry a positive amount; currencies without an entry are
/// filled at zero.
fn build_balances(
    currencies: &[Currency],
    entries: &BTreeMap<Currency, Decimal>,
) -> AppResult<BalanceSheet> {
    let mut sheet = BalanceSheet::initialize(currencies);

    for (currency, amount) in entries {
        if !currencies.contains(currency) {
            return Err(DomainError::unsupported_currency(currency.as_str()).into());
        }
        if *amount <= Decimal::ZERO {
            return Err(AppError::InvalidInput(format!(
                "Invalid amount for currency {currency}: {amount}. Amount must be a positive number."
            )));
        }
        sheet = sheet.with_balance(*currency, *amount);
    }

    Ok(sheet)
}
