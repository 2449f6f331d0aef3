//! Transaction service
//!
//! Posting: load the account, validate currency support and sufficient
//! funds, apply the delta, persist account then transaction, publish. The
//! whole window runs under the account's lock so concurrent posts are
//! additive. Querying: date-filtered, paginated history in stable
//! insertion order.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{Amount, DomainError, LedgerEvent, Transaction, TransactionKind};
use crate::error::AppResult;
use crate::events::EventPublisher;
use crate::locks::AccountLocks;
use crate::store::{AccountStore, TransactionFilter, TransactionStore};

use super::{AccountService, ListTransactions, PostTransaction};

/// Transaction poster and query service.
#[derive(Clone)]
pub struct TransactionService {
    accounts: Arc<AccountService>,
    account_store: Arc<dyn AccountStore>,
    transactions: Arc<dyn TransactionStore>,
    publisher: Arc<dyn EventPublisher>,
    locks: AccountLocks,
}

impl TransactionService {
    pub fn new(
        accounts: Arc<AccountService>,
        account_store: Arc<dyn AccountStore>,
        transactions: Arc<dyn TransactionStore>,
        publisher: Arc<dyn EventPublisher>,
        locks: AccountLocks,
    ) -> Self {
        Self {
            accounts,
            account_store,
            transactions,
            publisher,
            locks,
        }
    }

    /// Validate and apply one transaction against its account.
    ///
    /// Outbound posts require `balance >= amount`; equality is allowed and
    /// leaves the balance at zero. On any failure the account is untouched.
    pub async fn post(&self, command: PostTransaction) -> AppResult<Transaction> {
        // Defensive: upstream shape validation should already have rejected
        // non-positive amounts.
        let amount = Amount::new(command.amount)
            .map_err(|e| DomainError::InvalidAmount(e.to_string()))?;

        let _guard = self.locks.acquire(command.account_id).await;

        let mut account = self.accounts.get(command.account_id).await?;

        if !account.holds(command.currency) {
            return Err(DomainError::unsupported_currency(command.currency.as_str()).into());
        }

        if command.kind == TransactionKind::Outbound {
            let available = account.balances.get(command.currency);
            if available < amount.value() {
                return Err(DomainError::insufficient_balance(
                    command.currency,
                    amount.value(),
                    available,
                )
                .into());
            }
        }

        let delta = command.kind.signed(amount.value());
        account.balances =
            account
                .balances
                .apply_delta(&account.currencies, command.currency, delta)?;
        account.updated_at = Utc::now();

        let transaction = Transaction::post(
            account.id,
            command.kind,
            command.currency,
            amount,
            command.date,
        );

        // Account first. The transaction record is not written when the
        // account save fails, so a phantom record cannot exist; the reverse
        // gap (account saved, record insert fails) is accepted and surfaced
        // to the caller as the storage error.
        self.account_store.save(&account).await?;
        self.transactions.insert(&transaction).await?;

        self.publisher
            .publish(LedgerEvent::transaction_created(&transaction))
            .await?;

        tracing::info!(
            transaction_id = %transaction.id,
            account_id = %account.id,
            kind = transaction.kind.as_str(),
            currency = %transaction.currency,
            amount = %transaction.amount,
            "transaction posted"
        );
        Ok(transaction)
    }

    /// List an account's transactions filtered by date range.
    ///
    /// The returned total is the size of the account's full history, not of
    /// the filtered page: the date filter narrows `transactions` only.
    pub async fn list(
        &self,
        account_id: Uuid,
        query: ListTransactions,
    ) -> AppResult<(Vec<Transaction>, u64)> {
        let account = self.accounts.get(account_id).await?;

        let filter = TransactionFilter {
            from: query.from,
            to: query.to,
            skip: positive(query.skip),
            limit: positive(query.limit),
        };

        let transactions = self.transactions.find_by_account(account.id, &filter).await?;
        let total = self.transactions.count_by_account(account.id).await?;

        Ok((transactions, total))
    }
}

fn positive(value: Option<i64>) -> Option<u64> {
    value.filter(|v| *v > 0).map(|v| v as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_drops_non_positive_values() {
        assert_eq!(positive(None), None);
        assert_eq!(positive(Some(0)), None);
        assert_eq!(positive(Some(-5)), None);
        assert_eq!(positive(Some(10)), Some(10));
    }
}
