//! In-memory store
//!
//! Embedded implementation of the store traits behind a `tokio::sync::RwLock`.
//! Backs the test suite and mirrors the Postgres store's observable behavior:
//! uniqueness on `customer_id`/`account_number`, insertion-order transaction
//! history.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{Account, Transaction};

use super::{AccountStore, StoreError, TransactionFilter, TransactionStore};

#[derive(Debug, Default)]
struct Collections {
    accounts: HashMap<Uuid, Account>,
    // Vec keeps insertion order, which is the listing order contract.
    transactions: Vec<Transaction>,
}

/// In-memory account and transaction collections.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Collections>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_unique(
        collections: &Collections,
        account: &Account,
    ) -> Result<(), StoreError> {
        for existing in collections.accounts.values() {
            if existing.id == account.id {
                continue;
            }
            if existing.customer_id == account.customer_id {
                return Err(StoreError::DuplicateKey {
                    field: "customer_id",
                });
            }
            if existing.account_number == account.account_number {
                return Err(StoreError::DuplicateKey {
                    field: "account_number",
                });
            }
        }
        Ok(())
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn insert(&self, account: &Account) -> Result<(), StoreError> {
        let mut collections = self.inner.write().await;
        Self::check_unique(&collections, account)?;
        collections.accounts.insert(account.id, account.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        let collections = self.inner.read().await;
        Ok(collections.accounts.get(&id).cloned())
    }

    async fn save(&self, account: &Account) -> Result<(), StoreError> {
        let mut collections = self.inner.write().await;
        Self::check_unique(&collections, account)?;
        collections.accounts.insert(account.id, account.clone());
        Ok(())
    }
}

#[async_trait]
impl TransactionStore for MemoryStore {
    async fn insert(&self, transaction: &Transaction) -> Result<(), StoreError> {
        let mut collections = self.inner.write().await;
        collections.transactions.push(transaction.clone());
        Ok(())
    }

    async fn find_by_account(
        &self,
        account_id: Uuid,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, StoreError> {
        let collections = self.inner.read().await;

        let matching = collections
            .transactions
            .iter()
            .filter(|tx| tx.account_id == account_id && filter.contains(tx.date))
            .skip(filter.skip.unwrap_or(0) as usize);

        let transactions = match filter.limit {
            Some(limit) => matching.take(limit as usize).cloned().collect(),
            None => matching.cloned().collect(),
        };

        Ok(transactions)
    }

    async fn count_by_account(&self, account_id: Uuid) -> Result<u64, StoreError> {
        let collections = self.inner.read().await;
        let count = collections
            .transactions
            .iter()
            .filter(|tx| tx.account_id == account_id)
            .count();
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Amount, Currency, TransactionKind};
    use rust_decimal_macros::dec;

    fn account(customer_id: &str, number: &str) -> Account {
        Account::new(customer_id, number, vec![Currency::Gbp])
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = MemoryStore::new();
        let acc = account("cust-1", "ACC-1");

        AccountStore::insert(&store, &acc).await.unwrap();
        let found = store.find_by_id(acc.id).await.unwrap();
        assert_eq!(found, Some(acc));
    }

    #[tokio::test]
    async fn test_duplicate_customer_id_rejected() {
        let store = MemoryStore::new();
        AccountStore::insert(&store, &account("cust-1", "ACC-1"))
            .await
            .unwrap();

        let result = AccountStore::insert(&store, &account("cust-1", "ACC-2")).await;
        assert!(matches!(
            result,
            Err(StoreError::DuplicateKey {
                field: "customer_id"
            })
        ));
    }

    #[tokio::test]
    async fn test_duplicate_account_number_rejected_on_save() {
        let store = MemoryStore::new();
        AccountStore::insert(&store, &account("cust-1", "ACC-1"))
            .await
            .unwrap();

        let mut other = account("cust-2", "ACC-2");
        AccountStore::insert(&store, &other).await.unwrap();

        other.account_number = "ACC-1".to_string();
        let result = store.save(&other).await;
        assert!(matches!(
            result,
            Err(StoreError::DuplicateKey {
                field: "account_number"
            })
        ));
    }

    #[tokio::test]
    async fn test_save_same_account_is_not_a_duplicate() {
        let store = MemoryStore::new();
        let mut acc = account("cust-1", "ACC-1");
        AccountStore::insert(&store, &acc).await.unwrap();

        acc.currencies.push(Currency::Usd);
        store.save(&acc).await.unwrap();
    }

    #[tokio::test]
    async fn test_find_by_account_preserves_insertion_order() {
        let store = MemoryStore::new();
        let account_id = Uuid::new_v4();

        for value in [1, 2, 3] {
            let tx = Transaction::post(
                account_id,
                TransactionKind::Inbound,
                Currency::Gbp,
                Amount::new(rust_decimal::Decimal::from(value)).unwrap(),
                None,
            );
            TransactionStore::insert(&store, &tx).await.unwrap();
        }

        let listed = store
            .find_by_account(account_id, &TransactionFilter::default())
            .await
            .unwrap();
        let amounts: Vec<_> = listed.iter().map(|tx| tx.amount).collect();
        assert_eq!(amounts, vec![dec!(1), dec!(2), dec!(3)]);
    }
}
