//! Persistence collaborator
//!
//! The core talks to storage through these traits only. Two implementations
//! exist: [`PgStore`] over PostgreSQL for the server binary, and
//! [`MemoryStore`] as an embedded backend used by the test suite.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Account, Transaction};

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Storage failures surfaced to the core.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness constraint was violated. Carries the colliding field so
    /// the transport can produce a useful message.
    #[error("Duplicate value for unique field {field}")]
    DuplicateKey { field: &'static str },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Date-range and pagination filter for transaction listings.
///
/// `skip`/`limit` are only present when positive; the services normalize
/// non-positive caller values to `None` before building the filter.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub skip: Option<u64>,
    pub limit: Option<u64>,
}

/// Account collection, with uniqueness enforced on `customer_id` and
/// `account_number`.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Persist a new account. Fails with `DuplicateKey` when `customer_id` or
    /// `account_number` is already taken.
    async fn insert(&self, account: &Account) -> Result<(), StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError>;

    /// Persist the current state of an existing account. Subject to the same
    /// uniqueness constraints as `insert`.
    async fn save(&self, account: &Account) -> Result<(), StoreError>;
}

/// Transaction collection. Append-only; records are never updated.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    async fn insert(&self, transaction: &Transaction) -> Result<(), StoreError>;

    /// Transactions for one account matching the filter, in stable insertion
    /// order (oldest first).
    async fn find_by_account(
        &self,
        account_id: Uuid,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, StoreError>;

    /// Total number of transactions for the account, ignoring any filter.
    async fn count_by_account(&self, account_id: Uuid) -> Result<u64, StoreError>;
}

impl TransactionFilter {
    /// True when `date` falls inside the configured range.
    pub(crate) fn contains(&self, date: DateTime<Utc>) -> bool {
        if let Some(from) = self.from {
            if date < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if date > to {
                return false;
            }
        }
        true
    }
}
