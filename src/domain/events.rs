//! Domain events
//!
//! Facts published to the notification collaborator after a state change has
//! been persisted. Events are immutable and carry the full payload a consumer
//! needs, so no consumer ever has to read back through the store.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Account, BalanceSheet, Currency, Transaction, TransactionKind};

/// State-change notifications emitted by the core services.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LedgerEvent {
    /// A new account was created.
    AccountCreated {
        account_id: Uuid,
        customer_id: String,
        currencies: Vec<Currency>,
        balances: BalanceSheet,
        created_at: DateTime<Utc>,
    },

    /// An account's fields or currency set changed.
    AccountUpdated {
        account_id: Uuid,
        customer_id: String,
        currencies: Vec<Currency>,
        balances: BalanceSheet,
        updated_at: DateTime<Utc>,
    },

    /// A transaction was posted and its balance movement applied.
    TransactionCreated {
        transaction_id: Uuid,
        account_id: Uuid,
        amount: Decimal,
        currency: Currency,
        kind: TransactionKind,
        date: DateTime<Utc>,
    },
}

impl LedgerEvent {
    /// Get the event type as a string
    pub fn event_type(&self) -> &'static str {
        match self {
            LedgerEvent::AccountCreated { .. } => "AccountCreated",
            LedgerEvent::AccountUpdated { .. } => "AccountUpdated",
            LedgerEvent::TransactionCreated { .. } => "TransactionCreated",
        }
    }

    /// Get the account ID this event relates to
    pub fn account_id(&self) -> Uuid {
        match self {
            LedgerEvent::AccountCreated { account_id, .. } => *account_id,
            LedgerEvent::AccountUpdated { account_id, .. } => *account_id,
            LedgerEvent::TransactionCreated { account_id, .. } => *account_id,
        }
    }

    pub fn account_created(account: &Account) -> Self {
        LedgerEvent::AccountCreated {
            account_id: account.id,
            customer_id: account.customer_id.clone(),
            currencies: account.currencies.clone(),
            balances: account.balances.clone(),
            created_at: account.created_at,
        }
    }

    pub fn account_updated(account: &Account) -> Self {
        LedgerEvent::AccountUpdated {
            account_id: account.id,
            customer_id: account.customer_id.clone(),
            currencies: account.currencies.clone(),
            balances: account.balances.clone(),
            updated_at: account.updated_at,
        }
    }

    pub fn transaction_created(transaction: &Transaction) -> Self {
        LedgerEvent::TransactionCreated {
            transaction_id: transaction.id,
            account_id: transaction.account_id,
            amount: transaction.amount,
            currency: transaction.currency,
            kind: transaction.kind,
            date: transaction.date,
        }
    }
}
