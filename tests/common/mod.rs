//! Common test utilities
//!
//! Builds the core services over the in-memory store with a capturable
//! event queue.

use std::sync::Arc;

use tokio::sync::mpsc;

use accounts_ledger::events::QueuePublisher;
use accounts_ledger::locks::AccountLocks;
use accounts_ledger::service::{AccountService, TransactionService};
use accounts_ledger::store::MemoryStore;
use accounts_ledger::LedgerEvent;

pub struct TestApp {
    pub accounts: Arc<AccountService>,
    pub transactions: Arc<TransactionService>,
    pub events: mpsc::Receiver<LedgerEvent>,
}

pub fn build_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let (publisher, events) = QueuePublisher::bounded(256);
    let publisher = Arc::new(publisher);
    let locks = AccountLocks::new();

    let accounts = Arc::new(AccountService::new(
        store.clone(),
        publisher.clone(),
        locks.clone(),
    ));
    let transactions = Arc::new(TransactionService::new(
        accounts.clone(),
        store.clone(),
        store,
        publisher,
        locks,
    ));

    TestApp {
        accounts,
        transactions,
        events,
    }
}

impl TestApp {
    /// Drain and return every event published so far.
    pub fn drain_events(&mut self) -> Vec<LedgerEvent> {
        let mut drained = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            drained.push(event);
        }
        drained
    }
}
