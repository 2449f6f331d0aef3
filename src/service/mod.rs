//! Core services
//!
//! Orchestration of the domain against the store and publisher collaborators:
//! account lifecycle (create / get / update) and transaction posting and
//! querying. Each service method is one sequential unit of work; concurrency
//! control is the per-account lock shared between the two services.

mod accounts;
mod commands;
mod transactions;

pub use accounts::AccountService;
pub use commands::{CreateAccount, ListTransactions, PostTransaction, UpdateAccount};
pub use transactions::TransactionService;
