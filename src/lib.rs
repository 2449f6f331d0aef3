//! accounts-ledger library
//!
//! Multi-currency customer accounts with transaction posting. Re-exports the
//! core types for the server binary and the integration tests.

pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod events;
pub mod locks;
pub mod service;
pub mod store;

mod error;

pub use config::Config;
pub use domain::{
    Account, Amount, AmountError, BalanceSheet, Currency, DomainError, LedgerEvent, Transaction,
    TransactionKind,
};
pub use error::{AppError, AppResult, ErrorResponse};
