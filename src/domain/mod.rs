//! Domain layer
//!
//! Pure business types and rules: the currency catalog, the balance ledger,
//! account and transaction records, domain events and domain errors.
//! Nothing in here touches the network or the database.

mod account;
mod amount;
mod balances;
mod currency;
mod error;
mod events;
mod transaction;

pub use account::Account;
pub(crate) use account::dedup_currencies;
pub use amount::{Amount, AmountError};
pub use balances::BalanceSheet;
pub use currency::{Currency, CATALOG};
pub use error::DomainError;
pub use events::LedgerEvent;
pub use transaction::{Transaction, TransactionKind};
