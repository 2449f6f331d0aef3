//! Postgres store
//!
//! sqlx-backed implementation of the store traits. Currency lists and balance
//! sheets are stored as JSONB; amounts as NUMERIC. Uniqueness on
//! `customer_id` and `account_number` is enforced by the schema
//! (migrations/001_init.sql) and translated here into `DuplicateKey`.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::{Account, BalanceSheet, Currency, Transaction, TransactionKind};

use super::{AccountStore, StoreError, TransactionFilter, TransactionStore};

/// PostgreSQL-backed account and transaction collections.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for PgStore {
    async fn insert(&self, account: &Account) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO accounts
                (id, customer_id, account_number, currencies, balances, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(account.id)
        .bind(&account.customer_id)
        .bind(&account.account_number)
        .bind(encode_json(&account.currencies)?)
        .bind(encode_json(&account.balances)?)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, customer_id, account_number, currencies, balances, created_at, updated_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| account_from_row(&row)).transpose()
    }

    async fn save(&self, account: &Account) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE accounts
            SET customer_id = $2,
                account_number = $3,
                currencies = $4,
                balances = $5,
                updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(account.id)
        .bind(&account.customer_id)
        .bind(&account.account_number)
        .bind(encode_json(&account.currencies)?)
        .bind(encode_json(&account.balances)?)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(())
    }
}

#[async_trait]
impl TransactionStore for PgStore {
    async fn insert(&self, transaction: &Transaction) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO transactions (id, account_id, kind, currency, amount, date)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(transaction.id)
        .bind(transaction.account_id)
        .bind(transaction.kind.as_str())
        .bind(transaction.currency.as_str())
        .bind(transaction.amount)
        .bind(transaction.date)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_account(
        &self,
        account_id: Uuid,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, StoreError> {
        // seq is a bigserial assigned at insert, giving the stable
        // oldest-first order the pagination contract requires.
        // LIMIT NULL / OFFSET NULL behave as if the clause were omitted.
        let rows = sqlx::query(
            r#"
            SELECT id, account_id, kind, currency, amount, date
            FROM transactions
            WHERE account_id = $1
              AND ($2::timestamptz IS NULL OR date >= $2)
              AND ($3::timestamptz IS NULL OR date <= $3)
            ORDER BY seq ASC
            LIMIT $4::bigint OFFSET $5::bigint
            "#,
        )
        .bind(account_id)
        .bind(filter.from)
        .bind(filter.to)
        .bind(filter.limit.map(|l| l as i64))
        .bind(filter.skip.map(|s| s as i64))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(transaction_from_row).collect()
    }

    async fn count_by_account(&self, account_id: Uuid) -> Result<u64, StoreError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM transactions WHERE account_id = $1")
                .bind(account_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count as u64)
    }
}

fn account_from_row(row: &PgRow) -> Result<Account, StoreError> {
    let currencies: serde_json::Value = row.try_get("currencies")?;
    let balances: serde_json::Value = row.try_get("balances")?;

    Ok(Account {
        id: row.try_get("id")?,
        customer_id: row.try_get("customer_id")?,
        account_number: row.try_get("account_number")?,
        currencies: decode_json(currencies)?,
        balances: decode_json::<BalanceSheet>(balances)?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn transaction_from_row(row: &PgRow) -> Result<Transaction, StoreError> {
    let kind: String = row.try_get("kind")?;
    let currency: String = row.try_get("currency")?;

    Ok(Transaction {
        id: row.try_get("id")?,
        account_id: row.try_get("account_id")?,
        kind: match kind.as_str() {
            "INBOUND" => TransactionKind::Inbound,
            "OUTBOUND" => TransactionKind::Outbound,
            other => return Err(decode_error(format!("unknown transaction kind: {other}"))),
        },
        currency: currency
            .parse::<Currency>()
            .map_err(|e| decode_error(e.to_string()))?,
        amount: row.try_get("amount")?,
        date: row.try_get("date")?,
    })
}

fn encode_json<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, StoreError> {
    serde_json::to_value(value).map_err(|e| decode_error(e.to_string()))
}

fn decode_json<T: serde::de::DeserializeOwned>(
    value: serde_json::Value,
) -> Result<T, StoreError> {
    serde_json::from_value(value).map_err(|e| decode_error(e.to_string()))
}

fn decode_error(message: String) -> StoreError {
    StoreError::Database(sqlx::Error::Decode(message.into()))
}

/// Translate a PostgreSQL unique violation (SQLSTATE 23505) into
/// `DuplicateKey`, identified by the violated constraint.
fn map_unique_violation(error: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &error {
        if db.is_unique_violation() {
            let constraint = db.constraint().unwrap_or_default();
            let field = if constraint.contains("customer_id") {
                "customer_id"
            } else {
                "account_number"
            };
            return StoreError::DuplicateKey { field };
        }
    }
    StoreError::Database(error)
}
