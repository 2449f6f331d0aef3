//! API Routes
//!
//! HTTP endpoint definitions. The transport stays thin: decode the payload,
//! call the service, encode the result. All money values travel as decimal
//! strings on the wire.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Account, BalanceSheet, Currency, Transaction, TransactionKind};
use crate::error::AppError;
use crate::service::{
    AccountService, CreateAccount, ListTransactions, PostTransaction, TransactionService,
    UpdateAccount,
};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AccountService>,
    pub transactions: Arc<TransactionService>,
}

/// Build the API router.
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/accounts", post(create_account))
        .route("/accounts/:id", get(get_account).patch(update_account))
        .route("/accounts/:id/transactions", get(list_transactions))
        .route("/transactions", post(create_transaction))
}

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    pub customer_id: String,
    pub account_number: String,
    pub currencies: Vec<Currency>,
    #[serde(default)]
    pub balances: Option<BTreeMap<Currency, String>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAccountRequest {
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub account_number: Option<String>,
    #[serde(default)]
    pub currencies: Option<Vec<Currency>>,
    #[serde(default)]
    pub balances: Option<BTreeMap<Currency, String>>,
}

#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub id: Uuid,
    pub customer_id: String,
    pub account_number: String,
    pub currencies: Vec<Currency>,
    pub balances: BalanceSheet,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            customer_id: account.customer_id,
            account_number: account.account_number,
            currencies: account.currencies,
            balances: account.balances,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    pub account_id: Uuid,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub currency: Currency,
    pub amount: String,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    pub id: Uuid,
    pub account_id: Uuid,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub currency: Currency,
    pub amount: Decimal,
    pub date: DateTime<Utc>,
}

impl From<Transaction> for TransactionResponse {
    fn from(transaction: Transaction) -> Self {
        Self {
            id: transaction.id,
            account_id: transaction.account_id,
            kind: transaction.kind,
            currency: transaction.currency,
            amount: transaction.amount,
            date: transaction.date,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListTransactionsParams {
    #[serde(default)]
    pub skip: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub to: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct TransactionListResponse {
    pub transactions: Vec<TransactionResponse>,
    /// Count of the account's full history, regardless of the date filter.
    pub total: u64,
}

// =========================================================================
// Handlers
// =========================================================================

async fn create_account(
    State(state): State<AppState>,
    Json(request): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), AppError> {
    let mut command = CreateAccount::new(
        request.customer_id,
        request.account_number,
        request.currencies,
    );
    command.balances = request.balances.map(parse_balances).transpose()?;

    let account = state.accounts.create(command).await?;
    Ok((StatusCode::CREATED, Json(account.into())))
}

async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AccountResponse>, AppError> {
    let account = state.accounts.get(id).await?;
    Ok(Json(account.into()))
}

async fn update_account(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateAccountRequest>,
) -> Result<Json<AccountResponse>, AppError> {
    let command = UpdateAccount {
        customer_id: request.customer_id,
        account_number: request.account_number,
        currencies: request.currencies,
        balances: request.balances.map(parse_balances).transpose()?,
    };

    let account = state.accounts.update(id, command).await?;
    Ok(Json(account.into()))
}

async fn create_transaction(
    State(state): State<AppState>,
    Json(request): Json<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<TransactionResponse>), AppError> {
    let amount = parse_amount(&request.amount)?;
    let command = PostTransaction {
        account_id: request.account_id,
        kind: request.kind,
        currency: request.currency,
        amount,
        date: request.date,
    };

    let transaction = state.transactions.post(command).await?;
    Ok((StatusCode::CREATED, Json(transaction.into())))
}

async fn list_transactions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<ListTransactionsParams>,
) -> Result<Json<TransactionListResponse>, AppError> {
    let query = ListTransactions {
        skip: params.skip,
        limit: params.limit,
        from: params.from,
        to: params.to,
    };

    let (transactions, total) = state.transactions.list(id, query).await?;
    Ok(Json(TransactionListResponse {
        transactions: transactions.into_iter().map(Into::into).collect(),
        total,
    }))
}

fn parse_amount(raw: &str) -> Result<Decimal, AppError> {
    raw.parse::<Decimal>()
        .map_err(|e| AppError::InvalidInput(format!("Invalid amount: {e}")))
}

fn parse_balances(
    raw: BTreeMap<Currency, String>,
) -> Result<BTreeMap<Currency, Decimal>, AppError> {
    raw.into_iter()
        .map(|(currency, amount)| {
            let amount = amount.parse::<Decimal>().map_err(|e| {
                AppError::InvalidInput(format!("Invalid balance for {currency}: {e}"))
            })?;
            Ok((currency, amount))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("100.50").unwrap(), dec!(100.50));
        assert!(matches!(
            parse_amount("abc"),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_parse_balances() {
        let raw = BTreeMap::from([
            (Currency::Usd, "25".to_string()),
            (Currency::Eur, "1.5".to_string()),
        ]);
        let parsed = parse_balances(raw).unwrap();
        assert_eq!(parsed[&Currency::Usd], dec!(25));
        assert_eq!(parsed[&Currency::Eur], dec!(1.5));
    }

    #[test]
    fn test_create_account_request_decodes() {
        let json = serde_json::json!({
            "customer_id": "cust-1",
            "account_number": "ACC-1",
            "currencies": ["USD", "EUR"],
            "balances": { "USD": "25" }
        });

        let request: CreateAccountRequest = serde_json::from_value(json).unwrap();
        assert_eq!(request.currencies, vec![Currency::Usd, Currency::Eur]);
        assert_eq!(
            request.balances.unwrap()[&Currency::Usd],
            "25".to_string()
        );
    }
}
