//! Accounts API endpoints.

use api_types::account::{
    AccountKind as ApiAccountKind, AccountListQuery, AccountListResponse, AccountNew,
    AccountStatus as ApiAccountStatus, AccountView, HistoryEntryView,
    OperationKind as ApiOperationKind, TransferNew, TransferResponse,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use engine::{Account, AccountKind, AccountStatus, HistoryEntry, Money, OperationKind};
use uuid::Uuid;

use crate::{ServerError, query, server::ServerState};

pub(crate) fn map_view(account: &Account) -> AccountView {
    AccountView {
        id: account.id,
        name: account.name.clone(),
        kind: map_kind(account.kind),
        balance_minor: account.balance.minor(),
        currency: account.currency.clone(),
        status: map_status(account.status),
        history: account.history.iter().map(map_history_entry).collect(),
        created_at: account.created_at,
        updated_at: account.updated_at,
    }
}

fn map_history_entry(entry: &HistoryEntry) -> HistoryEntryView {
    HistoryEntryView {
        operation: match entry.operation {
            OperationKind::Income => ApiOperationKind::Income,
            OperationKind::Expense => ApiOperationKind::Expense,
        },
        amount_minor: entry.amount.minor(),
        occurred_at: entry.occurred_at,
        note: entry.note.clone(),
        linked_account_id: entry.linked_account_id,
    }
}

fn map_kind(kind: AccountKind) -> ApiAccountKind {
    match kind {
        AccountKind::Checking => ApiAccountKind::Checking,
        AccountKind::Savings => ApiAccountKind::Savings,
        AccountKind::Cash => ApiAccountKind::Cash,
        AccountKind::Card => ApiAccountKind::Card,
        AccountKind::Other => ApiAccountKind::Other,
    }
}

fn map_kind_to_engine(kind: ApiAccountKind) -> AccountKind {
    match kind {
        ApiAccountKind::Checking => AccountKind::Checking,
        ApiAccountKind::Savings => AccountKind::Savings,
        ApiAccountKind::Cash => AccountKind::Cash,
        ApiAccountKind::Card => AccountKind::Card,
        ApiAccountKind::Other => AccountKind::Other,
    }
}

fn map_status(status: AccountStatus) -> ApiAccountStatus {
    match status {
        AccountStatus::Active => ApiAccountStatus::Active,
        AccountStatus::Archived => ApiAccountStatus::Archived,
    }
}

fn parse_status(token: &str) -> Option<AccountStatus> {
    match token {
        "active" => Some(AccountStatus::Active),
        "archived" => Some(AccountStatus::Archived),
        _ => None,
    }
}

pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<AccountListQuery>,
) -> Result<Json<AccountListResponse>, ServerError> {
    let request = query::page_request(params.page, params.limit)?;
    let statuses = query::status_list(params.status.as_deref(), parse_status)?;

    let engine = state.engine.read().await;
    let page = engine.list_accounts(statuses.as_deref(), request);

    Ok(Json(AccountListResponse {
        accounts: page.items.iter().map(map_view).collect(),
        pagination: query::pagination(&page, request),
    }))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<AccountNew>,
) -> Result<(StatusCode, Json<AccountView>), ServerError> {
    let mut engine = state.engine.write().await;
    let account = engine.new_account(
        &payload.name,
        map_kind_to_engine(payload.kind),
        Money::new(payload.opening_balance_minor),
        payload.currency.as_deref(),
        Utc::now(),
    )?;

    Ok((StatusCode::CREATED, Json(map_view(&account))))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AccountView>, ServerError> {
    let engine = state.engine.read().await;
    Ok(Json(map_view(engine.account(id)?)))
}

pub async fn transfer(
    State(state): State<ServerState>,
    Json(payload): Json<TransferNew>,
) -> Result<Json<TransferResponse>, ServerError> {
    let occurred_at = payload
        .occurred_at
        .map_or_else(Utc::now, |dt| dt.with_timezone(&Utc));

    let mut engine = state.engine.write().await;
    let (from, to) = engine.transfer(
        payload.from_account_id,
        payload.to_account_id,
        Money::new(payload.amount_minor),
        payload.note.as_deref(),
        occurred_at,
        Utc::now(),
    )?;

    Ok(Json(TransferResponse {
        from_account: map_view(&from),
        to_account: map_view(&to),
    }))
}
