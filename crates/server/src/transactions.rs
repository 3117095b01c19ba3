//! Transactions API endpoints.

use api_types::transaction::{
    TransactionKind as ApiTransactionKind, TransactionListQuery, TransactionListResponse,
    TransactionNew, TransactionPatch as ApiTransactionPatch,
    TransactionStatus as ApiTransactionStatus, TransactionView,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use engine::{
    Engine, Money, NewTransaction, Transaction, TransactionFilter, TransactionKind,
    TransactionPatch, TransactionStatus,
};
use uuid::Uuid;

use crate::{ServerError, query, server::ServerState};

/// Render a transaction with its references resolved to display names.
/// The engine falls back to the frozen labels when a referenced row has
/// been permanently deleted.
pub(crate) fn map_view(engine: &Engine, transaction: &Transaction) -> TransactionView {
    TransactionView {
        id: transaction.id,
        account_id: transaction.account_id,
        account_name: engine
            .account_display_name(transaction.account_id, transaction.account_label.as_deref())
            .unwrap_or_else(|| "(unknown)".to_string()),
        to_account_id: transaction.to_account_id,
        to_account_name: transaction.to_account_id.and_then(|id| {
            engine.account_display_name(id, transaction.to_account_label.as_deref())
        }),
        kind: map_kind(transaction.kind),
        amount_minor: transaction.amount.minor(),
        category_id: transaction.category_id,
        category_name: transaction.category_id.and_then(|id| {
            engine.category_display_name(id, transaction.category_label.as_deref())
        }),
        note: transaction.note.clone(),
        occurred_at: transaction.occurred_at,
        status: match transaction.status {
            TransactionStatus::Active => ApiTransactionStatus::Active,
            TransactionStatus::Archived => ApiTransactionStatus::Archived,
        },
        created_at: transaction.created_at,
        updated_at: transaction.updated_at,
    }
}

pub(crate) fn map_kind(kind: TransactionKind) -> ApiTransactionKind {
    match kind {
        TransactionKind::Income => ApiTransactionKind::Income,
        TransactionKind::Expense => ApiTransactionKind::Expense,
        TransactionKind::Transfer => ApiTransactionKind::Transfer,
    }
}

pub(crate) fn map_kind_to_engine(kind: ApiTransactionKind) -> TransactionKind {
    match kind {
        ApiTransactionKind::Income => TransactionKind::Income,
        ApiTransactionKind::Expense => TransactionKind::Expense,
        ApiTransactionKind::Transfer => TransactionKind::Transfer,
    }
}

fn parse_status(token: &str) -> Option<TransactionStatus> {
    match token {
        "active" => Some(TransactionStatus::Active),
        "archived" => Some(TransactionStatus::Archived),
        _ => None,
    }
}

pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<TransactionListQuery>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let request = query::page_request(params.page, params.limit)?;
    let statuses = query::status_list(params.status.as_deref(), parse_status)?;
    let filter = TransactionFilter {
        statuses,
        account_id: params.account_id,
        kind: params.kind.map(map_kind_to_engine),
    };

    let engine = state.engine.read().await;
    let page = engine.list_transactions(&filter, request);

    Ok(Json(TransactionListResponse {
        transactions: page.items.iter().map(|tx| map_view(&engine, tx)).collect(),
        pagination: query::pagination(&page, request),
    }))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let occurred_at = payload
        .occurred_at
        .map_or_else(Utc::now, |dt| dt.with_timezone(&Utc));

    let mut engine = state.engine.write().await;
    let transaction = engine.record_transaction(
        NewTransaction {
            account_id: payload.account_id,
            kind: map_kind_to_engine(payload.kind),
            amount: Money::new(payload.amount_minor),
            category_id: payload.category_id,
            note: payload.note,
            occurred_at,
        },
        Utc::now(),
    )?;

    Ok((StatusCode::CREATED, Json(map_view(&engine, &transaction))))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ApiTransactionPatch>,
) -> Result<Json<TransactionView>, ServerError> {
    let patch = TransactionPatch {
        kind: payload.kind.map(map_kind_to_engine),
        account_id: payload.account_id,
        to_account_id: payload.to_account_id,
        amount: payload.amount_minor.map(Money::new),
        category_id: payload.category_id,
        note: payload.note,
        occurred_at: payload.occurred_at.map(|dt| dt.with_timezone(&Utc)),
    };

    let mut engine = state.engine.write().await;
    let transaction = engine.update_transaction(id, patch, Utc::now())?;

    Ok(Json(map_view(&engine, &transaction)))
}
