//! Archive API endpoints.
//!
//! The `{kind}` path segment is one of the six collection names
//! (`accounts`, `transactions`, `categories`, `goals`, `debts`,
//! `subscriptions`); anything else fails with 400 before the engine is
//! touched.

use api_types::{
    Ack, MessageResponse,
    archive::{
        ArchiveByKind, ArchiveListQuery, ArchiveListResponse, ArchiveRestoreResponse,
        ArchiveStatsResponse, ArchivedItem,
    },
};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::Utc;
use engine::{ArchiveQuery, ArchivedRecord, Engine, EntityKind};
use uuid::Uuid;

use crate::{
    ServerError, accounts, categories, debts, goals, query, server::ServerState, subscriptions,
    transactions,
};

fn map_item(engine: &Engine, record: &ArchivedRecord) -> ArchivedItem {
    match record {
        ArchivedRecord::Account(account) => ArchivedItem::Account(accounts::map_view(account)),
        ArchivedRecord::Transaction(tx) => {
            ArchivedItem::Transaction(transactions::map_view(engine, tx))
        }
        ArchivedRecord::Category(category) => {
            ArchivedItem::Category(categories::map_view(category))
        }
        ArchivedRecord::Goal(goal) => ArchivedItem::Goal(goals::map_view(engine, goal)),
        ArchivedRecord::Debt(debt) => ArchivedItem::Debt(debts::map_view(debt)),
        ArchivedRecord::Subscription(subscription) => {
            ArchivedItem::Subscription(subscriptions::map_view(subscription))
        }
    }
}

pub async fn stats(State(state): State<ServerState>) -> Json<ArchiveStatsResponse> {
    let engine = state.engine.read().await;
    let stats = engine.archive_stats();

    Json(ArchiveStatsResponse {
        total: stats.total,
        by_kind: ArchiveByKind {
            accounts: stats.accounts,
            transactions: stats.transactions,
            categories: stats.categories,
            goals: stats.goals,
            debts: stats.debts,
            subscriptions: stats.subscriptions,
        },
        oldest: stats.oldest,
    })
}

pub async fn list(
    State(state): State<ServerState>,
    Path(kind): Path<String>,
    Query(params): Query<ArchiveListQuery>,
) -> Result<Json<ArchiveListResponse>, ServerError> {
    let kind: EntityKind = kind.parse()?;
    let request = query::page_request(params.page, params.limit)?;
    let archive_query = ArchiveQuery {
        page: request,
        search: params.search,
        start_date: params
            .start_date
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc()),
        end_date: params
            .end_date
            .and_then(|date| date.and_hms_opt(23, 59, 59))
            .map(|dt| dt.and_utc()),
        tx_kind: params.kind.map(transactions::map_kind_to_engine),
    };

    let engine = state.engine.read().await;
    let page = engine.list_archived(kind, &archive_query)?;

    Ok(Json(ArchiveListResponse {
        items: page
            .items
            .iter()
            .map(|record| map_item(&engine, record))
            .collect(),
        pagination: query::pagination(&page, request),
    }))
}

pub async fn archive_entity(
    State(state): State<ServerState>,
    Path((kind, id)): Path<(String, Uuid)>,
) -> Result<Json<Ack>, ServerError> {
    let kind: EntityKind = kind.parse()?;
    let mut engine = state.engine.write().await;
    engine.archive_entity(kind, id, Utc::now())?;

    Ok(Json(Ack { success: true }))
}

pub async fn restore_entity(
    State(state): State<ServerState>,
    Path((kind, id)): Path<(String, Uuid)>,
) -> Result<Json<Ack>, ServerError> {
    let kind: EntityKind = kind.parse()?;
    let mut engine = state.engine.write().await;
    engine.restore_entity(kind, id, Utc::now())?;

    Ok(Json(Ack { success: true }))
}

pub async fn restore_archived(
    State(state): State<ServerState>,
    Path((kind, id)): Path<(String, Uuid)>,
) -> Result<Json<ArchiveRestoreResponse>, ServerError> {
    let kind: EntityKind = kind.parse()?;
    let mut engine = state.engine.write().await;
    let record = engine.restore_entity(kind, id, Utc::now())?;

    Ok(Json(ArchiveRestoreResponse {
        message: format!("restored from {kind}"),
        item: map_item(&engine, &record),
    }))
}

pub async fn delete_archived(
    State(state): State<ServerState>,
    Path((kind, id)): Path<(String, Uuid)>,
) -> Result<Json<MessageResponse>, ServerError> {
    let kind: EntityKind = kind.parse()?;
    let mut engine = state.engine.write().await;
    engine.delete_archived(kind, id)?;

    Ok(Json(MessageResponse {
        message: format!("permanently deleted from {kind}"),
    }))
}
