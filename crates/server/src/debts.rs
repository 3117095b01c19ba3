//! Debts API endpoints.

use api_types::debt::{
    DebtKind as ApiDebtKind, DebtListQuery, DebtListResponse, DebtNew, DebtPaymentNew,
    DebtPaymentView, DebtStatus as ApiDebtStatus, DebtStatusUpdate, DebtView,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use engine::{Debt, DebtKind, DebtStatus, Money};
use uuid::Uuid;

use crate::{ServerError, query, server::ServerState};

pub(crate) fn map_view(debt: &Debt) -> DebtView {
    DebtView {
        id: debt.id,
        name: debt.name.clone(),
        kind: match debt.kind {
            DebtKind::Owed => ApiDebtKind::Owed,
            DebtKind::Lent => ApiDebtKind::Lent,
        },
        initial_minor: debt.initial.minor(),
        remaining_minor: debt.remaining.minor(),
        payments: debt
            .payments
            .iter()
            .map(|payment| DebtPaymentView {
                occurred_at: payment.occurred_at,
                amount_minor: payment.amount.minor(),
                note: payment.note.clone(),
            })
            .collect(),
        status: map_status(debt.status),
        created_at: debt.created_at,
        updated_at: debt.updated_at,
    }
}

fn map_status(status: DebtStatus) -> ApiDebtStatus {
    match status {
        DebtStatus::Active => ApiDebtStatus::Active,
        DebtStatus::Paid => ApiDebtStatus::Paid,
        DebtStatus::Defaulted => ApiDebtStatus::Defaulted,
        DebtStatus::Archived => ApiDebtStatus::Archived,
    }
}

fn map_status_to_engine(status: ApiDebtStatus) -> DebtStatus {
    match status {
        ApiDebtStatus::Active => DebtStatus::Active,
        ApiDebtStatus::Paid => DebtStatus::Paid,
        ApiDebtStatus::Defaulted => DebtStatus::Defaulted,
        ApiDebtStatus::Archived => DebtStatus::Archived,
    }
}

fn parse_status(token: &str) -> Option<DebtStatus> {
    match token {
        "active" => Some(DebtStatus::Active),
        "paid" => Some(DebtStatus::Paid),
        "defaulted" => Some(DebtStatus::Defaulted),
        "archived" => Some(DebtStatus::Archived),
        _ => None,
    }
}

pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<DebtListQuery>,
) -> Result<Json<DebtListResponse>, ServerError> {
    let request = query::page_request(params.page, params.limit)?;
    let statuses = query::status_list(params.status.as_deref(), parse_status)?;

    let engine = state.engine.read().await;
    let page = engine.list_debts(statuses.as_deref(), request);

    Ok(Json(DebtListResponse {
        debts: page.items.iter().map(map_view).collect(),
        pagination: query::pagination(&page, request),
    }))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DebtNew>,
) -> Result<(StatusCode, Json<DebtView>), ServerError> {
    let kind = match payload.kind {
        ApiDebtKind::Owed => DebtKind::Owed,
        ApiDebtKind::Lent => DebtKind::Lent,
    };

    let mut engine = state.engine.write().await;
    let debt = engine.new_debt(&payload.name, kind, Money::new(payload.initial_minor), Utc::now())?;

    Ok((StatusCode::CREATED, Json(map_view(&debt))))
}

pub async fn payment(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DebtPaymentNew>,
) -> Result<Json<DebtView>, ServerError> {
    let occurred_at = payload
        .occurred_at
        .map_or_else(Utc::now, |dt| dt.with_timezone(&Utc));

    let mut engine = state.engine.write().await;
    let debt = engine.record_debt_payment(
        id,
        Money::new(payload.amount_minor),
        payload.note.as_deref(),
        occurred_at,
        Utc::now(),
    )?;

    Ok(Json(map_view(&debt)))
}

pub async fn set_status(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DebtStatusUpdate>,
) -> Result<Json<DebtView>, ServerError> {
    let mut engine = state.engine.write().await;
    let debt = engine.set_debt_status(id, map_status_to_engine(payload.status), Utc::now())?;

    Ok(Json(map_view(&debt)))
}
