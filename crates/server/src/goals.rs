//! Goals API endpoints.

use api_types::goal::{
    GoalFundResponse, GoalListQuery, GoalListResponse, GoalNew, GoalStatus as ApiGoalStatus,
    GoalTransferNew, GoalTransferView, GoalView,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use engine::{Engine, Goal, GoalStatus, Money};
use uuid::Uuid;

use crate::{ServerError, accounts, query, server::ServerState};

pub(crate) fn map_view(engine: &Engine, goal: &Goal) -> GoalView {
    GoalView {
        id: goal.id,
        name: goal.name.clone(),
        target_minor: goal.target.minor(),
        progress_minor: goal.progress.minor(),
        transfers: goal
            .transfers
            .iter()
            .map(|transfer| GoalTransferView {
                amount_minor: transfer.amount.minor(),
                occurred_at: transfer.occurred_at,
                from_account_id: transfer.from_account_id,
                from_account_name: engine.account_display_name(
                    transfer.from_account_id,
                    transfer.from_account_label.as_deref(),
                ),
            })
            .collect(),
        status: match goal.status {
            GoalStatus::Active => ApiGoalStatus::Active,
            GoalStatus::Completed => ApiGoalStatus::Completed,
            GoalStatus::Archived => ApiGoalStatus::Archived,
        },
        created_at: goal.created_at,
        updated_at: goal.updated_at,
    }
}

fn parse_status(token: &str) -> Option<GoalStatus> {
    match token {
        "active" => Some(GoalStatus::Active),
        "completed" => Some(GoalStatus::Completed),
        "archived" => Some(GoalStatus::Archived),
        _ => None,
    }
}

pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<GoalListQuery>,
) -> Result<Json<GoalListResponse>, ServerError> {
    let request = query::page_request(params.page, params.limit)?;
    let statuses = query::status_list(params.status.as_deref(), parse_status)?;

    let engine = state.engine.read().await;
    let page = engine.list_goals(statuses.as_deref(), request);

    Ok(Json(GoalListResponse {
        goals: page.items.iter().map(|goal| map_view(&engine, goal)).collect(),
        pagination: query::pagination(&page, request),
    }))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<GoalNew>,
) -> Result<(StatusCode, Json<GoalView>), ServerError> {
    let mut engine = state.engine.write().await;
    let goal = engine.new_goal(&payload.name, Money::new(payload.target_minor), Utc::now())?;

    Ok((StatusCode::CREATED, Json(map_view(&engine, &goal))))
}

pub async fn fund(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<GoalTransferNew>,
) -> Result<Json<GoalFundResponse>, ServerError> {
    let occurred_at = payload
        .occurred_at
        .map_or_else(Utc::now, |dt| dt.with_timezone(&Utc));

    let mut engine = state.engine.write().await;
    let (goal, account) = engine.record_goal_transfer(
        id,
        payload.from_account_id,
        Money::new(payload.amount_minor),
        occurred_at,
        Utc::now(),
    )?;

    Ok(Json(GoalFundResponse {
        goal: map_view(&engine, &goal),
        account: accounts::map_view(&account),
    }))
}
