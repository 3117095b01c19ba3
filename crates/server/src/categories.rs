//! Categories API endpoints.

use api_types::category::{
    CategoryKind as ApiCategoryKind, CategoryListQuery, CategoryListResponse, CategoryNew,
    CategoryStatus as ApiCategoryStatus, CategoryView,
};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use chrono::Utc;
use engine::{Category, CategoryKind, CategoryStatus};

use crate::{ServerError, query, server::ServerState};

pub(crate) fn map_view(category: &Category) -> CategoryView {
    CategoryView {
        id: category.id,
        name: category.name.clone(),
        kind: match category.kind {
            CategoryKind::Income => ApiCategoryKind::Income,
            CategoryKind::Expense => ApiCategoryKind::Expense,
        },
        status: match category.status {
            CategoryStatus::Active => ApiCategoryStatus::Active,
            CategoryStatus::Archived => ApiCategoryStatus::Archived,
        },
        created_at: category.created_at,
        updated_at: category.updated_at,
    }
}

fn map_kind_to_engine(kind: ApiCategoryKind) -> CategoryKind {
    match kind {
        ApiCategoryKind::Income => CategoryKind::Income,
        ApiCategoryKind::Expense => CategoryKind::Expense,
    }
}

fn parse_status(token: &str) -> Option<CategoryStatus> {
    match token {
        "active" => Some(CategoryStatus::Active),
        "archived" => Some(CategoryStatus::Archived),
        _ => None,
    }
}

pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<CategoryListQuery>,
) -> Result<Json<CategoryListResponse>, ServerError> {
    let request = query::page_request(params.page, params.limit)?;
    let statuses = query::status_list(params.status.as_deref(), parse_status)?;

    let engine = state.engine.read().await;
    let page = engine.list_categories(
        statuses.as_deref(),
        params.kind.map(map_kind_to_engine),
        request,
    );

    Ok(Json(CategoryListResponse {
        categories: page.items.iter().map(map_view).collect(),
        pagination: query::pagination(&page, request),
    }))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryNew>,
) -> Result<(StatusCode, Json<CategoryView>), ServerError> {
    let mut engine = state.engine.write().await;
    let category = engine.new_category(
        &payload.name,
        map_kind_to_engine(payload.kind),
        Utc::now(),
    )?;

    Ok((StatusCode::CREATED, Json(map_view(&category))))
}
