use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};
use engine::Engine;
use tokio::{net::TcpListener, sync::RwLock};

use crate::{accounts, archive, categories, debts, goals, subscriptions, transactions};

/// Shared handler state. One `RwLock` around the whole engine: write
/// operations take the exclusive guard, which is what serializes the
/// two-account transfer and the reverse-then-apply transaction update.
#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<RwLock<Engine>>,
}

pub fn router(engine: Arc<RwLock<Engine>>) -> Router {
    let state = ServerState { engine };

    Router::new()
        .route("/accounts", get(accounts::list).post(accounts::create))
        .route("/accounts/transfer", post(accounts::transfer))
        .route("/accounts/{id}", get(accounts::get))
        .route(
            "/transactions",
            get(transactions::list).post(transactions::create),
        )
        .route("/transactions/{id}", patch(transactions::update))
        .route("/categories", get(categories::list).post(categories::create))
        .route("/goals", get(goals::list).post(goals::create))
        .route("/goals/{id}/transfer", post(goals::fund))
        .route("/debts", get(debts::list).post(debts::create))
        .route("/debts/{id}/payment", post(debts::payment))
        .route("/debts/{id}/status", put(debts::set_status))
        .route(
            "/subscriptions",
            get(subscriptions::list).post(subscriptions::create),
        )
        .route("/subscriptions/{id}/payment", post(subscriptions::payment))
        .route("/subscriptions/{id}/status", put(subscriptions::set_status))
        .route("/archive/stats", get(archive::stats))
        .route("/archive/{kind}", get(archive::list))
        .route("/archive/{kind}/{id}/restore", patch(archive::restore_archived))
        .route("/archive/{kind}/{id}", delete(archive::delete_archived))
        .route("/{kind}/{id}/archive", put(archive::archive_entity))
        .route("/{kind}/{id}/restore", put(archive::restore_entity))
        .with_state(state)
}

/// Serve the API on an already-bound listener until the task is dropped.
pub async fn run_with_listener(engine: Engine, listener: TcpListener) -> std::io::Result<()> {
    let app = router(Arc::new(RwLock::new(engine)));
    tracing::info!("server ready");
    axum::serve(listener, app).await
}
