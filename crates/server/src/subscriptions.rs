//! Subscriptions API endpoints.

use api_types::subscription::{
    Frequency as ApiFrequency, PaymentOutcome as ApiPaymentOutcome, SubscriptionListQuery,
    SubscriptionListResponse, SubscriptionNew, SubscriptionPaymentNew, SubscriptionPaymentResponse,
    SubscriptionPaymentView, SubscriptionStatus as ApiSubscriptionStatus, SubscriptionStatusUpdate,
    SubscriptionView,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use engine::{
    Frequency, Money, NewSubscription, PaymentOutcome, Subscription, SubscriptionPayment,
    SubscriptionStatus,
};
use uuid::Uuid;

use crate::{ServerError, accounts, query, server::ServerState, transactions};

pub(crate) fn map_view(subscription: &Subscription) -> SubscriptionView {
    SubscriptionView {
        id: subscription.id,
        name: subscription.name.clone(),
        amount_minor: subscription.amount.minor(),
        account_id: subscription.account_id,
        frequency: map_frequency(subscription.frequency),
        custom_frequency_days: subscription.custom_frequency_days,
        next_payment_date: subscription.next_payment_date,
        payments: subscription.payments.iter().map(map_payment).collect(),
        status: map_status(subscription.status),
        created_at: subscription.created_at,
        updated_at: subscription.updated_at,
    }
}

fn map_payment(payment: &SubscriptionPayment) -> SubscriptionPaymentView {
    SubscriptionPaymentView {
        occurred_at: payment.occurred_at,
        amount_minor: payment.amount.minor(),
        outcome: match payment.outcome {
            PaymentOutcome::Success => ApiPaymentOutcome::Success,
            PaymentOutcome::Pending => ApiPaymentOutcome::Pending,
            PaymentOutcome::Failed => ApiPaymentOutcome::Failed,
        },
        transaction_id: payment.transaction_id,
    }
}

fn map_frequency(frequency: Frequency) -> ApiFrequency {
    match frequency {
        Frequency::Weekly => ApiFrequency::Weekly,
        Frequency::Biweekly => ApiFrequency::Biweekly,
        Frequency::Monthly => ApiFrequency::Monthly,
        Frequency::Quarterly => ApiFrequency::Quarterly,
        Frequency::Yearly => ApiFrequency::Yearly,
        Frequency::Custom => ApiFrequency::Custom,
    }
}

fn map_frequency_to_engine(frequency: ApiFrequency) -> Frequency {
    match frequency {
        ApiFrequency::Weekly => Frequency::Weekly,
        ApiFrequency::Biweekly => Frequency::Biweekly,
        ApiFrequency::Monthly => Frequency::Monthly,
        ApiFrequency::Quarterly => Frequency::Quarterly,
        ApiFrequency::Yearly => Frequency::Yearly,
        ApiFrequency::Custom => Frequency::Custom,
    }
}

fn map_status(status: SubscriptionStatus) -> ApiSubscriptionStatus {
    match status {
        SubscriptionStatus::Active => ApiSubscriptionStatus::Active,
        SubscriptionStatus::Paused => ApiSubscriptionStatus::Paused,
        SubscriptionStatus::Cancelled => ApiSubscriptionStatus::Cancelled,
        SubscriptionStatus::Archived => ApiSubscriptionStatus::Archived,
    }
}

fn map_status_to_engine(status: ApiSubscriptionStatus) -> SubscriptionStatus {
    match status {
        ApiSubscriptionStatus::Active => SubscriptionStatus::Active,
        ApiSubscriptionStatus::Paused => SubscriptionStatus::Paused,
        ApiSubscriptionStatus::Cancelled => SubscriptionStatus::Cancelled,
        ApiSubscriptionStatus::Archived => SubscriptionStatus::Archived,
    }
}

fn parse_status(token: &str) -> Option<SubscriptionStatus> {
    match token {
        "active" => Some(SubscriptionStatus::Active),
        "paused" => Some(SubscriptionStatus::Paused),
        "cancelled" => Some(SubscriptionStatus::Cancelled),
        "archived" => Some(SubscriptionStatus::Archived),
        _ => None,
    }
}

pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<SubscriptionListQuery>,
) -> Result<Json<SubscriptionListResponse>, ServerError> {
    let request = query::page_request(params.page, params.limit)?;
    let statuses = query::status_list(params.status.as_deref(), parse_status)?;

    let engine = state.engine.read().await;
    let page = engine.list_subscriptions(statuses.as_deref(), request);

    Ok(Json(SubscriptionListResponse {
        subscriptions: page.items.iter().map(map_view).collect(),
        pagination: query::pagination(&page, request),
    }))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<SubscriptionNew>,
) -> Result<(StatusCode, Json<SubscriptionView>), ServerError> {
    let mut engine = state.engine.write().await;
    let subscription = engine.new_subscription(
        NewSubscription {
            name: payload.name,
            amount: Money::new(payload.amount_minor),
            account_id: payload.account_id,
            frequency: map_frequency_to_engine(payload.frequency),
            custom_frequency_days: payload.custom_frequency_days,
            next_payment_date: payload.next_payment_date,
        },
        Utc::now(),
    )?;

    Ok((StatusCode::CREATED, Json(map_view(&subscription))))
}

pub async fn payment(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SubscriptionPaymentNew>,
) -> Result<Json<SubscriptionPaymentResponse>, ServerError> {
    let occurred_at = payload
        .occurred_at
        .map_or_else(Utc::now, |dt| dt.with_timezone(&Utc));

    let mut engine = state.engine.write().await;
    let outcome = engine.record_subscription_payment(
        id,
        payload.amount_minor.map(Money::new),
        payload.note.as_deref(),
        occurred_at,
        Utc::now(),
    )?;

    Ok(Json(SubscriptionPaymentResponse {
        subscription: map_view(&outcome.subscription),
        payment: map_payment(&outcome.payment),
        transaction: transactions::map_view(&engine, &outcome.transaction),
        account: accounts::map_view(&outcome.account),
    }))
}

pub async fn set_status(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SubscriptionStatusUpdate>,
) -> Result<Json<SubscriptionView>, ServerError> {
    let mut engine = state.engine.write().await;
    let subscription =
        engine.set_subscription_status(id, map_status_to_engine(payload.status), Utc::now())?;

    Ok(Json(map_view(&subscription)))
}
