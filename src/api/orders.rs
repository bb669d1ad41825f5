//! Checkout and back-office order handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::{ListParams, PaginatedResponse};
use crate::checkout::{CheckoutForm, Confirmation};
use crate::domain::aggregates::order::{Order, OrderStatus};
use crate::domain::events::{self, OrderEvent};
use crate::notify::OrderNotifier;
use crate::{AppError, AppState};

pub async fn list(
    State(s): State<AppState>,
    Query(p): Query<ListParams>,
) -> Result<Json<PaginatedResponse<Order>>, AppError> {
    let page = p.page.unwrap_or(1).max(1);
    let per_page = p.per_page.unwrap_or(20).min(100);
    let orders =
        sqlx::query_as::<_, Order>("SELECT * FROM orders ORDER BY created_at DESC LIMIT $1 OFFSET $2")
            .bind(per_page as i64)
            .bind(((page - 1) * per_page) as i64)
            .fetch_all(&s.db)
            .await?;
    let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders").fetch_one(&s.db).await?;
    Ok(Json(PaginatedResponse { data: orders, total: total.0, page }))
}

pub async fn get(State(s): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Order>, AppError> {
    sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1")
        .bind(id)
        .fetch_optional(&s.db)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))
}

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub session_id: String,
    pub user_id: Option<Uuid>,
    #[serde(flatten)]
    pub form: CheckoutForm,
}

pub async fn checkout(
    State(s): State<AppState>,
    Json(r): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<Confirmation>), AppError> {
    let (order, confirmation) = s.checkout.submit(&r.session_id, r.form, r.user_id).await?;
    events::publish(&s.nats, &OrderEvent::Placed { order }).await;
    Ok((StatusCode::CREATED, Json(confirmation)))
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

pub async fn update_status(
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
    Json(r): Json<StatusUpdateRequest>,
) -> Result<Json<Order>, AppError> {
    let status = OrderStatus::parse(&r.status)
        .ok_or_else(|| AppError::Validation(format!("unknown status: {}", r.status)))?;

    let sql = status_update_sql(status);
    let order = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&s.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;

    // Same race as checkout: the customer email must not hold the response.
    let notifier = s.notifier.clone();
    let payload = order.clone();
    let new_status = status.to_string();
    let task = tokio::spawn(async move { notifier.status_changed(payload, new_status).await });
    match tokio::time::timeout(s.config.notify_timeout, task).await {
        Ok(Ok(outcome)) if !outcome.customer_sent => {
            tracing::warn!(order_id = %id, "status email not sent")
        }
        Ok(Ok(_)) => {}
        Ok(Err(e)) => tracing::warn!(order_id = %id, "status notification task failed: {e}"),
        Err(_) => tracing::warn!(order_id = %id, "status notification still pending, proceeding"),
    }

    events::publish(
        &s.nats,
        &OrderEvent::StatusChanged { order: order.clone(), new_status: status.to_string() },
    )
    .await;
    Ok(Json(order))
}

/// Update statement for a status change. Stamps the status's own column,
/// and only the first time that status is reached (COALESCE keeps an
/// earlier stamp).
fn status_update_sql(status: OrderStatus) -> String {
    match status.stamp_column() {
        Some(col) => format!(
            "UPDATE orders SET status = $2, {col} = COALESCE({col}, NOW()) WHERE id = $1 RETURNING *"
        ),
        None => "UPDATE orders SET status = $2 WHERE id = $1 RETURNING *".to_string(),
    }
}

#[derive(Debug, Deserialize)]
pub struct ArrivingDateRequest {
    pub arriving_date: Option<NaiveDate>,
}

pub async fn set_arriving_date(
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
    Json(r): Json<ArrivingDateRequest>,
) -> Result<Json<Order>, AppError> {
    sqlx::query_as::<_, Order>("UPDATE orders SET arriving_date = $2 WHERE id = $1 RETURNING *")
        .bind(id)
        .bind(r.arriving_date)
        .fetch_optional(&s.db)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))
}
