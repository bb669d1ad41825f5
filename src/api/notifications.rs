//! Notification dispatcher endpoints.

use axum::extract::State;
use axum::Json;

use crate::domain::aggregates::order::Order;
use crate::notify::{DispatchOutcome, NotifyRequest};
use crate::AppState;

pub async fn send(
    State(s): State<AppState>,
    Json(request): Json<NotifyRequest>,
) -> Json<DispatchOutcome> {
    Json(s.notifier.dispatch(request).await)
}

/// Database-insert webhook: carries the new order row directly, same
/// contract as a `new_order` dispatch.
pub async fn order_webhook(
    State(s): State<AppState>,
    Json(order): Json<Order>,
) -> Json<DispatchOutcome> {
    Json(s.notifier.dispatch(NotifyRequest::NewOrder { order }).await)
}
