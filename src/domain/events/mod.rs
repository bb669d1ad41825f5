//! Order lifecycle events, published best-effort to NATS when configured.

use serde::Serialize;

use crate::domain::aggregates::order::Order;

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum OrderEvent {
    Placed { order: Order },
    StatusChanged { order: Order, new_status: String },
}

impl OrderEvent {
    pub fn subject(&self) -> &'static str {
        match self {
            OrderEvent::Placed { .. } => "orders.placed",
            OrderEvent::StatusChanged { .. } => "orders.status_changed",
        }
    }
}

/// Publish to the bus if one is connected. Failures are logged, never
/// propagated; the bus is an observer, not a dependency.
pub async fn publish(nats: &Option<async_nats::Client>, event: &OrderEvent) {
    let Some(client) = nats else { return };
    match serde_json::to_vec(event) {
        Ok(payload) => {
            if let Err(e) = client.publish(event.subject(), payload.into()).await {
                tracing::warn!("failed to publish {}: {e}", event.subject());
            }
        }
        Err(e) => tracing::warn!("failed to encode {}: {e}", event.subject()),
    }
}
