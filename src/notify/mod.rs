//! Admin and customer email notifications.
//!
//! Exposed over HTTP for external callers (including the order-insert
//! webhook) and invoked in-process by checkout. Delivery is best-effort;
//! the outcome tells the caller exactly which sends happened, and a partial
//! failure is theirs to interpret.

pub mod email;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::aggregates::order::Order;
use crate::notify::email::Mailer;
use crate::store::RecipientSource;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotifyRequest {
    NewOrder {
        #[serde(rename = "orderData")]
        order: Order,
    },
    StatusUpdate {
        #[serde(rename = "orderData")]
        order: Order,
        #[serde(rename = "newStatus")]
        new_status: String,
    },
}

/// Which sends actually happened. `skipped` lists addresses that failed the
/// shape check and were never attempted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DispatchOutcome {
    pub admin_sent: bool,
    pub customer_sent: bool,
    pub skipped: Vec<String>,
}

#[async_trait]
pub trait OrderNotifier: Send + Sync {
    async fn order_placed(&self, order: Order) -> DispatchOutcome;
    async fn status_changed(&self, order: Order, new_status: String) -> DispatchOutcome;
}

pub struct Notifier {
    mailer: Arc<dyn Mailer>,
    recipients: Arc<dyn RecipientSource>,
    fallback_admin: String,
}

impl Notifier {
    pub fn new(
        mailer: Arc<dyn Mailer>,
        recipients: Arc<dyn RecipientSource>,
        fallback_admin: String,
    ) -> Self {
        Self { mailer, recipients, fallback_admin }
    }

    pub async fn dispatch(&self, request: NotifyRequest) -> DispatchOutcome {
        match request {
            NotifyRequest::NewOrder { order } => self.order_placed(order).await,
            NotifyRequest::StatusUpdate { order, new_status } => {
                self.status_changed(order, new_status).await
            }
        }
    }

    /// Admin profile addresses, or the configured fallback when none exist
    /// (or the lookup fails). Addresses that fail the shape check are
    /// reported in `skipped`, never attempted.
    async fn admin_recipients(&self, skipped: &mut Vec<String>) -> Vec<String> {
        let mut addresses = match self.recipients.admin_emails().await {
            Ok(list) if !list.is_empty() => list,
            Ok(_) => vec![self.fallback_admin.clone()],
            Err(e) => {
                tracing::warn!("admin recipient lookup failed, using fallback: {e}");
                vec![self.fallback_admin.clone()]
            }
        };
        addresses.retain(|a| {
            if validator::validate_email(a) {
                true
            } else {
                skipped.push(a.clone());
                false
            }
        });
        addresses
    }
}

#[async_trait]
impl OrderNotifier for Notifier {
    async fn order_placed(&self, order: Order) -> DispatchOutcome {
        let mut outcome = DispatchOutcome::default();

        let admins = self.admin_recipients(&mut outcome.skipped).await;
        if !admins.is_empty() {
            let message = email::new_order_email(&admins, &order);
            outcome.admin_sent = match self.mailer.send(&message).await {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(order_number = %order.order_number, "admin email failed: {e}");
                    false
                }
            };
        }

        // The customer confirmation is independent of the admin outcome.
        if validator::validate_email(&order.customer_email) {
            let message = email::order_confirmation_email(&order);
            outcome.customer_sent = match self.mailer.send(&message).await {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(order_number = %order.order_number, "customer email failed: {e}");
                    false
                }
            };
        } else {
            outcome.skipped.push(order.customer_email.clone());
        }

        outcome
    }

    async fn status_changed(&self, order: Order, new_status: String) -> DispatchOutcome {
        let mut outcome = DispatchOutcome::default();

        if !validator::validate_email(&order.customer_email) {
            outcome.skipped.push(order.customer_email.clone());
            return outcome;
        }

        let message = email::status_update_email(&order, &new_status);
        outcome.customer_sent = match self.mailer.send(&message).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(order_number = %order.order_number, "status email failed: {e}");
                false
            }
        };
        outcome
    }
}
