//! Mail delivery over the Resend HTTP API, plus message composition.

use async_trait::async_trait;
use thiserror::Error;

use crate::config::MailConfig;
use crate::domain::aggregates::order::Order;
use crate::domain::value_objects::format_price;

#[derive(Debug, Clone)]
pub struct Email {
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail API key is not configured")]
    Unconfigured,

    #[error("request failed: {0}")]
    Transport(String),

    #[error("mail API returned {status}: {body}")]
    Rejected { status: u16, body: String },
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &Email) -> Result<(), MailError>;
}

pub struct ResendMailer {
    http: reqwest::Client,
    config: MailConfig,
}

impl ResendMailer {
    pub fn new(config: MailConfig) -> Self {
        Self { http: reqwest::Client::new(), config }
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, message: &Email) -> Result<(), MailError> {
        let key = self.config.api_key.as_deref().ok_or(MailError::Unconfigured)?;

        let response = self
            .http
            .post(&self.config.api_url)
            .bearer_auth(key)
            .json(&serde_json::json!({
                "from": self.config.from,
                "to": message.to,
                "subject": message.subject,
                "html": message.html,
            }))
            .send()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(MailError::Rejected {
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        Ok(())
    }
}

fn item_summary(order: &Order) -> String {
    if order.items.0.is_empty() {
        return "No items listed".to_string();
    }
    order
        .items
        .0
        .iter()
        .map(|i| format!("{} ({}) x{}", i.name, i.size, i.quantity))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn new_order_email(to: &[String], order: &Order) -> Email {
    Email {
        to: to.to_vec(),
        subject: format!("New Order #{}", order.order_number),
        html: format!(
            "<h1>New Order Received</h1>\
             <p><strong>Order:</strong> {}</p>\
             <p><strong>Customer:</strong> {}</p>\
             <p><strong>Email:</strong> {}</p>\
             <p><strong>Phone:</strong> {}</p>\
             <p><strong>Ship to:</strong> {}</p>\
             <p><strong>Total:</strong> {}</p>\
             <p><strong>Items:</strong> {}</p>",
            order.order_number,
            order.customer_name,
            order.customer_email,
            order.customer_phone,
            order.shipping_address,
            format_price(order.total_amount, &order.currency),
            item_summary(order),
        ),
    }
}

pub fn order_confirmation_email(order: &Order) -> Email {
    Email {
        to: vec![order.customer_email.clone()],
        subject: format!("Your Aurora Order #{}", order.order_number),
        html: format!(
            "<h1>Thank you for your order</h1>\
             <p>Hi {},</p>\
             <p>We have received your order <strong>#{}</strong>.</p>\
             <p><strong>Items:</strong> {}</p>\
             <p><strong>Total:</strong> {}</p>\
             <p>We will let you know as soon as it ships.</p>\
             <p>Thank you for shopping with Aurora!</p>",
            order.customer_name,
            order.order_number,
            item_summary(order),
            format_price(order.total_amount, &order.currency),
        ),
    }
}

pub fn status_update_email(order: &Order, new_status: &str) -> Email {
    Email {
        to: vec![order.customer_email.clone()],
        subject: format!("Order Update: #{}", order.order_number),
        html: format!(
            "<h1>Order Status Updated</h1>\
             <p>Hi {},</p>\
             <p>Your order <strong>#{}</strong> status has been changed to: <strong>{}</strong>.</p>\
             <p>Thank you for shopping with Aurora!</p>",
            order.customer_name, order.order_number, new_status,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use sqlx::types::Json;
    use uuid::Uuid;

    use crate::domain::aggregates::order::OrderItem;

    fn order() -> Order {
        Order {
            id: Uuid::new_v4(),
            order_number: "X9Y8Z7W".into(),
            user_id: None,
            customer_name: "Nino".into(),
            customer_email: "nino@example.com".into(),
            customer_phone: "+995 555 123456".into(),
            shipping_address: "Rustaveli 12, Tbilisi".into(),
            total_amount: Decimal::from(1250),
            currency: "GEL".into(),
            status: "pending".into(),
            items: Json(vec![OrderItem {
                product_id: Uuid::new_v4(),
                name: "Coat".into(),
                quantity: 2,
                size: "M".into(),
                price: Decimal::from(500),
            }]),
            arriving_date: None,
            created_at: Utc::now(),
            accepted_at: None,
            processing_at: None,
            shipped_at: None,
            delivered_at: None,
        }
    }

    #[test]
    fn admin_summary_lists_items_and_total() {
        let email = new_order_email(&["admin@aurora.ge".into()], &order());
        assert_eq!(email.subject, "New Order #X9Y8Z7W");
        assert!(email.html.contains("Coat (M) x2"));
        assert!(email.html.contains("₾1,250"));
    }

    #[test]
    fn empty_items_still_render() {
        let mut o = order();
        o.items = Json(vec![]);
        let email = new_order_email(&["admin@aurora.ge".into()], &o);
        assert!(email.html.contains("No items listed"));
    }

    #[test]
    fn status_email_names_the_new_status() {
        let email = status_update_email(&order(), "shipped");
        assert_eq!(email.to, vec!["nino@example.com".to_string()]);
        assert!(email.html.contains("<strong>shipped</strong>"));
    }
}
