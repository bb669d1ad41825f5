//! Session cart lines.
//!
//! A line's `unit_price` is captured when the item enters the cart; later
//! product edits never touch it. Orders snapshot that captured price.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::aggregates::order::OrderItem;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CartLine {
    pub id: Uuid,
    pub session_id: String,
    pub product_id: Uuid,
    pub name: String,
    pub size: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub delivery_days: i32,
    pub created_at: DateTime<Utc>,
}

impl CartLine {
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }

    /// Frozen order item: what this line costs now is what the order will
    /// say forever.
    pub fn snapshot(&self) -> OrderItem {
        OrderItem {
            product_id: self.product_id,
            name: self.name.clone(),
            quantity: self.quantity,
            size: self.size.clone(),
            price: self.unit_price,
        }
    }
}

pub fn subtotal(lines: &[CartLine]) -> Decimal {
    lines.iter().map(CartLine::line_total).sum()
}

pub fn item_count(lines: &[CartLine]) -> i32 {
    lines.iter().map(|l| l.quantity).sum()
}
