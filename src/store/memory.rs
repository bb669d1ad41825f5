//! In-memory stores mirroring the Postgres semantics.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use uuid::Uuid;

use crate::domain::aggregates::cart::CartLine;
use crate::domain::aggregates::order::{NewOrder, Order};
use crate::store::{CartStore, InsertError, NewCartLine, OrderStore, RecipientSource, StoreError};

/// Enforces the same uniqueness constraint on `order_number` the database
/// does.
#[derive(Default)]
pub struct MemOrderStore {
    orders: Mutex<Vec<Order>>,
}

impl MemOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn orders(&self) -> Vec<Order> {
        self.orders.lock().unwrap().clone()
    }
}

#[async_trait]
impl OrderStore for MemOrderStore {
    async fn insert(&self, order: NewOrder) -> Result<Order, InsertError> {
        let mut orders = self.orders.lock().unwrap();
        if orders.iter().any(|o| o.order_number == order.order_number) {
            return Err(InsertError::DuplicateOrderNumber);
        }
        let persisted = Order {
            id: Uuid::now_v7(),
            order_number: order.order_number,
            user_id: order.user_id,
            customer_name: order.customer_name,
            customer_email: order.customer_email,
            customer_phone: order.customer_phone,
            shipping_address: order.shipping_address,
            total_amount: order.total_amount,
            currency: order.currency,
            status: "pending".to_string(),
            items: Json(order.items),
            arriving_date: None,
            created_at: Utc::now(),
            accepted_at: None,
            processing_at: None,
            shipped_at: None,
            delivered_at: None,
        };
        orders.push(persisted.clone());
        Ok(persisted)
    }
}

#[derive(Default)]
pub struct MemCartStore {
    carts: Mutex<HashMap<String, Vec<CartLine>>>,
}

impl MemCartStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a session with pre-built lines.
    pub fn with_lines(session_id: &str, lines: Vec<CartLine>) -> Self {
        let store = Self::default();
        store.carts.lock().unwrap().insert(session_id.to_string(), lines);
        store
    }
}

#[async_trait]
impl CartStore for MemCartStore {
    async fn lines(&self, session_id: &str) -> Result<Vec<CartLine>, StoreError> {
        Ok(self.carts.lock().unwrap().get(session_id).cloned().unwrap_or_default())
    }

    async fn add(&self, session_id: &str, line: NewCartLine) -> Result<CartLine, StoreError> {
        let mut carts = self.carts.lock().unwrap();
        let lines = carts.entry(session_id.to_string()).or_default();
        if let Some(existing) = lines
            .iter_mut()
            .find(|l| l.product_id == line.product_id && l.size == line.size)
        {
            existing.quantity += line.quantity;
            return Ok(existing.clone());
        }
        let new_line = CartLine {
            id: Uuid::now_v7(),
            session_id: session_id.to_string(),
            product_id: line.product_id,
            name: line.name,
            size: line.size,
            quantity: line.quantity,
            unit_price: line.unit_price,
            delivery_days: line.delivery_days,
            created_at: Utc::now(),
        };
        lines.push(new_line.clone());
        Ok(new_line)
    }

    async fn set_quantity(
        &self,
        session_id: &str,
        product_id: Uuid,
        size: &str,
        quantity: i32,
    ) -> Result<(), StoreError> {
        if quantity < 1 {
            return self.remove(session_id, product_id, size).await;
        }
        let mut carts = self.carts.lock().unwrap();
        if let Some(lines) = carts.get_mut(session_id) {
            if let Some(line) = lines
                .iter_mut()
                .find(|l| l.product_id == product_id && l.size == size)
            {
                line.quantity = quantity;
            }
        }
        Ok(())
    }

    async fn remove(&self, session_id: &str, product_id: Uuid, size: &str) -> Result<(), StoreError> {
        let mut carts = self.carts.lock().unwrap();
        if let Some(lines) = carts.get_mut(session_id) {
            lines.retain(|l| !(l.product_id == product_id && l.size == size));
        }
        Ok(())
    }

    async fn clear(&self, session_id: &str) -> Result<(), StoreError> {
        self.carts.lock().unwrap().remove(session_id);
        Ok(())
    }
}

/// Fixed recipient list for tests and demos.
pub struct MemRecipientSource {
    emails: Vec<String>,
}

impl MemRecipientSource {
    pub fn new(emails: Vec<String>) -> Self {
        Self { emails }
    }
}

#[async_trait]
impl RecipientSource for MemRecipientSource {
    async fn admin_emails(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.emails.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn new_line(product_id: Uuid, size: &str, price: i64) -> NewCartLine {
        NewCartLine {
            product_id,
            name: "Linen Shirt".into(),
            size: size.into(),
            quantity: 1,
            unit_price: Decimal::from(price),
            delivery_days: 5,
        }
    }

    #[tokio::test]
    async fn add_merges_same_product_and_size_keeping_first_price() {
        let store = MemCartStore::new();
        let product = Uuid::new_v4();
        store.add("s1", new_line(product, "M", 100)).await.unwrap();
        // same line again after a price change elsewhere
        store.add("s1", new_line(product, "M", 150)).await.unwrap();

        let lines = store.lines("s1").await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 2);
        assert_eq!(lines[0].unit_price, Decimal::from(100));
    }

    #[tokio::test]
    async fn different_size_is_a_separate_line() {
        let store = MemCartStore::new();
        let product = Uuid::new_v4();
        store.add("s1", new_line(product, "M", 100)).await.unwrap();
        store.add("s1", new_line(product, "L", 100)).await.unwrap();
        assert_eq!(store.lines("s1").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn zero_quantity_removes_the_line() {
        let store = MemCartStore::new();
        let product = Uuid::new_v4();
        store.add("s1", new_line(product, "M", 100)).await.unwrap();
        store.set_quantity("s1", product, "M", 0).await.unwrap();
        assert!(store.lines("s1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_order_numbers_are_rejected() {
        let store = MemOrderStore::new();
        let order = NewOrder {
            order_number: "A1B2C3D".into(),
            user_id: None,
            customer_name: "Nino".into(),
            customer_email: "nino@example.com".into(),
            customer_phone: "+995 555 123456".into(),
            shipping_address: "Rustaveli 12, Tbilisi".into(),
            total_amount: Decimal::from(105),
            currency: "GEL".into(),
            items: vec![],
        };
        store.insert(order.clone()).await.unwrap();
        let err = store.insert(order).await.unwrap_err();
        assert!(matches!(err, InsertError::DuplicateOrderNumber));
    }
}
