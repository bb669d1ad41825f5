//! Storage seams.
//!
//! Postgres backs production; the in-memory variants mirror its semantics
//! for tests and local demos.

pub mod memory;
pub mod pg;

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::aggregates::cart::CartLine;
use crate::domain::aggregates::order::{NewOrder, Order};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Backend(String),
}

/// Outcome of an order insert. Only a duplicate order number is worth
/// retrying; everything else aborts the attempt.
#[derive(Debug, Error)]
pub enum InsertError {
    #[error("order number already taken")]
    DuplicateOrderNumber,
    #[error("{0}")]
    Other(String),
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn insert(&self, order: NewOrder) -> Result<Order, InsertError>;
}

/// Cart line before the store assigns id and timestamp.
#[derive(Debug, Clone)]
pub struct NewCartLine {
    pub product_id: Uuid,
    pub name: String,
    pub size: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub delivery_days: i32,
}

#[async_trait]
pub trait CartStore: Send + Sync {
    async fn lines(&self, session_id: &str) -> Result<Vec<CartLine>, StoreError>;

    /// Merges with an existing (product, size) line; a merged line keeps the
    /// unit price captured when it first entered the cart.
    async fn add(&self, session_id: &str, line: NewCartLine) -> Result<CartLine, StoreError>;

    /// Quantities below one remove the line.
    async fn set_quantity(
        &self,
        session_id: &str,
        product_id: Uuid,
        size: &str,
        quantity: i32,
    ) -> Result<(), StoreError>;

    async fn remove(&self, session_id: &str, product_id: Uuid, size: &str) -> Result<(), StoreError>;

    async fn clear(&self, session_id: &str) -> Result<(), StoreError>;
}

#[async_trait]
pub trait RecipientSource: Send + Sync {
    /// Emails of profiles flagged as admins.
    async fn admin_emails(&self) -> Result<Vec<String>, StoreError>;
}
