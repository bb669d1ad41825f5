//! Catalog products.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

/// Size label used when a product has no size chart (jewelry, makeup).
pub const ONE_SIZE: &str = "One Size";

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub sale_price: Option<Decimal>,
    pub on_sale: bool,
    pub currency: String,
    pub category: String,
    pub collection: Option<String>,
    pub details: Json<Vec<String>>,
    pub images: Json<Vec<String>>,
    pub sizes: Json<Vec<Size>>,
    pub has_sizes: bool,
    pub is_new: bool,
    pub is_bestseller: bool,
    /// Advertised delivery window. Informational only.
    pub delivery_days: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub label: String,
    pub available: bool,
}

impl Product {
    /// Price a buyer pays right now. The sale price only counts while the
    /// sale flag is on.
    pub fn effective_price(&self) -> Decimal {
        match (self.on_sale, self.sale_price) {
            (true, Some(p)) => p,
            _ => self.price,
        }
    }

    pub fn offers_size(&self, size: &str) -> bool {
        if !self.has_sizes {
            return size == ONE_SIZE;
        }
        self.sizes.0.iter().any(|s| s.available && s.label == size)
    }
}
