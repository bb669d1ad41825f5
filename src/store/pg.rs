//! Postgres-backed stores.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::aggregates::cart::CartLine;
use crate::domain::aggregates::order::{NewOrder, Order};
use crate::store::{CartStore, InsertError, NewCartLine, OrderStore, RecipientSource, StoreError};

pub struct PgOrderStore {
    pool: PgPool,
}

impl PgOrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderStore for PgOrderStore {
    async fn insert(&self, order: NewOrder) -> Result<Order, InsertError> {
        sqlx::query_as::<_, Order>(
            "INSERT INTO orders (id, order_number, user_id, customer_name, customer_email, \
             customer_phone, shipping_address, total_amount, currency, status, items, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'pending', $10, NOW()) RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(&order.order_number)
        .bind(order.user_id)
        .bind(&order.customer_name)
        .bind(&order.customer_email)
        .bind(&order.customer_phone)
        .bind(&order.shipping_address)
        .bind(order.total_amount)
        .bind(&order.currency)
        .bind(Json(&order.items))
        .fetch_one(&self.pool)
        .await
        .map_err(into_insert_error)
    }
}

fn into_insert_error(e: sqlx::Error) -> InsertError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() && db.constraint() == Some("orders_order_number_key") {
            return InsertError::DuplicateOrderNumber;
        }
    }
    InsertError::Other(e.to_string())
}

pub struct PgCartStore {
    pool: PgPool,
}

impl PgCartStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CartStore for PgCartStore {
    async fn lines(&self, session_id: &str) -> Result<Vec<CartLine>, StoreError> {
        sqlx::query_as::<_, CartLine>(
            "SELECT * FROM cart_items WHERE session_id = $1 ORDER BY created_at",
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)
    }

    async fn add(&self, session_id: &str, line: NewCartLine) -> Result<CartLine, StoreError> {
        // The DO UPDATE bumps only the quantity: an existing line keeps the
        // unit price captured when it first entered the cart.
        sqlx::query_as::<_, CartLine>(
            "INSERT INTO cart_items (id, session_id, product_id, name, size, quantity, unit_price, delivery_days, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW()) \
             ON CONFLICT (session_id, product_id, size) \
             DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity \
             RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(session_id)
        .bind(line.product_id)
        .bind(&line.name)
        .bind(&line.size)
        .bind(line.quantity)
        .bind(line.unit_price)
        .bind(line.delivery_days)
        .fetch_one(&self.pool)
        .await
        .map_err(backend)
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
        sqlx::query(
            "UPDATE cart_items SET quantity = $4 \
             WHERE session_id = $1 AND product_id = $2 AND size = $3",
        )
        .bind(session_id)
        .bind(product_id)
        .bind(size)
        .bind(quantity)
        .execute(&self.pool)
        .await
        .map_err(backend)?;
        Ok(())
    }

    async fn remove(&self, session_id: &str, product_id: Uuid, size: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM cart_items WHERE session_id = $1 AND product_id = $2 AND size = $3")
            .bind(session_id)
            .bind(product_id)
            .bind(size)
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        Ok(())
    }

    async fn clear(&self, session_id: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM cart_items WHERE session_id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        Ok(())
    }
}

pub struct PgRecipientSource {
    pool: PgPool,
}

impl PgRecipientSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecipientSource for PgRecipientSource {
    async fn admin_emails(&self) -> Result<Vec<String>, StoreError> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT email FROM profiles WHERE is_admin = TRUE AND email <> ''")
                .fetch_all(&self.pool)
                .await
                .map_err(backend)?;
        Ok(rows.into_iter().map(|(email,)| email).collect())
    }
}

fn backend(e: sqlx::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}
