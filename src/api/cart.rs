//! Session cart handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::aggregates::cart::{self, CartLine};
use crate::domain::aggregates::product::{Product, ONE_SIZE};
use crate::store::pg::PgCartStore;
use crate::store::{CartStore, NewCartLine};
use crate::{AppError, AppState};

#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<CartLine>,
    pub subtotal: Decimal,
    pub count: i32,
}

pub async fn get(
    State(s): State<AppState>,
    Path(session): Path<String>,
) -> Result<Json<CartView>, AppError> {
    let lines = PgCartStore::new(s.db.clone()).lines(&session).await?;
    Ok(Json(CartView {
        subtotal: cart::subtotal(&lines),
        count: cart::item_count(&lines),
        items: lines,
    }))
}

#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: Uuid,
    pub size: Option<String>,
    pub quantity: Option<i32>,
}

pub async fn add(
    State(s): State<AppState>,
    Path(session): Path<String>,
    Json(r): Json<AddToCartRequest>,
) -> Result<(StatusCode, Json<CartLine>), AppError> {
    let product =
        sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1 AND status = 'active'")
            .bind(r.product_id)
            .fetch_optional(&s.db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("product {}", r.product_id)))?;

    let size = if product.has_sizes {
        let size = r.size.ok_or_else(|| AppError::Validation("size is required".to_string()))?;
        if !product.offers_size(&size) {
            return Err(AppError::Validation(format!("size {size} is not available")));
        }
        size
    } else {
        ONE_SIZE.to_string()
    };

    // The effective price is captured here; the line keeps it even if the
    // product changes later.
    let line = PgCartStore::new(s.db.clone())
        .add(
            &session,
            NewCartLine {
                product_id: product.id,
                name: product.name.clone(),
                size,
                quantity: r.quantity.unwrap_or(1).max(1),
                unit_price: product.effective_price(),
                delivery_days: product.delivery_days,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(line)))
}

#[derive(Debug, Deserialize)]
pub struct QuantityRequest {
    pub product_id: Uuid,
    pub size: String,
    pub quantity: i32,
}

pub async fn set_quantity(
    State(s): State<AppState>,
    Path(session): Path<String>,
    Json(r): Json<QuantityRequest>,
) -> Result<StatusCode, AppError> {
    PgCartStore::new(s.db.clone())
        .set_quantity(&session, r.product_id, &r.size, r.quantity)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct LineRef {
    pub product_id: Uuid,
    pub size: String,
}

pub async fn remove_item(
    State(s): State<AppState>,
    Path(session): Path<String>,
    Query(r): Query<LineRef>,
) -> Result<StatusCode, AppError> {
    PgCartStore::new(s.db.clone()).remove(&session, r.product_id, &r.size).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn clear(
    State(s): State<AppState>,
    Path(session): Path<String>,
) -> Result<StatusCode, AppError> {
    PgCartStore::new(s.db.clone()).clear(&session).await?;
    Ok(StatusCode::NO_CONTENT)
}
