//! Catalog handlers. Mutations are back-office operations; listing powers
//! the storefront grids.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::types::Json as Jsonb;
use uuid::Uuid;

use crate::api::{ListParams, PaginatedResponse};
use crate::domain::aggregates::product::{Product, Size};
use crate::{AppError, AppState};

const ACTIVE_FILTER: &str = "status = 'active' \
    AND ($1::text IS NULL OR category = $1) \
    AND ($2::text IS NULL OR collection = $2) \
    AND ($3::text IS NULL OR name ILIKE '%' || $3 || '%')";

pub async fn list(
    State(s): State<AppState>,
    Query(p): Query<ListParams>,
) -> Result<Json<PaginatedResponse<Product>>, AppError> {
    let page = p.page.unwrap_or(1).max(1);
    let per_page = p.per_page.unwrap_or(20).min(100);
    let order_clause = match p.sort.as_deref() {
        Some("price-asc") => "price ASC",
        Some("price-desc") => "price DESC",
        Some("bestseller") => "is_bestseller DESC, created_at DESC",
        _ => "created_at DESC",
    };

    let sql = format!(
        "SELECT * FROM products WHERE {ACTIVE_FILTER} ORDER BY {order_clause} LIMIT $4 OFFSET $5"
    );
    let products = sqlx::query_as::<_, Product>(&sql)
        .bind(&p.category)
        .bind(&p.collection)
        .bind(&p.search)
        .bind(per_page as i64)
        .bind(((page - 1) * per_page) as i64)
        .fetch_all(&s.db)
        .await?;

    let count_sql = format!("SELECT COUNT(*) FROM products WHERE {ACTIVE_FILTER}");
    let total: (i64,) = sqlx::query_as(&count_sql)
        .bind(&p.category)
        .bind(&p.collection)
        .bind(&p.search)
        .fetch_one(&s.db)
        .await?;

    Ok(Json(PaginatedResponse { data: products, total: total.0, page }))
}

pub async fn get(
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Product>, AppError> {
    sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(&s.db)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}

#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub sale_price: Option<Decimal>,
    #[serde(default)]
    pub on_sale: bool,
    pub category: String,
    pub collection: Option<String>,
    #[serde(default)]
    pub details: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default = "default_sizes")]
    pub sizes: Vec<Size>,
    #[serde(default = "default_true")]
    pub has_sizes: bool,
    #[serde(default)]
    pub is_new: bool,
    #[serde(default)]
    pub is_bestseller: bool,
    #[serde(default = "default_delivery_days")]
    pub delivery_days: i32,
}

fn default_true() -> bool {
    true
}

fn default_delivery_days() -> i32 {
    5
}

fn default_sizes() -> Vec<Size> {
    ["XS", "S", "M", "L", "XL", "XXL"]
        .iter()
        .map(|label| Size { label: (*label).to_string(), available: true })
        .collect()
}

pub async fn create(
    State(s): State<AppState>,
    Json(r): Json<ProductRequest>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let product = sqlx::query_as::<_, Product>(
        "INSERT INTO products (id, name, description, price, sale_price, on_sale, currency, \
         category, collection, details, images, sizes, has_sizes, is_new, is_bestseller, \
         delivery_days, status, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, 'GEL', $7, $8, $9, $10, $11, $12, $13, $14, $15, \
         'active', NOW(), NOW()) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(&r.name)
    .bind(&r.description)
    .bind(r.price)
    .bind(r.sale_price)
    .bind(r.on_sale)
    .bind(&r.category)
    .bind(&r.collection)
    .bind(Jsonb(&r.details))
    .bind(Jsonb(&r.images))
    .bind(Jsonb(&r.sizes))
    .bind(r.has_sizes)
    .bind(r.is_new)
    .bind(r.is_bestseller)
    .bind(r.delivery_days)
    .fetch_one(&s.db)
    .await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update(
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
    Json(r): Json<ProductRequest>,
) -> Result<Json<Product>, AppError> {
    let product = sqlx::query_as::<_, Product>(
        "UPDATE products SET name = $2, description = $3, price = $4, sale_price = $5, \
         on_sale = $6, category = $7, collection = $8, details = $9, images = $10, sizes = $11, \
         has_sizes = $12, is_new = $13, is_bestseller = $14, delivery_days = $15, \
         updated_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(&r.name)
    .bind(&r.description)
    .bind(r.price)
    .bind(r.sale_price)
    .bind(r.on_sale)
    .bind(&r.category)
    .bind(&r.collection)
    .bind(Jsonb(&r.details))
    .bind(Jsonb(&r.images))
    .bind(Jsonb(&r.sizes))
    .bind(r.has_sizes)
    .bind(r.is_new)
    .bind(r.is_bestseller)
    .bind(r.delivery_days)
    .fetch_optional(&s.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    Ok(Json(product))
}

pub async fn remove(
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    sqlx::query("UPDATE products SET status = 'deleted', updated_at = NOW() WHERE id = $1")
        .bind(id)
        .execute(&s.db)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
