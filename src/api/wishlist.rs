//! Session wishlist handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::aggregates::product::Product;
use crate::{AppError, AppState};

pub async fn list(
    State(s): State<AppState>,
    Path(session): Path<String>,
) -> Result<Json<Vec<Product>>, AppError> {
    let products = sqlx::query_as::<_, Product>(
        "SELECT p.* FROM wishlist_items w JOIN products p ON p.id = w.product_id \
         WHERE w.session_id = $1 AND p.status = 'active' ORDER BY w.created_at DESC",
    )
    .bind(&session)
    .fetch_all(&s.db)
    .await?;
    Ok(Json(products))
}

#[derive(Debug, Deserialize)]
pub struct WishlistRequest {
    pub product_id: Uuid,
}

pub async fn add(
    State(s): State<AppState>,
    Path(session): Path<String>,
    Json(r): Json<WishlistRequest>,
) -> Result<StatusCode, AppError> {
    sqlx::query(
        "INSERT INTO wishlist_items (id, session_id, product_id, created_at) \
         VALUES ($1, $2, $3, NOW()) ON CONFLICT (session_id, product_id) DO NOTHING",
    )
    .bind(Uuid::now_v7())
    .bind(&session)
    .bind(r.product_id)
    .execute(&s.db)
    .await?;
    Ok(StatusCode::CREATED)
}

pub async fn remove(
    State(s): State<AppState>,
    Path((session, product_id)): Path<(String, Uuid)>,
) -> Result<StatusCode, AppError> {
    sqlx::query("DELETE FROM wishlist_items WHERE session_id = $1 AND product_id = $2")
        .bind(&session)
        .bind(product_id)
        .execute(&s.db)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
