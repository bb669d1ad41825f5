//! HTTP surface.

pub mod cart;
pub mod home;
pub mod locale;
pub mod notifications;
pub mod orders;
pub mod products;
pub mod profiles;
pub mod wishlist;

use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub category: Option<String>,
    pub collection: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: u32,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/products", get(products::list).post(products::create))
        .route(
            "/api/v1/products/:id",
            get(products::get).put(products::update).delete(products::remove),
        )
        .route("/api/v1/cart/:session", get(cart::get).post(cart::add).delete(cart::clear))
        .route(
            "/api/v1/cart/:session/items",
            put(cart::set_quantity).delete(cart::remove_item),
        )
        .route("/api/v1/wishlist/:session", get(wishlist::list).post(wishlist::add))
        .route("/api/v1/wishlist/:session/:product_id", delete(wishlist::remove))
        .route("/api/v1/checkout", post(orders::checkout))
        .route("/api/v1/orders", get(orders::list))
        .route("/api/v1/orders/:id", get(orders::get))
        .route("/api/v1/orders/:id/status", put(orders::update_status))
        .route("/api/v1/orders/:id/arriving-date", put(orders::set_arriving_date))
        .route("/api/v1/home-settings", get(home::get).put(home::update))
        .route("/api/v1/profiles/:id", get(profiles::get).put(profiles::upsert))
        .route("/api/v1/locale/switch", post(locale::switch))
        .route("/api/v1/notifications", post(notifications::send))
        .route("/api/v1/webhooks/orders", post(notifications::order_webhook))
        .fallback(locale::entry)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "healthy", "service": "aurora-store"}))
}
