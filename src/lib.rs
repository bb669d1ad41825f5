//! Aurora Storefront Service
//!
//! Backend for the Aurora fashion boutique.
//!
//! ## Features
//! - Product catalog with collections and sale pricing
//! - Session carts and wishlists
//! - Checkout with human-readable order numbers
//! - Admin and customer email notifications
//! - Order management with per-status timestamps
//! - Bilingual (English/Georgian) locale handling

pub mod api;
pub mod checkout;
pub mod config;
pub mod domain;
pub mod locale;
pub mod notify;
pub mod store;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::checkout::{CheckoutError, Coordinator};
use crate::config::Config;
use crate::notify::Notifier;

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub nats: Option<async_nats::Client>,
    pub config: Arc<Config>,
    pub notifier: Arc<Notifier>,
    pub checkout: Arc<Coordinator>,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("storage error: {0}")]
    Store(#[from] store::StoreError),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Checkout(#[from] CheckoutError),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Checkout(e) => match e {
                CheckoutError::EmptyCart | CheckoutError::InvalidForm(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
