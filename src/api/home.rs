//! Homepage content managed by the back office. One row, edited in place.

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AppError, AppState};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct HomeSettings {
    pub id: i16,
    pub hero_heading: String,
    pub hero_image: Option<String>,
    pub featured_collection: Option<String>,
    pub show_bestsellers: bool,
    pub updated_at: DateTime<Utc>,
}

pub async fn get(State(s): State<AppState>) -> Result<Json<HomeSettings>, AppError> {
    let settings =
        sqlx::query_as::<_, HomeSettings>("SELECT * FROM home_settings WHERE id = 1")
            .fetch_one(&s.db)
            .await?;
    Ok(Json(settings))
}

#[derive(Debug, Deserialize)]
pub struct HomeSettingsUpdate {
    pub hero_heading: String,
    pub hero_image: Option<String>,
    pub featured_collection: Option<String>,
    #[serde(default = "default_show_bestsellers")]
    pub show_bestsellers: bool,
}

fn default_show_bestsellers() -> bool {
    true
}

pub async fn update(
    State(s): State<AppState>,
    Json(r): Json<HomeSettingsUpdate>,
) -> Result<Json<HomeSettings>, AppError> {
    let settings = sqlx::query_as::<_, HomeSettings>(
        "UPDATE home_settings SET hero_heading = $1, hero_image = $2, featured_collection = $3, \
         show_bestsellers = $4, updated_at = NOW() WHERE id = 1 RETURNING *",
    )
    .bind(&r.hero_heading)
    .bind(&r.hero_image)
    .bind(&r.featured_collection)
    .bind(r.show_bestsellers)
    .fetch_one(&s.db)
    .await?;
    Ok(Json(settings))
}
