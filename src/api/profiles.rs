//! Customer profiles. Identity comes from the external auth provider; the
//! admin flag is managed out of band and never settable through this API.

use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::locale::Lang;
use crate::{AppError, AppState};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub is_admin: bool,
    pub preferred_lang: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub async fn get(State(s): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Profile>, AppError> {
    sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = $1")
        .bind(id)
        .fetch_optional(&s.db)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("profile {id}")))
}

#[derive(Debug, Deserialize)]
pub struct ProfileUpsert {
    pub email: String,
    pub display_name: Option<String>,
    pub preferred_lang: Option<String>,
}

pub async fn upsert(
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
    Json(r): Json<ProfileUpsert>,
) -> Result<Json<Profile>, AppError> {
    // Unsupported language codes are dropped rather than stored.
    let preferred_lang = r.preferred_lang.as_deref().and_then(Lang::parse).map(Lang::code);

    let profile = sqlx::query_as::<_, Profile>(
        "INSERT INTO profiles (id, email, display_name, preferred_lang, created_at) \
         VALUES ($1, $2, $3, $4, NOW()) \
         ON CONFLICT (id) DO UPDATE SET email = EXCLUDED.email, \
         display_name = EXCLUDED.display_name, \
         preferred_lang = COALESCE(EXCLUDED.preferred_lang, profiles.preferred_lang) \
         RETURNING *",
    )
    .bind(id)
    .bind(&r.email)
    .bind(&r.display_name)
    .bind(preferred_lang)
    .fetch_one(&s.db)
    .await?;
    Ok(Json(profile))
}
