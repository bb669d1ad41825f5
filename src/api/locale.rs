//! Locale routing seam: shell route resolution and explicit language
//! switches.

use axum::extract::State;
use axum::http::{header, HeaderMap, Uri};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::locale::{self, Lang};
use crate::{AppError, AppState};

/// What the storefront shell renders: the active language and the logical
/// route under it.
#[derive(Debug, Serialize)]
pub struct ShellRoute {
    pub lang: Lang,
    pub path: String,
}

/// Fallback for everything outside the API. Recognized prefixes resolve;
/// unrecognized ones land on the default-language root; admin paths are
/// never prefixed.
pub async fn entry(headers: HeaderMap, uri: Uri) -> Response {
    let path = uri.path();

    if path.starts_with("/admin") {
        return Json(ShellRoute { lang: locale::DEFAULT, path: path.to_string() }).into_response();
    }

    if path == "/" {
        let lang = locale::resolve_initial(None, accept_language(&headers).as_deref());
        return Redirect::temporary(&locale::path_for(lang, "/")).into_response();
    }

    let (first, rest) = locale::split_prefix(path);
    match first.and_then(Lang::parse) {
        Some(lang) => Json(ShellRoute { lang, path: rest.to_string() }).into_response(),
        None => Redirect::temporary(&locale::path_for(locale::DEFAULT, "/")).into_response(),
    }
}

fn accept_language(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::ACCEPT_LANGUAGE)?
        .to_str()
        .ok()?
        .split(',')
        .next()
        .map(|s| s.trim().to_string())
}

#[derive(Debug, Deserialize)]
pub struct SwitchRequest {
    pub lang: String,
    pub path: String,
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct SwitchResponse {
    pub lang: Lang,
    pub redirect: Option<String>,
}

/// Explicit language switch. Unsupported codes are a no-op. The choice is
/// persisted to the user's profile when one is attached.
pub async fn switch(
    State(s): State<AppState>,
    Json(r): Json<SwitchRequest>,
) -> Result<Json<SwitchResponse>, AppError> {
    let Some(lang) = Lang::parse(&r.lang) else {
        let current = locale::split_prefix(&r.path)
            .0
            .and_then(Lang::parse)
            .unwrap_or(locale::DEFAULT);
        return Ok(Json(SwitchResponse { lang: current, redirect: None }));
    };

    if let Some(user_id) = r.user_id {
        sqlx::query("UPDATE profiles SET preferred_lang = $2 WHERE id = $1")
            .bind(user_id)
            .bind(lang.code())
            .execute(&s.db)
            .await?;
    }

    Ok(Json(SwitchResponse { lang, redirect: locale::switch_target(&r.path, lang) }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use tower::ServiceExt;

    fn shell() -> Router {
        Router::new().fallback(entry)
    }

    async fn get(router: Router, uri: &str, accept_language: Option<&str>) -> axum::response::Response {
        let mut request = Request::builder().uri(uri);
        if let Some(al) = accept_language {
            request = request.header(header::ACCEPT_LANGUAGE, al);
        }
        router.oneshot(request.body(Body::empty()).unwrap()).await.unwrap()
    }

    #[tokio::test]
    async fn unrecognized_prefix_redirects_to_the_default_root() {
        let response = get(shell(), "/xx/sale", None).await;
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers()[header::LOCATION], "/en");
    }

    #[tokio::test]
    async fn recognized_prefix_resolves() {
        let response = get(shell(), "/ka/sale", None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn root_redirects_by_browser_language() {
        let response = get(shell(), "/", Some("ka-GE,ka;q=0.9")).await;
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers()[header::LOCATION], "/ka");

        let response = get(shell(), "/", None).await;
        assert_eq!(response.headers()[header::LOCATION], "/en");
    }

    #[tokio::test]
    async fn admin_paths_are_never_redirected() {
        let response = get(shell(), "/admin/orders", None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
