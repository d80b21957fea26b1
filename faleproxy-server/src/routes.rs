use std::path::Path;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, header::CONTENT_TYPE},
    routing::{get, post},
};
use faleproxy_rewrite::rewrite_html;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct FetchRequest {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchResponse {
    pub success: bool,
    pub content: String,
    pub title: String,
    pub original_url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub environment: String,
}

/// Router with every route; `/` and other unmatched GETs come from `static_dir`.
pub fn create_app(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/fetch", post(fetch_handler))
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        environment: state.environment.clone(),
    })
}

async fn fetch_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<FetchResponse>, ApiError> {
    let url = parse_fetch_request(&headers, &body)
        .url
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .ok_or(ApiError::MissingUrl)?;

    tracing::info!(url = %url, "fetch.request");

    let html = state.fetcher.fetch_page(&url).await.map_err(|e| {
        tracing::warn!(url = %url, error = %e, "fetch.failed");
        ApiError::Fetch(e.to_string())
    })?;

    let result = rewrite_html(&html, &state.substitution);
    tracing::info!(
        url = %url,
        bytes_in = html.len(),
        bytes_out = result.html.len(),
        replacements = result.replacements,
        "fetch.rewritten"
    );

    Ok(Json(FetchResponse {
        success: true,
        content: result.html,
        title: result.title,
        original_url: url,
    }))
}

/// Accept both JSON and urlencoded form bodies; anything unreadable counts as
/// a request without a URL.
fn parse_fetch_request(headers: &HeaderMap, body: &[u8]) -> FetchRequest {
    let is_form = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

    if is_form {
        let url = url::form_urlencoded::parse(body)
            .find(|(key, _)| key == "url")
            .map(|(_, value)| value.into_owned());
        return FetchRequest { url };
    }

    serde_json::from_slice(body).unwrap_or_default()
}
