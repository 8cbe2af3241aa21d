use axum::extract::State;

use crate::{AppState, error::AppError, extract::Json, models::FaviconResponse};

/// Settings key holding the site favicon URL.
pub const FAVICON_SETTING: &str = "favicon";

/// get_favicon
///
/// [Public Route] The `favicon` setting when it holds a non-empty value, otherwise the
/// configured default.
#[utoipa::path(
    get,
    path = "/api/favicon",
    tag = "settings",
    responses((status = 200, description = "Favicon URL", body = FaviconResponse))
)]
pub async fn get_favicon(State(state): State<AppState>) -> Result<Json<FaviconResponse>, AppError> {
    let url = state
        .repo
        .get_setting(FAVICON_SETTING)
        .await?
        .map(|setting| setting.value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| state.config.default_favicon_url.clone());

    Ok(Json(FaviconResponse { url }))
}
