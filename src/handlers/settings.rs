use axum::extract::State;
use futures::future::join_all;

use super::{check_access, not_found};
use crate::{
    AppState,
    auth::{CurrentSession, require_admin},
    error::{AppError, StoreError},
    extract::{Json, Path},
    models::{Ack, Setting, SettingInput, SettingsSaved},
    repository::RepositoryState,
};

const ENTITY: &str = "Setting";

/// list_settings
///
/// [Public Route] Every setting, ordered by key.
#[utoipa::path(
    get,
    path = "/api/settings",
    tag = "settings",
    responses((status = 200, description = "Settings", body = [Setting]))
)]
pub async fn list_settings(State(state): State<AppState>) -> Result<Json<Vec<Setting>>, AppError> {
    Ok(Json(state.repo.list_settings().await?))
}

#[utoipa::path(
    get,
    path = "/api/settings/{key}",
    tag = "settings",
    params(("key" = String, Path, description = "Setting key")),
    responses(
        (status = 200, description = "Found", body = Setting),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_setting(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<Setting>, AppError> {
    let setting = state
        .repo
        .get_setting(&key)
        .await?
        .ok_or_else(|| not_found(ENTITY))?;
    Ok(Json(setting))
}

/// Update when the key exists, insert otherwise. An insert that races another writer
/// for the same key falls back to an update. A bulk item without a description keeps
/// the stored one.
async fn upsert_setting(
    repo: &RepositoryState,
    mut item: SettingInput,
) -> Result<Setting, AppError> {
    if let Some(existing) = repo.get_setting(&item.key).await? {
        if item.description.is_none() {
            item.description = existing.description;
        }
        if let Some(setting) = repo.update_setting(item.clone()).await? {
            return Ok(setting);
        }
    }

    match repo.insert_setting(item.clone()).await {
        Ok(setting) => Ok(setting),
        Err(StoreError::UniqueViolation(_)) => repo
            .update_setting(item)
            .await?
            .ok_or_else(|| AppError::Internal("setting vanished during save".to_string())),
        Err(err) => Err(err.into()),
    }
}

/// save_settings
///
/// [Configurable Route] Bulk save. Each item is written independently and concurrently;
/// a failing item does not undo the others, and the caller sees a single error.
/// When a key repeats within the body, the last occurrence wins.
#[utoipa::path(
    post,
    path = "/api/settings",
    tag = "settings",
    request_body = [SettingInput],
    responses(
        (status = 200, description = "Saved", body = SettingsSaved),
        (status = 400, description = "Setting key is required")
    )
)]
pub async fn save_settings(
    CurrentSession(session): CurrentSession,
    State(state): State<AppState>,
    Json(items): Json<Vec<SettingInput>>,
) -> Result<Json<SettingsSaved>, AppError> {
    check_access(state.config.settings_save_access, session)?;

    let mut unique: Vec<SettingInput> = Vec::with_capacity(items.len());
    for item in items {
        item.validate()?;
        match unique.iter_mut().find(|existing| existing.key == item.key) {
            Some(existing) => *existing = item,
            None => unique.push(item),
        }
    }

    let results = join_all(
        unique
            .into_iter()
            .map(|item| upsert_setting(&state.repo, item)),
    )
    .await;

    let mut saved = 0;
    let mut first_error = None;
    for result in results {
        match result {
            Ok(_) => saved += 1,
            Err(err) => {
                tracing::error!(error = %err, "setting save failed");
                first_error.get_or_insert(err);
            }
        }
    }
    if let Some(err) = first_error {
        return Err(err);
    }

    tracing::info!(saved, "settings saved");
    Ok(Json(SettingsSaved {
        success: true,
        saved,
    }))
}

/// update_setting
///
/// [Admin Route] Overwrites value, type and description. The path key wins over any
/// key in the body.
#[utoipa::path(
    put,
    path = "/api/settings/{key}",
    tag = "settings",
    params(("key" = String, Path, description = "Setting key")),
    request_body = SettingInput,
    responses(
        (status = 200, description = "Updated", body = Setting),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_setting(
    CurrentSession(session): CurrentSession,
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(mut input): Json<SettingInput>,
) -> Result<Json<Setting>, AppError> {
    require_admin(session)?;
    input.key = key;
    input.validate()?;

    let setting = state
        .repo
        .update_setting(input)
        .await?
        .ok_or_else(|| not_found(ENTITY))?;

    tracing::info!(key = %setting.key, "setting updated");
    Ok(Json(setting))
}

#[utoipa::path(
    delete,
    path = "/api/settings/{key}",
    tag = "settings",
    params(("key" = String, Path, description = "Setting key")),
    responses(
        (status = 200, description = "Deleted", body = Ack),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_setting(
    CurrentSession(session): CurrentSession,
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<Ack>, AppError> {
    require_admin(session)?;
    if !state.repo.delete_setting(&key).await? {
        return Err(not_found(ENTITY));
    }

    tracing::info!(key = %key, "setting deleted");
    Ok(Json(Ack::ok()))
}
