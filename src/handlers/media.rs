use axum::{
    extract::{Multipart, State, multipart::MultipartError},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use super::{check_access, not_found};
use crate::{
    AppState,
    auth::{CurrentSession, require_admin},
    error::AppError,
    extract::{Json, Path},
    models::{Ack, Media, MediaDraft, MediaPatch, UploadResponse},
};

const ENTITY: &str = "Media";

/// Content types accepted by `POST /api/upload`.
pub const ALLOWED_MIME_TYPES: [&str; 6] = [
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "video/mp4",
    "video/webm",
];

/// Object key prefix for uploaded files.
pub const UPLOAD_PREFIX: &str = "uploads";

/// unique_filename
///
/// `<unix-millis>-<uuid>.<ext>`, keeping the original extension (lowercased, `bin` when
/// the original name has none).
pub fn unique_filename(original_name: &str) -> String {
    let extension = original_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| "bin".to_string());

    format!(
        "{}-{}.{}",
        Utc::now().timestamp_millis(),
        Uuid::new_v4(),
        extension
    )
}

fn too_large(limit: usize) -> AppError {
    AppError::Validation(format!(
        "File too large (max {} MB)",
        limit / (1024 * 1024)
    ))
}

fn multipart_error(err: MultipartError, limit: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        too_large(limit)
    } else {
        AppError::Validation(format!("Invalid upload: {}", err.body_text()))
    }
}

struct UploadedFile {
    original_name: String,
    mime_type: String,
    bytes: Vec<u8>,
}

/// upload_media
///
/// [Configurable Route] Accepts a multipart body with a `file` field, stores the bytes
/// under `uploads/` and records the metadata.
#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "media",
    request_body(content = Vec<u8>, content_type = "multipart/form-data", description = "Form with a `file` field"),
    responses(
        (status = 200, description = "Uploaded", body = UploadResponse),
        (status = 400, description = "Missing file, disallowed type or too large")
    )
)]
pub async fn upload_media(
    CurrentSession(session): CurrentSession,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    check_access(state.config.upload_access, session)?;
    let limit = state.config.upload_max_bytes;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| multipart_error(err, limit))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let original_name = field.file_name().unwrap_or("upload").to_string();
        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|err| multipart_error(err, limit))?;

        upload = Some(UploadedFile {
            original_name,
            mime_type,
            bytes: bytes.to_vec(),
        });
        break;
    }

    let file = upload.ok_or_else(|| AppError::Validation("No file provided".to_string()))?;
    if !ALLOWED_MIME_TYPES.contains(&file.mime_type.as_str()) {
        return Err(AppError::Validation(format!(
            "File type {} is not allowed",
            file.mime_type
        )));
    }
    if file.bytes.len() > limit {
        return Err(too_large(limit));
    }

    let filename = unique_filename(&file.original_name);
    let path = format!("{UPLOAD_PREFIX}/{filename}");
    let size = file.bytes.len() as i64;
    let url = state
        .storage
        .put_object(&path, file.bytes, &file.mime_type)
        .await?;

    let created = state
        .repo
        .create_media(MediaDraft {
            filename,
            original_name: file.original_name,
            mime_type: file.mime_type,
            size,
            path: path.clone(),
            url: url.clone(),
            alt: None,
        })
        .await;
    let media = match created {
        Ok(media) => media,
        Err(err) => {
            // The object has no metadata row; remove it before reporting the failure.
            if let Err(storage_err) = state.storage.delete_object(&path).await {
                tracing::warn!(path = %path, error = %storage_err, "orphaned upload not removed");
            }
            return Err(err.into());
        }
    };

    tracing::info!(media_id = %media.id, size, mime = %media.mime_type, "media uploaded");
    Ok(Json(UploadResponse {
        success: true,
        url,
        media,
    }))
}

/// list_media
///
/// [Public Route] Newest first.
#[utoipa::path(
    get,
    path = "/api/media",
    tag = "media",
    responses((status = 200, description = "Media library", body = [Media]))
)]
pub async fn list_media(State(state): State<AppState>) -> Result<Json<Vec<Media>>, AppError> {
    Ok(Json(state.repo.list_media().await?))
}

#[utoipa::path(
    get,
    path = "/api/media/{id}",
    tag = "media",
    params(("id" = Uuid, Path, description = "Media ID")),
    responses(
        (status = 200, description = "Found", body = Media),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_media(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Media>, AppError> {
    let media = state
        .repo
        .get_media(id)
        .await?
        .ok_or_else(|| not_found(ENTITY))?;
    Ok(Json(media))
}

/// update_media
///
/// [Admin Route] Only the alt text is editable.
#[utoipa::path(
    put,
    path = "/api/media/{id}",
    tag = "media",
    params(("id" = Uuid, Path, description = "Media ID")),
    request_body = MediaPatch,
    responses(
        (status = 200, description = "Updated", body = Media),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_media(
    CurrentSession(session): CurrentSession,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<MediaPatch>,
) -> Result<Json<Media>, AppError> {
    require_admin(session)?;
    let alt = patch.alt.filter(|alt| !alt.trim().is_empty());
    let media = state
        .repo
        .update_media_alt(id, alt)
        .await?
        .ok_or_else(|| not_found(ENTITY))?;
    Ok(Json(media))
}

/// delete_media
///
/// [Admin Route] Removes the record, then the stored object. A storage failure at that
/// point is logged and does not fail the request.
#[utoipa::path(
    delete,
    path = "/api/media/{id}",
    tag = "media",
    params(("id" = Uuid, Path, description = "Media ID")),
    responses(
        (status = 200, description = "Deleted", body = Ack),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_media(
    CurrentSession(session): CurrentSession,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Ack>, AppError> {
    require_admin(session)?;
    let media = state
        .repo
        .delete_media(id)
        .await?
        .ok_or_else(|| not_found(ENTITY))?;

    if let Err(err) = state.storage.delete_object(&media.path).await {
        tracing::warn!(media_id = %id, path = %media.path, error = %err, "stored object not removed");
    }

    tracing::info!(media_id = %id, "media deleted");
    Ok(Json(Ack::ok()))
}
