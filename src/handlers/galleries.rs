use axum::{extract::State, http::StatusCode};
use uuid::Uuid;

use super::{ensure_slug_available, not_found, slug_taken};
use crate::{
    AppState,
    auth::{CurrentSession, require_admin},
    error::{AppError, ConflictExt},
    extract::{Json, Path, Query},
    models::{Ack, EventGallery, GalleryFilter, GalleryInput},
};

const ENTITY: &str = "Gallery";

/// list_galleries
///
/// [Public Route] Event photo galleries, most recent event first; galleries without an
/// event date come last.
#[utoipa::path(
    get,
    path = "/api/galleries",
    tag = "galleries",
    params(GalleryFilter),
    responses((status = 200, description = "Galleries", body = [EventGallery]))
)]
pub async fn list_galleries(
    State(state): State<AppState>,
    Query(filter): Query<GalleryFilter>,
) -> Result<Json<Vec<EventGallery>>, AppError> {
    let galleries = state
        .repo
        .list_galleries(&filter)
        .await?
        .into_iter()
        .map(EventGallery::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(galleries))
}

#[utoipa::path(
    get,
    path = "/api/galleries/{id}",
    tag = "galleries",
    params(("id" = Uuid, Path, description = "Gallery ID")),
    responses(
        (status = 200, description = "Found", body = EventGallery),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_gallery(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EventGallery>, AppError> {
    let record = state
        .repo
        .get_gallery(id)
        .await?
        .ok_or_else(|| not_found(ENTITY))?;
    Ok(Json(EventGallery::try_from(record)?))
}

/// create_gallery
///
/// [Admin Route] The image list is stored in the order given.
#[utoipa::path(
    post,
    path = "/api/galleries",
    tag = "galleries",
    request_body = GalleryInput,
    responses(
        (status = 201, description = "Created", body = EventGallery),
        (status = 400, description = "Invalid input or slug taken")
    )
)]
pub async fn create_gallery(
    CurrentSession(session): CurrentSession,
    State(state): State<AppState>,
    Json(input): Json<GalleryInput>,
) -> Result<(StatusCode, Json<EventGallery>), AppError> {
    require_admin(session)?;
    input.validate()?;
    let draft = input.into_draft()?;

    let holder = state.repo.find_gallery_by_slug(&draft.slug).await?;
    ensure_slug_available(holder.map(|gallery| gallery.id), None, ENTITY)?;

    let record = state
        .repo
        .create_gallery(draft)
        .await
        .on_conflict(&slug_taken(ENTITY))?;
    let gallery = EventGallery::try_from(record)?;

    tracing::info!(
        gallery_id = %gallery.id,
        slug = %gallery.slug,
        images = gallery.images.len(),
        "gallery created"
    );
    Ok((StatusCode::CREATED, Json(gallery)))
}

#[utoipa::path(
    put,
    path = "/api/galleries/{id}",
    tag = "galleries",
    params(("id" = Uuid, Path, description = "Gallery ID")),
    request_body = GalleryInput,
    responses(
        (status = 200, description = "Updated", body = EventGallery),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_gallery(
    CurrentSession(session): CurrentSession,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<GalleryInput>,
) -> Result<Json<EventGallery>, AppError> {
    require_admin(session)?;
    input.validate()?;
    let draft = input.into_draft()?;

    let holder = state.repo.find_gallery_by_slug(&draft.slug).await?;
    ensure_slug_available(holder.map(|gallery| gallery.id), Some(id), ENTITY)?;

    let record = state
        .repo
        .update_gallery(id, draft)
        .await
        .on_conflict(&slug_taken(ENTITY))?
        .ok_or_else(|| not_found(ENTITY))?;

    tracing::info!(gallery_id = %id, "gallery updated");
    Ok(Json(EventGallery::try_from(record)?))
}

#[utoipa::path(
    delete,
    path = "/api/galleries/{id}",
    tag = "galleries",
    params(("id" = Uuid, Path, description = "Gallery ID")),
    responses(
        (status = 200, description = "Deleted", body = Ack),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_gallery(
    CurrentSession(session): CurrentSession,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Ack>, AppError> {
    require_admin(session)?;
    if !state.repo.delete_gallery(id).await? {
        return Err(not_found(ENTITY));
    }

    tracing::info!(gallery_id = %id, "gallery deleted");
    Ok(Json(Ack::ok()))
}
