use axum::{extract::State, http::StatusCode};
use uuid::Uuid;

use super::{ensure_slug_available, not_found, slug_taken};
use crate::{
    AppState,
    auth::{CurrentSession, require_admin},
    error::{AppError, ConflictExt},
    extract::{Json, Path, Query},
    models::{Ack, Page, PageFilter, PageInput},
};

const ENTITY: &str = "Page";

/// list_pages
///
/// [Public Route] Lists pages, most recently updated first.
#[utoipa::path(
    get,
    path = "/api/pages",
    tag = "pages",
    params(PageFilter),
    responses((status = 200, description = "Pages", body = [Page]))
)]
pub async fn list_pages(
    State(state): State<AppState>,
    Query(filter): Query<PageFilter>,
) -> Result<Json<Vec<Page>>, AppError> {
    let pages = state
        .repo
        .list_pages(&filter)
        .await?
        .into_iter()
        .map(Page::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(pages))
}

/// get_page
///
/// [Public Route]
#[utoipa::path(
    get,
    path = "/api/pages/{id}",
    tag = "pages",
    params(("id" = Uuid, Path, description = "Page ID")),
    responses(
        (status = 200, description = "Found", body = Page),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_page(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Page>, AppError> {
    let record = state
        .repo
        .get_page(id)
        .await?
        .ok_or_else(|| not_found(ENTITY))?;
    Ok(Json(Page::try_from(record)?))
}

/// create_page
///
/// [Admin Route] Creates a page authored by the calling admin.
#[utoipa::path(
    post,
    path = "/api/pages",
    tag = "pages",
    request_body = PageInput,
    responses(
        (status = 201, description = "Created", body = Page),
        (status = 400, description = "Invalid input or slug taken"),
        (status = 401, description = "Not an admin")
    )
)]
pub async fn create_page(
    CurrentSession(session): CurrentSession,
    State(state): State<AppState>,
    Json(input): Json<PageInput>,
) -> Result<(StatusCode, Json<Page>), AppError> {
    let session = require_admin(session)?;
    input.validate()?;
    let draft = input.into_draft()?;

    let holder = state.repo.find_page_by_slug(&draft.slug).await?;
    ensure_slug_available(holder.map(|page| page.id), None, ENTITY)?;

    let record = state
        .repo
        .create_page(draft, session.user.id)
        .await
        .on_conflict(&slug_taken(ENTITY))?;

    tracing::info!(page_id = %record.id, slug = %record.slug, "page created");
    Ok((StatusCode::CREATED, Json(Page::try_from(record)?)))
}

/// update_page
///
/// [Admin Route] Overwrites every mutable field. A page may keep its own slug.
#[utoipa::path(
    put,
    path = "/api/pages/{id}",
    tag = "pages",
    params(("id" = Uuid, Path, description = "Page ID")),
    request_body = PageInput,
    responses(
        (status = 200, description = "Updated", body = Page),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_page(
    CurrentSession(session): CurrentSession,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<PageInput>,
) -> Result<Json<Page>, AppError> {
    require_admin(session)?;
    input.validate()?;
    let draft = input.into_draft()?;

    let holder = state.repo.find_page_by_slug(&draft.slug).await?;
    ensure_slug_available(holder.map(|page| page.id), Some(id), ENTITY)?;

    let record = state
        .repo
        .update_page(id, draft)
        .await
        .on_conflict(&slug_taken(ENTITY))?
        .ok_or_else(|| not_found(ENTITY))?;

    tracing::info!(page_id = %id, slug = %record.slug, "page updated");
    Ok(Json(Page::try_from(record)?))
}

/// delete_page
///
/// [Admin Route]
#[utoipa::path(
    delete,
    path = "/api/pages/{id}",
    tag = "pages",
    params(("id" = Uuid, Path, description = "Page ID")),
    responses(
        (status = 200, description = "Deleted", body = Ack),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_page(
    CurrentSession(session): CurrentSession,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Ack>, AppError> {
    require_admin(session)?;
    if !state.repo.delete_page(id).await? {
        return Err(not_found(ENTITY));
    }

    tracing::info!(page_id = %id, "page deleted");
    Ok(Json(Ack::ok()))
}
