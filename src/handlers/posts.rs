use axum::{extract::State, http::StatusCode};
use uuid::Uuid;

use super::{ensure_slug_available, not_found, slug_taken};
use crate::{
    AppState,
    auth::{CurrentSession, require_admin},
    error::{AppError, ConflictExt},
    extract::{Json, Path, Query},
    models::{Ack, Post, PostFilter, PostInput},
};

const ENTITY: &str = "Post";

/// list_posts
///
/// [Public Route] Lists blog posts, most recently updated first.
#[utoipa::path(
    get,
    path = "/api/posts",
    tag = "posts",
    params(PostFilter),
    responses((status = 200, description = "Posts", body = [Post]))
)]
pub async fn list_posts(
    State(state): State<AppState>,
    Query(filter): Query<PostFilter>,
) -> Result<Json<Vec<Post>>, AppError> {
    let posts = state
        .repo
        .list_posts(&filter)
        .await?
        .into_iter()
        .map(Post::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(posts))
}

/// get_post
///
/// [Public Route]
#[utoipa::path(
    get,
    path = "/api/posts/{id}",
    tag = "posts",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Found", body = Post),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Post>, AppError> {
    let record = state
        .repo
        .get_post(id)
        .await?
        .ok_or_else(|| not_found(ENTITY))?;
    Ok(Json(Post::try_from(record)?))
}

/// create_post
///
/// [Admin Route] Creates a post authored by the calling admin.
#[utoipa::path(
    post,
    path = "/api/posts",
    tag = "posts",
    request_body = PostInput,
    responses(
        (status = 201, description = "Created", body = Post),
        (status = 400, description = "Invalid input or slug taken"),
        (status = 401, description = "Not an admin")
    )
)]
pub async fn create_post(
    CurrentSession(session): CurrentSession,
    State(state): State<AppState>,
    Json(input): Json<PostInput>,
) -> Result<(StatusCode, Json<Post>), AppError> {
    let session = require_admin(session)?;
    input.validate()?;
    let draft = input.into_draft()?;

    let holder = state.repo.find_post_by_slug(&draft.slug).await?;
    ensure_slug_available(holder.map(|post| post.id), None, ENTITY)?;

    let record = state
        .repo
        .create_post(draft, session.user.id)
        .await
        .on_conflict(&slug_taken(ENTITY))?;

    tracing::info!(post_id = %record.id, slug = %record.slug, category = ?record.category, "post created");
    Ok((StatusCode::CREATED, Json(Post::try_from(record)?)))
}

/// update_post
///
/// [Admin Route] Overwrites every mutable field. A post may keep its own slug.
#[utoipa::path(
    put,
    path = "/api/posts/{id}",
    tag = "posts",
    params(("id" = Uuid, Path, description = "Post ID")),
    request_body = PostInput,
    responses(
        (status = 200, description = "Updated", body = Post),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_post(
    CurrentSession(session): CurrentSession,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<PostInput>,
) -> Result<Json<Post>, AppError> {
    require_admin(session)?;
    input.validate()?;
    let draft = input.into_draft()?;

    let holder = state.repo.find_post_by_slug(&draft.slug).await?;
    ensure_slug_available(holder.map(|post| post.id), Some(id), ENTITY)?;

    let record = state
        .repo
        .update_post(id, draft)
        .await
        .on_conflict(&slug_taken(ENTITY))?
        .ok_or_else(|| not_found(ENTITY))?;

    tracing::info!(post_id = %id, slug = %record.slug, "post updated");
    Ok(Json(Post::try_from(record)?))
}

/// delete_post
///
/// [Admin Route]
#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    tag = "posts",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Deleted", body = Ack),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_post(
    CurrentSession(session): CurrentSession,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Ack>, AppError> {
    require_admin(session)?;
    if !state.repo.delete_post(id).await? {
        return Err(not_found(ENTITY));
    }

    tracing::info!(post_id = %id, "post deleted");
    Ok(Json(Ack::ok()))
}
