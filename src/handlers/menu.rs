use axum::{extract::State, http::StatusCode};
use uuid::Uuid;

use super::not_found;
use crate::{
    AppState,
    auth::{CurrentSession, require_admin},
    error::AppError,
    extract::{Json, Path, Query},
    models::{
        Ack, MenuFilter, MenuItem, MenuItemInput, MenuItemPatch, MenuNode, MenuQuery,
        ParentScope, PublishedFilter,
    },
    repository::RepositoryState,
};

const ENTITY: &str = "Menu item";
const NESTING_LIMIT: &str = "Menu items nest at most two levels";

/// Checks that `parent_id` can hold `item_id` (or a new item) while keeping the
/// menu two levels deep: the parent must exist and be top-level, and an item that
/// already has children cannot become a child itself.
async fn ensure_valid_parent(
    repo: &RepositoryState,
    parent_id: Uuid,
    item_id: Option<Uuid>,
) -> Result<(), AppError> {
    if item_id == Some(parent_id) {
        return Err(AppError::Validation(
            "A menu item cannot be its own parent".to_string(),
        ));
    }

    let parent = repo
        .get_menu_item(parent_id)
        .await?
        .ok_or_else(|| AppError::Validation("Parent menu item does not exist".to_string()))?;
    if parent.parent_id.is_some() {
        return Err(AppError::Validation(NESTING_LIMIT.to_string()));
    }

    if let Some(item_id) = item_id {
        let children = repo
            .list_menu_items(&MenuFilter {
                published: None,
                parent: ParentScope::Children(item_id),
            })
            .await?;
        if !children.is_empty() {
            return Err(AppError::Validation(NESTING_LIMIT.to_string()));
        }
    }
    Ok(())
}

/// list_menu_items
///
/// [Public Route] Flat menu listing in display order. `parentId=root` restricts the
/// listing to top-level items, `parentId=<id>` to the children of that item.
#[utoipa::path(
    get,
    path = "/api/menu",
    tag = "menu",
    params(MenuQuery),
    responses(
        (status = 200, description = "Menu items", body = [MenuItem]),
        (status = 400, description = "Invalid parentId")
    )
)]
pub async fn list_menu_items(
    State(state): State<AppState>,
    Query(query): Query<MenuQuery>,
) -> Result<Json<Vec<MenuItem>>, AppError> {
    let filter = MenuFilter::try_from(query)?;
    Ok(Json(state.repo.list_menu_items(&filter).await?))
}

/// menu_tree
///
/// [Public Route] Top-level items with their direct children nested.
#[utoipa::path(
    get,
    path = "/api/menu/tree",
    tag = "menu",
    params(PublishedFilter),
    responses((status = 200, description = "Menu tree", body = [MenuNode]))
)]
pub async fn menu_tree(
    State(state): State<AppState>,
    Query(filter): Query<PublishedFilter>,
) -> Result<Json<Vec<MenuNode>>, AppError> {
    let items = state
        .repo
        .list_menu_items(&MenuFilter {
            published: filter.published,
            parent: ParentScope::Any,
        })
        .await?;
    Ok(Json(MenuNode::build_tree(items)))
}

#[utoipa::path(
    get,
    path = "/api/menu/{id}",
    tag = "menu",
    params(("id" = Uuid, Path, description = "Menu item ID")),
    responses(
        (status = 200, description = "Found", body = MenuItem),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_menu_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MenuItem>, AppError> {
    let item = state
        .repo
        .get_menu_item(id)
        .await?
        .ok_or_else(|| not_found(ENTITY))?;
    Ok(Json(item))
}

/// create_menu_item
///
/// [Admin Route] `published` defaults to true and `target` to `_self`.
#[utoipa::path(
    post,
    path = "/api/menu",
    tag = "menu",
    request_body = MenuItemInput,
    responses(
        (status = 201, description = "Created", body = MenuItem),
        (status = 400, description = "Label and URL are required")
    )
)]
pub async fn create_menu_item(
    CurrentSession(session): CurrentSession,
    State(state): State<AppState>,
    Json(input): Json<MenuItemInput>,
) -> Result<(StatusCode, Json<MenuItem>), AppError> {
    require_admin(session)?;
    input.validate()?;
    if let Some(parent_id) = input.parent_id {
        ensure_valid_parent(&state.repo, parent_id, None).await?;
    }

    let item = state.repo.create_menu_item(input).await?;

    tracing::info!(menu_item_id = %item.id, parent_id = ?item.parent_id, "menu item created");
    Ok((StatusCode::CREATED, Json(item)))
}

/// update_menu_item
///
/// [Admin Route] Partial update. Only fields present in the body change;
/// `"parentId": null` moves the item to the top level.
#[utoipa::path(
    put,
    path = "/api/menu/{id}",
    tag = "menu",
    params(("id" = Uuid, Path, description = "Menu item ID")),
    request_body = MenuItemPatch,
    responses(
        (status = 200, description = "Updated", body = MenuItem),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_menu_item(
    CurrentSession(session): CurrentSession,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<MenuItemPatch>,
) -> Result<Json<MenuItem>, AppError> {
    require_admin(session)?;
    patch.validate()?;
    if let Some(Some(parent_id)) = patch.parent_id {
        ensure_valid_parent(&state.repo, parent_id, Some(id)).await?;
    }

    let item = state
        .repo
        .update_menu_item(id, patch)
        .await?
        .ok_or_else(|| not_found(ENTITY))?;

    tracing::info!(menu_item_id = %id, "menu item updated");
    Ok(Json(item))
}

/// delete_menu_item
///
/// [Admin Route] Children of the removed item become top-level items.
#[utoipa::path(
    delete,
    path = "/api/menu/{id}",
    tag = "menu",
    params(("id" = Uuid, Path, description = "Menu item ID")),
    responses(
        (status = 200, description = "Deleted", body = Ack),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_menu_item(
    CurrentSession(session): CurrentSession,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Ack>, AppError> {
    require_admin(session)?;
    if !state.repo.delete_menu_item(id).await? {
        return Err(not_found(ENTITY));
    }

    tracing::info!(menu_item_id = %id, "menu item deleted");
    Ok(Json(Ack::ok()))
}
