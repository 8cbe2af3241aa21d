use axum::{extract::State, http::StatusCode};
use uuid::Uuid;

use super::not_found;
use crate::{
    AppState,
    auth::{CurrentSession, require_admin},
    error::AppError,
    extract::{Json, Path},
    models::{Ack, MovementMember, MovementMemberInput},
};

const ENTITY: &str = "Movement member";

/// join_movement
///
/// [Public Route] The supporter sign-up form. No session required.
#[utoipa::path(
    post,
    path = "/api/movement-members",
    tag = "movement",
    request_body = MovementMemberInput,
    responses(
        (status = 201, description = "Signed up", body = MovementMember),
        (status = 400, description = "Missing fields or no mode of transport")
    )
)]
pub async fn join_movement(
    State(state): State<AppState>,
    Json(input): Json<MovementMemberInput>,
) -> Result<(StatusCode, Json<MovementMember>), AppError> {
    input.validate()?;
    let draft = input.into_draft()?;
    let record = state.repo.create_movement_member(draft).await?;
    let member = MovementMember::try_from(record)?;

    tracing::info!(member_id = %member.id, state_of_origin = %member.state_of_origin, "movement member joined");
    Ok((StatusCode::CREATED, Json(member)))
}

/// list_movement_members
///
/// [Admin Route] Sign-ups hold personal data, so reads are admin-only.
#[utoipa::path(
    get,
    path = "/api/movement-members",
    tag = "movement",
    responses(
        (status = 200, description = "Sign-ups, newest first", body = [MovementMember]),
        (status = 401, description = "Not an admin")
    )
)]
pub async fn list_movement_members(
    CurrentSession(session): CurrentSession,
    State(state): State<AppState>,
) -> Result<Json<Vec<MovementMember>>, AppError> {
    require_admin(session)?;
    let members = state
        .repo
        .list_movement_members()
        .await?
        .into_iter()
        .map(MovementMember::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(members))
}

#[utoipa::path(
    get,
    path = "/api/movement-members/{id}",
    tag = "movement",
    params(("id" = Uuid, Path, description = "Movement member ID")),
    responses(
        (status = 200, description = "Found", body = MovementMember),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_movement_member(
    CurrentSession(session): CurrentSession,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MovementMember>, AppError> {
    require_admin(session)?;
    let record = state
        .repo
        .get_movement_member(id)
        .await?
        .ok_or_else(|| not_found(ENTITY))?;
    Ok(Json(MovementMember::try_from(record)?))
}

#[utoipa::path(
    delete,
    path = "/api/movement-members/{id}",
    tag = "movement",
    params(("id" = Uuid, Path, description = "Movement member ID")),
    responses(
        (status = 200, description = "Deleted", body = Ack),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_movement_member(
    CurrentSession(session): CurrentSession,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Ack>, AppError> {
    require_admin(session)?;
    if !state.repo.delete_movement_member(id).await? {
        return Err(not_found(ENTITY));
    }

    tracing::info!(member_id = %id, "movement member deleted");
    Ok(Json(Ack::ok()))
}
