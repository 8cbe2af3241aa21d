use axum::{extract::State, http::StatusCode};
use uuid::Uuid;

use super::not_found;
use crate::{
    AppState,
    auth::{CurrentSession, require_admin},
    error::AppError,
    extract::{Json, Path, Query},
    models::{Ack, PublishedFilter, TeamMember, TeamMemberInput},
};

const ENTITY: &str = "Team member";

/// list_team
///
/// [Public Route] Team members in display order.
#[utoipa::path(
    get,
    path = "/api/team",
    tag = "team",
    params(PublishedFilter),
    responses((status = 200, description = "Team", body = [TeamMember]))
)]
pub async fn list_team(
    State(state): State<AppState>,
    Query(filter): Query<PublishedFilter>,
) -> Result<Json<Vec<TeamMember>>, AppError> {
    Ok(Json(state.repo.list_team(filter.published).await?))
}

#[utoipa::path(
    get,
    path = "/api/team/{id}",
    tag = "team",
    params(("id" = Uuid, Path, description = "Team member ID")),
    responses(
        (status = 200, description = "Found", body = TeamMember),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_team_member(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TeamMember>, AppError> {
    let member = state
        .repo
        .get_team_member(id)
        .await?
        .ok_or_else(|| not_found(ENTITY))?;
    Ok(Json(member))
}

#[utoipa::path(
    post,
    path = "/api/team",
    tag = "team",
    request_body = TeamMemberInput,
    responses(
        (status = 201, description = "Created", body = TeamMember),
        (status = 400, description = "Name and title are required")
    )
)]
pub async fn create_team_member(
    CurrentSession(session): CurrentSession,
    State(state): State<AppState>,
    Json(input): Json<TeamMemberInput>,
) -> Result<(StatusCode, Json<TeamMember>), AppError> {
    require_admin(session)?;
    input.validate()?;
    let member = state.repo.create_team_member(input).await?;

    tracing::info!(member_id = %member.id, "team member created");
    Ok((StatusCode::CREATED, Json(member)))
}

#[utoipa::path(
    put,
    path = "/api/team/{id}",
    tag = "team",
    params(("id" = Uuid, Path, description = "Team member ID")),
    request_body = TeamMemberInput,
    responses(
        (status = 200, description = "Updated", body = TeamMember),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_team_member(
    CurrentSession(session): CurrentSession,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<TeamMemberInput>,
) -> Result<Json<TeamMember>, AppError> {
    require_admin(session)?;
    input.validate()?;
    let member = state
        .repo
        .update_team_member(id, input)
        .await?
        .ok_or_else(|| not_found(ENTITY))?;

    tracing::info!(member_id = %id, "team member updated");
    Ok(Json(member))
}

#[utoipa::path(
    delete,
    path = "/api/team/{id}",
    tag = "team",
    params(("id" = Uuid, Path, description = "Team member ID")),
    responses(
        (status = 200, description = "Deleted", body = Ack),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_team_member(
    CurrentSession(session): CurrentSession,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Ack>, AppError> {
    require_admin(session)?;
    if !state.repo.delete_team_member(id).await? {
        return Err(not_found(ENTITY));
    }

    tracing::info!(member_id = %id, "team member deleted");
    Ok(Json(Ack::ok()))
}
