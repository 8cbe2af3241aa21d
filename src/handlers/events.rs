use axum::{extract::State, http::StatusCode};
use uuid::Uuid;

use super::not_found;
use crate::{
    AppState,
    auth::{CurrentSession, require_admin},
    error::AppError,
    extract::{Json, Path, Query},
    models::{Ack, Event, EventFilter, EventInput},
};

const ENTITY: &str = "Event";

/// list_events
///
/// [Public Route] Lists events soonest first. `upcoming=true` keeps events dated now or
/// later, `upcoming=false` keeps past events.
#[utoipa::path(
    get,
    path = "/api/events",
    tag = "events",
    params(EventFilter),
    responses((status = 200, description = "Events", body = [Event]))
)]
pub async fn list_events(
    State(state): State<AppState>,
    Query(filter): Query<EventFilter>,
) -> Result<Json<Vec<Event>>, AppError> {
    Ok(Json(state.repo.list_events(&filter).await?))
}

#[utoipa::path(
    get,
    path = "/api/events/{id}",
    tag = "events",
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Found", body = Event),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Event>, AppError> {
    let event = state
        .repo
        .get_event(id)
        .await?
        .ok_or_else(|| not_found(ENTITY))?;
    Ok(Json(event))
}

/// create_event
///
/// [Admin Route]
#[utoipa::path(
    post,
    path = "/api/events",
    tag = "events",
    request_body = EventInput,
    responses(
        (status = 201, description = "Created", body = Event),
        (status = 400, description = "Title and date are required")
    )
)]
pub async fn create_event(
    CurrentSession(session): CurrentSession,
    State(state): State<AppState>,
    Json(input): Json<EventInput>,
) -> Result<(StatusCode, Json<Event>), AppError> {
    require_admin(session)?;
    let draft = input.into_draft()?;
    let event = state.repo.create_event(draft).await?;

    tracing::info!(event_id = %event.id, date = %event.date, "event created");
    Ok((StatusCode::CREATED, Json(event)))
}

/// update_event
///
/// [Admin Route] Overwrites every mutable field.
#[utoipa::path(
    put,
    path = "/api/events/{id}",
    tag = "events",
    params(("id" = Uuid, Path, description = "Event ID")),
    request_body = EventInput,
    responses(
        (status = 200, description = "Updated", body = Event),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_event(
    CurrentSession(session): CurrentSession,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<EventInput>,
) -> Result<Json<Event>, AppError> {
    require_admin(session)?;
    let draft = input.into_draft()?;
    let event = state
        .repo
        .update_event(id, draft)
        .await?
        .ok_or_else(|| not_found(ENTITY))?;

    tracing::info!(event_id = %id, "event updated");
    Ok(Json(event))
}

/// delete_event
///
/// [Admin Route]
#[utoipa::path(
    delete,
    path = "/api/events/{id}",
    tag = "events",
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Deleted", body = Ack),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_event(
    CurrentSession(session): CurrentSession,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Ack>, AppError> {
    require_admin(session)?;
    if !state.repo.delete_event(id).await? {
        return Err(not_found(ENTITY));
    }

    tracing::info!(event_id = %id, "event deleted");
    Ok(Json(Ack::ok()))
}
