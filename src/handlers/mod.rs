//! HTTP handlers, one module per resource.
//!
//! Every handler returns `Result<_, AppError>`. Public reads ignore the session;
//! writes resolve it with [`CurrentSession`](crate::auth::CurrentSession) and gate
//! on [`require_admin`](crate::auth::require_admin) inline.

use uuid::Uuid;

use crate::{
    auth::{Session, require_admin},
    config::AccessPolicy,
    error::AppError,
};

pub mod auth;
pub mod events;
pub mod favicon;
pub mod galleries;
pub mod media;
pub mod menu;
pub mod movement;
pub mod pages;
pub mod posts;
pub mod settings;
pub mod team;

pub(crate) fn not_found(entity: &str) -> AppError {
    AppError::NotFound(format!("{entity} not found"))
}

pub(crate) fn slug_taken(entity: &str) -> String {
    format!("{entity} with this slug already exists")
}

/// Fails with a conflict when `holder` (the record currently owning the slug) is some
/// record other than `own_id`.
pub(crate) fn ensure_slug_available(
    holder: Option<Uuid>,
    own_id: Option<Uuid>,
    entity: &str,
) -> Result<(), AppError> {
    match holder {
        Some(holder) if Some(holder) != own_id => Err(AppError::Conflict(slug_taken(entity))),
        _ => Ok(()),
    }
}

/// Applies a configurable access policy to the caller's session.
pub(crate) fn check_access(
    policy: AccessPolicy,
    session: Option<Session>,
) -> Result<Option<Session>, AppError> {
    match policy {
        AccessPolicy::Public => Ok(session),
        AccessPolicy::Admin => require_admin(session).map(Some),
    }
}
