//! Router Module Index
//!
//! Routes are grouped by the part of the site they serve. Access control is not a
//! router concern here: public reads need no session, and every write resolves the
//! session and checks the admin role inside its handler.

/// Pages, posts, events and galleries.
pub mod content;

/// Team, navigation menu, settings and favicon.
pub mod site;

/// Media library, uploads and movement sign-ups.
pub mod media;

/// Login, logout and session introspection.
pub mod auth;

use crate::AppState;
use axum::Router;

/// api_routes
///
/// Every `/api/...` route. `upload_limit` bounds the request body of `POST /api/upload`.
pub fn api_routes(upload_limit: usize) -> Router<AppState> {
    Router::new()
        .merge(content::content_routes())
        .merge(site::site_routes())
        .merge(media::media_routes(upload_limit))
        .merge(auth::auth_routes())
}
