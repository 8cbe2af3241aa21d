use crate::{
    AppState,
    handlers::{media, movement},
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Media Router Module
///
/// The media library, the upload endpoint and the public movement sign-up.
pub fn media_routes(upload_limit: usize) -> Router<AppState> {
    Router::new()
        // POST /api/upload
        // Multipart upload. The default 2 MB body limit is replaced by the configured
        // maximum so oversize files reach the handler's own check.
        .route(
            "/api/upload",
            post(media::upload_media)
                .layer(DefaultBodyLimit::max(upload_limit + MULTIPART_OVERHEAD)),
        )
        .route("/api/media", get(media::list_media))
        .route(
            "/api/media/{id}",
            get(media::get_media)
                .put(media::update_media)
                .delete(media::delete_media),
        )
        // POST is the public sign-up form; reads and deletes are admin-only.
        .route(
            "/api/movement-members",
            get(movement::list_movement_members).post(movement::join_movement),
        )
        .route(
            "/api/movement-members/{id}",
            get(movement::get_movement_member).delete(movement::delete_movement_member),
        )
}
