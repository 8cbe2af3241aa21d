use crate::{
    AppState,
    handlers::{events, galleries, pages, posts},
};
use axum::{Router, routing::get};

/// Content Router Module
///
/// CRUD for the editorial content of the site.
pub fn content_routes() -> Router<AppState> {
    Router::new()
        // GET /api/pages?published=&slug=&pageType=
        // POST /api/pages (admin)
        .route("/api/pages", get(pages::list_pages).post(pages::create_page))
        .route(
            "/api/pages/{id}",
            get(pages::get_page)
                .put(pages::update_page)
                .delete(pages::delete_page),
        )
        // GET /api/posts?published=&category=&slug=
        .route("/api/posts", get(posts::list_posts).post(posts::create_post))
        .route(
            "/api/posts/{id}",
            get(posts::get_post)
                .put(posts::update_post)
                .delete(posts::delete_post),
        )
        // GET /api/events?published=&upcoming=
        .route(
            "/api/events",
            get(events::list_events).post(events::create_event),
        )
        .route(
            "/api/events/{id}",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        // GET /api/galleries?published=&slug=
        .route(
            "/api/galleries",
            get(galleries::list_galleries).post(galleries::create_gallery),
        )
        .route(
            "/api/galleries/{id}",
            get(galleries::get_gallery)
                .put(galleries::update_gallery)
                .delete(galleries::delete_gallery),
        )
}
