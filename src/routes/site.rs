use crate::{
    AppState,
    handlers::{favicon, menu, settings, team},
};
use axum::{Router, routing::get};

/// Site Router Module
///
/// Site-wide furniture: the team page, navigation and key/value settings.
pub fn site_routes() -> Router<AppState> {
    Router::new()
        .route("/api/team", get(team::list_team).post(team::create_team_member))
        .route(
            "/api/team/{id}",
            get(team::get_team_member)
                .put(team::update_team_member)
                .delete(team::delete_team_member),
        )
        // GET /api/menu?published=&parentId=root|<id>
        .route(
            "/api/menu",
            get(menu::list_menu_items).post(menu::create_menu_item),
        )
        // Static segment; takes precedence over /api/menu/{id}.
        .route("/api/menu/tree", get(menu::menu_tree))
        .route(
            "/api/menu/{id}",
            get(menu::get_menu_item)
                .put(menu::update_menu_item)
                .delete(menu::delete_menu_item),
        )
        // POST /api/settings is the bulk save; its access level is configurable.
        .route(
            "/api/settings",
            get(settings::list_settings).post(settings::save_settings),
        )
        .route(
            "/api/settings/{key}",
            get(settings::get_setting)
                .put(settings::update_setting)
                .delete(settings::delete_setting),
        )
        .route("/api/favicon", get(favicon::get_favicon))
}
