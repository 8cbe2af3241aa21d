use axum::{Router, extract::FromRef, http::HeaderName, routing::get};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod routes;
pub mod storage;

// --- Public Re-exports ---

pub use config::AppConfig;
pub use error::AppError;
pub use repository::{MemoryRepository, PostgresRepository, RepositoryState};
pub use storage::{MockStorageService, S3StorageClient, StorageState};

/// Migrations embedded at compile time; run by the server and the admin utility.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// ApiDoc
///
/// Aggregates every `#[utoipa::path]` handler and `ToSchema` model into the OpenAPI
/// document served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::pages::list_pages, handlers::pages::get_page, handlers::pages::create_page,
        handlers::pages::update_page, handlers::pages::delete_page,
        handlers::posts::list_posts, handlers::posts::get_post, handlers::posts::create_post,
        handlers::posts::update_post, handlers::posts::delete_post,
        handlers::events::list_events, handlers::events::get_event, handlers::events::create_event,
        handlers::events::update_event, handlers::events::delete_event,
        handlers::galleries::list_galleries, handlers::galleries::get_gallery,
        handlers::galleries::create_gallery, handlers::galleries::update_gallery,
        handlers::galleries::delete_gallery,
        handlers::team::list_team, handlers::team::get_team_member,
        handlers::team::create_team_member, handlers::team::update_team_member,
        handlers::team::delete_team_member,
        handlers::menu::list_menu_items, handlers::menu::menu_tree, handlers::menu::get_menu_item,
        handlers::menu::create_menu_item, handlers::menu::update_menu_item,
        handlers::menu::delete_menu_item,
        handlers::settings::list_settings, handlers::settings::get_setting,
        handlers::settings::save_settings, handlers::settings::update_setting,
        handlers::settings::delete_setting,
        handlers::favicon::get_favicon,
        handlers::media::upload_media, handlers::media::list_media, handlers::media::get_media,
        handlers::media::update_media, handlers::media::delete_media,
        handlers::movement::join_movement, handlers::movement::list_movement_members,
        handlers::movement::get_movement_member, handlers::movement::delete_movement_member,
        handlers::auth::login, handlers::auth::logout, handlers::auth::current_session,
    ),
    components(
        schemas(
            models::Page, models::PageInput, models::Post, models::PostInput,
            models::AuthorSnapshot, models::Event, models::EventInput,
            models::EventGallery, models::GalleryInput, models::TeamMember,
            models::TeamMemberInput, models::MenuItem, models::MenuItemInput,
            models::MenuItemPatch, models::MenuNode, models::Setting, models::SettingInput,
            models::SettingsSaved, models::FaviconResponse, models::Media, models::MediaPatch,
            models::UploadResponse, models::MovementMember, models::MovementMemberInput,
            models::LoginRequest, models::Ack, auth::Session, auth::SessionUser,
        )
    ),
    tags(
        (name = "campaign-site", description = "Campaign website CMS API")
    )
)]
pub struct ApiDoc;

/// AppState
///
/// The single shared container for every service the handlers need: the store, object
/// storage and the loaded configuration. Cloned per request.
#[derive(Clone)]
pub struct AppState {
    /// Repository Layer: Postgres in production, in-memory in tests.
    pub repo: RepositoryState,
    /// Storage Layer: S3/MinIO object storage for uploads.
    pub storage: StorageState,
    /// Configuration: The loaded, immutable environment configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for StorageState {
    fn from_ref(app_state: &AppState) -> StorageState {
        app_state.storage.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles the API routes, Swagger UI and health probe, registers the state and wraps
/// everything in the request-id, tracing and CORS layers.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for Request Correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly
    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // GET /health
        // Liveness probe for load balancers; touches neither the store nor storage.
        .route("/health", get(|| async { "ok" }))
        .merge(routes::api_routes(state.config.upload_max_bytes))
        .with_state(state);

    // 3. Observability and Correlation Layers
    base_router
        .layer(
            ServiceBuilder::new()
                // 3a. Generates an `x-request-id` for requests that arrive without one.
                .layer(SetRequestIdLayer::new(
                    x_request_id.clone(),
                    MakeRequestUuid,
                ))
                // 3b. One span per request, tagged with the request id.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // 3c. Echoes the request id on the response.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        // 4. CORS Layer
        .layer(cors)
}

/// trace_span_logger
///
/// Builds the `TraceLayer` span: method, uri and the request id, so every log line of
/// one request can be correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
