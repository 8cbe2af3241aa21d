use crate::{AppState, handlers::auth};
use axum::{
    Router,
    routing::{get, post},
};

/// Auth Router Module
///
/// Sign-in for the admin dashboard. Accounts are created with the `create_admin`
/// utility; there is no self-registration.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/session", get(auth::current_session))
}
