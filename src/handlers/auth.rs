use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};

use crate::{
    AppState,
    auth::{
        CurrentSession, Session, SessionUser, clear_session_cookie, issue_session_token,
        session_cookie,
    },
    error::AppError,
    extract::Json,
    models::{Ack, LoginRequest},
};

/// login
///
/// [Public Route] Verifies the password against the stored bcrypt hash, issues a
/// session token and sets it as the `auth-token` cookie. Unknown emails and wrong
/// passwords get the same answer.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in; sets the auth-token cookie", body = Session),
        (status = 400, description = "Email and password are required"),
        (status = 401, description = "Invalid email or password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, AppError> {
    let email = request.email.trim();
    if email.is_empty() || request.password.is_empty() {
        return Err(AppError::Validation(
            "Email and password are required".to_string(),
        ));
    }

    let user = state
        .repo
        .find_user_by_email(email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !bcrypt::verify(&request.password, &user.password).unwrap_or(false) {
        tracing::debug!(user_id = %user.id, "password mismatch");
        return Err(AppError::InvalidCredentials);
    }

    let config = &state.config;
    let (token, expires) = issue_session_token(&user, &config.auth_secret, config.session_ttl_secs)?;
    let cookie = session_cookie(&token, config.session_ttl_secs, config.is_production());

    tracing::info!(user_id = %user.id, role = %user.role, "user signed in");
    let session = Session {
        user: SessionUser {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
        },
        expires,
    };
    Ok(([(header::SET_COOKIE, cookie)], Json(session)).into_response())
}

/// logout
///
/// [Public Route] Expires the session cookie. Tokens are stateless, so a copied token
/// stays valid until its own expiry.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "auth",
    responses((status = 200, description = "Cookie cleared", body = Ack))
)]
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(
            header::SET_COOKIE,
            clear_session_cookie(state.config.is_production()),
        )],
        Json(Ack::ok()),
    )
}

/// current_session
///
/// [Public Route] The caller's session, or `null`.
#[utoipa::path(
    get,
    path = "/api/auth/session",
    tag = "auth",
    responses((status = 200, description = "The session, or null when signed out", body = Session))
)]
pub async fn current_session(CurrentSession(session): CurrentSession) -> Json<Option<Session>> {
    Json(session)
}
