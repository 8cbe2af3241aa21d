use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, header, request::Parts},
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{config::AppConfig, error::AppError, models::User};

/// Cookies that may carry the session token, highest priority first.
pub const SESSION_COOKIE_NAMES: [&str; 3] = [
    "next-auth.session-token",
    "__Secure-next-auth.session-token",
    "auth-token",
];

/// The cookie this service sets on login.
pub const AUTH_COOKIE: &str = "auth-token";

pub const ADMIN_ROLE: &str = "admin";
pub const DEFAULT_ROLE: &str = "user";

/// Claims
///
/// The payload of a session token. Tokens minted here always carry `sub`; tokens from
/// the dashboard's sign-in flow may carry `userId` instead.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    /// Expiration Time, seconds since the epoch. Always validated.
    pub exp: i64,
    #[serde(default)]
    pub iat: Option<i64>,
}

/// SessionUser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct SessionUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
}

/// Session
///
/// The resolved identity of the caller for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct Session {
    pub user: SessionUser,
    #[ts(type = "string")]
    pub expires: DateTime<Utc>,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.user.role == ADMIN_ROLE
    }

    /// Builds a session from verified claims. `None` when no usable user id is present.
    pub fn from_claims(claims: Claims) -> Option<Self> {
        let raw_id = claims.sub.or(claims.user_id)?;
        let id = Uuid::parse_str(raw_id.trim()).ok()?;
        let expires = DateTime::<Utc>::from_timestamp(claims.exp, 0)?;

        Some(Self {
            user: SessionUser {
                id,
                email: claims.email.unwrap_or_default(),
                name: claims.name.unwrap_or_default(),
                role: claims
                    .role
                    .filter(|role| !role.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_ROLE.to_string()),
            },
            expires,
        })
    }
}

/// Returns the session token carried by the request: a bearer header first, then the
/// first recognized cookie in priority order.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    let cookies: Vec<(&str, &str)> = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|line| line.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .collect();

    SESSION_COOKIE_NAMES.iter().find_map(|name| {
        cookies
            .iter()
            .find(|(key, value)| key == name && !value.is_empty())
            .map(|(_, value)| value.to_string())
    })
}

/// Verifies an HS256 token with `secret`, enforcing expiry.
pub fn decode_session_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let validation = Validation::new(Algorithm::HS256);
    let data = decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)?;
    Ok(data.claims)
}

/// resolve_session
///
/// Determines the caller's session from request headers. Every failure (no token,
/// bad signature, wrong algorithm, expired, missing user id) yields `None`.
pub fn resolve_session(headers: &HeaderMap, secret: &str) -> Option<Session> {
    let token = extract_token(headers)?;

    match decode_session_token(&token, secret) {
        Ok(claims) => {
            let session = Session::from_claims(claims);
            if session.is_none() {
                tracing::debug!("session token carries no usable user id");
            }
            session
        }
        Err(err) => {
            tracing::debug!(error = %err, "rejected session token");
            None
        }
    }
}

/// issue_session_token
///
/// Signs a session token for `user` valid for `ttl_secs`. Returns the token and its expiry.
pub fn issue_session_token(
    user: &User,
    secret: &str,
    ttl_secs: i64,
) -> Result<(String, DateTime<Utc>), jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let expires = now + Duration::seconds(ttl_secs);
    let claims = Claims {
        sub: Some(user.id.to_string()),
        user_id: None,
        email: Some(user.email.clone()),
        name: Some(user.name.clone()),
        role: Some(user.role.clone()),
        exp: expires.timestamp(),
        iat: Some(now.timestamp()),
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    // Whole seconds, matching what a decode of the token yields.
    let expires = DateTime::<Utc>::from_timestamp(claims.exp, 0).unwrap_or(expires);
    Ok((token, expires))
}

/// `Set-Cookie` value carrying a freshly issued token.
pub fn session_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie =
        format!("{AUTH_COOKIE}={token}; HttpOnly; SameSite=Lax; Path=/; Max-Age={max_age_secs}");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that expires the session cookie.
pub fn clear_session_cookie(secure: bool) -> String {
    session_cookie("", 0, secure)
}

/// CurrentSession Extractor
///
/// The session of the calling request, if any. Never rejects: public handlers ignore it,
/// gated handlers pass it through [`require_admin`].
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Option<Session>);

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
    AppConfig: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AppConfig::from_ref(state);
        Ok(CurrentSession(resolve_session(
            &parts.headers,
            &config.auth_secret,
        )))
    }
}

/// Admin gate: distinguishes "no session" from "session without the admin role".
pub fn require_admin(session: Option<Session>) -> Result<Session, AppError> {
    match session {
        None => Err(AppError::NoSession),
        Some(session) if !session.is_admin() => Err(AppError::NotAdmin),
        Some(session) => Ok(session),
    }
}
