use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

/// User
///
/// An account able to sign in to the admin dashboard. Stored in `users`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, Default)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    // bcrypt hash; never leaves the server.
    #[serde(skip_serializing, default)]
    pub password: String,
    // 'admin' or 'user'.
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// NewUser
///
/// Insert payload for the admin bootstrap utility. `password` is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password: String,
    pub role: String,
}

/// AuthorSnapshot
///
/// The slice of the owning user returned alongside pages and posts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct AuthorSnapshot {
    pub name: String,
    pub email: String,
}

impl AuthorSnapshot {
    /// Builds the snapshot from the joined author columns, if the join matched.
    pub(crate) fn from_columns(name: Option<String>, email: Option<String>) -> Option<Self> {
        match (name, email) {
            (None, None) => None,
            (name, email) => Some(Self {
                name: name.unwrap_or_default(),
                email: email.unwrap_or_default(),
            }),
        }
    }
}

/// LoginRequest
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
#[serde(default)]
pub struct LoginRequest {
    #[schema(example = "admin@example.org")]
    pub email: String,
    pub password: String,
}
