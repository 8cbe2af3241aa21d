#![allow(dead_code)]

use campaign_site::{
    AppConfig, AppState, MemoryRepository, MockStorageService,
    auth::{ADMIN_ROLE, DEFAULT_ROLE, Session, SessionUser, issue_session_token},
    models::{NewUser, User},
    repository::{Repository, RepositoryState},
    storage::StorageState,
};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use std::sync::Arc;

pub const TEST_PASSWORD: &str = "correct horse battery staple";

/// A fully wired `AppState` over the in-memory store and mock storage, with handles
/// to both for seeding and assertions.
pub struct TestContext {
    pub state: AppState,
    pub repo: Arc<MemoryRepository>,
    pub storage: MockStorageService,
}

pub fn test_context() -> TestContext {
    test_context_with(AppConfig::default(), MockStorageService::new())
}

pub fn test_context_with(config: AppConfig, storage: MockStorageService) -> TestContext {
    let repo = Arc::new(MemoryRepository::new());
    let state = AppState {
        repo: repo.clone() as RepositoryState,
        storage: Arc::new(storage.clone()) as StorageState,
        config,
    };
    TestContext {
        state,
        repo,
        storage,
    }
}

/// Inserts a user whose password is [`TEST_PASSWORD`]. Cost 4 keeps bcrypt fast in tests.
pub async fn seed_user(repo: &MemoryRepository, email: &str, name: &str, role: &str) -> User {
    let password = bcrypt::hash(TEST_PASSWORD, 4).expect("hash");
    repo.create_user(NewUser {
        email: email.to_string(),
        name: name.to_string(),
        password,
        role: role.to_string(),
    })
    .await
    .expect("seed user")
}

pub async fn seed_admin(repo: &MemoryRepository) -> User {
    seed_user(repo, "admin@campaign.test", "Ada Admin", ADMIN_ROLE).await
}

pub async fn seed_member(repo: &MemoryRepository) -> User {
    seed_user(repo, "member@campaign.test", "Mo Member", DEFAULT_ROLE).await
}

pub fn session_for(user: &User) -> Session {
    Session {
        user: SessionUser {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role.clone(),
        },
        expires: chrono::Utc::now() + chrono::Duration::hours(1),
    }
}

/// A valid token for `user`, signed with the test configuration's secret.
pub fn token_for(user: &User, config: &AppConfig) -> String {
    issue_session_token(user, &config.auth_secret, 3600)
        .expect("sign token")
        .0
}

/// Signs arbitrary claims with HS256.
pub fn mint_token(claims: &serde_json::Value, secret: &str) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("sign claims")
}
