use campaign_site::{
    MIGRATOR,
    error::StoreError,
    models::{
        EventFilter, EventInput, MenuFilter, MenuItemInput, MenuItemPatch, NewUser, PageFilter,
        PageInput, ParentScope, PostFilter, PostInput, SettingInput,
    },
    repository::{MemoryRepository, PostgresRepository, Repository},
};
use chrono::{Duration, Utc};
use sqlx::PgPool;
use tokio::test;
use uuid::Uuid;

// --- Test Context and Setup ---

/// Holds the pool of the Postgres test database.
struct DbTestContext {
    pool: PgPool,
}

impl DbTestContext {
    async fn setup() -> Self {
        dotenv::dotenv().ok();

        let db_url = std::env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set to run integration tests");

        let pool = PgPool::connect(&db_url)
            .await
            .expect("Failed to connect to database for integration tests.");

        MIGRATOR
            .run(&pool)
            .await
            .expect("Failed to run database migrations.");

        DbTestContext { pool }
    }

    fn repository(&self) -> PostgresRepository {
        PostgresRepository::new(self.pool.clone())
    }
}

// --- Test Data Helpers ---

/// A unique suffix, so runs against a persistent database never collide.
fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

async fn create_author(repo: &dyn Repository) -> campaign_site::models::User {
    repo.create_user(NewUser {
        email: format!("{}@campaign.test", unique("author")),
        name: "Ada Author".to_string(),
        password: "$2b$04$not-a-real-hash".to_string(),
        role: "admin".to_string(),
    })
    .await
    .expect("create author")
}

fn page(slug: &str, published: bool) -> PageInput {
    PageInput {
        title: "Page".to_string(),
        slug: slug.to_string(),
        published,
        ..Default::default()
    }
}

// --- Shared contract checks (run against both stores) ---

async fn check_page_author_join(repo: &dyn Repository) {
    let author = create_author(repo).await;
    let slug = unique("about");
    let draft = page(&slug, true).into_draft().unwrap();

    let created = repo.create_page(draft, author.id).await.unwrap();
    assert_eq!(created.author_id, author.id);
    assert_eq!(created.author_name.as_deref(), Some("Ada Author"));

    let by_slug = repo.find_page_by_slug(&slug).await.unwrap().expect("by slug");
    assert_eq!(by_slug.id, created.id);
    assert_eq!(by_slug.author_email, Some(author.email.clone()));

    let listed = repo
        .list_pages(&PageFilter {
            slug: Some(slug.clone()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
}

async fn check_slug_unique_violation(repo: &dyn Repository) {
    let author = create_author(repo).await;
    let slug = unique("launch");
    let post = PostInput {
        title: "Launch".to_string(),
        slug: slug.clone(),
        ..Default::default()
    };

    repo.create_post(post.clone().into_draft().unwrap(), author.id)
        .await
        .unwrap();
    let err = repo
        .create_post(post.into_draft().unwrap(), author.id)
        .await
        .expect_err("duplicate slug");
    assert!(matches!(err, StoreError::UniqueViolation(ref name) if name == "posts_slug_key"));

    let listed = repo
        .list_posts(&PostFilter {
            slug: Some(slug),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
}

async fn check_email_unique_ignores_case(repo: &dyn Repository) {
    let email = format!("{}@campaign.test", unique("case"));
    let new_user = |email: String| NewUser {
        email,
        name: "Case".to_string(),
        password: "x".to_string(),
        role: "user".to_string(),
    };

    repo.create_user(new_user(email.clone())).await.unwrap();
    let err = repo
        .create_user(new_user(email.to_uppercase()))
        .await
        .expect_err("same email, other case");
    assert!(matches!(err, StoreError::UniqueViolation(_)));

    let found = repo
        .find_user_by_email(&email.to_uppercase())
        .await
        .unwrap();
    assert!(found.is_some());
}

async fn check_menu_delete_detaches_children(repo: &dyn Repository) {
    let parent = repo
        .create_menu_item(MenuItemInput {
            label: "About".to_string(),
            url: "/about".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    let child = repo
        .create_menu_item(MenuItemInput {
            label: "Team".to_string(),
            url: "/team".to_string(),
            parent_id: Some(parent.id),
            ..Default::default()
        })
        .await
        .unwrap();

    let children = repo
        .list_menu_items(&MenuFilter {
            published: None,
            parent: ParentScope::Children(parent.id),
        })
        .await
        .unwrap();
    assert_eq!(children.len(), 1);

    assert!(repo.delete_menu_item(parent.id).await.unwrap());
    let child = repo.get_menu_item(child.id).await.unwrap().expect("child kept");
    assert_eq!(child.parent_id, None);

    assert!(!repo.delete_menu_item(parent.id).await.unwrap());
}

async fn check_menu_patch(repo: &dyn Repository) {
    let item = repo
        .create_menu_item(MenuItemInput {
            label: "Join".to_string(),
            url: "/join".to_string(),
            icon: Some("hand".to_string()),
            order: 7,
            ..Default::default()
        })
        .await
        .unwrap();

    let updated = repo
        .update_menu_item(
            item.id,
            MenuItemPatch {
                published: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .expect("updated");
    assert!(!updated.published);
    assert_eq!(updated.label, "Join");
    assert_eq!(updated.order, 7);
    assert_eq!(updated.icon.as_deref(), Some("hand"));
    assert!(updated.updated_at >= item.updated_at);

    let cleared = repo
        .update_menu_item(
            item.id,
            MenuItemPatch {
                label: Some("  Join us ".to_string()),
                icon: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .expect("updated");
    assert_eq!(cleared.label, "Join us");
    assert_eq!(cleared.icon, None);

    assert!(
        repo.update_menu_item(Uuid::new_v4(), MenuItemPatch::default())
            .await
            .unwrap()
            .is_none()
    );
}

async fn check_settings_upsert_primitives(repo: &dyn Repository) {
    let key = unique("site_name");
    let mut input = SettingInput::new(&key, "Old");
    input.description = Some("Shown in the header".to_string());
    repo.insert_setting(input).await.unwrap();

    let err = repo
        .insert_setting(SettingInput::new(&key, "Again"))
        .await
        .expect_err("duplicate key");
    assert!(matches!(err, StoreError::UniqueViolation(_)));

    let updated = repo
        .update_setting(SettingInput::new(&key, "New"))
        .await
        .unwrap()
        .expect("updated");
    assert_eq!(updated.value, "New");
    // The update overwrites the description too.
    assert_eq!(updated.description, None);

    assert!(
        repo.update_setting(SettingInput::new(&unique("missing"), "v"))
            .await
            .unwrap()
            .is_none()
    );
    assert!(repo.delete_setting(&key).await.unwrap());
}

async fn check_event_window(repo: &dyn Repository) {
    let title = unique("window");
    for offset in [5, -5] {
        repo.create_event(
            EventInput {
                title: title.clone(),
                date: Some(Utc::now() + Duration::days(offset)),
                ..Default::default()
            }
            .into_draft()
            .unwrap(),
        )
        .await
        .unwrap();
    }

    let upcoming = repo
        .list_events(&EventFilter {
            upcoming: Some(true),
            ..Default::default()
        })
        .await
        .unwrap();
    let ours: Vec<_> = upcoming.iter().filter(|e| e.title == title).collect();
    assert_eq!(ours.len(), 1);
    assert!(ours[0].date > Utc::now());
}

// --- In-memory store ---

#[test]
async fn memory_page_author_join() {
    check_page_author_join(&MemoryRepository::new()).await;
}

#[test]
async fn memory_slug_unique_violation() {
    check_slug_unique_violation(&MemoryRepository::new()).await;
}

#[test]
async fn memory_email_unique_ignores_case() {
    check_email_unique_ignores_case(&MemoryRepository::new()).await;
}

#[test]
async fn memory_menu_delete_detaches_children() {
    check_menu_delete_detaches_children(&MemoryRepository::new()).await;
}

#[test]
async fn memory_menu_patch() {
    check_menu_patch(&MemoryRepository::new()).await;
}

#[test]
async fn memory_settings_upsert_primitives() {
    check_settings_upsert_primitives(&MemoryRepository::new()).await;
}

#[test]
async fn memory_event_window() {
    check_event_window(&MemoryRepository::new()).await;
}

// --- Postgres store ---

#[test]
#[ignore = "requires DATABASE_URL pointing at a disposable Postgres database"]
async fn postgres_page_author_join() {
    let ctx = DbTestContext::setup().await;
    check_page_author_join(&ctx.repository()).await;
}

#[test]
#[ignore = "requires DATABASE_URL pointing at a disposable Postgres database"]
async fn postgres_slug_unique_violation() {
    let ctx = DbTestContext::setup().await;
    check_slug_unique_violation(&ctx.repository()).await;
}

#[test]
#[ignore = "requires DATABASE_URL pointing at a disposable Postgres database"]
async fn postgres_email_unique_ignores_case() {
    let ctx = DbTestContext::setup().await;
    check_email_unique_ignores_case(&ctx.repository()).await;
}

#[test]
#[ignore = "requires DATABASE_URL pointing at a disposable Postgres database"]
async fn postgres_menu_delete_detaches_children() {
    let ctx = DbTestContext::setup().await;
    check_menu_delete_detaches_children(&ctx.repository()).await;
}

#[test]
#[ignore = "requires DATABASE_URL pointing at a disposable Postgres database"]
async fn postgres_menu_patch() {
    let ctx = DbTestContext::setup().await;
    check_menu_patch(&ctx.repository()).await;
}

#[test]
#[ignore = "requires DATABASE_URL pointing at a disposable Postgres database"]
async fn postgres_settings_upsert_primitives() {
    let ctx = DbTestContext::setup().await;
    check_settings_upsert_primitives(&ctx.repository()).await;
}

#[test]
#[ignore = "requires DATABASE_URL pointing at a disposable Postgres database"]
async fn postgres_event_window() {
    let ctx = DbTestContext::setup().await;
    check_event_window(&ctx.repository()).await;
}
