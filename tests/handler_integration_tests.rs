mod common;

use axum::{extract::State, http::StatusCode};
use campaign_site::{
    AppConfig, AppError, MockStorageService,
    auth::CurrentSession,
    config::AccessPolicy,
    extract::{Json, Path, Query},
    handlers::{events, favicon, galleries, media, menu, movement, pages, posts, settings, team},
    models::{
        EventFilter, EventInput, GalleryFilter, GalleryInput, MediaDraft, MediaPatch, MenuItemInput,
        MenuItemPatch, MenuQuery, MovementMemberInput, PageFilter, PageInput, PostFilter,
        PostInput, PublishedFilter, SettingInput, TeamMemberInput,
    },
    repository::Repository,
};
use chrono::{Duration, Utc};
use common::{TestContext, seed_admin, seed_member, session_for, test_context, test_context_with};
use serde_json::json;
use tokio::test;
use uuid::Uuid;

// --- Helpers ---

async fn admin(ctx: &TestContext) -> CurrentSession {
    let user = seed_admin(&ctx.repo).await;
    CurrentSession(Some(session_for(&user)))
}

fn post_input(title: &str, slug: &str, published: bool) -> PostInput {
    PostInput {
        title: title.to_string(),
        slug: slug.to_string(),
        content: "...".to_string(),
        published,
        ..Default::default()
    }
}

fn page_input(slug: &str, published: bool) -> PageInput {
    PageInput {
        title: format!("Page {slug}"),
        slug: slug.to_string(),
        content: "<p>body</p>".to_string(),
        published,
        ..Default::default()
    }
}

fn assert_error(err: AppError, status: StatusCode, message: &str) {
    assert_eq!(err.status(), status);
    assert_eq!(err.to_string(), message);
}

// --- Posts ---

#[test]
async fn test_create_post_records_session_user_as_author() {
    let ctx = test_context();
    let user = seed_admin(&ctx.repo).await;

    let (status, Json(post)) = posts::create_post(
        CurrentSession(Some(session_for(&user))),
        State(ctx.state.clone()),
        Json(post_input("Launch", "launch", true)),
    )
    .await
    .expect("create");

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(post.author_id, user.id);
    let author = post.author.expect("author snapshot");
    assert_eq!(author.name, "Ada Admin");
    assert_eq!(author.email, "admin@campaign.test");
}

#[test]
async fn test_post_launch_scenario() {
    let ctx = test_context();
    let session = admin(&ctx).await;

    let (_, Json(created)) = posts::create_post(
        session.clone(),
        State(ctx.state.clone()),
        Json(post_input("Launch", "launch", true)),
    )
    .await
    .expect("first create");

    let Json(listed) = posts::list_posts(
        State(ctx.state.clone()),
        Query(PostFilter {
            published: Some(true),
            ..Default::default()
        }),
    )
    .await
    .expect("list");
    assert!(listed.iter().any(|post| post.id == created.id));

    let err = posts::create_post(
        session,
        State(ctx.state.clone()),
        Json(post_input("Launch again", "launch", true)),
    )
    .await
    .expect_err("duplicate slug");
    assert_error(
        err,
        StatusCode::BAD_REQUEST,
        "Post with this slug already exists",
    );
}

#[test]
async fn test_concurrent_duplicate_slugs_yield_one_success() {
    let ctx = test_context();
    let session = admin(&ctx).await;

    let (first, second) = tokio::join!(
        posts::create_post(
            session.clone(),
            State(ctx.state.clone()),
            Json(post_input("A", "same-slug", false)),
        ),
        posts::create_post(
            session.clone(),
            State(ctx.state.clone()),
            Json(post_input("B", "same-slug", false)),
        ),
    );

    let outcomes = [first.is_ok(), second.is_ok()];
    assert_eq!(outcomes.iter().filter(|ok| **ok).count(), 1);

    let failure = if first.is_err() { first } else { second };
    let err = failure.err().expect("one failure");
    assert_eq!(err.to_string(), "Post with this slug already exists");
}

#[test]
async fn test_update_post_slug_rules() {
    let ctx = test_context();
    let session = admin(&ctx).await;

    let (_, Json(first)) = posts::create_post(
        session.clone(),
        State(ctx.state.clone()),
        Json(post_input("First", "first", true)),
    )
    .await
    .unwrap();
    let (_, Json(second)) = posts::create_post(
        session.clone(),
        State(ctx.state.clone()),
        Json(post_input("Second", "second", true)),
    )
    .await
    .unwrap();

    // Keeping its own slug is fine.
    let Json(updated) = posts::update_post(
        session.clone(),
        State(ctx.state.clone()),
        Path(first.id),
        Json(post_input("First, edited", "first", false)),
    )
    .await
    .expect("own slug");
    assert_eq!(updated.title, "First, edited");
    assert!(!updated.published);

    // Taking another post's slug is not.
    let err = posts::update_post(
        session,
        State(ctx.state.clone()),
        Path(first.id),
        Json(post_input("First", &second.slug, true)),
    )
    .await
    .expect_err("slug taken");
    assert_error(
        err,
        StatusCode::BAD_REQUEST,
        "Post with this slug already exists",
    );
}

#[test]
async fn test_post_filters_by_category_and_preserves_gallery_order() {
    let ctx = test_context();
    let session = admin(&ctx).await;

    let images = vec![
        "https://cdn.test/3.jpg".to_string(),
        "https://cdn.test/1.jpg".to_string(),
        "https://cdn.test/2.jpg".to_string(),
    ];
    let mut input = post_input("Rally recap", "rally-recap", true);
    input.category = Some("news".to_string());
    input.tags = Some("rally, lagos ,youth".to_string());
    input.gallery_images = Some(images.clone());
    posts::create_post(session.clone(), State(ctx.state.clone()), Json(input))
        .await
        .unwrap();
    posts::create_post(
        session,
        State(ctx.state.clone()),
        Json(post_input("Other", "other", true)),
    )
    .await
    .unwrap();

    let Json(news) = posts::list_posts(
        State(ctx.state.clone()),
        Query(PostFilter {
            category: Some("news".to_string()),
            ..Default::default()
        }),
    )
    .await
    .unwrap();

    assert_eq!(news.len(), 1);
    assert_eq!(news[0].gallery_images.as_ref(), Some(&images));
    assert_eq!(news[0].tag_list(), vec!["rally", "lagos", "youth"]);
}

// --- Authorization ---

#[test]
async fn test_gated_operations_distinguish_missing_session_and_role() {
    let ctx = test_context();
    let member = seed_member(&ctx.repo).await;
    let admin_user = seed_admin(&ctx.repo).await;

    let err = pages::create_page(
        CurrentSession(None),
        State(ctx.state.clone()),
        Json(page_input("about", true)),
    )
    .await
    .expect_err("anonymous");
    assert_error(
        err,
        StatusCode::UNAUTHORIZED,
        "Unauthorized: no active session",
    );

    let err = pages::create_page(
        CurrentSession(Some(session_for(&member))),
        State(ctx.state.clone()),
        Json(page_input("about", true)),
    )
    .await
    .expect_err("member");
    assert_error(
        err,
        StatusCode::UNAUTHORIZED,
        "Unauthorized: admin role required",
    );

    let result = pages::create_page(
        CurrentSession(Some(session_for(&admin_user))),
        State(ctx.state.clone()),
        Json(page_input("about", true)),
    )
    .await;
    assert!(result.is_ok());
}

#[test]
async fn test_gate_runs_before_validation() {
    let ctx = test_context();
    let err = events::create_event(
        CurrentSession(None),
        State(ctx.state.clone()),
        Json(EventInput::default()),
    )
    .await
    .expect_err("anonymous");
    assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
}

// --- Pages ---

#[test]
async fn test_page_published_filter_semantics() {
    let ctx = test_context();
    let session = admin(&ctx).await;
    for (slug, published) in [("live", true), ("draft", false), ("live-too", true)] {
        pages::create_page(
            session.clone(),
            State(ctx.state.clone()),
            Json(page_input(slug, published)),
        )
        .await
        .unwrap();
    }

    let list = |published: Option<bool>| {
        let state = ctx.state.clone();
        async move {
            let Json(pages) = pages::list_pages(
                State(state),
                Query(PageFilter {
                    published,
                    ..Default::default()
                }),
            )
            .await
            .unwrap();
            pages
        }
    };

    let published = list(Some(true)).await;
    assert_eq!(published.len(), 2);
    assert!(published.iter().all(|page| page.published));

    let drafts = list(Some(false)).await;
    assert_eq!(drafts.len(), 1);
    assert_eq!(drafts[0].slug, "draft");

    assert_eq!(list(None).await.len(), 3);
}

#[test]
async fn test_page_defaults_and_structured_sections() {
    let ctx = test_context();
    let session = admin(&ctx).await;

    let mut input = page_input("home", true);
    input.slides = Some(vec![json!({"image": "/a.jpg", "caption": "One"})]);
    input.sections = Some(vec![json!({"type": "hero"}), json!({"type": "cta", "href": "/join"})]);

    let (_, Json(created)) = pages::create_page(session, State(ctx.state.clone()), Json(input))
        .await
        .unwrap();
    assert_eq!(created.page_type, "standard");
    assert_eq!(created.template, "default");

    let Json(fetched) = pages::get_page(State(ctx.state.clone()), Path(created.id))
        .await
        .unwrap();
    let sections = fetched.sections.expect("sections");
    assert_eq!(sections.len(), 2);
    assert_eq!(sections[1]["href"], "/join");
    assert_eq!(fetched.slides.expect("slides")[0]["caption"], "One");
}

#[test]
async fn test_page_validation_and_missing_ids() {
    let ctx = test_context();
    let session = admin(&ctx).await;

    let err = pages::create_page(
        session.clone(),
        State(ctx.state.clone()),
        Json(page_input("  ", true)),
    )
    .await
    .expect_err("blank slug");
    assert_error(err, StatusCode::BAD_REQUEST, "Title and slug are required");

    let missing = Uuid::new_v4();
    let err = pages::get_page(State(ctx.state.clone()), Path(missing))
        .await
        .expect_err("missing");
    assert_error(err, StatusCode::NOT_FOUND, "Page not found");

    let err = pages::update_page(
        session.clone(),
        State(ctx.state.clone()),
        Path(missing),
        Json(page_input("ghost", true)),
    )
    .await
    .expect_err("missing");
    assert_eq!(err.status(), StatusCode::NOT_FOUND);

    let err = pages::delete_page(session, State(ctx.state.clone()), Path(missing))
        .await
        .expect_err("missing");
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
}

#[test]
async fn test_store_unique_violation_maps_to_conflict() {
    // A page inserted behind the handler's back still trips the store constraint.
    let ctx = test_context();
    let session = admin(&ctx).await;
    let author = session.0.as_ref().map(|s| s.user.id).unwrap();

    let draft = page_input("raced", true).into_draft().unwrap();
    ctx.repo.create_page(draft.clone(), author).await.unwrap();
    let err = ctx.repo.create_page(draft, author).await.expect_err("dup");
    assert!(matches!(AppError::from(err), AppError::Conflict(_)));
}

// --- Events ---

#[test]
async fn test_events_upcoming_filter_and_order() {
    let ctx = test_context();
    let session = admin(&ctx).await;
    let now = Utc::now();

    for (title, offset) in [("Later", 10), ("Past", -3), ("Soon", 2)] {
        events::create_event(
            session.clone(),
            State(ctx.state.clone()),
            Json(EventInput {
                title: title.to_string(),
                date: Some(now + Duration::days(offset)),
                published: true,
                ..Default::default()
            }),
        )
        .await
        .unwrap();
    }

    let Json(upcoming) = events::list_events(
        State(ctx.state.clone()),
        Query(EventFilter {
            upcoming: Some(true),
            ..Default::default()
        }),
    )
    .await
    .unwrap();
    let titles: Vec<&str> = upcoming.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Soon", "Later"]);

    let Json(past) = events::list_events(
        State(ctx.state.clone()),
        Query(EventFilter {
            upcoming: Some(false),
            ..Default::default()
        }),
    )
    .await
    .unwrap();
    assert_eq!(past.len(), 1);
    assert_eq!(past[0].title, "Past");
}

#[test]
async fn test_event_requires_date() {
    let ctx = test_context();
    let session = admin(&ctx).await;
    let err = events::create_event(
        session,
        State(ctx.state.clone()),
        Json(EventInput {
            title: "Town hall".to_string(),
            ..Default::default()
        }),
    )
    .await
    .expect_err("no date");
    assert_error(err, StatusCode::BAD_REQUEST, "Title and date are required");
}

// --- Galleries ---

#[test]
async fn test_gallery_images_round_trip_and_validation() {
    let ctx = test_context();
    let session = admin(&ctx).await;
    let images = vec!["/g/b.jpg".to_string(), "/g/a.jpg".to_string()];

    let err = galleries::create_gallery(
        session.clone(),
        State(ctx.state.clone()),
        Json(GalleryInput {
            title: "Rally".to_string(),
            slug: "rally".to_string(),
            ..Default::default()
        }),
    )
    .await
    .expect_err("no images");
    assert_error(
        err,
        StatusCode::BAD_REQUEST,
        "Title, slug and at least one image are required",
    );

    let (_, Json(created)) = galleries::create_gallery(
        session.clone(),
        State(ctx.state.clone()),
        Json(GalleryInput {
            title: "Rally".to_string(),
            slug: "rally".to_string(),
            images: images.clone(),
            published: true,
            ..Default::default()
        }),
    )
    .await
    .unwrap();

    let Json(fetched) = galleries::get_gallery(State(ctx.state.clone()), Path(created.id))
        .await
        .unwrap();
    assert_eq!(fetched.images, images);

    let err = galleries::create_gallery(
        session,
        State(ctx.state.clone()),
        Json(GalleryInput {
            title: "Rally 2".to_string(),
            slug: "rally".to_string(),
            images,
            ..Default::default()
        }),
    )
    .await
    .expect_err("dup");
    assert_eq!(err.to_string(), "Gallery with this slug already exists");
}

#[test]
async fn test_galleries_newest_event_first_undated_last() {
    let ctx = test_context();
    let session = admin(&ctx).await;
    let now = Utc::now();

    for (slug, event_date) in [
        ("undated", None),
        ("older", Some(now - Duration::days(30))),
        ("newer", Some(now - Duration::days(1))),
    ] {
        galleries::create_gallery(
            session.clone(),
            State(ctx.state.clone()),
            Json(GalleryInput {
                title: slug.to_string(),
                slug: slug.to_string(),
                event_date,
                images: vec!["/x.jpg".to_string()],
                published: true,
                ..Default::default()
            }),
        )
        .await
        .unwrap();
    }

    let Json(list) = galleries::list_galleries(
        State(ctx.state.clone()),
        Query(GalleryFilter::default()),
    )
    .await
    .unwrap();
    let slugs: Vec<&str> = list.iter().map(|g| g.slug.as_str()).collect();
    assert_eq!(slugs, vec!["newer", "older", "undated"]);
}

// --- Team ---

#[test]
async fn test_team_listing_follows_display_order() {
    let ctx = test_context();
    let session = admin(&ctx).await;

    for (name, order) in [("Third", 3), ("First", 1), ("Second", 2)] {
        team::create_team_member(
            session.clone(),
            State(ctx.state.clone()),
            Json(TeamMemberInput {
                name: name.to_string(),
                title: "Coordinator".to_string(),
                order,
                published: true,
                ..Default::default()
            }),
        )
        .await
        .unwrap();
    }

    let Json(members) = team::list_team(
        State(ctx.state.clone()),
        Query(PublishedFilter {
            published: Some(true),
        }),
    )
    .await
    .unwrap();
    let names: Vec<&str> = members.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["First", "Second", "Third"]);
}

// --- Menu ---

async fn create_item(
    ctx: &TestContext,
    session: &CurrentSession,
    label: &str,
    order: i32,
    parent_id: Option<Uuid>,
) -> campaign_site::models::MenuItem {
    let (_, Json(item)) = menu::create_menu_item(
        session.clone(),
        State(ctx.state.clone()),
        Json(MenuItemInput {
            label: label.to_string(),
            url: format!("/{}", label.to_lowercase()),
            order,
            parent_id,
            ..Default::default()
        }),
    )
    .await
    .expect("create menu item");
    item
}

#[test]
async fn test_menu_partial_update_leaves_other_fields() {
    let ctx = test_context();
    let session = admin(&ctx).await;
    let item = create_item(&ctx, &session, "About", 4, None).await;
    assert!(item.published);
    assert_eq!(item.target, "_self");

    let patch: MenuItemPatch = serde_json::from_value(json!({ "published": false })).unwrap();
    let Json(updated) = menu::update_menu_item(
        session,
        State(ctx.state.clone()),
        Path(item.id),
        Json(patch),
    )
    .await
    .unwrap();

    assert!(!updated.published);
    assert_eq!(updated.label, item.label);
    assert_eq!(updated.url, item.url);
    assert_eq!(updated.order, item.order);
    assert_eq!(updated.target, item.target);
    assert_eq!(updated.parent_id, item.parent_id);
}

#[test]
async fn test_menu_parent_detach_and_tree() {
    let ctx = test_context();
    let session = admin(&ctx).await;
    let about = create_item(&ctx, &session, "About", 1, None).await;
    let team = create_item(&ctx, &session, "Team", 2, Some(about.id)).await;
    let history = create_item(&ctx, &session, "History", 1, Some(about.id)).await;
    create_item(&ctx, &session, "Join", 2, None).await;

    let Json(tree) = menu::menu_tree(State(ctx.state.clone()), Query(PublishedFilter::default()))
        .await
        .unwrap();
    assert_eq!(tree.len(), 2);
    assert_eq!(tree[0].item.id, about.id);
    let children: Vec<Uuid> = tree[0].children.iter().map(|c| c.id).collect();
    assert_eq!(children, vec![history.id, team.id]);

    let Json(root) = menu::list_menu_items(
        State(ctx.state.clone()),
        Query(MenuQuery {
            parent_id: Some("root".to_string()),
            ..Default::default()
        }),
    )
    .await
    .unwrap();
    assert_eq!(root.len(), 2);

    // "parentId": null detaches.
    let patch: MenuItemPatch = serde_json::from_value(json!({ "parentId": null })).unwrap();
    let Json(detached) = menu::update_menu_item(
        session.clone(),
        State(ctx.state.clone()),
        Path(team.id),
        Json(patch),
    )
    .await
    .unwrap();
    assert_eq!(detached.parent_id, None);

    // Deleting a parent promotes its remaining children.
    menu::delete_menu_item(session, State(ctx.state.clone()), Path(about.id))
        .await
        .unwrap();
    let Json(orphan) = menu::get_menu_item(State(ctx.state.clone()), Path(history.id))
        .await
        .unwrap();
    assert_eq!(orphan.parent_id, None);
}

#[test]
async fn test_menu_rejects_bad_parent_references() {
    let ctx = test_context();
    let session = admin(&ctx).await;
    let item = create_item(&ctx, &session, "Home", 0, None).await;

    let err = menu::list_menu_items(
        State(ctx.state.clone()),
        Query(MenuQuery {
            parent_id: Some("nope".to_string()),
            ..Default::default()
        }),
    )
    .await
    .expect_err("bad parentId");
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);

    let patch: MenuItemPatch =
        serde_json::from_value(json!({ "parentId": item.id })).unwrap();
    let err = menu::update_menu_item(
        session.clone(),
        State(ctx.state.clone()),
        Path(item.id),
        Json(patch),
    )
    .await
    .expect_err("self parent");
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);

    let err = menu::create_menu_item(
        session,
        State(ctx.state.clone()),
        Json(MenuItemInput {
            label: "Child".to_string(),
            url: "/child".to_string(),
            parent_id: Some(Uuid::new_v4()),
            ..Default::default()
        }),
    )
    .await
    .expect_err("unknown parent");
    assert_error(
        err,
        StatusCode::BAD_REQUEST,
        "Parent menu item does not exist",
    );
}

#[test]
async fn test_menu_rejects_parent_cycles() {
    let ctx = test_context();
    let session = admin(&ctx).await;
    let about = create_item(&ctx, &session, "About", 1, None).await;
    let team = create_item(&ctx, &session, "Team", 1, Some(about.id)).await;

    // About -> Team would close a loop: About is already Team's parent.
    let patch: MenuItemPatch = serde_json::from_value(json!({ "parentId": team.id })).unwrap();
    let err = menu::update_menu_item(
        session.clone(),
        State(ctx.state.clone()),
        Path(about.id),
        Json(patch),
    )
    .await
    .expect_err("cycle");
    assert_error(
        err,
        StatusCode::BAD_REQUEST,
        "Menu items nest at most two levels",
    );

    let stored = ctx.repo.get_menu_item(about.id).await.unwrap().unwrap();
    assert_eq!(stored.parent_id, None);

    let Json(tree) = menu::menu_tree(State(ctx.state.clone()), Query(PublishedFilter::default()))
        .await
        .unwrap();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].children[0].id, team.id);
}

#[test]
async fn test_menu_rejects_grandchildren() {
    let ctx = test_context();
    let session = admin(&ctx).await;
    let about = create_item(&ctx, &session, "About", 1, None).await;
    let team = create_item(&ctx, &session, "Team", 1, Some(about.id)).await;
    let join = create_item(&ctx, &session, "Join", 2, None).await;

    let err = menu::create_menu_item(
        session.clone(),
        State(ctx.state.clone()),
        Json(MenuItemInput {
            label: "Leaders".to_string(),
            url: "/leaders".to_string(),
            parent_id: Some(team.id),
            ..Default::default()
        }),
    )
    .await
    .expect_err("grandchild");
    assert_error(
        err,
        StatusCode::BAD_REQUEST,
        "Menu items nest at most two levels",
    );

    // An item with children cannot move under another item.
    let patch: MenuItemPatch = serde_json::from_value(json!({ "parentId": join.id })).unwrap();
    let err = menu::update_menu_item(
        session.clone(),
        State(ctx.state.clone()),
        Path(about.id),
        Json(patch),
    )
    .await
    .expect_err("parent with children");
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);

    // A childless item may still move between top-level parents.
    let patch: MenuItemPatch = serde_json::from_value(json!({ "parentId": join.id })).unwrap();
    let Json(moved) = menu::update_menu_item(
        session,
        State(ctx.state.clone()),
        Path(team.id),
        Json(patch),
    )
    .await
    .unwrap();
    assert_eq!(moved.parent_id, Some(join.id));
}

// --- Settings ---

#[test]
async fn test_settings_bulk_save_inserts_and_updates() {
    let ctx = test_context();
    let session = admin(&ctx).await;
    ctx.repo
        .insert_setting(SettingInput::new("site_name", "Old"))
        .await
        .unwrap();

    let Json(saved) = settings::save_settings(
        session,
        State(ctx.state.clone()),
        Json(vec![
            SettingInput::new("site_name", "New Dawn"),
            SettingInput::new("tagline", "Forward"),
            SettingInput::new("tagline", "Forward together"),
        ]),
    )
    .await
    .unwrap();
    assert!(saved.success);
    assert_eq!(saved.saved, 2);

    let Json(all) = settings::list_settings(State(ctx.state.clone())).await.unwrap();
    let pairs: Vec<(&str, &str)> = all
        .iter()
        .map(|s| (s.key.as_str(), s.value.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![("site_name", "New Dawn"), ("tagline", "Forward together")]
    );
}

#[test]
async fn test_settings_bulk_save_access_policy() {
    let ctx = test_context();
    let member = seed_member(&ctx.repo).await;
    let err = settings::save_settings(
        CurrentSession(Some(session_for(&member))),
        State(ctx.state.clone()),
        Json(vec![SettingInput::new("k", "v")]),
    )
    .await
    .expect_err("admin only by default");
    assert_eq!(err.status(), StatusCode::UNAUTHORIZED);

    let open = test_context_with(
        AppConfig {
            settings_save_access: AccessPolicy::Public,
            ..AppConfig::default()
        },
        MockStorageService::new(),
    );
    let Json(saved) = settings::save_settings(
        CurrentSession(None),
        State(open.state.clone()),
        Json(vec![SettingInput::new("k", "v")]),
    )
    .await
    .unwrap();
    assert_eq!(saved.saved, 1);
}

#[test]
async fn test_settings_blank_key_rejected_and_put_missing_key() {
    let ctx = test_context();
    let session = admin(&ctx).await;

    let err = settings::save_settings(
        session.clone(),
        State(ctx.state.clone()),
        Json(vec![SettingInput::new(" ", "v")]),
    )
    .await
    .expect_err("blank key");
    assert_error(err, StatusCode::BAD_REQUEST, "Setting key is required");

    let err = settings::update_setting(
        session,
        State(ctx.state.clone()),
        Path("missing".to_string()),
        Json(SettingInput::new("ignored", "v")),
    )
    .await
    .expect_err("missing");
    assert_error(err, StatusCode::NOT_FOUND, "Setting not found");
}

#[test]
async fn test_settings_put_overwrites_description_bulk_save_keeps_it() {
    let ctx = test_context();
    let session = admin(&ctx).await;
    let mut described = SettingInput::new("tagline", "Forward");
    described.description = Some("Shown under the logo".to_string());
    ctx.repo.insert_setting(described).await.unwrap();

    let Json(saved) = settings::save_settings(
        session.clone(),
        State(ctx.state.clone()),
        Json(vec![SettingInput::new("tagline", "Forward together")]),
    )
    .await
    .unwrap();
    assert_eq!(saved.saved, 1);
    let kept = ctx.repo.get_setting("tagline").await.unwrap().unwrap();
    assert_eq!(kept.value, "Forward together");
    assert_eq!(kept.description.as_deref(), Some("Shown under the logo"));

    let Json(updated) = settings::update_setting(
        session,
        State(ctx.state.clone()),
        Path("tagline".to_string()),
        Json(SettingInput::new("tagline", "Onward")),
    )
    .await
    .unwrap();
    assert_eq!(updated.value, "Onward");
    assert_eq!(updated.description, None);
}

#[test]
async fn test_favicon_falls_back_to_default() {
    let ctx = test_context();
    let Json(default) = favicon::get_favicon(State(ctx.state.clone())).await.unwrap();
    assert_eq!(default.url, "/favicon.ico");

    ctx.repo
        .insert_setting(SettingInput::new("favicon", "https://cdn.test/fav.png"))
        .await
        .unwrap();
    let Json(custom) = favicon::get_favicon(State(ctx.state.clone())).await.unwrap();
    assert_eq!(custom.url, "https://cdn.test/fav.png");
}

// --- Movement members ---

fn sign_up(modes: Vec<&str>) -> MovementMemberInput {
    MovementMemberInput {
        full_name: "Ngozi Eze".to_string(),
        gender: "female".to_string(),
        email: Some("ngozi@example.org".to_string()),
        phone_number: "+2348000000000".to_string(),
        state_of_origin: "Enugu".to_string(),
        lga: "Nsukka".to_string(),
        modes_of_transport: modes.into_iter().map(String::from).collect(),
    }
}

#[test]
async fn test_movement_sign_up_requires_transport_mode() {
    let ctx = test_context();
    let err = movement::join_movement(State(ctx.state.clone()), Json(sign_up(vec![])))
        .await
        .expect_err("no modes");
    assert_error(
        err,
        StatusCode::BAD_REQUEST,
        "Select at least one mode of transport",
    );

    let (status, Json(member)) =
        movement::join_movement(State(ctx.state.clone()), Json(sign_up(vec!["bus", "bike"])))
            .await
            .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(member.modes_of_transport, vec!["bus", "bike"]);
}

#[test]
async fn test_movement_reads_are_admin_only() {
    let ctx = test_context();
    movement::join_movement(State(ctx.state.clone()), Json(sign_up(vec!["car"])))
        .await
        .unwrap();

    let err = movement::list_movement_members(CurrentSession(None), State(ctx.state.clone()))
        .await
        .expect_err("anonymous");
    assert_eq!(err.status(), StatusCode::UNAUTHORIZED);

    let session = admin(&ctx).await;
    let Json(members) = movement::list_movement_members(session, State(ctx.state.clone()))
        .await
        .unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].modes_of_transport, vec!["car"]);
}

// --- Media ---

#[test]
async fn test_media_delete_survives_storage_failure() {
    let ctx = test_context_with(AppConfig::default(), MockStorageService::new_failing());
    let session = admin(&ctx).await;
    let media = ctx
        .repo
        .create_media(MediaDraft {
            filename: "1-a.png".to_string(),
            original_name: "a.png".to_string(),
            mime_type: "image/png".to_string(),
            size: 3,
            path: "uploads/1-a.png".to_string(),
            url: "http://localhost:9000/mock-bucket/uploads/1-a.png".to_string(),
            alt: None,
        })
        .await
        .unwrap();

    let Json(ack) = media::delete_media(session.clone(), State(ctx.state.clone()), Path(media.id))
        .await
        .expect("best-effort storage removal");
    assert!(ack.success);

    let err = media::get_media(State(ctx.state.clone()), Path(media.id))
        .await
        .expect_err("gone");
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
}

#[test]
async fn test_media_alt_update_and_storage_cleanup() {
    let ctx = test_context();
    let session = admin(&ctx).await;
    let media = ctx
        .repo
        .create_media(MediaDraft {
            filename: "2-b.jpg".to_string(),
            original_name: "b.jpg".to_string(),
            mime_type: "image/jpeg".to_string(),
            size: 10,
            path: "uploads/2-b.jpg".to_string(),
            url: "http://localhost:9000/mock-bucket/uploads/2-b.jpg".to_string(),
            alt: None,
        })
        .await
        .unwrap();

    let Json(updated) = media::update_media(
        session.clone(),
        State(ctx.state.clone()),
        Path(media.id),
        Json(MediaPatch {
            alt: Some("Crowd at the rally".to_string()),
        }),
    )
    .await
    .unwrap();
    assert_eq!(updated.alt.as_deref(), Some("Crowd at the rally"));

    media::delete_media(session, State(ctx.state.clone()), Path(media.id))
        .await
        .unwrap();
    assert_eq!(ctx.storage.deleted_keys(), vec!["uploads/2-b.jpg"]);
}

#[test]
async fn test_unique_filename_keeps_extension() {
    let name = media::unique_filename("Rally Photo.JPG");
    assert!(name.ends_with(".jpg"));
    let (millis, rest) = name.split_once('-').unwrap();
    assert!(millis.parse::<i64>().is_ok());
    assert!(Uuid::parse_str(rest.trim_end_matches(".jpg")).is_ok());

    assert!(media::unique_filename("README").ends_with(".bin"));
}
