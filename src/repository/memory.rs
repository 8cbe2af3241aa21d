use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::{
    cmp::Reverse,
    sync::atomic::{AtomicBool, Ordering},
};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Repository, StoreResult};
use crate::{
    error::StoreError,
    models::{
        Event, EventDraft, EventFilter, EventGalleryRecord, GalleryDraft, GalleryFilter, Media,
        MediaDraft, MenuFilter, MenuItem, MenuItemInput, MenuItemPatch, MovementMemberDraft,
        MovementMemberRecord, NewUser, PageDraft, PageFilter, PageRecord, ParentScope, PostDraft,
        PostFilter, PostRecord, Setting, SettingInput, TeamMember, TeamMemberInput, User,
    },
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    pages: Vec<PageRecord>,
    posts: Vec<PostRecord>,
    events: Vec<Event>,
    galleries: Vec<EventGalleryRecord>,
    team: Vec<TeamMember>,
    menu: Vec<MenuItem>,
    settings: Vec<Setting>,
    media: Vec<Media>,
    movement: Vec<MovementMemberRecord>,
    last_tick: Option<DateTime<Utc>>,
}

impl Tables {
    /// Strictly increasing timestamps, so "most recent first" orderings stay
    /// deterministic even when writes land within the same clock tick.
    fn tick(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let next = match self.last_tick {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_tick = Some(next);
        next
    }

    fn author_columns(&self, author_id: Uuid) -> (Option<String>, Option<String>) {
        self.users
            .iter()
            .find(|user| user.id == author_id)
            .map(|user| (Some(user.name.clone()), Some(user.email.clone())))
            .unwrap_or_default()
    }

    fn with_page_author(&self, mut record: PageRecord) -> PageRecord {
        (record.author_name, record.author_email) = self.author_columns(record.author_id);
        record
    }

    fn with_post_author(&self, mut record: PostRecord) -> PostRecord {
        (record.author_name, record.author_email) = self.author_columns(record.author_id);
        record
    }
}

fn unique_violation(constraint: &str) -> StoreError {
    StoreError::UniqueViolation(constraint.to_string())
}

fn matches_flag(filter: Option<bool>, value: bool) -> bool {
    filter.is_none_or(|flag| flag == value)
}

/// MemoryRepository
///
/// A process-local `Repository` holding every table in memory. It enforces the same
/// unique keys, filters and orderings as the Postgres schema, which makes it the
/// store of choice for handler tests and local experiments without a database.
#[derive(Default)]
pub struct MemoryRepository {
    tables: RwLock<Tables>,
    media_unavailable: AtomicBool,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, media inserts fail with a database error.
    pub fn set_media_unavailable(&self, unavailable: bool) {
        self.media_unavailable.store(unavailable, Ordering::SeqCst);
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    // --- Users ---

    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|user| user.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .iter()
            .any(|existing| existing.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(unique_violation("users_email_key"));
        }

        let created = User {
            id: Uuid::new_v4(),
            email: user.email,
            name: user.name,
            password: user.password,
            role: user.role,
            created_at: tables.tick(),
        };
        tables.users.push(created.clone());
        Ok(created)
    }

    // --- Pages ---

    async fn list_pages(&self, filter: &PageFilter) -> StoreResult<Vec<PageRecord>> {
        let tables = self.tables.read().await;
        let mut pages: Vec<PageRecord> = tables
            .pages
            .iter()
            .filter(|page| matches_flag(filter.published, page.published))
            .filter(|page| filter.slug.as_ref().is_none_or(|slug| &page.slug == slug))
            .filter(|page| {
                filter
                    .page_type
                    .as_ref()
                    .is_none_or(|page_type| &page.page_type == page_type)
            })
            .map(|page| tables.with_page_author(page.clone()))
            .collect();
        pages.sort_by_key(|page| Reverse(page.updated_at));
        Ok(pages)
    }

    async fn get_page(&self, id: Uuid) -> StoreResult<Option<PageRecord>> {
        let tables = self.tables.read().await;
        Ok(tables
            .pages
            .iter()
            .find(|page| page.id == id)
            .map(|page| tables.with_page_author(page.clone())))
    }

    async fn find_page_by_slug(&self, slug: &str) -> StoreResult<Option<PageRecord>> {
        let tables = self.tables.read().await;
        Ok(tables
            .pages
            .iter()
            .find(|page| page.slug == slug)
            .map(|page| tables.with_page_author(page.clone())))
    }

    async fn create_page(&self, draft: PageDraft, author_id: Uuid) -> StoreResult<PageRecord> {
        let mut tables = self.tables.write().await;
        if tables.pages.iter().any(|page| page.slug == draft.slug) {
            return Err(unique_violation("pages_slug_key"));
        }

        let now = tables.tick();
        let record = PageRecord {
            id: Uuid::new_v4(),
            title: draft.title,
            slug: draft.slug,
            content: draft.content,
            meta_title: draft.meta_title,
            meta_description: draft.meta_description,
            published: draft.published,
            page_type: draft.page_type,
            template: draft.template,
            slides: draft.slides,
            sections: draft.sections,
            author_id,
            created_at: now,
            updated_at: now,
            author_name: None,
            author_email: None,
        };
        tables.pages.push(record.clone());
        Ok(tables.with_page_author(record))
    }

    async fn update_page(&self, id: Uuid, draft: PageDraft) -> StoreResult<Option<PageRecord>> {
        let mut tables = self.tables.write().await;
        if tables
            .pages
            .iter()
            .any(|page| page.id != id && page.slug == draft.slug)
        {
            return Err(unique_violation("pages_slug_key"));
        }

        let now = tables.tick();
        let Some(page) = tables.pages.iter_mut().find(|page| page.id == id) else {
            return Ok(None);
        };
        page.title = draft.title;
        page.slug = draft.slug;
        page.content = draft.content;
        page.meta_title = draft.meta_title;
        page.meta_description = draft.meta_description;
        page.published = draft.published;
        page.page_type = draft.page_type;
        page.template = draft.template;
        page.slides = draft.slides;
        page.sections = draft.sections;
        page.updated_at = now;

        let updated = page.clone();
        Ok(Some(tables.with_page_author(updated)))
    }

    async fn delete_page(&self, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.pages.len();
        tables.pages.retain(|page| page.id != id);
        Ok(tables.pages.len() < before)
    }

    // --- Posts ---

    async fn list_posts(&self, filter: &PostFilter) -> StoreResult<Vec<PostRecord>> {
        let tables = self.tables.read().await;
        let mut posts: Vec<PostRecord> = tables
            .posts
            .iter()
            .filter(|post| matches_flag(filter.published, post.published))
            .filter(|post| {
                filter
                    .category
                    .as_ref()
                    .is_none_or(|category| post.category.as_ref() == Some(category))
            })
            .filter(|post| filter.slug.as_ref().is_none_or(|slug| &post.slug == slug))
            .map(|post| tables.with_post_author(post.clone()))
            .collect();
        posts.sort_by_key(|post| Reverse(post.updated_at));
        Ok(posts)
    }

    async fn get_post(&self, id: Uuid) -> StoreResult<Option<PostRecord>> {
        let tables = self.tables.read().await;
        Ok(tables
            .posts
            .iter()
            .find(|post| post.id == id)
            .map(|post| tables.with_post_author(post.clone())))
    }

    async fn find_post_by_slug(&self, slug: &str) -> StoreResult<Option<PostRecord>> {
        let tables = self.tables.read().await;
        Ok(tables
            .posts
            .iter()
            .find(|post| post.slug == slug)
            .map(|post| tables.with_post_author(post.clone())))
    }

    async fn create_post(&self, draft: PostDraft, author_id: Uuid) -> StoreResult<PostRecord> {
        let mut tables = self.tables.write().await;
        if tables.posts.iter().any(|post| post.slug == draft.slug) {
            return Err(unique_violation("posts_slug_key"));
        }

        let now = tables.tick();
        let record = PostRecord {
            id: Uuid::new_v4(),
            title: draft.title,
            slug: draft.slug,
            content: draft.content,
            excerpt: draft.excerpt,
            featured_image: draft.featured_image,
            published: draft.published,
            category: draft.category,
            tags: draft.tags,
            gallery_images: draft.gallery_images,
            author_id,
            created_at: now,
            updated_at: now,
            author_name: None,
            author_email: None,
        };
        tables.posts.push(record.clone());
        Ok(tables.with_post_author(record))
    }

    async fn update_post(&self, id: Uuid, draft: PostDraft) -> StoreResult<Option<PostRecord>> {
        let mut tables = self.tables.write().await;
        if tables
            .posts
            .iter()
            .any(|post| post.id != id && post.slug == draft.slug)
        {
            return Err(unique_violation("posts_slug_key"));
        }

        let now = tables.tick();
        let Some(post) = tables.posts.iter_mut().find(|post| post.id == id) else {
            return Ok(None);
        };
        post.title = draft.title;
        post.slug = draft.slug;
        post.content = draft.content;
        post.excerpt = draft.excerpt;
        post.featured_image = draft.featured_image;
        post.published = draft.published;
        post.category = draft.category;
        post.tags = draft.tags;
        post.gallery_images = draft.gallery_images;
        post.updated_at = now;

        let updated = post.clone();
        Ok(Some(tables.with_post_author(updated)))
    }

    async fn delete_post(&self, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.posts.len();
        tables.posts.retain(|post| post.id != id);
        Ok(tables.posts.len() < before)
    }

    // --- Events ---

    async fn list_events(&self, filter: &EventFilter) -> StoreResult<Vec<Event>> {
        let tables = self.tables.read().await;
        let now = Utc::now();
        let mut events: Vec<Event> = tables
            .events
            .iter()
            .filter(|event| matches_flag(filter.published, event.published))
            .filter(|event| match filter.upcoming {
                Some(true) => event.date >= now,
                Some(false) => event.date < now,
                None => true,
            })
            .cloned()
            .collect();
        events.sort_by_key(|event| event.date);
        Ok(events)
    }

    async fn get_event(&self, id: Uuid) -> StoreResult<Option<Event>> {
        let tables = self.tables.read().await;
        Ok(tables.events.iter().find(|event| event.id == id).cloned())
    }

    async fn create_event(&self, draft: EventDraft) -> StoreResult<Event> {
        let mut tables = self.tables.write().await;
        let now = tables.tick();
        let event = Event {
            id: Uuid::new_v4(),
            title: draft.title,
            description: draft.description,
            date: draft.date,
            location: draft.location,
            image_url: draft.image_url,
            published: draft.published,
            created_at: now,
            updated_at: now,
        };
        tables.events.push(event.clone());
        Ok(event)
    }

    async fn update_event(&self, id: Uuid, draft: EventDraft) -> StoreResult<Option<Event>> {
        let mut tables = self.tables.write().await;
        let now = tables.tick();
        let Some(event) = tables.events.iter_mut().find(|event| event.id == id) else {
            return Ok(None);
        };
        event.title = draft.title;
        event.description = draft.description;
        event.date = draft.date;
        event.location = draft.location;
        event.image_url = draft.image_url;
        event.published = draft.published;
        event.updated_at = now;
        Ok(Some(event.clone()))
    }

    async fn delete_event(&self, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.events.len();
        tables.events.retain(|event| event.id != id);
        Ok(tables.events.len() < before)
    }

    // --- Galleries ---

    async fn list_galleries(
        &self,
        filter: &GalleryFilter,
    ) -> StoreResult<Vec<EventGalleryRecord>> {
        let tables = self.tables.read().await;
        let mut galleries: Vec<EventGalleryRecord> = tables
            .galleries
            .iter()
            .filter(|gallery| matches_flag(filter.published, gallery.published))
            .filter(|gallery| filter.slug.as_ref().is_none_or(|slug| &gallery.slug == slug))
            .cloned()
            .collect();
        // Dated galleries newest first, undated ones last; ties by creation, newest first.
        galleries.sort_by(|a, b| match (a.event_date, b.event_date) {
            (Some(x), Some(y)) => y.cmp(&x).then(b.created_at.cmp(&a.created_at)),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => b.created_at.cmp(&a.created_at),
        });
        Ok(galleries)
    }

    async fn get_gallery(&self, id: Uuid) -> StoreResult<Option<EventGalleryRecord>> {
        let tables = self.tables.read().await;
        Ok(tables
            .galleries
            .iter()
            .find(|gallery| gallery.id == id)
            .cloned())
    }

    async fn find_gallery_by_slug(&self, slug: &str) -> StoreResult<Option<EventGalleryRecord>> {
        let tables = self.tables.read().await;
        Ok(tables
            .galleries
            .iter()
            .find(|gallery| gallery.slug == slug)
            .cloned())
    }

    async fn create_gallery(&self, draft: GalleryDraft) -> StoreResult<EventGalleryRecord> {
        let mut tables = self.tables.write().await;
        if tables.galleries.iter().any(|gallery| gallery.slug == draft.slug) {
            return Err(unique_violation("event_galleries_slug_key"));
        }

        let now = tables.tick();
        let record = EventGalleryRecord {
            id: Uuid::new_v4(),
            title: draft.title,
            slug: draft.slug,
            description: draft.description,
            location: draft.location,
            event_date: draft.event_date,
            images: draft.images,
            published: draft.published,
            created_at: now,
            updated_at: now,
        };
        tables.galleries.push(record.clone());
        Ok(record)
    }

    async fn update_gallery(
        &self,
        id: Uuid,
        draft: GalleryDraft,
    ) -> StoreResult<Option<EventGalleryRecord>> {
        let mut tables = self.tables.write().await;
        if tables
            .galleries
            .iter()
            .any(|gallery| gallery.id != id && gallery.slug == draft.slug)
        {
            return Err(unique_violation("event_galleries_slug_key"));
        }

        let now = tables.tick();
        let Some(gallery) = tables.galleries.iter_mut().find(|gallery| gallery.id == id) else {
            return Ok(None);
        };
        gallery.title = draft.title;
        gallery.slug = draft.slug;
        gallery.description = draft.description;
        gallery.location = draft.location;
        gallery.event_date = draft.event_date;
        gallery.images = draft.images;
        gallery.published = draft.published;
        gallery.updated_at = now;
        Ok(Some(gallery.clone()))
    }

    async fn delete_gallery(&self, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.galleries.len();
        tables.galleries.retain(|gallery| gallery.id != id);
        Ok(tables.galleries.len() < before)
    }

    // --- Team ---

    async fn list_team(&self, published: Option<bool>) -> StoreResult<Vec<TeamMember>> {
        let tables = self.tables.read().await;
        let mut team: Vec<TeamMember> = tables
            .team
            .iter()
            .filter(|member| matches_flag(published, member.published))
            .cloned()
            .collect();
        team.sort_by_key(|member| (member.order, member.created_at));
        Ok(team)
    }

    async fn get_team_member(&self, id: Uuid) -> StoreResult<Option<TeamMember>> {
        let tables = self.tables.read().await;
        Ok(tables.team.iter().find(|member| member.id == id).cloned())
    }

    async fn create_team_member(&self, input: TeamMemberInput) -> StoreResult<TeamMember> {
        let mut tables = self.tables.write().await;
        let now = tables.tick();
        let member = TeamMember {
            id: Uuid::new_v4(),
            name: input.name.trim().to_string(),
            title: input.title.trim().to_string(),
            bio: input.bio,
            image_url: input.image_url,
            email: input.email,
            phone: input.phone,
            order: input.order,
            published: input.published,
            created_at: now,
            updated_at: now,
        };
        tables.team.push(member.clone());
        Ok(member)
    }

    async fn update_team_member(
        &self,
        id: Uuid,
        input: TeamMemberInput,
    ) -> StoreResult<Option<TeamMember>> {
        let mut tables = self.tables.write().await;
        let now = tables.tick();
        let Some(member) = tables.team.iter_mut().find(|member| member.id == id) else {
            return Ok(None);
        };
        member.name = input.name.trim().to_string();
        member.title = input.title.trim().to_string();
        member.bio = input.bio;
        member.image_url = input.image_url;
        member.email = input.email;
        member.phone = input.phone;
        member.order = input.order;
        member.published = input.published;
        member.updated_at = now;
        Ok(Some(member.clone()))
    }

    async fn delete_team_member(&self, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.team.len();
        tables.team.retain(|member| member.id != id);
        Ok(tables.team.len() < before)
    }

    // --- Menu ---

    async fn list_menu_items(&self, filter: &MenuFilter) -> StoreResult<Vec<MenuItem>> {
        let tables = self.tables.read().await;
        let mut items: Vec<MenuItem> = tables
            .menu
            .iter()
            .filter(|item| matches_flag(filter.published, item.published))
            .filter(|item| match filter.parent {
                ParentScope::Any => true,
                ParentScope::Root => item.parent_id.is_none(),
                ParentScope::Children(parent_id) => item.parent_id == Some(parent_id),
            })
            .cloned()
            .collect();
        items.sort_by_key(|item| (item.order, item.created_at));
        Ok(items)
    }

    async fn get_menu_item(&self, id: Uuid) -> StoreResult<Option<MenuItem>> {
        let tables = self.tables.read().await;
        Ok(tables.menu.iter().find(|item| item.id == id).cloned())
    }

    async fn create_menu_item(&self, input: MenuItemInput) -> StoreResult<MenuItem> {
        let mut tables = self.tables.write().await;
        let now = tables.tick();
        let item = MenuItem {
            id: Uuid::new_v4(),
            label: input.label.trim().to_string(),
            url: input.url.trim().to_string(),
            icon: input.icon,
            order: input.order,
            parent_id: input.parent_id,
            published: input.published,
            target: input.target,
            created_at: now,
            updated_at: now,
        };
        tables.menu.push(item.clone());
        Ok(item)
    }

    async fn update_menu_item(
        &self,
        id: Uuid,
        patch: MenuItemPatch,
    ) -> StoreResult<Option<MenuItem>> {
        let mut tables = self.tables.write().await;
        let now = tables.tick();
        let Some(item) = tables.menu.iter_mut().find(|item| item.id == id) else {
            return Ok(None);
        };
        item.apply(patch);
        item.updated_at = now;
        Ok(Some(item.clone()))
    }

    async fn delete_menu_item(&self, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.menu.len();
        tables.menu.retain(|item| item.id != id);
        let removed = tables.menu.len() < before;
        if removed {
            for child in tables.menu.iter_mut().filter(|item| item.parent_id == Some(id)) {
                child.parent_id = None;
            }
        }
        Ok(removed)
    }

    // --- Settings ---

    async fn list_settings(&self) -> StoreResult<Vec<Setting>> {
        let tables = self.tables.read().await;
        let mut settings = tables.settings.clone();
        settings.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(settings)
    }

    async fn get_setting(&self, key: &str) -> StoreResult<Option<Setting>> {
        let tables = self.tables.read().await;
        Ok(tables.settings.iter().find(|setting| setting.key == key).cloned())
    }

    async fn insert_setting(&self, input: SettingInput) -> StoreResult<Setting> {
        let mut tables = self.tables.write().await;
        if tables.settings.iter().any(|setting| setting.key == input.key) {
            return Err(unique_violation("settings_pkey"));
        }

        let setting = Setting {
            key: input.key,
            value: input.value,
            setting_type: input.setting_type,
            description: input.description,
            updated_at: tables.tick(),
        };
        tables.settings.push(setting.clone());
        Ok(setting)
    }

    async fn update_setting(&self, input: SettingInput) -> StoreResult<Option<Setting>> {
        let mut tables = self.tables.write().await;
        let now = tables.tick();
        let Some(setting) = tables
            .settings
            .iter_mut()
            .find(|setting| setting.key == input.key)
        else {
            return Ok(None);
        };
        setting.value = input.value;
        setting.setting_type = input.setting_type;
        setting.description = input.description;
        setting.updated_at = now;
        Ok(Some(setting.clone()))
    }

    async fn delete_setting(&self, key: &str) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.settings.len();
        tables.settings.retain(|setting| setting.key != key);
        Ok(tables.settings.len() < before)
    }

    // --- Media ---

    async fn list_media(&self) -> StoreResult<Vec<Media>> {
        let tables = self.tables.read().await;
        let mut media = tables.media.clone();
        media.sort_by_key(|item| Reverse(item.created_at));
        Ok(media)
    }

    async fn get_media(&self, id: Uuid) -> StoreResult<Option<Media>> {
        let tables = self.tables.read().await;
        Ok(tables.media.iter().find(|item| item.id == id).cloned())
    }

    async fn create_media(&self, draft: MediaDraft) -> StoreResult<Media> {
        if self.media_unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Database("media table unavailable".to_string()));
        }
        let mut tables = self.tables.write().await;
        let media = Media {
            id: Uuid::new_v4(),
            filename: draft.filename,
            original_name: draft.original_name,
            mime_type: draft.mime_type,
            size: draft.size,
            path: draft.path,
            url: draft.url,
            alt: draft.alt,
            created_at: tables.tick(),
        };
        tables.media.push(media.clone());
        Ok(media)
    }

    async fn update_media_alt(&self, id: Uuid, alt: Option<String>) -> StoreResult<Option<Media>> {
        let mut tables = self.tables.write().await;
        let Some(media) = tables.media.iter_mut().find(|item| item.id == id) else {
            return Ok(None);
        };
        media.alt = alt;
        Ok(Some(media.clone()))
    }

    async fn delete_media(&self, id: Uuid) -> StoreResult<Option<Media>> {
        let mut tables = self.tables.write().await;
        let position = tables.media.iter().position(|item| item.id == id);
        Ok(position.map(|index| tables.media.remove(index)))
    }

    // --- Movement members ---

    async fn list_movement_members(&self) -> StoreResult<Vec<MovementMemberRecord>> {
        let tables = self.tables.read().await;
        let mut members = tables.movement.clone();
        members.sort_by_key(|member| Reverse(member.created_at));
        Ok(members)
    }

    async fn get_movement_member(&self, id: Uuid) -> StoreResult<Option<MovementMemberRecord>> {
        let tables = self.tables.read().await;
        Ok(tables.movement.iter().find(|member| member.id == id).cloned())
    }

    async fn create_movement_member(
        &self,
        draft: MovementMemberDraft,
    ) -> StoreResult<MovementMemberRecord> {
        let mut tables = self.tables.write().await;
        let record = MovementMemberRecord {
            id: Uuid::new_v4(),
            full_name: draft.full_name,
            gender: draft.gender,
            email: draft.email,
            phone_number: draft.phone_number,
            state_of_origin: draft.state_of_origin,
            lga: draft.lga,
            modes_of_transport: draft.modes_of_transport,
            created_at: tables.tick(),
        };
        tables.movement.push(record.clone());
        Ok(record)
    }

    async fn delete_movement_member(&self, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.movement.len();
        tables.movement.retain(|member| member.id != id);
        Ok(tables.movement.len() < before)
    }
}
