use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::StoreError,
    models::{
        Event, EventDraft, EventFilter, EventGalleryRecord, GalleryDraft, GalleryFilter, Media,
        MediaDraft, MenuFilter, MenuItem, MenuItemInput, MenuItemPatch, MovementMemberDraft,
        MovementMemberRecord, NewUser, PageDraft, PageFilter, PageRecord, PostDraft, PostFilter,
        PostRecord, Setting, SettingInput, TeamMember, TeamMemberInput, User,
    },
};

mod memory;
mod postgres;

pub use memory::MemoryRepository;
pub use postgres::PostgresRepository;

pub type StoreResult<T> = Result<T, StoreError>;

/// Repository Trait
///
/// The persistence contract for every site resource. Handlers only see this trait,
/// so the Postgres store and the in-memory store are interchangeable.
///
/// Records come back with JSON columns still encoded as text. Lookups return `None`
/// for a missing id; updates return `None` when nothing matched; deletes return
/// whether a row was removed. A unique-constraint violation surfaces as
/// [`StoreError::UniqueViolation`].
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Users ---
    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    async fn create_user(&self, user: NewUser) -> StoreResult<User>;

    // --- Pages ---
    async fn list_pages(&self, filter: &PageFilter) -> StoreResult<Vec<PageRecord>>;
    async fn get_page(&self, id: Uuid) -> StoreResult<Option<PageRecord>>;
    async fn find_page_by_slug(&self, slug: &str) -> StoreResult<Option<PageRecord>>;
    async fn create_page(&self, draft: PageDraft, author_id: Uuid) -> StoreResult<PageRecord>;
    async fn update_page(&self, id: Uuid, draft: PageDraft) -> StoreResult<Option<PageRecord>>;
    async fn delete_page(&self, id: Uuid) -> StoreResult<bool>;

    // --- Posts ---
    async fn list_posts(&self, filter: &PostFilter) -> StoreResult<Vec<PostRecord>>;
    async fn get_post(&self, id: Uuid) -> StoreResult<Option<PostRecord>>;
    async fn find_post_by_slug(&self, slug: &str) -> StoreResult<Option<PostRecord>>;
    async fn create_post(&self, draft: PostDraft, author_id: Uuid) -> StoreResult<PostRecord>;
    async fn update_post(&self, id: Uuid, draft: PostDraft) -> StoreResult<Option<PostRecord>>;
    async fn delete_post(&self, id: Uuid) -> StoreResult<bool>;

    // --- Events ---
    async fn list_events(&self, filter: &EventFilter) -> StoreResult<Vec<Event>>;
    async fn get_event(&self, id: Uuid) -> StoreResult<Option<Event>>;
    async fn create_event(&self, draft: EventDraft) -> StoreResult<Event>;
    async fn update_event(&self, id: Uuid, draft: EventDraft) -> StoreResult<Option<Event>>;
    async fn delete_event(&self, id: Uuid) -> StoreResult<bool>;

    // --- Galleries ---
    async fn list_galleries(&self, filter: &GalleryFilter)
    -> StoreResult<Vec<EventGalleryRecord>>;
    async fn get_gallery(&self, id: Uuid) -> StoreResult<Option<EventGalleryRecord>>;
    async fn find_gallery_by_slug(&self, slug: &str) -> StoreResult<Option<EventGalleryRecord>>;
    async fn create_gallery(&self, draft: GalleryDraft) -> StoreResult<EventGalleryRecord>;
    async fn update_gallery(
        &self,
        id: Uuid,
        draft: GalleryDraft,
    ) -> StoreResult<Option<EventGalleryRecord>>;
    async fn delete_gallery(&self, id: Uuid) -> StoreResult<bool>;

    // --- Team ---
    async fn list_team(&self, published: Option<bool>) -> StoreResult<Vec<TeamMember>>;
    async fn get_team_member(&self, id: Uuid) -> StoreResult<Option<TeamMember>>;
    async fn create_team_member(&self, input: TeamMemberInput) -> StoreResult<TeamMember>;
    async fn update_team_member(
        &self,
        id: Uuid,
        input: TeamMemberInput,
    ) -> StoreResult<Option<TeamMember>>;
    async fn delete_team_member(&self, id: Uuid) -> StoreResult<bool>;

    // --- Menu ---
    async fn list_menu_items(&self, filter: &MenuFilter) -> StoreResult<Vec<MenuItem>>;
    async fn get_menu_item(&self, id: Uuid) -> StoreResult<Option<MenuItem>>;
    async fn create_menu_item(&self, input: MenuItemInput) -> StoreResult<MenuItem>;
    /// Partial update: only fields present in `patch` change.
    async fn update_menu_item(&self, id: Uuid, patch: MenuItemPatch)
    -> StoreResult<Option<MenuItem>>;
    /// Children of the removed item become top-level items.
    async fn delete_menu_item(&self, id: Uuid) -> StoreResult<bool>;

    // --- Settings ---
    async fn list_settings(&self) -> StoreResult<Vec<Setting>>;
    async fn get_setting(&self, key: &str) -> StoreResult<Option<Setting>>;
    async fn insert_setting(&self, input: SettingInput) -> StoreResult<Setting>;
    async fn update_setting(&self, input: SettingInput) -> StoreResult<Option<Setting>>;
    async fn delete_setting(&self, key: &str) -> StoreResult<bool>;

    // --- Media ---
    async fn list_media(&self) -> StoreResult<Vec<Media>>;
    async fn get_media(&self, id: Uuid) -> StoreResult<Option<Media>>;
    async fn create_media(&self, draft: MediaDraft) -> StoreResult<Media>;
    async fn update_media_alt(&self, id: Uuid, alt: Option<String>) -> StoreResult<Option<Media>>;
    /// Returns the removed record so its stored object can be cleaned up.
    async fn delete_media(&self, id: Uuid) -> StoreResult<Option<Media>>;

    // --- Movement members ---
    async fn list_movement_members(&self) -> StoreResult<Vec<MovementMemberRecord>>;
    async fn get_movement_member(&self, id: Uuid) -> StoreResult<Option<MovementMemberRecord>>;
    async fn create_movement_member(
        &self,
        draft: MovementMemberDraft,
    ) -> StoreResult<MovementMemberRecord>;
    async fn delete_movement_member(&self, id: Uuid) -> StoreResult<bool>;
}

/// RepositoryState
///
/// The shared handle to the store held in `AppState`.
pub type RepositoryState = Arc<dyn Repository>;
