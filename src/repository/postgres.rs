use async_trait::async_trait;
use sqlx::{PgPool, Postgres, query_builder::QueryBuilder};
use uuid::Uuid;

use super::{Repository, StoreResult};
use crate::models::{
    Event, EventDraft, EventFilter, EventGalleryRecord, GalleryDraft, GalleryFilter, Media,
    MediaDraft, MenuFilter, MenuItem, MenuItemInput, MenuItemPatch, MovementMemberDraft,
    MovementMemberRecord, NewUser, PageDraft, PageFilter, PageRecord, ParentScope, PostDraft,
    PostFilter, PostRecord, Setting, SettingInput, TeamMember, TeamMemberInput, User,
};

// --- Column lists ---
//
// Kept in one place so every SELECT/RETURNING yields the same shape for `FromRow`.

const USER_COLUMNS: &str = "id, email, name, password, role, created_at";

const PAGE_COLUMNS: &str = "p.id, p.title, p.slug, p.content, p.meta_title, p.meta_description, \
     p.published, p.page_type, p.template, p.slides, p.sections, p.author_id, \
     p.created_at, p.updated_at, u.name AS author_name, u.email AS author_email";

const POST_COLUMNS: &str = "p.id, p.title, p.slug, p.content, p.excerpt, p.featured_image, \
     p.published, p.category, p.tags, p.gallery_images, p.author_id, \
     p.created_at, p.updated_at, u.name AS author_name, u.email AS author_email";

const EVENT_COLUMNS: &str =
    "id, title, description, date, location, image_url, published, created_at, updated_at";

const GALLERY_COLUMNS: &str = "id, title, slug, description, location, event_date, images, \
     published, created_at, updated_at";

const TEAM_COLUMNS: &str = "id, name, title, bio, image_url, email, phone, sort_order, \
     published, created_at, updated_at";

const MENU_COLUMNS: &str =
    "id, label, url, icon, sort_order, parent_id, published, target, created_at, updated_at";

const SETTING_COLUMNS: &str = "key, value, type, description, updated_at";

const MEDIA_COLUMNS: &str =
    "id, filename, original_name, mime_type, size, path, url, alt, created_at";

const MOVEMENT_COLUMNS: &str = "id, full_name, gender, email, phone_number, state_of_origin, \
     lga, modes_of_transport, created_at";

/// PostgresRepository
///
/// The production implementation of `Repository`, backed by a PostgreSQL pool.
/// Dynamic filters are assembled with `QueryBuilder` so every value is a bound parameter.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn execute_delete(&self, sql: &str, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query(sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Appends `AND <column> = <flag>` when a published filter is present.
fn push_published(builder: &mut QueryBuilder<'_, Postgres>, column: &str, published: Option<bool>) {
    if let Some(flag) = published {
        builder.push(format!(" AND {column} = "));
        builder.push_bind(flag);
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    // --- Users ---

    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let sql = format!(
            "INSERT INTO users (id, email, name, password, role, created_at) \
             VALUES ($1, $2, $3, $4, $5, NOW()) RETURNING {USER_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::new_v4())
            .bind(user.email)
            .bind(user.name)
            .bind(user.password)
            .bind(user.role)
            .fetch_one(&self.pool)
            .await?)
    }

    // --- Pages ---

    /// list_pages
    ///
    /// Joins `users` for the author snapshot. Most recently updated first.
    async fn list_pages(&self, filter: &PageFilter) -> StoreResult<Vec<PageRecord>> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {PAGE_COLUMNS} FROM pages p LEFT JOIN users u ON u.id = p.author_id WHERE 1 = 1"
        ));
        push_published(&mut builder, "p.published", filter.published);
        if let Some(slug) = &filter.slug {
            builder.push(" AND p.slug = ");
            builder.push_bind(slug.clone());
        }
        if let Some(page_type) = &filter.page_type {
            builder.push(" AND p.page_type = ");
            builder.push_bind(page_type.clone());
        }
        builder.push(" ORDER BY p.updated_at DESC");

        Ok(builder
            .build_query_as::<PageRecord>()
            .fetch_all(&self.pool)
            .await?)
    }

    async fn get_page(&self, id: Uuid) -> StoreResult<Option<PageRecord>> {
        let sql = format!(
            "SELECT {PAGE_COLUMNS} FROM pages p LEFT JOIN users u ON u.id = p.author_id WHERE p.id = $1"
        );
        Ok(sqlx::query_as::<_, PageRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_page_by_slug(&self, slug: &str) -> StoreResult<Option<PageRecord>> {
        let sql = format!(
            "SELECT {PAGE_COLUMNS} FROM pages p LEFT JOIN users u ON u.id = p.author_id WHERE p.slug = $1"
        );
        Ok(sqlx::query_as::<_, PageRecord>(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// create_page
    ///
    /// Inserts and joins the author in one statement via a CTE.
    async fn create_page(&self, draft: PageDraft, author_id: Uuid) -> StoreResult<PageRecord> {
        let sql = format!(
            "WITH p AS ( \
                INSERT INTO pages (id, title, slug, content, meta_title, meta_description, published, \
                                   page_type, template, slides, sections, author_id, created_at, updated_at) \
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, NOW(), NOW()) \
                RETURNING * \
             ) \
             SELECT {PAGE_COLUMNS} FROM p LEFT JOIN users u ON u.id = p.author_id"
        );
        Ok(sqlx::query_as::<_, PageRecord>(&sql)
            .bind(Uuid::new_v4())
            .bind(draft.title)
            .bind(draft.slug)
            .bind(draft.content)
            .bind(draft.meta_title)
            .bind(draft.meta_description)
            .bind(draft.published)
            .bind(draft.page_type)
            .bind(draft.template)
            .bind(draft.slides)
            .bind(draft.sections)
            .bind(author_id)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update_page(&self, id: Uuid, draft: PageDraft) -> StoreResult<Option<PageRecord>> {
        let sql = format!(
            "WITH p AS ( \
                UPDATE pages SET title = $2, slug = $3, content = $4, meta_title = $5, \
                       meta_description = $6, published = $7, page_type = $8, template = $9, \
                       slides = $10, sections = $11, updated_at = NOW() \
                WHERE id = $1 \
                RETURNING * \
             ) \
             SELECT {PAGE_COLUMNS} FROM p LEFT JOIN users u ON u.id = p.author_id"
        );
        Ok(sqlx::query_as::<_, PageRecord>(&sql)
            .bind(id)
            .bind(draft.title)
            .bind(draft.slug)
            .bind(draft.content)
            .bind(draft.meta_title)
            .bind(draft.meta_description)
            .bind(draft.published)
            .bind(draft.page_type)
            .bind(draft.template)
            .bind(draft.slides)
            .bind(draft.sections)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_page(&self, id: Uuid) -> StoreResult<bool> {
        self.execute_delete("DELETE FROM pages WHERE id = $1", id).await
    }

    // --- Posts ---

    async fn list_posts(&self, filter: &PostFilter) -> StoreResult<Vec<PostRecord>> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {POST_COLUMNS} FROM posts p LEFT JOIN users u ON u.id = p.author_id WHERE 1 = 1"
        ));
        push_published(&mut builder, "p.published", filter.published);
        if let Some(category) = &filter.category {
            builder.push(" AND p.category = ");
            builder.push_bind(category.clone());
        }
        if let Some(slug) = &filter.slug {
            builder.push(" AND p.slug = ");
            builder.push_bind(slug.clone());
        }
        builder.push(" ORDER BY p.updated_at DESC");

        Ok(builder
            .build_query_as::<PostRecord>()
            .fetch_all(&self.pool)
            .await?)
    }

    async fn get_post(&self, id: Uuid) -> StoreResult<Option<PostRecord>> {
        let sql = format!(
            "SELECT {POST_COLUMNS} FROM posts p LEFT JOIN users u ON u.id = p.author_id WHERE p.id = $1"
        );
        Ok(sqlx::query_as::<_, PostRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_post_by_slug(&self, slug: &str) -> StoreResult<Option<PostRecord>> {
        let sql = format!(
            "SELECT {POST_COLUMNS} FROM posts p LEFT JOIN users u ON u.id = p.author_id WHERE p.slug = $1"
        );
        Ok(sqlx::query_as::<_, PostRecord>(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create_post(&self, draft: PostDraft, author_id: Uuid) -> StoreResult<PostRecord> {
        let sql = format!(
            "WITH p AS ( \
                INSERT INTO posts (id, title, slug, content, excerpt, featured_image, published, \
                                   category, tags, gallery_images, author_id, created_at, updated_at) \
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, NOW(), NOW()) \
                RETURNING * \
             ) \
             SELECT {POST_COLUMNS} FROM p LEFT JOIN users u ON u.id = p.author_id"
        );
        Ok(sqlx::query_as::<_, PostRecord>(&sql)
            .bind(Uuid::new_v4())
            .bind(draft.title)
            .bind(draft.slug)
            .bind(draft.content)
            .bind(draft.excerpt)
            .bind(draft.featured_image)
            .bind(draft.published)
            .bind(draft.category)
            .bind(draft.tags)
            .bind(draft.gallery_images)
            .bind(author_id)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update_post(&self, id: Uuid, draft: PostDraft) -> StoreResult<Option<PostRecord>> {
        let sql = format!(
            "WITH p AS ( \
                UPDATE posts SET title = $2, slug = $3, content = $4, excerpt = $5, \
                       featured_image = $6, published = $7, category = $8, tags = $9, \
                       gallery_images = $10, updated_at = NOW() \
                WHERE id = $1 \
                RETURNING * \
             ) \
             SELECT {POST_COLUMNS} FROM p LEFT JOIN users u ON u.id = p.author_id"
        );
        Ok(sqlx::query_as::<_, PostRecord>(&sql)
            .bind(id)
            .bind(draft.title)
            .bind(draft.slug)
            .bind(draft.content)
            .bind(draft.excerpt)
            .bind(draft.featured_image)
            .bind(draft.published)
            .bind(draft.category)
            .bind(draft.tags)
            .bind(draft.gallery_images)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_post(&self, id: Uuid) -> StoreResult<bool> {
        self.execute_delete("DELETE FROM posts WHERE id = $1", id).await
    }

    // --- Events ---

    /// list_events
    ///
    /// Chronological, soonest first. `upcoming` compares against the database clock.
    async fn list_events(&self, filter: &EventFilter) -> StoreResult<Vec<Event>> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {EVENT_COLUMNS} FROM events WHERE 1 = 1"));
        push_published(&mut builder, "published", filter.published);
        match filter.upcoming {
            Some(true) => {
                builder.push(" AND date >= NOW()");
            }
            Some(false) => {
                builder.push(" AND date < NOW()");
            }
            None => {}
        }
        builder.push(" ORDER BY date ASC");

        Ok(builder.build_query_as::<Event>().fetch_all(&self.pool).await?)
    }

    async fn get_event(&self, id: Uuid) -> StoreResult<Option<Event>> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1");
        Ok(sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create_event(&self, draft: EventDraft) -> StoreResult<Event> {
        let sql = format!(
            "INSERT INTO events (id, title, description, date, location, image_url, published, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, NOW(), NOW()) RETURNING {EVENT_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Event>(&sql)
            .bind(Uuid::new_v4())
            .bind(draft.title)
            .bind(draft.description)
            .bind(draft.date)
            .bind(draft.location)
            .bind(draft.image_url)
            .bind(draft.published)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update_event(&self, id: Uuid, draft: EventDraft) -> StoreResult<Option<Event>> {
        let sql = format!(
            "UPDATE events SET title = $2, description = $3, date = $4, location = $5, \
                    image_url = $6, published = $7, updated_at = NOW() \
             WHERE id = $1 RETURNING {EVENT_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .bind(draft.title)
            .bind(draft.description)
            .bind(draft.date)
            .bind(draft.location)
            .bind(draft.image_url)
            .bind(draft.published)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_event(&self, id: Uuid) -> StoreResult<bool> {
        self.execute_delete("DELETE FROM events WHERE id = $1", id).await
    }

    // --- Galleries ---

    async fn list_galleries(
        &self,
        filter: &GalleryFilter,
    ) -> StoreResult<Vec<EventGalleryRecord>> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {GALLERY_COLUMNS} FROM event_galleries WHERE 1 = 1"
        ));
        push_published(&mut builder, "published", filter.published);
        if let Some(slug) = &filter.slug {
            builder.push(" AND slug = ");
            builder.push_bind(slug.clone());
        }
        builder.push(" ORDER BY event_date DESC NULLS LAST, created_at DESC");

        Ok(builder
            .build_query_as::<EventGalleryRecord>()
            .fetch_all(&self.pool)
            .await?)
    }

    async fn get_gallery(&self, id: Uuid) -> StoreResult<Option<EventGalleryRecord>> {
        let sql = format!("SELECT {GALLERY_COLUMNS} FROM event_galleries WHERE id = $1");
        Ok(sqlx::query_as::<_, EventGalleryRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_gallery_by_slug(&self, slug: &str) -> StoreResult<Option<EventGalleryRecord>> {
        let sql = format!("SELECT {GALLERY_COLUMNS} FROM event_galleries WHERE slug = $1");
        Ok(sqlx::query_as::<_, EventGalleryRecord>(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create_gallery(&self, draft: GalleryDraft) -> StoreResult<EventGalleryRecord> {
        let sql = format!(
            "INSERT INTO event_galleries (id, title, slug, description, location, event_date, images, \
                                          published, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW(), NOW()) RETURNING {GALLERY_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, EventGalleryRecord>(&sql)
            .bind(Uuid::new_v4())
            .bind(draft.title)
            .bind(draft.slug)
            .bind(draft.description)
            .bind(draft.location)
            .bind(draft.event_date)
            .bind(draft.images)
            .bind(draft.published)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update_gallery(
        &self,
        id: Uuid,
        draft: GalleryDraft,
    ) -> StoreResult<Option<EventGalleryRecord>> {
        let sql = format!(
            "UPDATE event_galleries SET title = $2, slug = $3, description = $4, location = $5, \
                    event_date = $6, images = $7, published = $8, updated_at = NOW() \
             WHERE id = $1 RETURNING {GALLERY_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, EventGalleryRecord>(&sql)
            .bind(id)
            .bind(draft.title)
            .bind(draft.slug)
            .bind(draft.description)
            .bind(draft.location)
            .bind(draft.event_date)
            .bind(draft.images)
            .bind(draft.published)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_gallery(&self, id: Uuid) -> StoreResult<bool> {
        self.execute_delete("DELETE FROM event_galleries WHERE id = $1", id)
            .await
    }

    // --- Team ---

    async fn list_team(&self, published: Option<bool>) -> StoreResult<Vec<TeamMember>> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {TEAM_COLUMNS} FROM team_members WHERE 1 = 1"));
        push_published(&mut builder, "published", published);
        builder.push(" ORDER BY sort_order ASC, created_at ASC");

        Ok(builder
            .build_query_as::<TeamMember>()
            .fetch_all(&self.pool)
            .await?)
    }

    async fn get_team_member(&self, id: Uuid) -> StoreResult<Option<TeamMember>> {
        let sql = format!("SELECT {TEAM_COLUMNS} FROM team_members WHERE id = $1");
        Ok(sqlx::query_as::<_, TeamMember>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create_team_member(&self, input: TeamMemberInput) -> StoreResult<TeamMember> {
        let sql = format!(
            "INSERT INTO team_members (id, name, title, bio, image_url, email, phone, sort_order, \
                                       published, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW(), NOW()) RETURNING {TEAM_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, TeamMember>(&sql)
            .bind(Uuid::new_v4())
            .bind(input.name.trim().to_string())
            .bind(input.title.trim().to_string())
            .bind(input.bio)
            .bind(input.image_url)
            .bind(input.email)
            .bind(input.phone)
            .bind(input.order)
            .bind(input.published)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update_team_member(
        &self,
        id: Uuid,
        input: TeamMemberInput,
    ) -> StoreResult<Option<TeamMember>> {
        let sql = format!(
            "UPDATE team_members SET name = $2, title = $3, bio = $4, image_url = $5, email = $6, \
                    phone = $7, sort_order = $8, published = $9, updated_at = NOW() \
             WHERE id = $1 RETURNING {TEAM_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, TeamMember>(&sql)
            .bind(id)
            .bind(input.name.trim().to_string())
            .bind(input.title.trim().to_string())
            .bind(input.bio)
            .bind(input.image_url)
            .bind(input.email)
            .bind(input.phone)
            .bind(input.order)
            .bind(input.published)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_team_member(&self, id: Uuid) -> StoreResult<bool> {
        self.execute_delete("DELETE FROM team_members WHERE id = $1", id)
            .await
    }

    // --- Menu ---

    async fn list_menu_items(&self, filter: &MenuFilter) -> StoreResult<Vec<MenuItem>> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {MENU_COLUMNS} FROM menu_items WHERE 1 = 1"));
        push_published(&mut builder, "published", filter.published);
        match filter.parent {
            ParentScope::Any => {}
            ParentScope::Root => {
                builder.push(" AND parent_id IS NULL");
            }
            ParentScope::Children(parent_id) => {
                builder.push(" AND parent_id = ");
                builder.push_bind(parent_id);
            }
        }
        builder.push(" ORDER BY sort_order ASC, created_at ASC");

        Ok(builder.build_query_as::<MenuItem>().fetch_all(&self.pool).await?)
    }

    async fn get_menu_item(&self, id: Uuid) -> StoreResult<Option<MenuItem>> {
        let sql = format!("SELECT {MENU_COLUMNS} FROM menu_items WHERE id = $1");
        Ok(sqlx::query_as::<_, MenuItem>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create_menu_item(&self, input: MenuItemInput) -> StoreResult<MenuItem> {
        let sql = format!(
            "INSERT INTO menu_items (id, label, url, icon, sort_order, parent_id, published, target, \
                                     created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW(), NOW()) RETURNING {MENU_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, MenuItem>(&sql)
            .bind(Uuid::new_v4())
            .bind(input.label.trim().to_string())
            .bind(input.url.trim().to_string())
            .bind(input.icon)
            .bind(input.order)
            .bind(input.parent_id)
            .bind(input.published)
            .bind(input.target)
            .fetch_one(&self.pool)
            .await?)
    }

    /// update_menu_item
    ///
    /// `COALESCE` keeps a column unchanged when its patch field is absent. `icon` and
    /// `parent_id` use an explicit flag so that `null` clears them.
    async fn update_menu_item(
        &self,
        id: Uuid,
        patch: MenuItemPatch,
    ) -> StoreResult<Option<MenuItem>> {
        let sql = format!(
            "UPDATE menu_items \
             SET label = COALESCE($2, label), \
                 url = COALESCE($3, url), \
                 icon = CASE WHEN $4 THEN $5 ELSE icon END, \
                 sort_order = COALESCE($6, sort_order), \
                 parent_id = CASE WHEN $7 THEN $8 ELSE parent_id END, \
                 published = COALESCE($9, published), \
                 target = COALESCE($10, target), \
                 updated_at = NOW() \
             WHERE id = $1 RETURNING {MENU_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, MenuItem>(&sql)
            .bind(id)
            .bind(patch.label.as_deref().map(str::trim))
            .bind(patch.url.as_deref().map(str::trim))
            .bind(patch.icon.is_some())
            .bind(patch.icon.flatten())
            .bind(patch.order)
            .bind(patch.parent_id.is_some())
            .bind(patch.parent_id.flatten())
            .bind(patch.published)
            .bind(patch.target)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_menu_item(&self, id: Uuid) -> StoreResult<bool> {
        // parent_id is ON DELETE SET NULL, so children are promoted by the schema.
        self.execute_delete("DELETE FROM menu_items WHERE id = $1", id)
            .await
    }

    // --- Settings ---

    async fn list_settings(&self) -> StoreResult<Vec<Setting>> {
        let sql = format!("SELECT {SETTING_COLUMNS} FROM settings ORDER BY key ASC");
        Ok(sqlx::query_as::<_, Setting>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn get_setting(&self, key: &str) -> StoreResult<Option<Setting>> {
        let sql = format!("SELECT {SETTING_COLUMNS} FROM settings WHERE key = $1");
        Ok(sqlx::query_as::<_, Setting>(&sql)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert_setting(&self, input: SettingInput) -> StoreResult<Setting> {
        let sql = format!(
            "INSERT INTO settings (key, value, type, description, updated_at) \
             VALUES ($1, $2, $3, $4, NOW()) RETURNING {SETTING_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Setting>(&sql)
            .bind(input.key)
            .bind(input.value)
            .bind(input.setting_type)
            .bind(input.description)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update_setting(&self, input: SettingInput) -> StoreResult<Option<Setting>> {
        let sql = format!(
            "UPDATE settings SET value = $2, type = $3, description = $4, \
                    updated_at = NOW() \
             WHERE key = $1 RETURNING {SETTING_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Setting>(&sql)
            .bind(input.key)
            .bind(input.value)
            .bind(input.setting_type)
            .bind(input.description)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_setting(&self, key: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM settings WHERE key = $1")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // --- Media ---

    async fn list_media(&self) -> StoreResult<Vec<Media>> {
        let sql = format!("SELECT {MEDIA_COLUMNS} FROM media ORDER BY created_at DESC");
        Ok(sqlx::query_as::<_, Media>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn get_media(&self, id: Uuid) -> StoreResult<Option<Media>> {
        let sql = format!("SELECT {MEDIA_COLUMNS} FROM media WHERE id = $1");
        Ok(sqlx::query_as::<_, Media>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create_media(&self, draft: MediaDraft) -> StoreResult<Media> {
        let sql = format!(
            "INSERT INTO media (id, filename, original_name, mime_type, size, path, url, alt, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW()) RETURNING {MEDIA_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Media>(&sql)
            .bind(Uuid::new_v4())
            .bind(draft.filename)
            .bind(draft.original_name)
            .bind(draft.mime_type)
            .bind(draft.size)
            .bind(draft.path)
            .bind(draft.url)
            .bind(draft.alt)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update_media_alt(&self, id: Uuid, alt: Option<String>) -> StoreResult<Option<Media>> {
        let sql = format!("UPDATE media SET alt = $2 WHERE id = $1 RETURNING {MEDIA_COLUMNS}");
        Ok(sqlx::query_as::<_, Media>(&sql)
            .bind(id)
            .bind(alt)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_media(&self, id: Uuid) -> StoreResult<Option<Media>> {
        let sql = format!("DELETE FROM media WHERE id = $1 RETURNING {MEDIA_COLUMNS}");
        Ok(sqlx::query_as::<_, Media>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    // --- Movement members ---

    async fn list_movement_members(&self) -> StoreResult<Vec<MovementMemberRecord>> {
        let sql =
            format!("SELECT {MOVEMENT_COLUMNS} FROM movement_members ORDER BY created_at DESC");
        Ok(sqlx::query_as::<_, MovementMemberRecord>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn get_movement_member(&self, id: Uuid) -> StoreResult<Option<MovementMemberRecord>> {
        let sql = format!("SELECT {MOVEMENT_COLUMNS} FROM movement_members WHERE id = $1");
        Ok(sqlx::query_as::<_, MovementMemberRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create_movement_member(
        &self,
        draft: MovementMemberDraft,
    ) -> StoreResult<MovementMemberRecord> {
        let sql = format!(
            "INSERT INTO movement_members (id, full_name, gender, email, phone_number, state_of_origin, \
                                           lga, modes_of_transport, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW()) RETURNING {MOVEMENT_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, MovementMemberRecord>(&sql)
            .bind(Uuid::new_v4())
            .bind(draft.full_name)
            .bind(draft.gender)
            .bind(draft.email)
            .bind(draft.phone_number)
            .bind(draft.state_of_origin)
            .bind(draft.lga)
            .bind(draft.modes_of_transport)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn delete_movement_member(&self, id: Uuid) -> StoreResult<bool> {
        self.execute_delete("DELETE FROM movement_members WHERE id = $1", id)
            .await
    }
}
