use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{AuthorSnapshot, decode_optional, encode_optional, require_fields};
use crate::error::AppError;

// --- Pages ---

/// PageRecord
///
/// Row of the `pages` table. `slides` and `sections` hold JSON text.
/// The author columns are only populated by queries that join `users`.
#[derive(Debug, Clone, FromRow, Default)]
pub struct PageRecord {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub published: bool,
    pub page_type: String,
    pub template: String,
    pub slides: Option<String>,
    pub sections: Option<String>,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(default)]
    pub author_name: Option<String>,
    #[sqlx(default)]
    pub author_email: Option<String>,
}

/// Page
///
/// A CMS page as served to the site and the admin dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Page {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub published: bool,
    pub page_type: String,
    pub template: String,
    #[ts(type = "Array<unknown> | null")]
    #[schema(value_type = Option<Vec<Object>>)]
    pub slides: Option<Vec<Value>>,
    #[ts(type = "Array<unknown> | null")]
    #[schema(value_type = Option<Vec<Object>>)]
    pub sections: Option<Vec<Value>>,
    pub author_id: Uuid,
    pub author: Option<AuthorSnapshot>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<PageRecord> for Page {
    type Error = serde_json::Error;

    fn try_from(record: PageRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            slides: decode_optional(record.slides.as_deref())?,
            sections: decode_optional(record.sections.as_deref())?,
            author: AuthorSnapshot::from_columns(record.author_name, record.author_email),
            id: record.id,
            title: record.title,
            slug: record.slug,
            content: record.content,
            meta_title: record.meta_title,
            meta_description: record.meta_description,
            published: record.published,
            page_type: record.page_type,
            template: record.template,
            author_id: record.author_id,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

/// PageInput
///
/// Body of `POST /api/pages` and `PUT /api/pages/{id}`. Updates overwrite every field.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PageInput {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub published: bool,
    pub page_type: Option<String>,
    pub template: Option<String>,
    #[schema(value_type = Option<Vec<Object>>)]
    pub slides: Option<Vec<Value>>,
    #[schema(value_type = Option<Vec<Object>>)]
    pub sections: Option<Vec<Value>>,
}

/// PageDraft
///
/// A validated page ready for the store, JSON columns already encoded.
#[derive(Debug, Clone, Default)]
pub struct PageDraft {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub published: bool,
    pub page_type: String,
    pub template: String,
    pub slides: Option<String>,
    pub sections: Option<String>,
}

impl PageInput {
    pub fn validate(&self) -> Result<(), AppError> {
        require_fields(&[&self.title, &self.slug], "Title and slug are required")
    }

    pub fn into_draft(self) -> Result<PageDraft, serde_json::Error> {
        Ok(PageDraft {
            slides: encode_optional(&self.slides)?,
            sections: encode_optional(&self.sections)?,
            title: self.title.trim().to_string(),
            slug: self.slug.trim().to_string(),
            content: self.content,
            meta_title: self.meta_title,
            meta_description: self.meta_description,
            published: self.published,
            page_type: self.page_type.unwrap_or_else(|| "standard".to_string()),
            template: self.template.unwrap_or_else(|| "default".to_string()),
        })
    }
}

// --- Posts ---

/// PostRecord
///
/// Row of the `posts` table. `gallery_images` holds JSON text; `tags` is comma-delimited.
#[derive(Debug, Clone, FromRow, Default)]
pub struct PostRecord {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub published: bool,
    pub category: Option<String>,
    pub tags: Option<String>,
    pub gallery_images: Option<String>,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(default)]
    pub author_name: Option<String>,
    #[sqlx(default)]
    pub author_email: Option<String>,
}

/// Post
///
/// A blog post.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub published: bool,
    pub category: Option<String>,
    /// Comma-delimited.
    pub tags: Option<String>,
    pub gallery_images: Option<Vec<String>>,
    pub author_id: Uuid,
    pub author: Option<AuthorSnapshot>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// The individual tags, trimmed, blanks dropped.
    pub fn tag_list(&self) -> Vec<&str> {
        self.tags
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .collect()
    }
}

impl TryFrom<PostRecord> for Post {
    type Error = serde_json::Error;

    fn try_from(record: PostRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            gallery_images: decode_optional(record.gallery_images.as_deref())?,
            author: AuthorSnapshot::from_columns(record.author_name, record.author_email),
            id: record.id,
            title: record.title,
            slug: record.slug,
            content: record.content,
            excerpt: record.excerpt,
            featured_image: record.featured_image,
            published: record.published,
            category: record.category,
            tags: record.tags,
            author_id: record.author_id,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

/// PostInput
///
/// Body of `POST /api/posts` and `PUT /api/posts/{id}`. Updates overwrite every field.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PostInput {
    #[schema(example = "Launch")]
    pub title: String,
    #[schema(example = "launch")]
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub published: bool,
    pub category: Option<String>,
    pub tags: Option<String>,
    pub gallery_images: Option<Vec<String>>,
}

/// PostDraft
#[derive(Debug, Clone, Default)]
pub struct PostDraft {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub published: bool,
    pub category: Option<String>,
    pub tags: Option<String>,
    pub gallery_images: Option<String>,
}

impl PostInput {
    pub fn validate(&self) -> Result<(), AppError> {
        require_fields(&[&self.title, &self.slug], "Title and slug are required")
    }

    pub fn into_draft(self) -> Result<PostDraft, serde_json::Error> {
        Ok(PostDraft {
            gallery_images: encode_optional(&self.gallery_images)?,
            title: self.title.trim().to_string(),
            slug: self.slug.trim().to_string(),
            content: self.content,
            excerpt: self.excerpt,
            featured_image: self.featured_image,
            published: self.published,
            category: self.category,
            tags: self.tags,
        })
    }
}
