use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{decode_json, encode_json, require_fields};
use crate::error::AppError;

// --- Events ---

/// Event
///
/// A dated campaign event. Stored as-is in `events` (no JSON columns).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    #[ts(type = "string")]
    pub date: DateTime<Utc>,
    pub location: Option<String>,
    pub image_url: Option<String>,
    pub published: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// EventInput
///
/// Body of `POST /api/events` and `PUT /api/events/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct EventInput {
    pub title: String,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub image_url: Option<String>,
    pub published: bool,
}

/// EventDraft
#[derive(Debug, Clone)]
pub struct EventDraft {
    pub title: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub location: Option<String>,
    pub image_url: Option<String>,
    pub published: bool,
}

impl EventInput {
    /// Validates and converts in one step, since `date` stops being optional.
    pub fn into_draft(self) -> Result<EventDraft, AppError> {
        const MESSAGE: &str = "Title and date are required";
        require_fields(&[&self.title], MESSAGE)?;
        let date = self
            .date
            .ok_or_else(|| AppError::Validation(MESSAGE.to_string()))?;

        Ok(EventDraft {
            title: self.title.trim().to_string(),
            description: self.description,
            date,
            location: self.location,
            image_url: self.image_url,
            published: self.published,
        })
    }
}

// --- Galleries ---

/// EventGalleryRecord
///
/// Row of `event_galleries`; `images` is a JSON array of URLs.
#[derive(Debug, Clone, FromRow, Default)]
pub struct EventGalleryRecord {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
    pub images: String,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// EventGallery
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct EventGallery {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub location: Option<String>,
    #[ts(type = "string | null")]
    pub event_date: Option<DateTime<Utc>>,
    pub images: Vec<String>,
    pub published: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<EventGalleryRecord> for EventGallery {
    type Error = serde_json::Error;

    fn try_from(record: EventGalleryRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            images: decode_json(&record.images)?,
            id: record.id,
            title: record.title,
            slug: record.slug,
            description: record.description,
            location: record.location,
            event_date: record.event_date,
            published: record.published,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

/// GalleryInput
///
/// Body of `POST /api/galleries` and `PUT /api/galleries/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct GalleryInput {
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
    pub images: Vec<String>,
    pub published: bool,
}

/// GalleryDraft
#[derive(Debug, Clone, Default)]
pub struct GalleryDraft {
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
    pub images: String,
    pub published: bool,
}

impl GalleryInput {
    pub fn validate(&self) -> Result<(), AppError> {
        const MESSAGE: &str = "Title, slug and at least one image are required";
        require_fields(&[&self.title, &self.slug], MESSAGE)?;
        if self.images.iter().all(|image| image.trim().is_empty()) {
            return Err(AppError::Validation(MESSAGE.to_string()));
        }
        Ok(())
    }

    /// Blank image entries are dropped; the rest keep their order.
    pub fn into_draft(self) -> Result<GalleryDraft, serde_json::Error> {
        let images: Vec<&str> = self
            .images
            .iter()
            .map(|image| image.trim())
            .filter(|image| !image.is_empty())
            .collect();
        Ok(GalleryDraft {
            images: encode_json(&images)?,
            title: self.title.trim().to_string(),
            slug: self.slug.trim().to_string(),
            description: self.description,
            location: self.location,
            event_date: self.event_date,
            published: self.published,
        })
    }
}
