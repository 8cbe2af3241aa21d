use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{decode_json, encode_json, require_fields};
use crate::error::AppError;

// --- Media ---

/// Media
///
/// Metadata for an uploaded file. The bytes live in object storage under `path`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Media {
    pub id: Uuid,
    pub filename: String,
    pub original_name: String,
    pub mime_type: String,
    pub size: i64,
    // Storage object key.
    pub path: String,
    pub url: String,
    pub alt: Option<String>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// MediaDraft
///
/// Metadata inserted once the bytes are stored.
#[derive(Debug, Clone, Default)]
pub struct MediaDraft {
    pub filename: String,
    pub original_name: String,
    pub mime_type: String,
    pub size: i64,
    pub path: String,
    pub url: String,
    pub alt: Option<String>,
}

/// MediaPatch
///
/// Body of `PUT /api/media/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct MediaPatch {
    #[serde(default)]
    pub alt: Option<String>,
}

/// UploadResponse
///
/// Output of `POST /api/upload`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct UploadResponse {
    pub success: bool,
    pub url: String,
    pub media: Media,
}

// --- Movement members ---

/// MovementMemberRecord
///
/// Row of `movement_members`; `modes_of_transport` is a JSON array.
#[derive(Debug, Clone, FromRow, Default)]
pub struct MovementMemberRecord {
    pub id: Uuid,
    pub full_name: String,
    pub gender: String,
    pub email: Option<String>,
    pub phone_number: String,
    pub state_of_origin: String,
    pub lga: String,
    pub modes_of_transport: String,
    pub created_at: DateTime<Utc>,
}

/// MovementMember
///
/// A supporter who signed up through the public movement form.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MovementMember {
    pub id: Uuid,
    pub full_name: String,
    pub gender: String,
    pub email: Option<String>,
    pub phone_number: String,
    pub state_of_origin: String,
    /// Local government area.
    pub lga: String,
    pub modes_of_transport: Vec<String>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

impl TryFrom<MovementMemberRecord> for MovementMember {
    type Error = serde_json::Error;

    fn try_from(record: MovementMemberRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            modes_of_transport: decode_json(&record.modes_of_transport)?,
            id: record.id,
            full_name: record.full_name,
            gender: record.gender,
            email: record.email,
            phone_number: record.phone_number,
            state_of_origin: record.state_of_origin,
            lga: record.lga,
            created_at: record.created_at,
        })
    }
}

/// MovementMemberInput
///
/// Body of the public `POST /api/movement-members` sign-up.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct MovementMemberInput {
    pub full_name: String,
    pub gender: String,
    pub email: Option<String>,
    pub phone_number: String,
    pub state_of_origin: String,
    pub lga: String,
    pub modes_of_transport: Vec<String>,
}

/// MovementMemberDraft
#[derive(Debug, Clone, Default)]
pub struct MovementMemberDraft {
    pub full_name: String,
    pub gender: String,
    pub email: Option<String>,
    pub phone_number: String,
    pub state_of_origin: String,
    pub lga: String,
    pub modes_of_transport: String,
}

impl MovementMemberInput {
    pub fn validate(&self) -> Result<(), AppError> {
        require_fields(
            &[
                &self.full_name,
                &self.gender,
                &self.phone_number,
                &self.state_of_origin,
                &self.lga,
            ],
            "Full name, gender, phone number, state of origin and LGA are required",
        )?;
        if self.modes_of_transport.iter().all(|mode| mode.trim().is_empty()) {
            return Err(AppError::Validation(
                "Select at least one mode of transport".to_string(),
            ));
        }
        Ok(())
    }

    pub fn into_draft(self) -> Result<MovementMemberDraft, serde_json::Error> {
        let modes: Vec<String> = self
            .modes_of_transport
            .into_iter()
            .map(|mode| mode.trim().to_string())
            .filter(|mode| !mode.is_empty())
            .collect();

        Ok(MovementMemberDraft {
            modes_of_transport: encode_json(&modes)?,
            full_name: self.full_name.trim().to_string(),
            gender: self.gender,
            email: self.email.filter(|email| !email.trim().is_empty()),
            phone_number: self.phone_number.trim().to_string(),
            state_of_origin: self.state_of_origin,
            lga: self.lga,
        })
    }
}
