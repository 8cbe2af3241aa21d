//! Store records, API shapes and request payloads for every site resource.
//!
//! Entities with JSON-encoded columns come in two shapes: a `*Record` mirroring the
//! table row (JSON kept as text) and an API struct with the parsed value. Handlers
//! convert between them with [`encode_json`] / [`decode_json`].

use serde::{Serialize, de::DeserializeOwned};

use crate::error::AppError;

mod content;
mod events;
mod filters;
mod media;
mod site;
mod user;

pub use content::*;
pub use events::*;
pub use filters::*;
pub use media::*;
pub use site::*;
pub use user::*;

/// Serializes a structured value into the text stored in a JSON column.
pub fn encode_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(value)
}

/// Parses a JSON column back into its structured value.
pub fn decode_json<T: DeserializeOwned>(text: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str(text)
}

fn encode_optional<T: Serialize>(value: &Option<T>) -> Result<Option<String>, serde_json::Error> {
    value.as_ref().map(encode_json).transpose()
}

fn decode_optional<T: DeserializeOwned>(
    text: Option<&str>,
) -> Result<Option<T>, serde_json::Error> {
    match text {
        Some(raw) if !raw.trim().is_empty() => decode_json(raw).map(Some),
        _ => Ok(None),
    }
}

/// Rejects the request when any of the named fields is blank.
pub(crate) fn require_fields(fields: &[&str], message: &str) -> Result<(), AppError> {
    if fields.iter().any(|value| value.trim().is_empty()) {
        return Err(AppError::Validation(message.to_string()));
    }
    Ok(())
}

/// Acknowledgement body for deletes and bulk operations.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, utoipa::ToSchema, ts_rs::TS)]
#[ts(export)]
pub struct Ack {
    pub success: bool,
}

impl Ack {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
