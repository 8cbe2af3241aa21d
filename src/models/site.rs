use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use super::require_fields;
use crate::error::AppError;

// --- Team ---

/// TeamMember
///
/// A bio card on the team page. `order` maps to the `sort_order` column.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TeamMember {
    pub id: Uuid,
    pub name: String,
    pub title: String,
    pub bio: Option<String>,
    pub image_url: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[sqlx(rename = "sort_order")]
    pub order: i32,
    pub published: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// TeamMemberInput
///
/// Body of `POST /api/team` and `PUT /api/team/{id}`. Updates overwrite every field.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamMemberInput {
    pub name: String,
    pub title: String,
    pub bio: Option<String>,
    pub image_url: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub order: i32,
    pub published: bool,
}

impl TeamMemberInput {
    pub fn validate(&self) -> Result<(), AppError> {
        require_fields(&[&self.name, &self.title], "Name and title are required")
    }
}

// --- Menu ---

/// MenuItem
///
/// A navigation entry. `parent_id` forms a tree; the site renders at most two levels.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MenuItem {
    pub id: Uuid,
    pub label: String,
    pub url: String,
    pub icon: Option<String>,
    #[sqlx(rename = "sort_order")]
    pub order: i32,
    pub parent_id: Option<Uuid>,
    pub published: bool,
    pub target: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

impl MenuItem {
    /// Applies only the fields present in the patch.
    pub fn apply(&mut self, patch: MenuItemPatch) {
        if let Some(label) = patch.label {
            self.label = label.trim().to_string();
        }
        if let Some(url) = patch.url {
            self.url = url.trim().to_string();
        }
        if let Some(icon) = patch.icon {
            self.icon = icon;
        }
        if let Some(order) = patch.order {
            self.order = order;
        }
        if let Some(parent_id) = patch.parent_id {
            self.parent_id = parent_id;
        }
        if let Some(published) = patch.published {
            self.published = published;
        }
        if let Some(target) = patch.target {
            self.target = target;
        }
    }
}

fn default_published() -> bool {
    true
}

fn default_target() -> String {
    "_self".to_string()
}

/// MenuItemInput
///
/// Body of `POST /api/menu`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemInput {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub parent_id: Option<Uuid>,
    #[serde(default = "default_published")]
    pub published: bool,
    #[serde(default = "default_target")]
    pub target: String,
}

impl Default for MenuItemInput {
    fn default() -> Self {
        Self {
            label: String::new(),
            url: String::new(),
            icon: None,
            order: 0,
            parent_id: None,
            published: default_published(),
            target: default_target(),
        }
    }
}

impl MenuItemInput {
    pub fn validate(&self) -> Result<(), AppError> {
        require_fields(&[&self.label, &self.url], "Label and URL are required")
    }
}

/// MenuItemPatch
///
/// Body of `PUT /api/menu/{id}`. Absent fields stay unchanged; `"parentId": null`
/// detaches the item from its parent and `"icon": null` removes the icon.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    #[schema(value_type = Option<String>)]
    pub icon: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    #[schema(value_type = Option<Uuid>)]
    pub parent_id: Option<Option<Uuid>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl MenuItemPatch {
    pub fn validate(&self) -> Result<(), AppError> {
        let present: Vec<&str> = [self.label.as_deref(), self.url.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        require_fields(&present, "Label and URL cannot be empty")
    }
}

/// MenuNode
///
/// A top-level menu item with its direct children.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MenuNode {
    #[serde(flatten)]
    pub item: MenuItem,
    pub children: Vec<MenuItem>,
}

impl MenuNode {
    /// Groups already-ordered items into a two-level tree. Items whose parent is
    /// not a top-level item in `items` are left out.
    pub fn build_tree(items: Vec<MenuItem>) -> Vec<MenuNode> {
        let (roots, children): (Vec<MenuItem>, Vec<MenuItem>) =
            items.into_iter().partition(|item| item.parent_id.is_none());

        let mut nodes: Vec<MenuNode> = roots
            .into_iter()
            .map(|item| MenuNode {
                item,
                children: Vec::new(),
            })
            .collect();

        for child in children {
            if let Some(node) = nodes
                .iter_mut()
                .find(|node| Some(node.item.id) == child.parent_id)
            {
                node.children.push(child);
            }
        }

        nodes
    }
}

// --- Settings ---

/// Setting
///
/// One entry of the flat key/value site configuration.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Setting {
    pub key: String,
    pub value: String,
    // 'type' is reserved in Rust; exposed as "type" on the wire and in SQL.
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub setting_type: String,
    pub description: Option<String>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

fn default_setting_type() -> String {
    "string".to_string()
}

/// SettingInput
///
/// One item of the bulk save body, also the body of `PUT /api/settings/{key}`
/// (where the path key wins).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SettingInput {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: String,
    #[serde(rename = "type", default = "default_setting_type")]
    pub setting_type: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl SettingInput {
    pub fn new(key: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            value: value.to_string(),
            setting_type: default_setting_type(),
            description: None,
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        require_fields(&[&self.key], "Setting key is required")
    }
}

/// SettingsSaved
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct SettingsSaved {
    pub success: bool,
    pub saved: usize,
}

/// FaviconResponse
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct FaviconResponse {
    pub url: String,
}
