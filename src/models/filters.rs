use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::error::AppError;

// --- List Filters ---
//
// Query parameters accepted by the collection endpoints. `published` absent means
// "regardless of flag"; `Some(true)`/`Some(false)` select exactly that flag.

/// PageFilter
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageFilter {
    pub published: Option<bool>,
    pub slug: Option<String>,
    #[serde(rename = "pageType")]
    pub page_type: Option<String>,
}

/// PostFilter
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PostFilter {
    pub published: Option<bool>,
    pub category: Option<String>,
    pub slug: Option<String>,
}

/// EventFilter
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EventFilter {
    pub published: Option<bool>,
    /// `true`: events dated now or later. `false`: past events.
    pub upcoming: Option<bool>,
}

/// GalleryFilter
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GalleryFilter {
    pub published: Option<bool>,
    pub slug: Option<String>,
}

/// PublishedFilter
///
/// Used by resources filtered on the flag alone (team, menu tree).
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PublishedFilter {
    pub published: Option<bool>,
}

/// MenuQuery
///
/// Raw query of `GET /api/menu`. `parentId` is `root` or an item id.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MenuQuery {
    pub published: Option<bool>,
    #[serde(rename = "parentId")]
    pub parent_id: Option<String>,
}

/// ParentScope
///
/// Which level of the menu tree a listing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParentScope {
    #[default]
    Any,
    Root,
    Children(Uuid),
}

/// MenuFilter
///
/// Validated form of [`MenuQuery`] handed to the repository.
#[derive(Debug, Clone, Copy, Default)]
pub struct MenuFilter {
    pub published: Option<bool>,
    pub parent: ParentScope,
}

impl TryFrom<MenuQuery> for MenuFilter {
    type Error = AppError;

    fn try_from(query: MenuQuery) -> Result<Self, Self::Error> {
        let parent = match query.parent_id.as_deref().map(str::trim) {
            None | Some("") => ParentScope::Any,
            Some("root") | Some("null") => ParentScope::Root,
            Some(raw) => Uuid::parse_str(raw)
                .map(ParentScope::Children)
                .map_err(|_| AppError::Validation("parentId must be 'root' or an id".into()))?,
        };

        Ok(Self {
            published: query.published,
            parent,
        })
    }
}
