use crate::engine::derived::{derive_view, tab_counts, TabCounts};
use crate::error::{Result, ShowcaseError};
use crate::models::{Comment, Property};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Client-side filter over the loaded properties
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    /// Everything except disliked
    #[default]
    All,
    Liked,
    Disliked,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Price,
    Beds,
    SquareFeet,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Error for unrecognized tab/sort names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseViewOptionError(pub String);

impl fmt::Display for ParseViewOptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized option: {}", self.0)
    }
}

impl std::error::Error for ParseViewOptionError {}

impl FromStr for Tab {
    type Err = ParseViewOptionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Tab::All),
            "liked" => Ok(Tab::Liked),
            "disliked" => Ok(Tab::Disliked),
            other => Err(ParseViewOptionError(other.to_string())),
        }
    }
}

impl FromStr for SortKey {
    type Err = ParseViewOptionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "price" => Ok(SortKey::Price),
            "beds" | "bedrooms" => Ok(SortKey::Beds),
            "square-feet" | "square_feet" | "squarefeet" | "sqft" => Ok(SortKey::SquareFeet),
            other => Err(ParseViewOptionError(other.to_string())),
        }
    }
}

impl FromStr for SortOrder {
    type Err = ParseViewOptionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Asc),
            "desc" | "descending" => Ok(SortOrder::Desc),
            other => Err(ParseViewOptionError(other.to_string())),
        }
    }
}

/// The property currently open in the detail view, with its comments
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDetail {
    pub property: Property,
    pub comments: Vec<Comment>,
}

/// Everything the showcases page holds for the selected collection
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    collection_id: Option<String>,
    properties: Vec<Property>,
    detail: Option<PropertyDetail>,
    pub tab: Tab,
    pub sort_by: SortKey,
    pub sort_order: SortOrder,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collection_id(&self) -> Option<&str> {
        self.collection_id.as_deref()
    }

    /// Switch collections. Loaded properties and the open detail are discarded.
    pub fn select_collection(&mut self, collection_id: impl Into<String>) {
        let id = collection_id.into();
        debug!("Selecting collection {}", id);
        self.collection_id = Some(id);
        self.properties.clear();
        self.detail = None;
    }

    pub fn clear_selection(&mut self) {
        self.collection_id = None;
        self.properties.clear();
        self.detail = None;
    }

    /// Replace the loaded set; ignored if `collection_id` is no longer selected
    pub fn load_properties(&mut self, collection_id: &str, properties: Vec<Property>) -> bool {
        if self.collection_id() != Some(collection_id) {
            return false;
        }
        self.properties = properties;
        true
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn property(&self, property_id: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.id == property_id)
    }

    /// Apply `f` to the loaded property and to the open detail if it shows
    /// the same property. Returns false if the property is not loaded.
    pub fn update_property<F>(&mut self, property_id: &str, f: F) -> bool
    where
        F: Fn(&mut Property),
    {
        let Some(property) = self.properties.iter_mut().find(|p| p.id == property_id) else {
            return false;
        };
        f(property);

        if let Some(detail) = self.detail.as_mut() {
            if detail.property.id == property_id {
                f(&mut detail.property);
            }
        }
        true
    }

    pub fn open_detail(&mut self, property_id: &str) -> Result<()> {
        let property = self
            .property(property_id)
            .cloned()
            .ok_or_else(|| ShowcaseError::UnknownProperty(property_id.to_string()))?;
        // reopening the same property keeps comments still being submitted
        let comments = self
            .detail
            .take()
            .filter(|d| d.property.id == property_id)
            .map(|d| {
                d.comments
                    .into_iter()
                    .filter(Comment::is_temporary)
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        self.detail = Some(PropertyDetail { property, comments });
        Ok(())
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    pub fn detail(&self) -> Option<&PropertyDetail> {
        self.detail.as_ref()
    }

    /// The open detail, only if it shows `property_id`
    pub fn detail_for(&self, property_id: &str) -> Option<&PropertyDetail> {
        self.detail.as_ref().filter(|d| d.property.id == property_id)
    }

    pub fn detail_for_mut(&mut self, property_id: &str) -> Option<&mut PropertyDetail> {
        self.detail.as_mut().filter(|d| d.property.id == property_id)
    }

    pub fn set_sort(&mut self, sort_by: SortKey, sort_order: SortOrder) {
        self.sort_by = sort_by;
        self.sort_order = sort_order;
    }

    /// Filtered and sorted list for the active tab
    pub fn visible(&self) -> Vec<&Property> {
        derive_view(&self.properties, self.tab, self.sort_by, self.sort_order)
    }

    pub fn counts(&self) -> TabCounts {
        tab_counts(&self.properties)
    }
}
