use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Visitor interaction flags on a property.
///
/// `liked` and `disliked` are mutually exclusive; `favorited` is independent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionFlags {
    pub liked: bool,
    pub disliked: bool,
    pub favorited: bool,
}

/// A listing snapshot inside a collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: String,
    pub address: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub price: Option<i64>,
    pub beds: Option<u32>,
    pub baths: Option<f32>,
    pub square_feet: Option<u32>,
    pub images: Vec<String>,
    pub listing_url: Option<String>,
    pub liked: bool,
    pub disliked: bool,
    pub favorited: bool,
}

impl Property {
    /// Bare property with only an id and address, everything else unset.
    pub fn new(id: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            address: address.into(),
            city: None,
            state: None,
            zip_code: None,
            price: None,
            beds: None,
            baths: None,
            square_feet: None,
            images: Vec::new(),
            listing_url: None,
            liked: false,
            disliked: false,
            favorited: false,
        }
    }

    pub fn flags(&self) -> InteractionFlags {
        InteractionFlags {
            liked: self.liked,
            disliked: self.disliked,
            favorited: self.favorited,
        }
    }

    /// Overwrite all three flags. A server pair claiming both liked and
    /// disliked is resolved in favor of `liked`.
    pub fn apply_flags(&mut self, flags: InteractionFlags) {
        self.liked = flags.liked;
        self.disliked = flags.disliked && !flags.liked;
        self.favorited = flags.favorited;
    }

    pub fn set_liked(&mut self, liked: bool) {
        self.liked = liked;
        if liked {
            self.disliked = false;
        }
    }

    pub fn set_disliked(&mut self, disliked: bool) {
        self.disliked = disliked;
        if disliked {
            self.liked = false;
        }
    }

    pub fn set_favorited(&mut self, favorited: bool) {
        self.favorited = favorited;
    }

    /// Single-line address for display, e.g. "123 Main St, Philadelphia, PA 19103"
    pub fn full_address(&self) -> String {
        let mut out = self.address.clone();
        if let Some(city) = &self.city {
            out.push_str(", ");
            out.push_str(city);
        }
        if let Some(state) = &self.state {
            out.push_str(", ");
            out.push_str(state);
        }
        if let Some(zip) = &self.zip_code {
            out.push(' ');
            out.push_str(zip);
        }
        out
    }
}

/// Collection lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CollectionStatus {
    Active,
    Inactive,
}

impl CollectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionStatus::Active => "ACTIVE",
            CollectionStatus::Inactive => "INACTIVE",
        }
    }
}

/// Where a showcase looks for matching listings.
///
/// An address search and an area search cannot coexist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum LocationMode {
    Address { address: String, radius_miles: f32 },
    Area {
        cities: Vec<String>,
        townships: Vec<String>,
    },
}

/// The six listing categories a showcase can match
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyTypes {
    pub single_family: bool,
    pub condo: bool,
    pub townhouse: bool,
    pub apartment: bool,
    pub multi_family: bool,
    pub lot_land: bool,
}

impl PropertyTypes {
    pub fn any(&self) -> bool {
        self.single_family
            || self.condo
            || self.townhouse
            || self.apartment
            || self.multi_family
            || self.lot_land
    }
}

/// Search criteria attached to a collection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    pub min_beds: Option<u32>,
    pub max_beds: Option<u32>,
    pub min_baths: Option<f32>,
    pub max_baths: Option<f32>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub location: Option<LocationMode>,
    pub property_types: PropertyTypes,
}

/// A curated, shareable grouping of properties ("showcase")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub id: String,
    pub name: String,
    pub status: CollectionStatus,
    pub preferences: Preferences,
    pub share_token: Option<String>,
    pub is_public: bool,
    pub property_count: u32,
    pub created_at: Option<DateTime<Utc>>,
}

impl Collection {
    /// Public link for a shared collection, if it is public and has a token
    pub fn share_url(&self, base_url: &str) -> Option<String> {
        if !self.is_public {
            return None;
        }
        let token = self.share_token.as_deref().filter(|t| !t.is_empty())?;
        Some(format!(
            "{}/showcase/{}",
            base_url.trim_end_matches('/'),
            token
        ))
    }
}

/// A visitor comment on a property within a collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub author: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub const TEMP_PREFIX: &'static str = "temp-";

    /// Client-side placeholder shown until the backend assigns a real id
    pub fn temporary(author: impl Into<String>, content: impl Into<String>) -> Self {
        let created_at = Utc::now();
        Self {
            id: format!("{}{}", Self::TEMP_PREFIX, created_at.timestamp_millis()),
            author: author.into(),
            content: content.into(),
            created_at,
        }
    }

    pub fn is_temporary(&self) -> bool {
        self.id.starts_with(Self::TEMP_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_and_dislike_are_exclusive() {
        let mut p = Property::new("5", "1 Elm St");
        p.set_liked(true);
        assert!(p.liked && !p.disliked);

        p.set_disliked(true);
        assert!(!p.liked && p.disliked);

        p.set_disliked(false);
        assert!(!p.liked && !p.disliked);
    }

    #[test]
    fn favorite_is_independent() {
        let mut p = Property::new("5", "1 Elm St");
        p.set_liked(true);
        p.set_favorited(true);
        p.set_disliked(true);
        assert!(p.favorited);
    }

    #[test]
    fn conflicting_server_flags_never_break_exclusivity() {
        let mut p = Property::new("1", "x");
        p.apply_flags(InteractionFlags {
            liked: true,
            disliked: true,
            favorited: false,
        });
        assert!(p.liked);
        assert!(!p.disliked);
    }

    #[test]
    fn share_url_requires_public_collection() {
        let mut c = Collection {
            id: "c1".into(),
            name: "Main Line".into(),
            status: CollectionStatus::Active,
            preferences: Preferences::default(),
            share_token: Some("abc123".into()),
            is_public: false,
            property_count: 0,
            created_at: None,
        };
        assert_eq!(c.share_url("https://openhousepal.com"), None);

        c.is_public = true;
        assert_eq!(
            c.share_url("https://openhousepal.com/").as_deref(),
            Some("https://openhousepal.com/showcase/abc123")
        );
    }

    #[test]
    fn temporary_comment_ids_are_prefixed() {
        let c = Comment::temporary("Jo", "Great kitchen");
        assert!(c.is_temporary());
        assert!(c.id.starts_with("temp-"));
    }
}
