//! Wire payloads and their conversion into model types.
//!
//! The backend has served several shapes over time (camelCase and snake_case
//! keys, numeric or string ids, numbers as strings, comma-joined city lists).
//! Everything is decoded into a `Raw*` struct here and converted exactly once.

use crate::error::ApiError;
use crate::models::{
    Collection, CollectionStatus, Comment, InteractionFlags, LocationMode, Preferences, Property,
    PropertyTypes,
};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Kind of visitor interaction sent to the interact endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    Like,
    Dislike,
    Favorite,
}

impl InteractionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionKind::Like => "like",
            InteractionKind::Dislike => "dislike",
            InteractionKind::Favorite => "favorite",
        }
    }
}

/// Body of `POST .../interact`
#[derive(Debug, Clone, Serialize)]
pub struct InteractionRequest {
    pub interaction_type: InteractionKind,
    pub value: bool,
}

/// Canonical flags returned by the interact endpoint.
/// `favorited` is absent for like/dislike responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionUpdate {
    pub liked: bool,
    pub disliked: bool,
    pub favorited: Option<bool>,
}

impl InteractionUpdate {
    /// Merge onto the current flags, keeping `favorited` when not reported
    pub fn merged_with(&self, current: InteractionFlags) -> InteractionFlags {
        InteractionFlags {
            liked: self.liked,
            disliked: self.disliked,
            favorited: self.favorited.unwrap_or(current.favorited),
        }
    }
}

/// Body of `POST .../comments`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewComment {
    pub content: String,
    pub visitor_name: String,
    pub visitor_email: String,
}

/// Partial update sent with `PATCH /collections/{id}`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionUpdate {
    pub name: Option<String>,
    pub status: Option<CollectionStatus>,
    pub preferences: Option<Preferences>,
    pub is_public: Option<bool>,
}

impl CollectionUpdate {
    pub fn status(status: CollectionStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn preferences(preferences: Preferences) -> Self {
        Self {
            preferences: Some(preferences),
            ..Self::default()
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CollectionUpdatePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CollectionStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferences: Option<PreferencesPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
}

impl From<&CollectionUpdate> for CollectionUpdatePayload {
    fn from(update: &CollectionUpdate) -> Self {
        Self {
            name: update.name.clone(),
            status: update.status,
            preferences: update.preferences.as_ref().map(PreferencesPayload::from),
            is_public: update.is_public,
        }
    }
}

/// Preferences in the flat shape the backend stores
#[derive(Debug, Serialize)]
pub struct PreferencesPayload {
    pub min_beds: Option<u32>,
    pub max_beds: Option<u32>,
    pub min_baths: Option<f32>,
    pub max_baths: Option<f32>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub address: Option<String>,
    pub diameter: Option<f32>,
    pub cities: Vec<String>,
    pub townships: Vec<String>,
    pub is_single_family: bool,
    pub is_condo: bool,
    pub is_town_house: bool,
    pub is_apartment: bool,
    pub is_multi_family: bool,
    pub is_lot_land: bool,
}

impl From<&Preferences> for PreferencesPayload {
    fn from(prefs: &Preferences) -> Self {
        let (address, diameter, cities, townships) = match &prefs.location {
            Some(LocationMode::Address {
                address,
                radius_miles,
            }) => (Some(address.clone()), Some(*radius_miles), Vec::new(), Vec::new()),
            Some(LocationMode::Area { cities, townships }) => {
                (None, None, cities.clone(), townships.clone())
            }
            None => (None, None, Vec::new(), Vec::new()),
        };
        let types = prefs.property_types;
        Self {
            min_beds: prefs.min_beds,
            max_beds: prefs.max_beds,
            min_baths: prefs.min_baths,
            max_baths: prefs.max_baths,
            min_price: prefs.min_price,
            max_price: prefs.max_price,
            address,
            diameter,
            cities,
            townships,
            is_single_family: types.single_family,
            is_condo: types.condo,
            is_town_house: types.townhouse,
            is_apartment: types.apartment,
            is_multi_family: types.multi_family,
            is_lot_land: types.lot_land,
        }
    }
}

/// Id that may arrive as a JSON number or string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Number(i64),
    Text(String),
}

impl RawId {
    pub fn into_string(self) -> String {
        match self {
            RawId::Number(n) => n.to_string(),
            RawId::Text(s) => s,
        }
    }
}

/// Number that may arrive as a JSON number or a formatted string ("$500,000")
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Number(f64),
    Text(String),
}

impl RawNumber {
    pub fn value(&self) -> Option<f64> {
        match self {
            RawNumber::Number(n) => Some(*n),
            RawNumber::Text(s) => {
                let cleaned: String = s
                    .chars()
                    .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                    .collect();
                cleaned.parse().ok()
            }
        }
    }
}

fn non_negative(n: Option<&RawNumber>) -> Option<f64> {
    n.and_then(RawNumber::value).filter(|v| *v >= 0.0)
}

/// List that may arrive as an array or a comma-joined string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawStringList {
    List(Vec<String>),
    Joined(String),
}

impl RawStringList {
    pub fn into_vec(self) -> Vec<String> {
        let items = match self {
            RawStringList::List(items) => items,
            // "Philadelphia, PA" is one city, so only split on ';' or '|'
            RawStringList::Joined(s) => s.split([';', '|']).map(str::to_string).collect(),
        };
        items
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawInteraction {
    #[serde(default)]
    pub liked: Option<bool>,
    #[serde(default)]
    pub disliked: Option<bool>,
    #[serde(default, alias = "favorite", alias = "is_favorite")]
    pub favorited: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawProperty {
    pub id: RawId,
    #[serde(default, alias = "street_address", alias = "streetAddress")]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default, alias = "zipCode", alias = "zip", alias = "postal_code")]
    pub zip_code: Option<String>,
    #[serde(default, alias = "list_price", alias = "listPrice")]
    pub price: Option<RawNumber>,
    #[serde(default, alias = "bedrooms")]
    pub beds: Option<RawNumber>,
    #[serde(default, alias = "bathrooms")]
    pub baths: Option<RawNumber>,
    #[serde(default, alias = "squareFeet", alias = "sqft", alias = "living_area")]
    pub square_feet: Option<RawNumber>,
    #[serde(default, alias = "photos", alias = "image_urls")]
    pub images: Option<Vec<String>>,
    #[serde(default, alias = "listingUrl", alias = "url")]
    pub listing_url: Option<String>,
    #[serde(default)]
    pub liked: Option<bool>,
    #[serde(default)]
    pub disliked: Option<bool>,
    #[serde(default, alias = "is_favorite")]
    pub favorited: Option<bool>,
    /// Some endpoints nest the visitor's flags instead of inlining them
    #[serde(default)]
    pub interaction: Option<RawInteraction>,
}

impl From<RawProperty> for Property {
    fn from(raw: RawProperty) -> Self {
        let nested = raw.interaction.unwrap_or_default();
        let liked = raw.liked.or(nested.liked).unwrap_or(false);
        let disliked = raw.disliked.or(nested.disliked).unwrap_or(false);
        let favorited = raw.favorited.or(nested.favorited).unwrap_or(false);

        let mut property = Property {
            id: raw.id.into_string(),
            address: raw.address.unwrap_or_default().trim().to_string(),
            city: raw.city.filter(|s| !s.is_empty()),
            state: raw.state.filter(|s| !s.is_empty()),
            zip_code: raw.zip_code.filter(|s| !s.is_empty()),
            price: non_negative(raw.price.as_ref()).map(|v| v.round() as i64),
            beds: non_negative(raw.beds.as_ref()).map(|v| v.round() as u32),
            baths: non_negative(raw.baths.as_ref()).map(|v| v as f32),
            square_feet: non_negative(raw.square_feet.as_ref()).map(|v| v.round() as u32),
            images: raw.images.unwrap_or_default(),
            listing_url: raw.listing_url.filter(|s| !s.is_empty()),
            liked: false,
            disliked: false,
            favorited: false,
        };
        property.apply_flags(InteractionFlags {
            liked,
            disliked,
            favorited,
        });
        property
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPreferences {
    #[serde(default, alias = "minBeds")]
    pub min_beds: Option<RawNumber>,
    #[serde(default, alias = "maxBeds")]
    pub max_beds: Option<RawNumber>,
    #[serde(default, alias = "minBaths")]
    pub min_baths: Option<RawNumber>,
    #[serde(default, alias = "maxBaths")]
    pub max_baths: Option<RawNumber>,
    #[serde(default, alias = "minPrice")]
    pub min_price: Option<RawNumber>,
    #[serde(default, alias = "maxPrice")]
    pub max_price: Option<RawNumber>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, alias = "radius", alias = "radius_miles")]
    pub diameter: Option<RawNumber>,
    #[serde(default)]
    pub cities: Option<RawStringList>,
    #[serde(default)]
    pub townships: Option<RawStringList>,
    #[serde(default, alias = "isSingleFamily")]
    pub is_single_family: Option<bool>,
    #[serde(default, alias = "isCondo")]
    pub is_condo: Option<bool>,
    #[serde(default, alias = "isTownHouse", alias = "is_townhouse")]
    pub is_town_house: Option<bool>,
    #[serde(default, alias = "isApartment")]
    pub is_apartment: Option<bool>,
    #[serde(default, alias = "isMultiFamily")]
    pub is_multi_family: Option<bool>,
    #[serde(default, alias = "isLotLand")]
    pub is_lot_land: Option<bool>,
}

impl From<RawPreferences> for Preferences {
    fn from(raw: RawPreferences) -> Self {
        let address = raw
            .address
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty());
        let radius = non_negative(raw.diameter.as_ref()).filter(|r| *r > 0.0);
        let cities = raw.cities.map(RawStringList::into_vec).unwrap_or_default();
        let townships = raw.townships.map(RawStringList::into_vec).unwrap_or_default();

        // Address search wins only when complete; otherwise fall back to area
        let location = match (address, radius) {
            (Some(address), Some(radius)) => Some(LocationMode::Address {
                address,
                radius_miles: radius as f32,
            }),
            _ if !cities.is_empty() || !townships.is_empty() => {
                Some(LocationMode::Area { cities, townships })
            }
            _ => None,
        };

        let whole = |n: Option<RawNumber>| non_negative(n.as_ref()).map(|v| v.round() as u32);
        let price = |n: Option<RawNumber>| non_negative(n.as_ref()).map(|v| v.round() as i64);
        let half = |n: Option<RawNumber>| non_negative(n.as_ref()).map(|v| v as f32);

        Preferences {
            min_beds: whole(raw.min_beds),
            max_beds: whole(raw.max_beds),
            min_baths: half(raw.min_baths),
            max_baths: half(raw.max_baths),
            min_price: price(raw.min_price),
            max_price: price(raw.max_price),
            location,
            property_types: PropertyTypes {
                single_family: raw.is_single_family.unwrap_or(false),
                condo: raw.is_condo.unwrap_or(false),
                townhouse: raw.is_town_house.unwrap_or(false),
                apartment: raw.is_apartment.unwrap_or(false),
                multi_family: raw.is_multi_family.unwrap_or(false),
                lot_land: raw.is_lot_land.unwrap_or(false),
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCollection {
    pub id: RawId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub preferences: Option<RawPreferences>,
    #[serde(default, alias = "shareToken")]
    pub share_token: Option<String>,
    #[serde(default, alias = "isPublic")]
    pub is_public: Option<bool>,
    #[serde(default, alias = "propertyCount", alias = "properties_count")]
    pub property_count: Option<RawNumber>,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<String>,
}

impl From<RawCollection> for Collection {
    fn from(raw: RawCollection) -> Self {
        let status = match raw.status.as_deref().map(str::to_ascii_uppercase).as_deref() {
            Some("INACTIVE") => CollectionStatus::Inactive,
            _ => CollectionStatus::Active,
        };
        Collection {
            id: raw.id.into_string(),
            name: raw.name.unwrap_or_else(|| "Untitled showcase".to_string()),
            status,
            preferences: raw.preferences.map(Preferences::from).unwrap_or_default(),
            share_token: raw.share_token.filter(|t| !t.is_empty()),
            is_public: raw.is_public.unwrap_or(false),
            property_count: non_negative(raw.property_count.as_ref())
                .map(|v| v as u32)
                .unwrap_or(0),
            created_at: raw.created_at.as_deref().and_then(parse_timestamp),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawComment {
    pub id: RawId,
    #[serde(default, alias = "visitor_name", alias = "author_name")]
    pub author: Option<String>,
    #[serde(default, alias = "text", alias = "comment")]
    pub content: Option<String>,
    #[serde(default, alias = "createdAt", alias = "timestamp")]
    pub created_at: Option<String>,
}

impl From<RawComment> for Comment {
    fn from(raw: RawComment) -> Self {
        Comment {
            id: raw.id.into_string(),
            author: raw
                .author
                .filter(|a| !a.trim().is_empty())
                .unwrap_or_else(|| "Anonymous".to_string()),
            content: raw.content.unwrap_or_default(),
            created_at: raw
                .created_at
                .as_deref()
                .and_then(parse_timestamp)
                .unwrap_or_else(Utc::now),
        }
    }
}

/// Parse RFC 3339 or a zone-less ISO timestamp (assumed UTC)
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

/// Decode a list that is either a bare array or wrapped under `key`.
/// Items that fail to decode are logged and skipped.
pub fn decode_list<R, T>(value: Value, key: &str) -> Result<Vec<T>, ApiError>
where
    R: DeserializeOwned,
    T: From<R>,
{
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove(key) {
            Some(Value::Array(items)) => items,
            Some(Value::Null) | None => Vec::new(),
            Some(other) => {
                return Err(ApiError::Decode(format!(
                    "expected `{}` to be an array, got {}",
                    key, other
                )))
            }
        },
        Value::Null => Vec::new(),
        other => {
            return Err(ApiError::Decode(format!(
                "expected array or object, got {}",
                other
            )))
        }
    };

    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match serde_json::from_value::<R>(item) {
            Ok(raw) => out.push(T::from(raw)),
            Err(e) => warn!("Skipping malformed {} entry: {}", key, e),
        }
    }
    Ok(out)
}

/// Decode a single object that is either bare or wrapped under `key`
pub fn decode_one<R, T>(value: Value, key: &str) -> Result<T, ApiError>
where
    R: DeserializeOwned,
    T: From<R>,
{
    let inner = match value {
        Value::Object(mut map) if map.contains_key(key) => map.remove(key).unwrap_or(Value::Null),
        other => other,
    };
    let raw: R = serde_json::from_value(inner)?;
    Ok(T::from(raw))
}

/// Decode `{interaction: {liked, disliked}}`, also accepting the flags inline
pub fn decode_interaction(value: Value) -> Result<InteractionUpdate, ApiError> {
    let raw: RawInteraction = decode_one::<RawInteraction, RawInteraction>(value, "interaction")?;
    match (raw.liked, raw.disliked) {
        (Some(liked), Some(disliked)) => Ok(InteractionUpdate {
            liked,
            disliked,
            favorited: raw.favorited,
        }),
        _ => Err(ApiError::Decode(
            "interaction response is missing liked/disliked".to_string(),
        )),
    }
}

/// Pull a human-readable message out of an error body
pub fn error_message(body: &str, fallback: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let from_json = parsed.as_ref().and_then(|v| {
        ["error", "detail", "message"]
            .iter()
            .find_map(|key| match v.get(key) {
                Some(Value::String(s)) => Some(s.clone()),
                Some(Value::Array(items)) => items
                    .first()
                    .and_then(|i| i.get("msg"))
                    .and_then(Value::as_str)
                    .map(str::to_string),
                Some(Value::Object(obj)) => obj
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                _ => None,
            })
    });

    from_json
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty() && parsed.is_none()).then(|| trimmed.to_string())
        })
        .unwrap_or_else(|| fallback.to_string())
}
