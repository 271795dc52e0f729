use async_trait::async_trait;
use chrono::Utc;
use openhousepal::api::{CollectionUpdate, InteractionKind, InteractionUpdate, NewComment};
use openhousepal::models::{Collection, CollectionStatus, Comment, Preferences, Property};
use openhousepal::{ApiError, ShowcaseApi};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

/// In-memory backend with switchable failures and per-call delays
#[derive(Default)]
pub struct MockApi {
    pub state: Mutex<MockState>,
}

#[derive(Default)]
pub struct MockState {
    pub collections: Vec<Collection>,
    pub properties: HashMap<String, Vec<Property>>,
    pub comments: HashMap<String, Vec<Comment>>,
    /// Returned by every call while set
    pub fail_with: Option<ApiError>,
    pub fail_interactions: bool,
    pub fail_comments: bool,
    /// Popped on every call; `fetch_properties`, `interact`, `add_comment`
    /// and `delete_collection` wait on it before answering
    pub delays: VecDeque<Duration>,
    pub calls: Vec<String>,
    next_comment_id: u64,
}

pub fn property(id: &str, price: i64) -> Property {
    let mut p = Property::new(id, format!("{} Walnut St", id));
    p.city = Some("Philadelphia".into());
    p.state = Some("PA".into());
    p.price = Some(price);
    p
}

pub fn collection(id: &str) -> Collection {
    Collection {
        id: id.into(),
        name: format!("Showcase {}", id),
        status: CollectionStatus::Active,
        preferences: Preferences::default(),
        share_token: Some(format!("share-{}", id)),
        is_public: true,
        property_count: 0,
        created_at: None,
    }
}

impl MockApi {
    pub fn with_collection(id: &str, properties: Vec<Property>) -> Self {
        let api = Self::default();
        api.add_collection(id, properties);
        api
    }

    pub fn add_collection(&self, id: &str, properties: Vec<Property>) {
        let mut state = self.state.lock();
        state.collections.push(collection(id));
        state.properties.insert(id.to_string(), properties);
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    fn record(&self, call: String) -> Result<Option<Duration>, ApiError> {
        let mut state = self.state.lock();
        state.calls.push(call);
        if let Some(err) = state.fail_with.clone() {
            return Err(err);
        }
        Ok(state.delays.pop_front())
    }
}

async fn pause(delay: Option<Duration>) {
    if let Some(d) = delay {
        tokio::time::sleep(d).await;
    }
}

#[async_trait]
impl ShowcaseApi for MockApi {
    async fn list_collections(&self) -> Result<Vec<Collection>, ApiError> {
        self.record("list_collections".into())?;
        Ok(self.state.lock().collections.clone())
    }

    async fn fetch_properties(&self, collection_id: &str) -> Result<Vec<Property>, ApiError> {
        let delay = self.record(format!("fetch_properties {}", collection_id))?;
        pause(delay).await;
        self.state
            .lock()
            .properties
            .get(collection_id)
            .cloned()
            .ok_or_else(|| ApiError::Status {
                status: 404,
                error: "Collection not found".into(),
            })
    }

    async fn interact(
        &self,
        collection_id: &str,
        property_id: &str,
        kind: InteractionKind,
        value: bool,
    ) -> Result<InteractionUpdate, ApiError> {
        let delay = self.record(format!(
            "interact {} {} {}={}",
            collection_id,
            property_id,
            kind.as_str(),
            value
        ))?;

        // server state changes on arrival, the answer is delivered after the delay
        let response = {
            let mut state = self.state.lock();
            if state.fail_interactions {
                Err(ApiError::Status {
                    status: 500,
                    error: "Internal Server Error".into(),
                })
            } else {
                let prop = state
                    .properties
                    .get_mut(collection_id)
                    .and_then(|props| props.iter_mut().find(|p| p.id == property_id));
                match prop {
                    Some(p) => {
                        match kind {
                            InteractionKind::Like => p.set_liked(value),
                            InteractionKind::Dislike => p.set_disliked(value),
                            InteractionKind::Favorite => p.set_favorited(value),
                        }
                        Ok(InteractionUpdate {
                            liked: p.liked,
                            disliked: p.disliked,
                            favorited: (kind == InteractionKind::Favorite).then_some(p.favorited),
                        })
                    }
                    None => Err(ApiError::Status {
                        status: 404,
                        error: "Property not found".into(),
                    }),
                }
            }
        };
        pause(delay).await;
        response
    }

    async fn fetch_comments(
        &self,
        collection_id: &str,
        property_id: &str,
    ) -> Result<Vec<Comment>, ApiError> {
        self.record(format!("fetch_comments {} {}", collection_id, property_id))?;
        Ok(self
            .state
            .lock()
            .comments
            .get(property_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn add_comment(
        &self,
        collection_id: &str,
        property_id: &str,
        comment: &NewComment,
    ) -> Result<Comment, ApiError> {
        let delay = self.record(format!("add_comment {} {}", collection_id, property_id))?;

        // stored on arrival, acknowledged after the delay
        let response = {
            let mut state = self.state.lock();
            if state.fail_comments {
                Err(ApiError::Network("connection reset".into()))
            } else {
                state.next_comment_id += 1;
                let saved = Comment {
                    id: format!("{}", 1000 + state.next_comment_id),
                    author: comment.visitor_name.clone(),
                    content: comment.content.clone(),
                    created_at: Utc::now(),
                };
                state
                    .comments
                    .entry(property_id.to_string())
                    .or_default()
                    .push(saved.clone());
                Ok(saved)
            }
        };
        pause(delay).await;
        response
    }

    async fn update_collection(
        &self,
        collection_id: &str,
        update: &CollectionUpdate,
    ) -> Result<Collection, ApiError> {
        self.record(format!("update_collection {}", collection_id))?;
        let mut state = self.state.lock();
        let existing = state
            .collections
            .iter_mut()
            .find(|c| c.id == collection_id)
            .ok_or_else(|| ApiError::Status {
                status: 404,
                error: "Collection not found".into(),
            })?;
        if let Some(status) = update.status {
            existing.status = status;
        }
        if let Some(prefs) = &update.preferences {
            existing.preferences = prefs.clone();
        }
        if let Some(name) = &update.name {
            existing.name = name.clone();
        }
        Ok(existing.clone())
    }

    async fn delete_collection(&self, collection_id: &str) -> Result<(), ApiError> {
        let delay = self.record(format!("delete_collection {}", collection_id))?;
        pause(delay).await;
        self.state
            .lock()
            .collections
            .retain(|c| c.id != collection_id);
        Ok(())
    }
}
