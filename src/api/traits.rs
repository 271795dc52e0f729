use crate::api::types::{CollectionUpdate, InteractionKind, InteractionUpdate, NewComment};
use crate::error::ApiError;
use crate::models::{Collection, Comment, Property};
use async_trait::async_trait;

/// Backend operations the showcase engine depends on.
/// Implemented over HTTP in production and in memory for tests.
#[async_trait]
pub trait ShowcaseApi: Send + Sync {
    /// Collections owned by the signed-in agent
    async fn list_collections(&self) -> Result<Vec<Collection>, ApiError>;

    /// Properties currently in a collection, with the visitor's flags
    async fn fetch_properties(&self, collection_id: &str) -> Result<Vec<Property>, ApiError>;

    /// Record a like/dislike/favorite; returns the server's canonical flags
    async fn interact(
        &self,
        collection_id: &str,
        property_id: &str,
        kind: InteractionKind,
        value: bool,
    ) -> Result<InteractionUpdate, ApiError>;

    async fn fetch_comments(
        &self,
        collection_id: &str,
        property_id: &str,
    ) -> Result<Vec<Comment>, ApiError>;

    async fn add_comment(
        &self,
        collection_id: &str,
        property_id: &str,
        comment: &NewComment,
    ) -> Result<Comment, ApiError>;

    async fn update_collection(
        &self,
        collection_id: &str,
        update: &CollectionUpdate,
    ) -> Result<Collection, ApiError>;

    async fn delete_collection(&self, collection_id: &str) -> Result<(), ApiError>;
}
