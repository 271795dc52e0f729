use crate::api::session::Session;
use crate::api::traits::ShowcaseApi;
use crate::api::types::{
    decode_interaction, decode_list, decode_one, error_message, CollectionUpdate,
    CollectionUpdatePayload, InteractionKind, InteractionRequest, InteractionUpdate, NewComment,
    RawCollection, RawComment, RawProperty,
};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::models::{Collection, Comment, Property};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// `ShowcaseApi` over the OpenHousePal REST backend
pub struct HttpShowcaseApi {
    client: Client,
    base_url: String,
    session: Arc<Session>,
}

impl HttpShowcaseApi {
    /// Create a client with a fresh session seeded from the config token
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let session = Arc::new(Session::new(config.token.clone()));
        Self::with_session(config, session)
    }

    /// Create a client sharing an existing session
    pub fn with_session(config: &ClientConfig, session: Arc<Session>) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("openhousepal/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self.client.request(method, url);
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and return the parsed JSON body.
    /// An empty 2xx body comes back as `Value::Null`.
    async fn send(&self, builder: RequestBuilder, path: &str) -> Result<Value, ApiError> {
        debug!("Requesting {}", path);

        let response = builder.send().await.map_err(|e| {
            warn!("Request to {} failed: {}", path, e);
            ApiError::Network(e.to_string())
        })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            let redirect = self.session.teardown();
            return Err(ApiError::Unauthorized { redirect });
        }

        let body = response.text().await.map_err(ApiError::from)?;

        if !status.is_success() {
            let fallback = status.canonical_reason().unwrap_or("Request failed");
            let error = error_message(&body, fallback);
            warn!("{} returned {}: {}", path, status, error);
            return Err(ApiError::Status {
                status: status.as_u16(),
                error,
            });
        }

        debug!("{} returned {} bytes", path, body.len());

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }
}

fn property_path(collection_id: &str, property_id: &str) -> String {
    format!("/collections/{}/properties/{}", collection_id, property_id)
}

#[async_trait]
impl ShowcaseApi for HttpShowcaseApi {
    async fn list_collections(&self) -> Result<Vec<Collection>, ApiError> {
        let path = "/collections";
        let value = self.send(self.request(Method::GET, path), path).await?;
        let collections = decode_list::<RawCollection, Collection>(value, "collections")?;
        info!("Loaded {} collections", collections.len());
        Ok(collections)
    }

    async fn fetch_properties(&self, collection_id: &str) -> Result<Vec<Property>, ApiError> {
        let path = format!("/collections/{}/properties", collection_id);
        let value = self.send(self.request(Method::GET, &path), &path).await?;
        let properties = decode_list::<RawProperty, Property>(value, "properties")?;
        info!(
            "Loaded {} properties for collection {}",
            properties.len(),
            collection_id
        );
        Ok(properties)
    }

    async fn interact(
        &self,
        collection_id: &str,
        property_id: &str,
        kind: InteractionKind,
        value: bool,
    ) -> Result<InteractionUpdate, ApiError> {
        let path = format!("{}/interact", property_path(collection_id, property_id));
        let body = InteractionRequest {
            interaction_type: kind,
            value,
        };
        let builder = self.request(Method::POST, &path).json(&body);
        let response = self.send(builder, &path).await?;
        decode_interaction(response)
    }

    async fn fetch_comments(
        &self,
        collection_id: &str,
        property_id: &str,
    ) -> Result<Vec<Comment>, ApiError> {
        let path = format!("{}/comments", property_path(collection_id, property_id));
        let value = self.send(self.request(Method::GET, &path), &path).await?;
        decode_list::<RawComment, Comment>(value, "comments")
    }

    async fn add_comment(
        &self,
        collection_id: &str,
        property_id: &str,
        comment: &NewComment,
    ) -> Result<Comment, ApiError> {
        let path = format!("{}/comments", property_path(collection_id, property_id));
        let builder = self.request(Method::POST, &path).json(comment);
        let value = self.send(builder, &path).await?;
        decode_one::<RawComment, Comment>(value, "comment")
    }

    async fn update_collection(
        &self,
        collection_id: &str,
        update: &CollectionUpdate,
    ) -> Result<Collection, ApiError> {
        let path = format!("/collections/{}", collection_id);
        let payload = CollectionUpdatePayload::from(update);
        let builder = self.request(Method::PATCH, &path).json(&payload);
        let value = self.send(builder, &path).await?;
        decode_one::<RawCollection, Collection>(value, "collection")
    }

    async fn delete_collection(&self, collection_id: &str) -> Result<(), ApiError> {
        let path = format!("/collections/{}", collection_id);
        self.send(self.request(Method::DELETE, &path), &path).await?;
        info!("Deleted collection {}", collection_id);
        Ok(())
    }
}
