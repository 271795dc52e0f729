use crate::api::types::{CollectionUpdate, InteractionKind, NewComment};
use crate::api::ShowcaseApi;
use crate::config::ClientConfig;
use crate::engine::comments::{begin_comment, resolve_comment, CommentOutcome};
use crate::engine::derived::TabCounts;
use crate::engine::guard::{ActionGuard, PageAction};
use crate::engine::interaction::{InteractionController, Resolution};
use crate::engine::notifications::NotificationQueue;
use crate::engine::view_state::{SortKey, SortOrder, Tab, ViewState};
use crate::error::{friendly_message, ApiError, Result, ShowcaseError};
use crate::forms::ShowcaseForm;
use crate::models::{Collection, CollectionStatus, Comment, InteractionFlags, Property};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Default)]
struct PageState {
    view: ViewState,
    interactions: InteractionController,
    guard: ActionGuard,
    collections: Vec<Collection>,
}

/// Releases an action guard entry when dropped, including on cancellation
struct InFlight<'a> {
    state: &'a Mutex<PageState>,
    action: PageAction,
    entity: String,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.state.lock().guard.finish(self.action, &self.entity);
    }
}

/// Action handlers for the showcases page.
///
/// Methods take `&self` so several actions can be pending at once. State is
/// only locked between awaits. Every failure is turned into a toast or, for
/// validation and duplicate-submission errors, returned for inline display.
pub struct ShowcasePage {
    api: Arc<dyn ShowcaseApi>,
    state: Mutex<PageState>,
    notifications: NotificationQueue,
    visitor_name: String,
    visitor_email: String,
}

impl ShowcasePage {
    pub fn new(api: Arc<dyn ShowcaseApi>, config: &ClientConfig) -> Self {
        Self {
            api,
            state: Mutex::new(PageState::default()),
            notifications: NotificationQueue::from_config(config),
            visitor_name: config.visitor_name.clone(),
            visitor_email: config.visitor_email.clone(),
        }
    }

    pub fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    /// Read the view state under the lock
    pub fn with_view<R>(&self, f: impl FnOnce(&ViewState) -> R) -> R {
        f(&self.state.lock().view)
    }

    pub fn set_tab(&self, tab: Tab) {
        self.state.lock().view.tab = tab;
    }

    pub fn set_sort(&self, sort_by: SortKey, sort_order: SortOrder) {
        self.state.lock().view.set_sort(sort_by, sort_order);
    }

    pub fn visible_properties(&self) -> Vec<Property> {
        self.with_view(|view| view.visible().into_iter().cloned().collect())
    }

    pub fn tab_counts(&self) -> TabCounts {
        self.with_view(ViewState::counts)
    }

    pub fn collections(&self) -> Vec<Collection> {
        self.state.lock().collections.clone()
    }

    pub fn share_url(&self, collection_id: &str, base_url: &str) -> Option<String> {
        self.state
            .lock()
            .collections
            .iter()
            .find(|c| c.id == collection_id)
            .and_then(|c| c.share_url(base_url))
    }

    /// Surface a failure to the user and hand it back to the caller
    fn report(&self, err: ShowcaseError) -> ShowcaseError {
        match &err {
            ShowcaseError::Validation(_) | ShowcaseError::AlreadyInFlight(_) => {}
            ShowcaseError::Api(ApiError::Unauthorized { redirect }) => {
                info!("Login required, redirect to {}", redirect);
            }
            _ => {
                self.notifications.error(friendly_message(&err));
            }
        }
        err
    }

    fn begin_action(&self, action: PageAction, entity: &str) -> Result<InFlight<'_>> {
        if !self.state.lock().guard.try_begin(action, entity) {
            debug!("Ignoring duplicate {} for {}", action.label(), entity);
            return Err(ShowcaseError::AlreadyInFlight(action.label().to_string()));
        }
        Ok(InFlight {
            state: &self.state,
            action,
            entity: entity.to_string(),
        })
    }

    pub async fn load_collections(&self) -> Result<Vec<Collection>> {
        let collections = self
            .api
            .list_collections()
            .await
            .map_err(|e| self.report(e.into()))?;
        self.state.lock().collections = collections.clone();
        Ok(collections)
    }

    /// Switch to `collection_id` and load its properties.
    /// Returns the number of properties loaded.
    ///
    /// The latest selection always wins. Re-selecting a collection whose load
    /// is still pending switches the view back and lets that load finish it.
    pub async fn select_collection(&self, collection_id: &str) -> Result<usize> {
        {
            let mut state = self.state.lock();
            state.view.select_collection(collection_id);
            state.interactions.reset();
        }
        let _in_flight = self.begin_action(PageAction::LoadProperties, collection_id)?;

        let properties = self
            .api
            .fetch_properties(collection_id)
            .await
            .map_err(|e| self.report(e.into()))?;

        let count = properties.len();
        if !self
            .state
            .lock()
            .view
            .load_properties(collection_id, properties)
        {
            debug!("Collection {} deselected before load finished", collection_id);
            return Ok(0);
        }
        Ok(count)
    }

    pub async fn set_like(&self, property_id: &str, liked: bool) -> Result<InteractionFlags> {
        self.interact(property_id, InteractionKind::Like, liked).await
    }

    pub async fn set_dislike(&self, property_id: &str, disliked: bool) -> Result<InteractionFlags> {
        self.interact(property_id, InteractionKind::Dislike, disliked)
            .await
    }

    pub async fn set_favorite(&self, property_id: &str, favorited: bool) -> Result<InteractionFlags> {
        self.interact(property_id, InteractionKind::Favorite, favorited)
            .await
    }

    async fn interact(
        &self,
        property_id: &str,
        kind: InteractionKind,
        value: bool,
    ) -> Result<InteractionFlags> {
        let ticket = {
            let mut state = self.state.lock();
            let PageState {
                view, interactions, ..
            } = &mut *state;
            interactions.begin(view, property_id, kind, value)
        }
        .map_err(|e| self.report(e))?;

        let response = self
            .api
            .interact(&ticket.collection_id, property_id, kind, value)
            .await;

        let (resolution, current) = {
            let mut state = self.state.lock();
            let PageState {
                view, interactions, ..
            } = &mut *state;
            let fallback = ticket.previous();
            let resolution = interactions.resolve(view, ticket, response);
            let current = view
                .property(property_id)
                .map(Property::flags)
                .unwrap_or(fallback);
            (resolution, current)
        };

        match resolution {
            Resolution::Confirmed(flags) => Ok(flags),
            Resolution::RolledBack { error, .. } => Err(self.report(error.into())),
            Resolution::Stale => Ok(current),
        }
    }

    /// Open the detail view for a property and load its comments.
    /// The detail stays open with no comments if loading fails.
    pub async fn open_detail(&self, property_id: &str) -> Result<Vec<Comment>> {
        let collection_id = {
            let mut state = self.state.lock();
            let collection_id = state
                .view
                .collection_id()
                .ok_or(ShowcaseError::NoCollectionSelected)
                .map(str::to_string);
            match collection_id {
                Ok(id) => state.view.open_detail(property_id).map(|_| id),
                Err(e) => Err(e),
            }
        }
        .map_err(|e| self.report(e))?;

        let comments = self
            .api
            .fetch_comments(&collection_id, property_id)
            .await
            .map_err(|e| self.report(e.into()))?;

        let mut state = self.state.lock();
        if state.view.collection_id() == Some(collection_id.as_str()) {
            if let Some(detail) = state.view.detail_for_mut(property_id) {
                // keep any comment submitted while the list was loading
                let pending: Vec<Comment> = detail
                    .comments
                    .drain(..)
                    .filter(Comment::is_temporary)
                    .collect();
                detail.comments = comments.clone();
                detail.comments.extend(pending);
            }
        }
        Ok(comments)
    }

    pub fn close_detail(&self) {
        self.state.lock().view.close_detail();
    }

    pub async fn add_comment(&self, property_id: &str, text: &str) -> Result<Comment> {
        let _in_flight = self.begin_action(PageAction::SubmitComment, property_id)?;

        let ticket = begin_comment(
            &mut self.state.lock().view,
            property_id,
            &self.visitor_name,
            text,
        )
        .map_err(|e| self.report(e))?;

        let body = NewComment {
            content: ticket.content.clone(),
            visitor_name: self.visitor_name.clone(),
            visitor_email: self.visitor_email.clone(),
        };
        let response = self
            .api
            .add_comment(&ticket.collection_id, property_id, &body)
            .await;

        let outcome = resolve_comment(&mut self.state.lock().view, ticket, response.clone());
        match outcome {
            CommentOutcome::Saved(comment) => {
                self.notifications.success("Comment added");
                Ok(comment)
            }
            CommentOutcome::Removed(error) => Err(self.report(error.into())),
            CommentOutcome::Detached => response.map_err(|e| self.report(e.into())),
        }
    }

    pub async fn set_collection_status(
        &self,
        collection_id: &str,
        status: CollectionStatus,
    ) -> Result<Collection> {
        info!("Setting collection {} to {}", collection_id, status.as_str());
        let updated = self
            .update_collection(collection_id, CollectionUpdate::status(status))
            .await?;
        let message = match updated.status {
            CollectionStatus::Active => "Showcase activated",
            CollectionStatus::Inactive => "Showcase deactivated",
        };
        self.notifications.success(message);
        Ok(updated)
    }

    /// Validate the edit form and save it. Validation errors never reach
    /// the backend and are returned for inline display.
    pub async fn update_preferences(
        &self,
        collection_id: &str,
        form: &ShowcaseForm,
    ) -> Result<Collection> {
        let preferences = form.validate().map_err(|e| self.report(e.into()))?;
        let updated = self
            .update_collection(collection_id, CollectionUpdate::preferences(preferences))
            .await?;
        self.notifications.success("Showcase preferences updated");
        Ok(updated)
    }

    async fn update_collection(
        &self,
        collection_id: &str,
        update: CollectionUpdate,
    ) -> Result<Collection> {
        let _in_flight = self.begin_action(PageAction::UpdateCollection, collection_id)?;
        let updated = self
            .api
            .update_collection(collection_id, &update)
            .await
            .map_err(|e| self.report(e.into()))?;

        let mut state = self.state.lock();
        match state.collections.iter_mut().find(|c| c.id == updated.id) {
            Some(existing) => *existing = updated.clone(),
            None => state.collections.push(updated.clone()),
        }
        Ok(updated)
    }

    pub async fn delete_collection(&self, collection_id: &str) -> Result<()> {
        let _in_flight = self.begin_action(PageAction::DeleteCollection, collection_id)?;
        self.api
            .delete_collection(collection_id)
            .await
            .map_err(|e| self.report(e.into()))?;

        {
            let mut state = self.state.lock();
            state.collections.retain(|c| c.id != collection_id);
            if state.view.collection_id() == Some(collection_id) {
                warn!("Deleted the selected collection {}", collection_id);
                state.view.clear_selection();
                state.interactions.reset();
            }
        }
        self.notifications.success("Showcase deleted");
        Ok(())
    }
}
