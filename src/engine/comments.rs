use crate::engine::view_state::ViewState;
use crate::error::{ApiError, Result, ShowcaseError, ValidationError};
use crate::models::Comment;
use tracing::{debug, warn};

/// A temporary comment waiting for the backend to assign it a real id
#[derive(Debug, Clone, PartialEq)]
pub struct CommentTicket {
    pub collection_id: String,
    pub property_id: String,
    pub temp_id: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommentOutcome {
    /// The temporary comment was replaced by the server's record
    Saved(Comment),
    /// The temporary comment was removed again
    Removed(ApiError),
    /// The detail view was closed or switched before the response arrived
    Detached,
}

/// Append a temporary comment to the open detail of `property_id`
pub fn begin_comment(
    view: &mut ViewState,
    property_id: &str,
    author: &str,
    text: &str,
) -> Result<CommentTicket> {
    let content = text.trim();
    if content.is_empty() {
        return Err(ValidationError::EmptyComment.into());
    }
    let collection_id = view
        .collection_id()
        .ok_or(ShowcaseError::NoCollectionSelected)?
        .to_string();
    let detail = view
        .detail_for_mut(property_id)
        .ok_or_else(|| ShowcaseError::DetailNotOpen(property_id.to_string()))?;

    let mut comment = Comment::temporary(author, content);
    // Two comments in the same millisecond would share a timestamp id
    let base = comment.id.clone();
    let mut n = 1;
    while detail.comments.iter().any(|c| c.id == comment.id) {
        comment.id = format!("{}-{}", base, n);
        n += 1;
    }

    let ticket = CommentTicket {
        collection_id,
        property_id: property_id.to_string(),
        temp_id: comment.id.clone(),
        content: content.to_string(),
    };
    debug!("Added temporary comment {} on {}", ticket.temp_id, property_id);
    detail.comments.push(comment);
    Ok(ticket)
}

/// Swap in the server comment, or drop the temporary one on failure
pub fn resolve_comment(
    view: &mut ViewState,
    ticket: CommentTicket,
    response: std::result::Result<Comment, ApiError>,
) -> CommentOutcome {
    if view.collection_id() != Some(ticket.collection_id.as_str()) {
        return CommentOutcome::Detached;
    }
    let Some(detail) = view.detail_for_mut(&ticket.property_id) else {
        return CommentOutcome::Detached;
    };

    let position = detail.comments.iter().position(|c| c.id == ticket.temp_id);
    match response {
        Ok(saved) => {
            // a refetch may already have brought in the stored record
            let listed = detail.comments.iter().any(|c| c.id == saved.id);
            match (position, listed) {
                (Some(i), true) => {
                    detail.comments.remove(i);
                }
                (Some(i), false) => detail.comments[i] = saved.clone(),
                (None, true) => {}
                (None, false) => detail.comments.push(saved.clone()),
            }
            CommentOutcome::Saved(saved)
        }
        Err(error) => {
            warn!(
                "Comment on property {} failed, removing {}: {}",
                ticket.property_id, ticket.temp_id, error
            );
            if let Some(i) = position {
                detail.comments.remove(i);
            }
            CommentOutcome::Removed(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Property;
    use chrono::Utc;

    fn open_view() -> ViewState {
        let mut view = ViewState::new();
        view.select_collection("c1");
        view.load_properties("c1", vec![Property::new("p1", "1 Elm St")]);
        view.open_detail("p1").unwrap();
        view
    }

    fn existing() -> Comment {
        Comment {
            id: "10".into(),
            author: "Agent".into(),
            content: "Open house Sunday".into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn success_replaces_temporary_comment() {
        let mut view = open_view();
        let ticket = begin_comment(&mut view, "p1", "Sam", "  Love the porch ").unwrap();
        let comments = &view.detail().unwrap().comments;
        assert_eq!(comments.len(), 1);
        assert!(comments[0].is_temporary());
        assert_eq!(comments[0].content, "Love the porch");

        let saved = Comment {
            id: "77".into(),
            author: "Sam".into(),
            content: "Love the porch".into(),
            created_at: Utc::now(),
        };
        let outcome = resolve_comment(&mut view, ticket, Ok(saved.clone()));
        assert_eq!(outcome, CommentOutcome::Saved(saved.clone()));
        assert_eq!(view.detail().unwrap().comments, vec![saved]);
    }

    #[test]
    fn failure_restores_previous_list() {
        let mut view = open_view();
        view.detail_for_mut("p1").unwrap().comments.push(existing());
        let before = view.detail().unwrap().comments.clone();

        let ticket = begin_comment(&mut view, "p1", "Sam", "Too small").unwrap();
        assert_eq!(view.detail().unwrap().comments.len(), 2);

        let outcome = resolve_comment(&mut view, ticket, Err(ApiError::Network("down".into())));
        assert!(matches!(outcome, CommentOutcome::Removed(_)));
        assert_eq!(view.detail().unwrap().comments, before);
    }

    #[test]
    fn temporary_ids_stay_unique() {
        let mut view = open_view();
        let a = begin_comment(&mut view, "p1", "Sam", "one").unwrap();
        let b = begin_comment(&mut view, "p1", "Sam", "two").unwrap();
        assert_ne!(a.temp_id, b.temp_id);
    }

    #[test]
    fn rejects_empty_text_and_closed_detail() {
        let mut view = open_view();
        assert_eq!(
            begin_comment(&mut view, "p1", "Sam", "   "),
            Err(ShowcaseError::Validation(ValidationError::EmptyComment))
        );
        view.close_detail();
        assert_eq!(
            begin_comment(&mut view, "p1", "Sam", "hi"),
            Err(ShowcaseError::DetailNotOpen("p1".into()))
        );
    }

    #[test]
    fn saved_comment_already_refetched_is_not_duplicated() {
        let mut view = open_view();
        let ticket = begin_comment(&mut view, "p1", "Sam", "Roof age?").unwrap();
        let saved = Comment {
            id: "1001".into(),
            author: "Sam".into(),
            content: "Roof age?".into(),
            created_at: Utc::now(),
        };
        view.detail_for_mut("p1")
            .unwrap()
            .comments
            .insert(0, saved.clone());

        let outcome = resolve_comment(&mut view, ticket, Ok(saved.clone()));
        assert_eq!(outcome, CommentOutcome::Saved(saved.clone()));
        assert_eq!(view.detail().unwrap().comments, vec![saved]);
    }

    #[test]
    fn response_after_detail_closed_is_detached() {
        let mut view = open_view();
        let ticket = begin_comment(&mut view, "p1", "Sam", "hi").unwrap();
        view.close_detail();
        assert_eq!(
            resolve_comment(&mut view, ticket, Ok(existing())),
            CommentOutcome::Detached
        );
    }
}
