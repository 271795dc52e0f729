use crate::api::types::{InteractionKind, InteractionUpdate};
use crate::engine::view_state::ViewState;
use crate::error::{ApiError, Result, ShowcaseError};
use crate::models::{InteractionFlags, Property};
use std::collections::HashMap;
use tracing::{debug, warn};

/// An optimistic interaction waiting for its backend response
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionTicket {
    pub collection_id: String,
    pub property_id: String,
    pub kind: InteractionKind,
    pub value: bool,
    seq: u64,
    previous: InteractionFlags,
}

impl InteractionTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Flags the property had before this interaction was applied
    pub fn previous(&self) -> InteractionFlags {
        self.previous
    }
}

/// What happened to the view when a response arrived
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Server flags were written to the view
    Confirmed(InteractionFlags),
    /// Request failed; the pre-interaction flags were restored
    RolledBack {
        restored: InteractionFlags,
        error: ApiError,
    },
    /// A newer interaction on the same property was issued after this one,
    /// or the collection changed; the response was discarded
    Stale,
}

fn apply(property: &mut Property, kind: InteractionKind, value: bool) {
    match kind {
        InteractionKind::Like => property.set_liked(value),
        InteractionKind::Dislike => property.set_disliked(value),
        InteractionKind::Favorite => property.set_favorited(value),
    }
}

/// Optimistic like/dislike/favorite with per-property sequencing.
///
/// Every interaction gets a sequence number; only the response for the
/// latest one issued on a property may touch that property afterwards.
#[derive(Debug, Default)]
pub struct InteractionController {
    next_seq: u64,
    latest: HashMap<String, u64>,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply the interaction to the view and hand back a ticket for the response
    pub fn begin(
        &mut self,
        view: &mut ViewState,
        property_id: &str,
        kind: InteractionKind,
        value: bool,
    ) -> Result<InteractionTicket> {
        let collection_id = view
            .collection_id()
            .ok_or(ShowcaseError::NoCollectionSelected)?
            .to_string();
        let previous = view
            .property(property_id)
            .map(Property::flags)
            .ok_or_else(|| ShowcaseError::UnknownProperty(property_id.to_string()))?;

        view.update_property(property_id, |p| apply(p, kind, value));

        self.next_seq += 1;
        let seq = self.next_seq;
        self.latest.insert(property_id.to_string(), seq);
        debug!(
            "Optimistic {}={} on property {} (seq {})",
            kind.as_str(),
            value,
            property_id,
            seq
        );

        Ok(InteractionTicket {
            collection_id,
            property_id: property_id.to_string(),
            kind,
            value,
            seq,
            previous,
        })
    }

    /// Forget every pending interaction, e.g. after the collection changed.
    /// Responses for them will resolve as stale.
    pub fn reset(&mut self) {
        self.latest.clear();
    }

    /// Number of properties with an interaction awaiting its response
    pub fn pending(&self) -> usize {
        self.latest.len()
    }

    /// Whether `ticket` is still the newest interaction on its property
    pub fn is_latest(&self, ticket: &InteractionTicket) -> bool {
        self.latest.get(&ticket.property_id) == Some(&ticket.seq)
    }

    /// Reconcile the view with the backend's answer for `ticket`
    pub fn resolve(
        &mut self,
        view: &mut ViewState,
        ticket: InteractionTicket,
        response: std::result::Result<InteractionUpdate, ApiError>,
    ) -> Resolution {
        let latest = self.is_latest(&ticket);
        if !latest || view.collection_id() != Some(ticket.collection_id.as_str()) {
            if latest {
                self.latest.remove(&ticket.property_id);
            }
            debug!(
                "Discarding stale {} response for property {} (seq {})",
                ticket.kind.as_str(),
                ticket.property_id,
                ticket.seq
            );
            return Resolution::Stale;
        }
        self.latest.remove(&ticket.property_id);

        match response {
            Ok(update) => {
                let current = view
                    .property(&ticket.property_id)
                    .map(Property::flags)
                    .unwrap_or(ticket.previous);
                let flags = update.merged_with(current);
                view.update_property(&ticket.property_id, |p| p.apply_flags(flags));
                Resolution::Confirmed(flags)
            }
            Err(error) => {
                warn!(
                    "{} on property {} failed, rolling back: {}",
                    ticket.kind.as_str(),
                    ticket.property_id,
                    error
                );
                let restored = ticket.previous;
                view.update_property(&ticket.property_id, |p| p.apply_flags(restored));
                Resolution::RolledBack { restored, error }
            }
        }
    }
}
