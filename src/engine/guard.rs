use std::collections::HashSet;

/// Actions that must not be submitted twice for the same entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageAction {
    LoadProperties,
    SubmitComment,
    UpdateCollection,
    DeleteCollection,
}

impl PageAction {
    pub fn label(&self) -> &'static str {
        match self {
            PageAction::LoadProperties => "loading properties",
            PageAction::SubmitComment => "submitting comment",
            PageAction::UpdateCollection => "updating showcase",
            PageAction::DeleteCollection => "deleting showcase",
        }
    }
}

/// In-flight `(action, entity)` pairs. Distinct actions never block each other.
#[derive(Debug, Default)]
pub struct ActionGuard {
    in_flight: HashSet<(PageAction, String)>,
}

impl ActionGuard {
    /// Mark the action as started; false if it is already running
    pub fn try_begin(&mut self, action: PageAction, entity: &str) -> bool {
        self.in_flight.insert((action, entity.to_string()))
    }

    pub fn finish(&mut self, action: PageAction, entity: &str) {
        self.in_flight.remove(&(action, entity.to_string()));
    }

    pub fn is_busy(&self, action: PageAction, entity: &str) -> bool {
        self.in_flight.contains(&(action, entity.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_only_the_same_action_on_the_same_entity() {
        let mut guard = ActionGuard::default();
        assert!(guard.try_begin(PageAction::DeleteCollection, "c1"));
        assert!(!guard.try_begin(PageAction::DeleteCollection, "c1"));
        assert!(guard.try_begin(PageAction::DeleteCollection, "c2"));
        assert!(guard.try_begin(PageAction::UpdateCollection, "c1"));

        guard.finish(PageAction::DeleteCollection, "c1");
        assert!(!guard.is_busy(PageAction::DeleteCollection, "c1"));
        assert!(guard.try_begin(PageAction::DeleteCollection, "c1"));
    }
}
