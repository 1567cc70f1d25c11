//! Global lookup index over the screen graph
//!
//! Elements carry no back-reference to their screen, so the aggregate keeps
//! two derived maps: screen id → position in the screen order, and element
//! id → owning screen id. Both are rebuilt from the ordered screen lists
//! alone, which makes a full rebuild the recovery path after a bulk replace.

use std::collections::HashMap;

use crate::model::{ElementId, ScreenId};

/// Derived, non-owning view of where every screen and element lives
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphIndex {
    screen_positions: HashMap<ScreenId, usize>,
    element_owners: HashMap<ElementId, ScreenId>,
}

impl GraphIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from `(screen id, element ids)` pairs in screen order
    pub fn build<'a, I, E>(screens: I) -> Self
    where
        I: IntoIterator<Item = (&'a ScreenId, E)>,
        E: IntoIterator<Item = &'a ElementId>,
    {
        let mut index = Self::new();
        index.rebuild(screens);
        index
    }

    /// Clear and repopulate both maps
    pub fn rebuild<'a, I, E>(&mut self, screens: I)
    where
        I: IntoIterator<Item = (&'a ScreenId, E)>,
        E: IntoIterator<Item = &'a ElementId>,
    {
        self.screen_positions.clear();
        self.element_owners.clear();

        for (position, (screen_id, elements)) in screens.into_iter().enumerate() {
            self.screen_positions.insert(screen_id.clone(), position);
            for element_id in elements {
                self.element_owners.insert(element_id.clone(), screen_id.clone());
            }
        }
    }

    /// Recompute screen positions after the screen order changed
    pub fn reposition<'a>(&mut self, order: impl IntoIterator<Item = &'a ScreenId>) {
        self.screen_positions.clear();
        for (position, screen_id) in order.into_iter().enumerate() {
            self.screen_positions.insert(screen_id.clone(), position);
        }
    }

    pub fn screen_position(&self, screen_id: &str) -> Option<usize> {
        self.screen_positions.get(screen_id).copied()
    }

    pub fn owner_of(&self, element_id: &str) -> Option<&ScreenId> {
        self.element_owners.get(element_id)
    }

    pub fn contains_screen(&self, screen_id: &str) -> bool {
        self.screen_positions.contains_key(screen_id)
    }

    pub fn contains_element(&self, element_id: &str) -> bool {
        self.element_owners.contains_key(element_id)
    }

    pub fn insert_element(&mut self, element_id: ElementId, screen_id: ScreenId) {
        self.element_owners.insert(element_id, screen_id);
    }

    pub fn remove_element(&mut self, element_id: &str) -> Option<ScreenId> {
        self.element_owners.remove(element_id)
    }

    pub fn screen_count(&self) -> usize {
        self.screen_positions.len()
    }

    pub fn element_count(&self) -> usize {
        self.element_owners.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_build_and_lookup() {
        let screens = vec![
            ("screen_1".to_string(), ids(&["el_1", "el_2"])),
            ("screen_2".to_string(), ids(&["el_3"])),
        ];
        let index = GraphIndex::build(screens.iter().map(|(s, e)| (s, e.iter())));

        assert_eq!(index.screen_position("screen_2"), Some(1));
        assert_eq!(index.owner_of("el_3").map(String::as_str), Some("screen_2"));
        assert_eq!(index.owner_of("el_9"), None);
        assert_eq!(index.element_count(), 3);
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let screens = vec![("screen_1".to_string(), ids(&["el_1"]))];
        let mut index = GraphIndex::build(screens.iter().map(|(s, e)| (s, e.iter())));
        let first = index.clone();

        index.rebuild(screens.iter().map(|(s, e)| (s, e.iter())));
        index.rebuild(screens.iter().map(|(s, e)| (s, e.iter())));
        assert_eq!(index, first);
    }
}
