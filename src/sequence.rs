//! Monotonic id allocation for screens and elements

use crate::codegen::names::unique_name;
use crate::model::{ElementId, ScreenId};

const SCREEN_PREFIX: &str = "screen_";
const ELEMENT_PREFIX: &str = "el_";

/// Issues `screen_<n>` and `el_<n>` identifiers.
///
/// Counters are post-incremented and persisted with the project
/// (`screenSeq`, `elementSeq`), so ids are never reused for the lifetime of
/// a project. Counters saturate at `u32::MAX`; from there on the caller's
/// `taken` check picks a `_<n>` suffix instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceAllocator {
    next_element: u32,
    next_screen: u32,
}

impl SequenceAllocator {
    pub fn new(next_element: u32, next_screen: u32) -> Self {
        Self {
            next_element: next_element.max(1),
            next_screen: next_screen.max(1),
        }
    }

    pub fn next_screen_id(&mut self, taken: impl Fn(&str) -> bool) -> ScreenId {
        issue(&mut self.next_screen, SCREEN_PREFIX, taken)
    }

    pub fn next_element_id(&mut self, taken: impl Fn(&str) -> bool) -> ElementId {
        issue(&mut self.next_element, ELEMENT_PREFIX, taken)
    }

    /// Make sure a future screen id cannot collide with `existing`
    pub fn observe_screen_id(&mut self, existing: &str) {
        if let Some(n) = sequence_of(existing, SCREEN_PREFIX) {
            self.next_screen = self.next_screen.max(n.saturating_add(1));
        }
    }

    /// Make sure a future element id cannot collide with `existing`
    pub fn observe_element_id(&mut self, existing: &str) {
        if let Some(n) = sequence_of(existing, ELEMENT_PREFIX) {
            self.next_element = self.next_element.max(n.saturating_add(1));
        }
    }

    pub fn element_seq(&self) -> u32 {
        self.next_element
    }

    pub fn screen_seq(&self) -> u32 {
        self.next_screen
    }
}

fn issue(counter: &mut u32, prefix: &str, taken: impl Fn(&str) -> bool) -> String {
    let base = format!("{}{}", prefix, counter);
    *counter = counter.saturating_add(1);
    unique_name(&base, taken)
}

fn sequence_of(id: &str, prefix: &str) -> Option<u32> {
    id.strip_prefix(prefix)?.parse().ok()
}
