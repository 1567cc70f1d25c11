//! Drift detection between a checked-in sketch and a fresh export
//!
//! Generation is deterministic, so any difference means either the project
//! changed or the sketch on disk was edited by hand.

use similar::{ChangeTag, TextDiff};

use crate::checksum::Checksum;

/// Line-level comparison of two generated files
#[derive(Debug, Clone)]
pub struct DriftReport {
    pub expected: Checksum,
    pub actual: Checksum,
    pub lines_added: usize,
    pub lines_removed: usize,
    /// Unified diff, `existing` as the old side
    pub unified_diff: String,
}

impl DriftReport {
    /// Compare what is on disk (`existing`) against freshly generated text
    pub fn compare(existing: &str, generated: &str, label: &str) -> Self {
        let diff = TextDiff::from_lines(existing, generated);

        let mut lines_added = 0;
        let mut lines_removed = 0;
        for change in diff.iter_all_changes() {
            match change.tag() {
                ChangeTag::Insert => lines_added += 1,
                ChangeTag::Delete => lines_removed += 1,
                ChangeTag::Equal => {}
            }
        }

        let unified_diff = if lines_added + lines_removed == 0 {
            String::new()
        } else {
            diff.unified_diff()
                .context_radius(3)
                .header(&format!("{} (on disk)", label), &format!("{} (generated)", label))
                .to_string()
        };

        Self {
            expected: Checksum::from_str(generated),
            actual: Checksum::from_str(existing),
            lines_added,
            lines_removed,
            unified_diff,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.expected == self.actual
    }
}
