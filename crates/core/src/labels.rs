//! Activity label table.
//!
//! The remote classifier answers with a numeric class id; this table maps
//! it to the activity it was trained on.

use crate::error::CoreError;

const ACTIVITY_LABELS: [(&str, &str); 6] = [
    ("1", "walking"),
    ("2", "walking upstairs"),
    ("3", "walking downstairs"),
    ("4", "sitting"),
    ("5", "standing"),
    ("6", "laying"),
];

/// Fixed, read-only mapping from class id to human-readable activity.
#[derive(Debug, Clone, Copy)]
pub struct LabelTable {
    entries: &'static [(&'static str, &'static str)],
}

impl LabelTable {
    /// The six activity classes of the human-activity dataset.
    pub const fn activities() -> Self {
        Self {
            entries: &ACTIVITY_LABELS,
        }
    }

    /// Resolve a class id. Ids outside the table are an error, never a default.
    pub fn lookup(&self, class_id: &str) -> Result<&'static str, CoreError> {
        self.entries
            .iter()
            .find(|(id, _)| *id == class_id)
            .map(|(_, name)| *name)
            .ok_or_else(|| CoreError::UnknownLabel(class_id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for LabelTable {
    fn default() -> Self {
        Self::activities()
    }
}
