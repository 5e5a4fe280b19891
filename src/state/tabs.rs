//! Tab Selection - Exactly one active label out of a fixed ordered set.

use tracing::debug;

use crate::reactive::{Dependency, Field};

#[derive(Clone, Debug)]
pub struct TabSelection {
    labels: &'static [&'static str],
    active: Field<usize>,
}

impl TabSelection {
    /// Starts on the first label. `labels` must not be empty.
    pub fn new(labels: &'static [&'static str]) -> Self {
        debug_assert!(!labels.is_empty(), "tab set needs at least one label");
        Self {
            labels,
            active: Field::new(0),
        }
    }

    pub fn labels(&self) -> &'static [&'static str] {
        self.labels
    }

    /// Label of the active tab.
    pub fn active(&self) -> &'static str {
        self.labels.get(self.active.get()).copied().unwrap_or_default()
    }

    pub fn is_active(&self, label: &str) -> bool {
        self.active() == label
    }

    /// Activate `label`. Unknown labels are ignored and return false.
    pub fn click(&self, label: &str) -> bool {
        let Some(index) = self.labels.iter().position(|l| *l == label) else {
            return false;
        };
        if self.active.replace_if_changed(index) {
            debug!(tab = label, "tab activated");
        }
        true
    }

    /// Read-set entry that changes when the active tab does.
    pub fn dependency(&self) -> Dependency {
        self.active.dependency()
    }
}
