//! State for distinct-count checks.

use std::collections::HashMap;

/// Occurrence count per distinct key.
#[derive(Debug, Default)]
pub(super) struct DistinctCounts {
    counts: HashMap<Vec<String>, usize>,
}

impl DistinctCounts {
    pub(super) fn record(&mut self, key: Vec<String>) {
        *self.counts.entry(key).or_default() += 1;
    }

    pub(super) fn distinct(&self) -> usize {
        self.counts.len()
    }

    pub(super) fn clear(&mut self) {
        self.counts.clear();
    }
}
