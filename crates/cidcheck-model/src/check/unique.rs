//! State for uniqueness checks.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// Keys seen so far together with the row each first appeared in.
#[derive(Debug, Default)]
pub(super) struct UniqueKeys {
    first_rows: HashMap<Vec<String>, usize>,
}

impl UniqueKeys {
    /// Record `key` for `row_number`. Returns the earlier row if the key
    /// was already seen; the earlier row stays the reference.
    pub(super) fn insert(&mut self, key: Vec<String>, row_number: usize) -> Option<usize> {
        match self.first_rows.entry(key) {
            Entry::Occupied(entry) => Some(*entry.get()),
            Entry::Vacant(entry) => {
                entry.insert(row_number);
                None
            }
        }
    }

    pub(super) fn clear(&mut self) {
        self.first_rows.clear();
    }
}
