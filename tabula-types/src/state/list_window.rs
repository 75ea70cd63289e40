use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::RecordId;

/// Ordered ids of the last-fetched page of a resource, with the time each id
/// was fetched.
///
/// The order is the server's sort order. `fetched_at` is metadata only:
/// entries go stale after the retention window but are dropped lazily, when
/// the next GET_MANY result is merged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListWindow {
    ids: Vec<RecordId>,
    fetched_at: HashMap<RecordId, Instant>,
}

impl ListWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &[RecordId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn fetched_at(&self, id: &RecordId) -> Option<Instant> {
        self.fetched_at.get(id).copied()
    }

    /// The new sequence becomes the window.
    pub fn replace(&mut self, ids: Vec<RecordId>, now: Instant) {
        self.fetched_at = ids.iter().map(|id| (id.clone(), now)).collect();
        self.ids = ids;
    }

    /// Stale-while-revalidate merge: keep previously tracked ids fetched
    /// within `retention` of `now`, then append `ids` stamped with `now`.
    ///
    /// Ids are not de-duplicated: an id that is still fresh and fetched
    /// again appears twice.
    pub fn merge_fresh(&mut self, ids: &[RecordId], now: Instant, retention: Duration) {
        // `None` means the clock has not run for `retention` yet: nothing is stale.
        if let Some(latest_valid) = now.checked_sub(retention) {
            let fetched_at = &self.fetched_at;
            self.ids
                .retain(|id| fetched_at.get(id).is_some_and(|at| *at >= latest_valid));
            self.fetched_at.retain(|_, at| *at >= latest_valid);
        }
        for id in ids {
            self.ids.push(id.clone());
            self.fetched_at.insert(id.clone(), now);
        }
    }

    /// Remove the first occurrence of `id`. Returns whether one was found.
    pub fn remove_first(&mut self, id: &RecordId) -> bool {
        let Some(index) = self.ids.iter().position(|candidate| candidate == id) else {
            return false;
        };
        self.ids.remove(index);
        if !self.ids.contains(id) {
            self.fetched_at.remove(id);
        }
        true
    }
}
