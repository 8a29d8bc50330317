use std::collections::{HashMap, HashSet};

use lazypick_source_api::{ItemId, Payload, SourceError};

use super::error::SelectorError;

/// Where an item's payload is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HydrationState {
    /// No fetch issued yet.
    Pending,
    /// A fetch is in flight.
    Loading,
    /// The payload is cached.
    Ready,
    /// The source has no payload for this item.
    Absent,
    /// The fetch failed. It is not retried.
    Failed,
}

/// Result of applying a payload response.
#[derive(Debug)]
pub(crate) enum HydrationUpdate {
    Stale,
    Stored,
    Absent,
    Failed(SelectorError),
}

/// Lazily fetched payloads keyed by item identity.
///
/// Each item gets a one-shot visibility watch. The first visibility signal
/// releases the watch and triggers at most one fetch; later signals and
/// explicit [`begin`](Self::begin) calls for the same id are no-ops. Nothing
/// is evicted until [`invalidate`](Self::invalidate).
#[derive(Debug, Default)]
pub(crate) struct Hydrator {
    epoch: u64,
    payloads: HashMap<ItemId, Payload>,
    states: HashMap<ItemId, HydrationState>,
    failures: HashMap<ItemId, SelectorError>,
    watches: HashSet<ItemId>,
}

impl Hydrator {
    /// Arm a visibility watch for `id` unless it was already fetched.
    pub(crate) fn observe(&mut self, id: &ItemId) {
        if !self.states.contains_key(id) {
            self.watches.insert(id.clone());
        }
    }

    /// Drop every armed watch, e.g. when the rendered list is replaced.
    pub(crate) fn release_watches(&mut self) {
        self.watches.clear();
    }

    /// Fire the watch for `id`. Returns `true` when a fetch should be issued.
    pub(crate) fn on_visible(&mut self, id: &ItemId) -> bool {
        if !self.watches.remove(id) {
            return false;
        }
        self.begin(id)
    }

    /// Mark `id` as loading. Returns `false` if it was already requested.
    pub(crate) fn begin(&mut self, id: &ItemId) -> bool {
        self.watches.remove(id);
        if self.states.contains_key(id) {
            return false;
        }
        self.states.insert(id.clone(), HydrationState::Loading);
        true
    }

    /// Return `id` to the pending state after its request could not be sent.
    pub(crate) fn abandon(&mut self, id: &ItemId) {
        if self.states.get(id) == Some(&HydrationState::Loading) {
            self.states.remove(id);
        }
    }

    pub(crate) fn apply(
        &mut self,
        epoch: u64,
        id: ItemId,
        result: Result<Option<Payload>, SourceError>,
    ) -> HydrationUpdate {
        if epoch != self.epoch || self.states.get(&id) != Some(&HydrationState::Loading) {
            return HydrationUpdate::Stale;
        }

        match result {
            Ok(Some(payload)) => {
                self.states.insert(id.clone(), HydrationState::Ready);
                self.payloads.insert(id, payload);
                HydrationUpdate::Stored
            }
            Ok(None) => {
                self.states.insert(id, HydrationState::Absent);
                HydrationUpdate::Absent
            }
            Err(err) => {
                let error = SelectorError::Hydration {
                    id: id.clone(),
                    message: err.to_string(),
                };
                self.states.insert(id.clone(), HydrationState::Failed);
                self.failures.insert(id, error.clone());
                HydrationUpdate::Failed(error)
            }
        }
    }

    /// Drop every cached payload and ignore responses still in flight.
    pub(crate) fn invalidate(&mut self) {
        self.epoch += 1;
        self.payloads.clear();
        self.states.clear();
        self.failures.clear();
        self.watches.clear();
    }

    pub(crate) fn epoch(&self) -> u64 {
        self.epoch
    }

    pub(crate) fn state(&self, id: &ItemId) -> HydrationState {
        self.states
            .get(id)
            .copied()
            .unwrap_or(HydrationState::Pending)
    }

    pub(crate) fn payload(&self, id: &ItemId) -> Option<&Payload> {
        self.payloads.get(id)
    }

    pub(crate) fn failure(&self, id: &ItemId) -> Option<&SelectorError> {
        self.failures.get(id)
    }

    pub(crate) fn cached_len(&self) -> usize {
        self.payloads.len()
    }

    #[cfg(test)]
    pub(crate) fn is_watching(&self, id: &ItemId) -> bool {
        self.watches.contains(id)
    }
}
