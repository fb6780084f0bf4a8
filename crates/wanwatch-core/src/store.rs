// ── Tracked state persistence ──
//
// The tracking algorithm never touches storage directly; the poll loop
// seeds from and saves to a `StateStore`.

use crate::model::TrackedState;

/// Where the tracked state lives between poll cycles (and, for a durable
/// implementation, between restarts).
pub trait StateStore {
    fn load(&self) -> Option<TrackedState>;
    fn save(&mut self, state: TrackedState);
}

/// In-process store. Nothing survives a restart, so a fresh process starts
/// from `{now, active}`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Option<TrackedState>,
}

impl MemoryStore {
    pub fn with_state(state: TrackedState) -> Self {
        Self { state: Some(state) }
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Option<TrackedState> {
        self.state
    }

    fn save(&mut self, state: TrackedState) {
        self.state = Some(state);
    }
}
