// ── State Tracker ──
//
// Pure decision logic: given the tracked state and one alarm batch, decide
// which alarms are new WAN transitions. No I/O, cannot fail.

use tracing::{debug, info, trace, warn};

use wanwatch_api::RawAlarm;

use crate::model::{AlertRecord, TrackedState, TransitionEvent};

/// Alarm key the controller uses for gateway WAN up/down changes.
pub const WAN_TRANSITION_KEY: &str = "EVT_GW_WANTransition";

/// Filters alarm batches down to transitions of one interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateTracker {
    event_key: String,
    iface: String,
}

impl StateTracker {
    /// Track `iface` using the standard WAN transition alarm key.
    pub fn new(iface: impl Into<String>) -> Self {
        Self {
            event_key: WAN_TRANSITION_KEY.into(),
            iface: iface.into(),
        }
    }

    pub fn with_event_key(mut self, event_key: impl Into<String>) -> Self {
        self.event_key = event_key.into();
        self
    }

    pub fn iface(&self) -> &str {
        &self.iface
    }

    pub fn event_key(&self) -> &str {
        &self.event_key
    }

    fn matches(&self, alarm: &RawAlarm) -> bool {
        alarm.key.as_deref() == Some(self.event_key.as_str())
            && alarm.iface.as_deref() == Some(self.iface.as_str())
    }

    /// Fold one alarm batch into `tracked`.
    ///
    /// Matching alarms are applied oldest first, whatever order the
    /// controller returned them in. An alarm not newer than the tracked
    /// timestamp is stale and ignored. A newer alarm always advances the
    /// timestamp, and yields a [`TransitionEvent`] only when its state
    /// differs from the tracked one. Every transition in the batch is
    /// returned, in chronological order.
    pub fn process(
        &self,
        alerts: &[RawAlarm],
        tracked: TrackedState,
    ) -> (TrackedState, Vec<TransitionEvent>) {
        let mut records: Vec<AlertRecord> = alerts
            .iter()
            .filter(|alarm| self.matches(alarm))
            .filter_map(|alarm| match AlertRecord::from_raw(alarm) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(id = ?alarm.id, error = %e, "skipping malformed WAN transition alarm");
                    None
                }
            })
            .collect();
        records.sort_by_key(|record| record.time);

        let mut tracked = tracked;
        let mut events = Vec::new();

        for record in records {
            if record.time <= tracked.last_event_time {
                trace!(time = record.time, "stale alarm");
                continue;
            }

            let event = TransitionEvent {
                state: record.state,
                time: record.time,
            };

            if record.state == tracked.state {
                debug!(state = %record.state, time = record.time, "repeated state, no transition");
            } else {
                match event.timestamp() {
                    Some(at) => info!("Primary WAN went {} at {}", record.state, at),
                    None => info!("Primary WAN went {}", record.state),
                }
                events.push(event);
            }

            tracked = TrackedState::new(record.time, record.state);
        }

        (tracked, events)
    }
}
