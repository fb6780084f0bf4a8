// ── WAN state domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use wanwatch_api::RawAlarm;

use crate::error::MalformedAlert;

/// Last known status of the monitored interface.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WanState {
    Active,
    Inactive,
}

/// The single tracked value threaded through every poll cycle.
///
/// `last_event_time` never decreases over the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedState {
    /// Milliseconds since the Unix epoch.
    pub last_event_time: i64,
    pub state: WanState,
}

impl TrackedState {
    pub fn new(last_event_time: i64, state: WanState) -> Self {
        Self {
            last_event_time,
            state,
        }
    }

    /// `{now, active}`: an assumption made at startup, not an observation.
    pub fn at_startup() -> Self {
        Self::new(Utc::now().timestamp_millis(), WanState::Active)
    }
}

/// A WAN transition alarm with every field the tracker relies on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertRecord {
    pub key: String,
    pub iface: String,
    /// Milliseconds since the Unix epoch.
    pub time: i64,
    pub state: WanState,
}

impl AlertRecord {
    pub fn from_raw(raw: &RawAlarm) -> Result<Self, MalformedAlert> {
        let key = raw.key.clone().ok_or(MalformedAlert::MissingField("key"))?;
        let iface = raw
            .iface
            .clone()
            .ok_or(MalformedAlert::MissingField("iface"))?;
        let time = raw.time.ok_or(MalformedAlert::MissingField("time"))?;
        let state = raw
            .state
            .as_deref()
            .ok_or(MalformedAlert::MissingField("state"))?;
        let state = state
            .parse::<WanState>()
            .map_err(|_| MalformedAlert::UnknownState(state.to_owned()))?;

        Ok(Self {
            key,
            iface,
            time,
            state,
        })
    }
}

/// A genuine state change accepted by the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionEvent {
    pub state: WanState,
    /// Milliseconds since the Unix epoch.
    pub time: i64,
}

impl TransitionEvent {
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.time)
    }
}
