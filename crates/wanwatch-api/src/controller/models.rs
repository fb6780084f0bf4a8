// Controller response types
//
// The alarm log mixes many alarm kinds in one list, so every field is
// optional; only WAN transition alarms carry `iface` and `state`.

use serde::{Deserialize, Serialize};

/// Controller response envelope.
///
/// ```json
/// { "meta": { "rc": "ok", "msg": "optional" }, "data": [...] }
/// ```
///
/// Some firmware omits `meta` on `stat/alarm`; only `data` is required.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub meta: Option<Meta>,
    pub data: Vec<T>,
}

/// `rc == "ok"` means success.
#[derive(Debug, Deserialize)]
pub struct Meta {
    pub rc: String,
    #[serde(default)]
    pub msg: Option<String>,
}

/// One entry from `stat/alarm`, as the controller reported it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawAlarm {
    #[serde(default, rename = "_id")]
    pub id: Option<String>,
    /// Event kind, e.g. `EVT_GW_WANTransition`.
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub iface: Option<String>,
    /// Milliseconds since the Unix epoch.
    #[serde(default)]
    pub time: Option<i64>,
    /// `active` / `inactive` for WAN transitions.
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
