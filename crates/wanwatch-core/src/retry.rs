use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

// --- Durations are configured in whole seconds ---
fn deserialize_duration_from_secs<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let secs = u64::deserialize(deserializer)?;
    Ok(Duration::from_secs(secs))
}

fn serialize_duration_as_secs<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u64(duration.as_secs())
}

fn default_max_retries() -> u32 {
    3
}

fn default_delay() -> Duration {
    Duration::from_secs(2)
}

/// Capped retry with a fixed delay, applied to server-side delivery failures.
///
/// `max_retries` counts the attempts *after* the first one, so the total
/// number of attempts is `max_retries + 1`. The delay is constant, not
/// exponential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(
        default = "default_delay",
        rename = "delay_secs",
        deserialize_with = "deserialize_duration_from_secs",
        serialize_with = "serialize_duration_as_secs"
    )]
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            delay: default_delay(),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }

    /// Same retry count, no sleeping between attempts.
    pub fn immediate(max_retries: u32) -> Self {
        Self::new(max_retries, Duration::ZERO)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_three_retries_two_seconds_apart() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.max_attempts(), 4);
        assert_eq!(policy.delay, Duration::from_secs(2));
    }

    #[test]
    fn deserializes_delay_in_seconds() {
        let policy: RetryPolicy =
            serde_json::from_str(r#"{ "max_retries": 5, "delay_secs": 7 }"#).unwrap();
        assert_eq!(policy, RetryPolicy::new(5, Duration::from_secs(7)));

        let policy: RetryPolicy = serde_json::from_str("{}").unwrap();
        assert_eq!(policy, RetryPolicy::default());
    }

    #[test]
    fn serializes_delay_in_seconds() {
        let json = serde_json::to_value(RetryPolicy::default()).unwrap();
        assert_eq!(json, serde_json::json!({ "max_retries": 3, "delay_secs": 2 }));
    }
}
