// ABOUTME: Live rollout view configuration.
// ABOUTME: Poll interval, backend refresh cadence, and events shown per service.

use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MonitorConfig {
    /// Time between redraws of the live view.
    #[serde(
        default = "default_poll_interval",
        deserialize_with = "deserialize_poll_interval"
    )]
    pub poll_interval: Duration,

    /// Re-fetch backend state every N redraws.
    #[serde(default = "default_refresh_every")]
    pub refresh_every: u32,

    /// Recent service events shown per service.
    #[serde(default = "default_events")]
    pub events: usize,
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(1)
}

/// A zero interval would poll the backend in a tight loop.
fn deserialize_poll_interval<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let interval: Duration = humantime_serde::deserialize(deserializer)?;
    if interval.is_zero() {
        return Err(serde::de::Error::custom(
            "monitor.poll_interval must be greater than zero",
        ));
    }
    Ok(interval)
}

fn default_refresh_every() -> u32 {
    5
}

fn default_events() -> usize {
    1
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            poll_interval: default_poll_interval(),
            refresh_every: default_refresh_every(),
            events: default_events(),
        }
    }
}
