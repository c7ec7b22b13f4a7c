use serde::Deserialize;
use std::time::Duration;

/// Delays between choreography steps, in milliseconds, and the marker footprint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Timing {
    pub marker_size: f32,
    pub dispatch_to_server_ms: u64,
    pub dispatch_to_thread_ms: u64,
    pub dispatch_linger_ms: u64,
    pub relay_to_proxy_ms: u64,
    pub relay_across_proxy_ms: u64,
    pub relay_to_server_ms: u64,
    pub relay_linger_ms: u64,
    pub relay_transition_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            marker_size: 24.0,
            dispatch_to_server_ms: 1000,
            dispatch_to_thread_ms: 1000,
            dispatch_linger_ms: 1500,
            relay_to_proxy_ms: 1000,
            relay_across_proxy_ms: 500,
            relay_to_server_ms: 1000,
            relay_linger_ms: 1500,
            relay_transition_ms: 1000,
        }
    }
}

impl Timing {
    /// All step delays, labelled, for validation and display.
    pub fn delays(&self) -> [(&'static str, u64); 7] {
        [
            ("dispatch_to_server_ms", self.dispatch_to_server_ms),
            ("dispatch_to_thread_ms", self.dispatch_to_thread_ms),
            ("dispatch_linger_ms", self.dispatch_linger_ms),
            ("relay_to_proxy_ms", self.relay_to_proxy_ms),
            ("relay_across_proxy_ms", self.relay_across_proxy_ms),
            ("relay_to_server_ms", self.relay_to_server_ms),
            ("relay_linger_ms", self.relay_linger_ms),
        ]
    }

    pub fn half_marker(&self) -> f32 {
        self.marker_size / 2.0
    }

    pub(crate) fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }
}
