use sequencer::Timing;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: f32,
    pub height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Request flow".to_string(),
            width: 960.0,
            height: 720.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub thread_slots: usize,
    pub max_thread_slots: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            thread_slots: 4,
            max_thread_slots: 12,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    pub window: WindowConfig,
    pub layout: LayoutConfig,
    pub timing: Timing,
}
