use std::time::Duration;

use egui::Pos2;

pub type MarkerId = u64;

/// Visual class of a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerStyle {
    Request,
    Relay,
}

impl MarkerStyle {
    pub fn class(self) -> &'static str {
        match self {
            MarkerStyle::Request => "request",
            MarkerStyle::Relay => "blue-circle",
        }
    }
}

/// A unit of work in flight across the stage.
#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    pub id: MarkerId,
    pub style: MarkerStyle,
    pub label: String,
    /// Top-left corner in page coordinates.
    pub position: Pos2,
    pub size: f32,
    /// Once set, every later move glides over this duration instead of jumping.
    pub transition: Option<Duration>,
}

impl Marker {
    pub fn new(id: MarkerId, style: MarkerStyle, label: impl Into<String>, size: f32) -> Self {
        Self {
            id,
            style,
            label: label.into(),
            position: Pos2::ZERO,
            size,
            transition: None,
        }
    }
}
