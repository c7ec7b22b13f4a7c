use egui::{Pos2, Rect, Vec2};
use std::fmt;
use std::time::Duration;

use crate::anchor::{AnchorId, AnchorSelector};
use crate::marker::MarkerStyle;
use crate::timing::Timing;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SequenceKind {
    ThreadDispatch,
    ProxyRelay,
}

impl fmt::Display for SequenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SequenceKind::ThreadDispatch => write!(f, "thread dispatch"),
            SequenceKind::ProxyRelay => write!(f, "proxy relay"),
        }
    }
}

/// Horizontal reference point on an anchor rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Horizontal {
    Left,
    Center,
    Right,
    /// Left edge pushed in by half the anchor's height.
    LeftInset,
}

/// Vertical reference point on an anchor rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vertical {
    Top,
    Center,
    Bottom,
}

/// Where a marker's top-left corner lands relative to an anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub anchor: AnchorSelector,
    pub horizontal: Horizontal,
    pub vertical: Vertical,
    pub offset: Vec2,
}

impl Waypoint {
    pub fn new(
        anchor: impl Into<AnchorSelector>,
        horizontal: Horizontal,
        vertical: Vertical,
        offset: Vec2,
    ) -> Self {
        Self {
            anchor: anchor.into(),
            horizontal,
            vertical,
            offset,
        }
    }

    /// Marker centered on the anchor.
    pub fn centered(anchor: impl Into<AnchorSelector>, marker_size: f32) -> Self {
        let half = marker_size / 2.0;
        Self::new(
            anchor,
            Horizontal::Center,
            Vertical::Center,
            Vec2::new(-half, -half),
        )
    }

    /// Turns a viewport-relative anchor rectangle into a page position.
    pub fn resolve(&self, rect: Rect, scroll: Vec2) -> Pos2 {
        let x = match self.horizontal {
            Horizontal::Left => rect.left(),
            Horizontal::Center => rect.center().x,
            Horizontal::Right => rect.right(),
            Horizontal::LeftInset => rect.left() + rect.height() / 2.0,
        };
        let y = match self.vertical {
            Vertical::Top => rect.top(),
            Vertical::Center => rect.center().y,
            Vertical::Bottom => rect.bottom(),
        };
        Pos2::new(x, y) + scroll + self.offset
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StepAction {
    Spawn(Waypoint),
    Move {
        to: Waypoint,
        /// Switches smooth movement on for this and every later move.
        transition: Option<Duration>,
    },
    Remove,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// Wait after the previous step ran.
    pub delay: Duration,
    pub action: StepAction,
}

impl Step {
    fn spawn(to: Waypoint) -> Self {
        Self {
            delay: Duration::ZERO,
            action: StepAction::Spawn(to),
        }
    }

    fn move_to(delay: Duration, to: Waypoint) -> Self {
        Self {
            delay,
            action: StepAction::Move {
                to,
                transition: None,
            },
        }
    }

    fn glide_to(delay: Duration, to: Waypoint, transition: Duration) -> Self {
        Self {
            delay,
            action: StepAction::Move {
                to,
                transition: Some(transition),
            },
        }
    }

    fn remove(delay: Duration) -> Self {
        Self {
            delay,
            action: StepAction::Remove,
        }
    }

    pub fn is_placement(&self) -> bool {
        matches!(self.action, StepAction::Spawn(_) | StepAction::Move { .. })
    }
}

/// Scripted path of one marker, from creation to removal.
#[derive(Debug, Clone, PartialEq)]
pub struct Choreography {
    pub kind: SequenceKind,
    pub style: MarkerStyle,
    pub label: String,
    pub steps: Vec<Step>,
}

impl Choreography {
    /// Client, then server, then the next thread slot in round-robin order.
    pub fn thread_dispatch(timing: &Timing) -> Self {
        let size = timing.marker_size;
        Self {
            kind: SequenceKind::ThreadDispatch,
            style: MarkerStyle::Request,
            label: "R".to_string(),
            steps: vec![
                Step::spawn(Waypoint::centered(AnchorId::Client, size)),
                Step::move_to(
                    Timing::ms(timing.dispatch_to_server_ms),
                    Waypoint::centered(AnchorId::Server, size),
                ),
                Step::move_to(
                    Timing::ms(timing.dispatch_to_thread_ms),
                    Waypoint::centered(AnchorSelector::NextThread, size),
                ),
                Step::remove(Timing::ms(timing.dispatch_linger_ms)),
            ],
        }
    }

    /// Proxy client, across the proxy box edge to edge, then on to the main server.
    pub fn proxy_relay(timing: &Timing) -> Self {
        let half = timing.half_marker();
        Self {
            kind: SequenceKind::ProxyRelay,
            style: MarkerStyle::Relay,
            label: String::new(),
            steps: vec![
                Step::spawn(Waypoint::new(
                    AnchorId::ProxyClient,
                    Horizontal::Center,
                    Vertical::Center,
                    Vec2::new(0.0, 80.0),
                )),
                Step::glide_to(
                    Timing::ms(timing.relay_to_proxy_ms),
                    Waypoint::new(
                        AnchorId::Proxy,
                        Horizontal::Left,
                        Vertical::Center,
                        Vec2::new(0.0, -half),
                    ),
                    Timing::ms(timing.relay_transition_ms),
                ),
                Step::move_to(
                    Timing::ms(timing.relay_across_proxy_ms),
                    Waypoint::new(
                        AnchorId::Proxy,
                        Horizontal::Right,
                        Vertical::Center,
                        Vec2::new(-half, -half),
                    ),
                ),
                Step::move_to(
                    Timing::ms(timing.relay_to_server_ms),
                    Waypoint::new(
                        AnchorId::MainServer,
                        Horizontal::LeftInset,
                        Vertical::Center,
                        Vec2::new(2.0, 40.0),
                    ),
                ),
                Step::remove(Timing::ms(timing.relay_linger_ms)),
            ],
        }
    }

    /// Number of steps that place the marker, the initial spawn included.
    pub fn placements(&self) -> usize {
        self.steps.iter().filter(|step| step.is_placement()).count()
    }

    /// Time from spawn to removal when every step fires on schedule.
    pub fn lifetime(&self) -> Duration {
        self.steps.iter().map(|step| step.delay).sum()
    }
}
