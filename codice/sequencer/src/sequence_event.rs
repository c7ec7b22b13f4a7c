use egui::Pos2;
use std::fmt;

use crate::anchor::AnchorId;
use crate::choreography::SequenceKind;
use crate::error::SequenceError;
use crate::marker::MarkerId;

pub type SequenceId = u64;

/// Published by the sequencer as sequences progress. `at` is the time the step ran, in seconds.
#[derive(Debug, Clone, PartialEq)]
pub enum SequenceEvent {
    Started {
        id: SequenceId,
        kind: SequenceKind,
        at: f64,
    },
    MarkerPlaced {
        id: SequenceId,
        marker: MarkerId,
        anchor: AnchorId,
        position: Pos2,
        at: f64,
    },
    Finished {
        id: SequenceId,
        kind: SequenceKind,
        at: f64,
    },
    Failed {
        id: SequenceId,
        kind: SequenceKind,
        error: SequenceError,
        at: f64,
    },
    Rejected {
        kind: SequenceKind,
        error: SequenceError,
        at: f64,
    },
    Cancelled {
        id: SequenceId,
        kind: SequenceKind,
        at: f64,
    },
}

impl fmt::Display for SequenceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SequenceEvent::Started { id, kind, at } => {
                write!(f, "[{at:7.3}s] sequence {id} ({kind}) started")
            }
            SequenceEvent::MarkerPlaced {
                id,
                marker,
                anchor,
                position,
                at,
            } => write!(
                f,
                "[{at:7.3}s] sequence {id}: marker {marker} -> {anchor} at ({:.0}, {:.0})",
                position.x, position.y
            ),
            SequenceEvent::Finished { id, kind, at } => {
                write!(f, "[{at:7.3}s] sequence {id} ({kind}) finished")
            }
            SequenceEvent::Failed {
                id,
                kind,
                error,
                at,
            } => write!(f, "[{at:7.3}s] sequence {id} ({kind}) aborted: {error}"),
            SequenceEvent::Rejected { kind, error, at } => {
                write!(f, "[{at:7.3}s] {kind} rejected: {error}")
            }
            SequenceEvent::Cancelled { id, kind, at } => {
                write!(f, "[{at:7.3}s] sequence {id} ({kind}) cancelled")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_placement() {
        let event = SequenceEvent::MarkerPlaced {
            id: 3,
            marker: 3,
            anchor: AnchorId::Thread(1),
            position: Pos2::new(438.4, 12.6),
            at: 2.0,
        };
        assert_eq!(
            event.to_string(),
            "[  2.000s] sequence 3: marker 3 -> thread-box[1] at (438, 13)"
        );
    }

    #[test]
    fn test_display_rejection() {
        let event = SequenceEvent::Rejected {
            kind: SequenceKind::ThreadDispatch,
            error: SequenceError::NoAnchorsAvailable,
            at: 0.5,
        };
        assert_eq!(
            event.to_string(),
            "[  0.500s] thread dispatch rejected: no thread anchors available to dispatch to"
        );
    }
}
