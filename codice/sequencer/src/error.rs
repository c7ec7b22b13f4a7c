use thiserror::Error;

use crate::anchor::AnchorId;
use crate::sequence_event::SequenceId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequenceError {
    #[error("anchor {0} is not on the stage")]
    MissingAnchor(AnchorId),
    #[error("no thread anchors available to dispatch to")]
    NoAnchorsAvailable,
    #[error("sequence {0} is not in flight")]
    UnknownSequence(SequenceId),
}
