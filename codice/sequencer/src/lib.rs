pub mod anchor;
pub mod choreography;
pub mod cursor;
pub mod error;
pub mod headless_stage;
pub mod marker;
pub mod sequence_event;
pub mod sequence_stats;
pub mod sequencer;
pub mod stage;
pub mod timing;

pub use anchor::{AnchorId, AnchorSelector};
pub use choreography::{Choreography, SequenceKind};
pub use error::SequenceError;
pub use headless_stage::HeadlessStage;
pub use marker::{Marker, MarkerId, MarkerStyle};
pub use sequence_event::{SequenceEvent, SequenceId};
pub use sequence_stats::SequenceStats;
pub use sequencer::Sequencer;
pub use stage::Stage;
pub use timing::Timing;
