/// Counters for one choreography.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SequenceStats {
    pub started: u32,
    pub finished: u32,
    pub failed: u32,
    pub rejected: u32,
    pub cancelled: u32,
    pub placements: u32,
}

impl SequenceStats {
    pub fn in_flight(&self) -> u32 {
        self.started - self.finished - self.failed - self.cancelled
    }
}
