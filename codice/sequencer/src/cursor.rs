use crate::error::SequenceError;

/// Round-robin selection over a set of equivalent anchors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoundRobinCursor {
    next: usize,
}

impl RoundRobinCursor {
    pub fn new() -> Self {
        Self { next: 0 }
    }

    /// Index the next selection will return, assuming the anchor count is unchanged.
    pub fn position(&self) -> usize {
        self.next
    }

    /// Returns the current index and advances, wrapping modulo `count`.
    pub fn select(&mut self, count: usize) -> Result<usize, SequenceError> {
        if count == 0 {
            return Err(SequenceError::NoAnchorsAvailable);
        }
        let current = self.next % count;
        self.next = (current + 1) % count;
        Ok(current)
    }

    /// Keeps the cursor inside `[0, count)` after the anchor set shrank.
    pub fn clamp(&mut self, count: usize) {
        if count == 0 {
            self.next = 0;
        } else {
            self.next %= count;
        }
    }
}
