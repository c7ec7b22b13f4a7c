use egui::{Rect, Vec2};

use crate::anchor::AnchorId;
use crate::marker::{Marker, MarkerId};

/// Surface holding the anchors and the markers moving between them.
pub trait Stage {
    /// Current bounding rectangle of `anchor`, relative to the visible viewport.
    fn anchor_rect(&self, anchor: AnchorId) -> Option<Rect>;

    /// Number of thread anchors, indexed `0..thread_count()`.
    fn thread_count(&self) -> usize;

    /// How far the viewport is scrolled into the page.
    fn scroll_offset(&self) -> Vec2 {
        Vec2::ZERO
    }

    /// Shows `marker`, or updates it in place when it is already shown.
    fn show_marker(&mut self, marker: &Marker);

    fn remove_marker(&mut self, id: MarkerId);
}
