use egui::{Rect, Vec2};
use std::collections::{BTreeMap, HashMap};

use crate::anchor::AnchorId;
use crate::marker::{Marker, MarkerId};
use crate::stage::Stage;

/// A mutation applied to a [`HeadlessStage`].
#[derive(Clone, Debug, PartialEq)]
pub enum StageOp {
    Show(Marker),
    Remove(MarkerId),
}

/// In-memory stage that keeps a journal of every marker mutation.
#[derive(Debug, Default)]
pub struct HeadlessStage {
    anchors: HashMap<AnchorId, Rect>,
    threads: Vec<Rect>,
    scroll: Vec2,
    markers: BTreeMap<MarkerId, Marker>,
    journal: Vec<StageOp>,
}

impl HeadlessStage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places a named anchor. Thread anchors go through [`Self::set_threads`].
    pub fn set_anchor(&mut self, anchor: AnchorId, rect: Rect) {
        if let AnchorId::Thread(index) = anchor {
            if let Some(slot) = self.threads.get_mut(index) {
                *slot = rect;
            }
            return;
        }
        self.anchors.insert(anchor, rect);
    }

    pub fn remove_anchor(&mut self, anchor: AnchorId) {
        self.anchors.remove(&anchor);
    }

    pub fn set_threads(&mut self, threads: Vec<Rect>) {
        self.threads = threads;
    }

    pub fn set_scroll_offset(&mut self, scroll: Vec2) {
        self.scroll = scroll;
    }

    pub fn marker(&self, id: MarkerId) -> Option<&Marker> {
        self.markers.get(&id)
    }

    pub fn markers(&self) -> impl Iterator<Item = &Marker> {
        self.markers.values()
    }

    pub fn journal(&self) -> &[StageOp] {
        &self.journal
    }

    /// Journal entries touching a single marker.
    pub fn history(&self, id: MarkerId) -> Vec<&StageOp> {
        self.journal
            .iter()
            .filter(|op| match op {
                StageOp::Show(marker) => marker.id == id,
                StageOp::Remove(removed) => *removed == id,
            })
            .collect()
    }
}

impl Stage for HeadlessStage {
    fn anchor_rect(&self, anchor: AnchorId) -> Option<Rect> {
        match anchor {
            AnchorId::Thread(index) => self.threads.get(index).copied(),
            _ => self.anchors.get(&anchor).copied(),
        }
    }

    fn thread_count(&self) -> usize {
        self.threads.len()
    }

    fn scroll_offset(&self) -> Vec2 {
        self.scroll
    }

    fn show_marker(&mut self, marker: &Marker) {
        self.markers.insert(marker.id, marker.clone());
        self.journal.push(StageOp::Show(marker.clone()));
    }

    fn remove_marker(&mut self, id: MarkerId) {
        if self.markers.remove(&id).is_some() {
            self.journal.push(StageOp::Remove(id));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::MarkerStyle;
    use egui::Pos2;

    #[test]
    fn test_thread_anchors_are_indexed() {
        let mut stage = HeadlessStage::new();
        let slot = Rect::from_min_size(Pos2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        stage.set_threads(vec![slot, slot.translate(Vec2::new(0.0, 20.0))]);

        assert_eq!(stage.thread_count(), 2);
        assert_eq!(
            stage.anchor_rect(AnchorId::Thread(1)).map(|r| r.top()),
            Some(20.0)
        );
        assert_eq!(stage.anchor_rect(AnchorId::Thread(2)), None);

        // thread slots are not created through set_anchor
        stage.set_anchor(AnchorId::Thread(5), slot);
        assert_eq!(stage.thread_count(), 2);
    }

    #[test]
    fn test_remove_unknown_marker_is_not_journaled() {
        let mut stage = HeadlessStage::new();
        let marker = Marker::new(1, MarkerStyle::Request, "R", 24.0);

        stage.remove_marker(1);
        stage.show_marker(&marker);
        stage.remove_marker(1);

        assert_eq!(
            stage.journal(),
            &[StageOp::Show(marker), StageOp::Remove(1)]
        );
    }
}
