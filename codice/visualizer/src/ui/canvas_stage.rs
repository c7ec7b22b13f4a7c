use egui::{Align2, Color32, CornerRadius, FontId, Painter, Pos2, Rect, Vec2};
use sequencer::{AnchorId, Marker, MarkerId, MarkerStyle, Stage};
use std::collections::{BTreeMap, HashMap};

struct ShownMarker {
    marker: Marker,
    // Where the current glide started, and when
    from: Pos2,
    moved_at: f64,
}

impl ShownMarker {
    fn position_at(&self, now: f64) -> Pos2 {
        match self.marker.transition {
            Some(transition) if !transition.is_zero() => {
                let t = ((now - self.moved_at) / transition.as_secs_f64()).clamp(0.0, 1.0) as f32;
                let eased = t * t * (3.0 - 2.0 * t);
                self.from.lerp(self.marker.position, eased)
            }
            _ => self.marker.position,
        }
    }

    fn is_gliding(&self, now: f64) -> bool {
        self.marker
            .transition
            .is_some_and(|transition| now < self.moved_at + transition.as_secs_f64())
    }
}

/// Stage backed by the egui scroll area the diagrams are drawn in.
///
/// Anchor rectangles are refreshed every frame from the laid-out boxes and
/// stored relative to the visible viewport. Markers live in page coordinates.
pub struct CanvasStage {
    anchors: HashMap<AnchorId, Rect>,
    thread_count: usize,
    viewport_min: Pos2,
    page_origin: Pos2,
    markers: BTreeMap<MarkerId, ShownMarker>,
    now: f64,
}

impl CanvasStage {
    pub fn new() -> Self {
        Self {
            anchors: HashMap::new(),
            thread_count: 0,
            viewport_min: Pos2::ZERO,
            page_origin: Pos2::ZERO,
            markers: BTreeMap::new(),
            now: 0.0,
        }
    }

    /// Starts a layout pass. `page_origin` is the screen position of the page's
    /// top-left corner, which sits above and left of `viewport_min` once scrolled.
    pub fn begin_frame(&mut self, now: f64, viewport_min: Pos2, page_origin: Pos2) {
        self.now = now;
        self.viewport_min = viewport_min;
        self.page_origin = page_origin;
        self.anchors.clear();
        self.thread_count = 0;
    }

    pub fn set_time(&mut self, now: f64) {
        self.now = now;
    }

    /// Records where an anchor box was drawn this frame, in screen coordinates.
    pub fn place_anchor(&mut self, anchor: AnchorId, screen_rect: Rect) {
        if let AnchorId::Thread(index) = anchor {
            self.thread_count = self.thread_count.max(index + 1);
        }
        self.anchors
            .insert(anchor, screen_rect.translate(-self.viewport_min.to_vec2()));
    }

    /// Drops thread slots at or past `count` until the next layout pass.
    pub fn truncate_threads(&mut self, count: usize) {
        self.anchors
            .retain(|anchor, _| !matches!(anchor, AnchorId::Thread(index) if *index >= count));
        self.thread_count = self.thread_count.min(count);
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// A marker is still sliding toward its latest position.
    pub fn is_gliding(&self, now: f64) -> bool {
        self.markers.values().any(|shown| shown.is_gliding(now))
    }

    pub fn paint(&self, painter: &Painter) {
        for shown in self.markers.values() {
            let page_position = shown.position_at(self.now);
            let size = shown.marker.size;
            let center = self.page_origin + page_position.to_vec2() + Vec2::splat(size / 2.0);

            let color = match shown.marker.style {
                MarkerStyle::Request => Color32::from_rgb(230, 126, 34),
                MarkerStyle::Relay => Color32::from_rgb(52, 120, 246),
            };
            painter.circle_filled(center, size / 2.0, color);
            if !shown.marker.label.is_empty() {
                painter.text(
                    center,
                    Align2::CENTER_CENTER,
                    &shown.marker.label,
                    FontId::monospace(size * 0.6),
                    Color32::WHITE,
                );
            }
        }
    }
}

/// Draws an anchor box with its caption.
pub fn paint_anchor(painter: &Painter, rect: Rect, caption: &str, fill: Color32) {
    painter.rect_filled(rect, CornerRadius::same(6), fill);
    painter.text(
        rect.center(),
        Align2::CENTER_CENTER,
        caption,
        FontId::proportional(14.0),
        Color32::WHITE,
    );
}

impl Stage for CanvasStage {
    fn anchor_rect(&self, anchor: AnchorId) -> Option<Rect> {
        self.anchors.get(&anchor).copied()
    }

    fn thread_count(&self) -> usize {
        self.thread_count
    }

    fn scroll_offset(&self) -> Vec2 {
        self.viewport_min - self.page_origin
    }

    fn show_marker(&mut self, marker: &Marker) {
        let now = self.now;
        let from = self
            .markers
            .get(&marker.id)
            .map_or(marker.position, |shown| shown.position_at(now));
        self.markers.insert(
            marker.id,
            ShownMarker {
                marker: marker.clone(),
                from,
                moved_at: now,
            },
        );
    }

    fn remove_marker(&mut self, id: MarkerId) {
        self.markers.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_anchor_rects_are_viewport_relative() {
        let mut stage = CanvasStage::new();
        stage.begin_frame(0.0, Pos2::new(10.0, 50.0), Pos2::new(10.0, -150.0));
        stage.place_anchor(
            AnchorId::Client,
            Rect::from_min_size(Pos2::new(50.0, 100.0), Vec2::new(120.0, 60.0)),
        );

        assert_eq!(
            stage.anchor_rect(AnchorId::Client).map(|r| r.min),
            Some(Pos2::new(40.0, 50.0))
        );
        assert_eq!(stage.scroll_offset(), Vec2::new(0.0, 200.0));
    }

    #[test]
    fn test_thread_count_follows_placed_slots() {
        let mut stage = CanvasStage::new();
        let slot = Rect::from_min_size(Pos2::ZERO, Vec2::splat(10.0));
        stage.begin_frame(0.0, Pos2::ZERO, Pos2::ZERO);
        for index in 0..4 {
            stage.place_anchor(AnchorId::Thread(index), slot);
        }
        assert_eq!(stage.thread_count(), 4);

        stage.truncate_threads(1);
        assert_eq!(stage.thread_count(), 1);
        assert!(stage.anchor_rect(AnchorId::Thread(1)).is_none());

        stage.begin_frame(0.1, Pos2::ZERO, Pos2::ZERO);
        assert_eq!(stage.thread_count(), 0);
    }

    #[test]
    fn test_glide_interpolates_from_last_shown_position() {
        let mut stage = CanvasStage::new();
        let mut marker = Marker::new(1, MarkerStyle::Relay, "", 24.0);
        marker.position = Pos2::new(0.0, 0.0);
        stage.show_marker(&marker);

        stage.set_time(1.0);
        marker.transition = Some(Duration::from_secs(1));
        marker.position = Pos2::new(100.0, 0.0);
        stage.show_marker(&marker);

        let shown = &stage.markers[&1];
        assert_eq!(shown.position_at(1.0), Pos2::new(0.0, 0.0));
        assert_eq!(shown.position_at(1.5), Pos2::new(50.0, 0.0));
        assert_eq!(shown.position_at(3.0), Pos2::new(100.0, 0.0));

        assert!(stage.is_gliding(1.5));
        assert!(!stage.is_gliding(2.0));
    }

    #[test]
    fn test_jump_without_transition() {
        let mut stage = CanvasStage::new();
        let mut marker = Marker::new(1, MarkerStyle::Request, "R", 24.0);
        stage.show_marker(&marker);
        marker.position = Pos2::new(40.0, 40.0);
        stage.show_marker(&marker);

        assert_eq!(stage.markers[&1].position_at(0.0), Pos2::new(40.0, 40.0));
        assert!(!stage.is_gliding(0.0));
        stage.remove_marker(1);
        assert_eq!(stage.marker_count(), 0);
    }
}
