use egui::{Pos2, Rect, Vec2};
use sequencer::AnchorId;

const BOX_SIZE: Vec2 = Vec2::new(120.0, 60.0);
const THREAD_SIZE: Vec2 = Vec2::new(140.0, 48.0);
const THREAD_PITCH: f32 = 60.0;

/// Titles of the two diagrams, with their top-left corners.
pub struct Sections {
    pub dispatch: Pos2,
    pub relay: Pos2,
}

fn relay_top(thread_slots: usize) -> f32 {
    (50.0 + thread_slots as f32 * THREAD_PITCH).max(220.0) + 40.0
}

pub fn sections(thread_slots: usize) -> Sections {
    Sections {
        dispatch: Pos2::new(20.0, 10.0),
        relay: Pos2::new(20.0, relay_top(thread_slots)),
    }
}

/// Anchor rectangles relative to the top-left corner of the page.
/// Thread slots are listed in index order.
pub fn anchor_layout(thread_slots: usize) -> Vec<(AnchorId, Rect)> {
    let mut anchors = vec![
        (
            AnchorId::Client,
            Rect::from_min_size(Pos2::new(40.0, 100.0), BOX_SIZE),
        ),
        (
            AnchorId::Server,
            Rect::from_min_size(Pos2::new(280.0, 100.0), BOX_SIZE),
        ),
    ];
    for index in 0..thread_slots {
        anchors.push((
            AnchorId::Thread(index),
            Rect::from_min_size(
                Pos2::new(520.0, 50.0 + index as f32 * THREAD_PITCH),
                THREAD_SIZE,
            ),
        ));
    }

    let row = relay_top(thread_slots) + 40.0;
    anchors.push((
        AnchorId::ProxyClient,
        Rect::from_min_size(Pos2::new(40.0, row), BOX_SIZE),
    ));
    anchors.push((
        AnchorId::Proxy,
        Rect::from_min_size(Pos2::new(280.0, row), Vec2::new(160.0, 60.0)),
    ));
    anchors.push((
        AnchorId::MainServer,
        Rect::from_min_size(Pos2::new(560.0, row), Vec2::new(140.0, 60.0)),
    ));
    anchors
}

/// Size of the scrollable page, leaving room below the proxy client for the relay spawn point.
pub fn content_size(thread_slots: usize) -> Vec2 {
    Vec2::new(740.0, relay_top(thread_slots) + 240.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threads_in_index_order() {
        let anchors = anchor_layout(5);
        let threads = anchors
            .iter()
            .filter_map(|(anchor, rect)| match anchor {
                AnchorId::Thread(index) => Some((*index, rect.top())),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert_eq!(threads.len(), 5);
        assert!(threads.windows(2).all(|w| w[0].0 + 1 == w[1].0 && w[0].1 < w[1].1));
    }

    #[test]
    fn test_relay_row_below_threads() {
        for slots in [0, 3, 12] {
            let anchors = anchor_layout(slots);
            let lowest_thread = anchors
                .iter()
                .filter(|(anchor, _)| matches!(anchor, AnchorId::Thread(_)))
                .map(|(_, rect)| rect.bottom())
                .fold(0.0, f32::max);
            let proxy = anchors
                .iter()
                .find(|(anchor, _)| *anchor == AnchorId::Proxy)
                .map(|(_, rect)| *rect)
                .unwrap();
            assert!(proxy.top() > lowest_thread);
            assert!(content_size(slots).y > proxy.bottom() + 80.0);
        }
    }
}
