use crossbeam_channel::unbounded;
use sequencer::{AnchorId, HeadlessStage, SequenceEvent, SequenceKind, Sequencer};

use crate::config::FlowConfig;
use crate::layout::anchor_layout;

/// Frame interval of the simulated clock, in milliseconds.
const FRAME_MS: u64 = 16;
/// Gap between two triggered sequences, in milliseconds.
const TRIGGER_SPACING_MS: u64 = 500;

pub fn headless_stage(thread_slots: usize) -> HeadlessStage {
    let mut stage = HeadlessStage::new();
    let mut threads = Vec::new();
    for (anchor, rect) in anchor_layout(thread_slots) {
        match anchor {
            AnchorId::Thread(_) => threads.push(rect),
            _ => stage.set_anchor(anchor, rect),
        }
    }
    stage.set_threads(threads);
    stage
}

/// Triggers one dispatch per thread slot plus one more (so the cursor wraps),
/// and a single relay, then runs a simulated frame clock until every marker is gone.
pub fn trace(config: &FlowConfig) -> Vec<SequenceEvent> {
    let (event_sender, event_receiver) = unbounded();
    let mut sequencer = Sequencer::new(&config.timing).with_event_sender(event_sender);
    let mut stage = headless_stage(config.layout.thread_slots);

    let mut triggers = vec![SequenceKind::ThreadDispatch; config.layout.thread_slots + 1];
    triggers.insert(1, SequenceKind::ProxyRelay);
    log::info!(
        "Headless trace: {} sequences over {} thread slots",
        triggers.len(),
        config.layout.thread_slots
    );

    let mut events = Vec::new();
    let mut pending = triggers.into_iter().enumerate().peekable();
    let mut now_ms = 0;
    loop {
        let now = now_ms as f64 / 1000.0;
        while let Some((_, kind)) =
            pending.next_if(|(index, _)| *index as u64 * TRIGGER_SPACING_MS <= now_ms)
        {
            // failures are reported through the event channel
            let _ = sequencer.start(kind, now, &mut stage);
        }
        sequencer.tick(now, &mut stage);

        for event in event_receiver.try_iter() {
            println!("{event}");
            events.push(event);
        }

        if pending.peek().is_none() && sequencer.in_flight() == 0 {
            break;
        }
        now_ms += FRAME_MS;
    }

    for kind in [SequenceKind::ThreadDispatch, SequenceKind::ProxyRelay] {
        let stats = sequencer.stats(kind);
        log::info!(
            "{kind}: {} started, {} finished, {} failed, {} rejected",
            stats.started,
            stats.finished,
            stats.failed,
            stats.rejected
        );
    }
    events
}
