use crossbeam_channel::Sender;
use std::collections::{BTreeMap, HashMap};

use crate::anchor::{AnchorId, AnchorSelector};
use crate::choreography::{Choreography, SequenceKind, Step, StepAction, Waypoint};
use crate::cursor::RoundRobinCursor;
use crate::error::SequenceError;
use crate::marker::Marker;
use crate::sequence_event::{SequenceEvent, SequenceId};
use crate::sequence_stats::SequenceStats;
use crate::stage::Stage;
use crate::timing::Timing;
use egui::Pos2;

struct RunningSequence {
    kind: SequenceKind,
    marker: Marker,
    // Index of the step that fires at `due_at`
    next_step: usize,
    due_at: f64,
}

enum StepOutcome {
    Placed(AnchorId, Pos2),
    Removed,
}

/// Runs marker choreographies against a [`Stage`].
///
/// Time is supplied by the caller in seconds (the frame clock in the window,
/// a simulated clock elsewhere). Every call to [`Sequencer::tick`] fires at
/// most one step per in-flight sequence, and the step after it is scheduled
/// from the moment it actually fired.
pub struct Sequencer {
    dispatch: Choreography,
    relay: Choreography,
    marker_size: f32,
    cursor: RoundRobinCursor,
    running: BTreeMap<SequenceId, RunningSequence>,
    next_id: SequenceId,
    stats: HashMap<SequenceKind, SequenceStats>,
    event_sender: Option<Sender<SequenceEvent>>,
}

impl Sequencer {
    pub fn new(timing: &Timing) -> Self {
        Self {
            dispatch: Choreography::thread_dispatch(timing),
            relay: Choreography::proxy_relay(timing),
            marker_size: timing.marker_size,
            cursor: RoundRobinCursor::new(),
            running: BTreeMap::new(),
            next_id: 1,
            stats: HashMap::new(),
            event_sender: None,
        }
    }

    /// Publishes a [`SequenceEvent`] for every start, placement and outcome.
    pub fn with_event_sender(mut self, event_sender: Sender<SequenceEvent>) -> Self {
        self.event_sender = Some(event_sender);
        self
    }

    /// Sends a request marker from the client through the server to the next thread slot.
    pub fn run_thread_dispatch(
        &mut self,
        now: f64,
        stage: &mut dyn Stage,
    ) -> Result<SequenceId, SequenceError> {
        self.start(SequenceKind::ThreadDispatch, now, stage)
    }

    /// Sends a relay marker from the proxy client across the proxy to the main server.
    pub fn run_proxy_relay(
        &mut self,
        now: f64,
        stage: &mut dyn Stage,
    ) -> Result<SequenceId, SequenceError> {
        self.start(SequenceKind::ProxyRelay, now, stage)
    }

    /// Creates the marker, places it right away and schedules the remaining steps.
    ///
    /// A dispatch with no thread anchors on the stage is rejected before any
    /// marker exists. A failing first placement aborts the sequence and is
    /// returned as well as published.
    pub fn start(
        &mut self,
        kind: SequenceKind,
        now: f64,
        stage: &mut dyn Stage,
    ) -> Result<SequenceId, SequenceError> {
        if kind == SequenceKind::ThreadDispatch && stage.thread_count() == 0 {
            return Err(self.reject(kind, SequenceError::NoAnchorsAvailable, now));
        }

        let id = self.next_id;
        self.next_id += 1;

        let choreography = self.choreography(kind);
        let marker = Marker::new(
            id,
            choreography.style,
            choreography.label.clone(),
            self.marker_size,
        );
        self.running.insert(
            id,
            RunningSequence {
                kind,
                marker,
                next_step: 0,
                due_at: now,
            },
        );
        self.stats_mut(kind).started += 1;
        log::info!("Starting {kind} sequence {id}");
        self.emit(SequenceEvent::Started { id, kind, at: now });

        self.advance(id, now, stage)?;
        Ok(id)
    }

    /// Fires every step that is due at `now`, earliest first. Returns how many fired.
    pub fn tick(&mut self, now: f64, stage: &mut dyn Stage) -> usize {
        let mut due = self
            .running
            .iter()
            .filter(|(_, sequence)| sequence.due_at <= now)
            .map(|(id, sequence)| (sequence.due_at, *id))
            .collect::<Vec<_>>();
        due.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        for (_, id) in &due {
            // failures are logged and published by `advance`
            let _ = self.advance(*id, now, stage);
        }
        due.len()
    }

    /// Stops a sequence before its last step and takes its marker off the stage.
    pub fn cancel(
        &mut self,
        id: SequenceId,
        now: f64,
        stage: &mut dyn Stage,
    ) -> Result<(), SequenceError> {
        let sequence = self
            .running
            .remove(&id)
            .ok_or(SequenceError::UnknownSequence(id))?;
        stage.remove_marker(sequence.marker.id);

        let kind = sequence.kind;
        self.stats_mut(kind).cancelled += 1;
        log::info!("Cancelled {kind} sequence {id}");
        self.emit(SequenceEvent::Cancelled { id, kind, at: now });
        Ok(())
    }

    pub fn cancel_all(&mut self, now: f64, stage: &mut dyn Stage) -> usize {
        let ids = self.running.keys().copied().collect::<Vec<_>>();
        for id in &ids {
            let _ = self.cancel(*id, now, stage);
        }
        ids.len()
    }

    pub fn in_flight(&self) -> usize {
        self.running.len()
    }

    pub fn is_running(&self, id: SequenceId) -> bool {
        self.running.contains_key(&id)
    }

    /// Earliest time a pending step becomes due.
    pub fn next_due(&self) -> Option<f64> {
        self.running
            .values()
            .map(|sequence| sequence.due_at)
            .min_by(f64::total_cmp)
    }

    /// Thread slot the next dispatch will be routed to.
    pub fn cursor(&self) -> usize {
        self.cursor.position()
    }

    /// Keeps the cursor in range after thread anchors were removed from the stage.
    pub fn sync_thread_count(&mut self, count: usize) {
        self.cursor.clamp(count);
    }

    pub fn choreography(&self, kind: SequenceKind) -> &Choreography {
        match kind {
            SequenceKind::ThreadDispatch => &self.dispatch,
            SequenceKind::ProxyRelay => &self.relay,
        }
    }

    pub fn stats(&self, kind: SequenceKind) -> SequenceStats {
        self.stats.get(&kind).copied().unwrap_or_default()
    }

    fn advance(
        &mut self,
        id: SequenceId,
        now: f64,
        stage: &mut dyn Stage,
    ) -> Result<(), SequenceError> {
        let mut sequence = self
            .running
            .remove(&id)
            .ok_or(SequenceError::UnknownSequence(id))?;
        let kind = sequence.kind;

        let choreography = self.choreography(kind);
        let step = choreography.steps.get(sequence.next_step).cloned();
        let next_delay = choreography
            .steps
            .get(sequence.next_step + 1)
            .map(|step| step.delay);

        let Some(step) = step else {
            stage.remove_marker(sequence.marker.id);
            self.finish(id, kind, now);
            return Ok(());
        };

        match Self::perform(&step, &mut sequence.marker, &mut self.cursor, stage) {
            Ok(StepOutcome::Placed(anchor, position)) => {
                log::debug!(
                    "{kind} sequence {id}: step {} placed marker at {anchor} ({:.0}, {:.0})",
                    sequence.next_step,
                    position.x,
                    position.y
                );
                self.stats_mut(kind).placements += 1;
                self.emit(SequenceEvent::MarkerPlaced {
                    id,
                    marker: sequence.marker.id,
                    anchor,
                    position,
                    at: now,
                });

                sequence.next_step += 1;
                match next_delay {
                    Some(delay) => {
                        sequence.due_at = now + delay.as_secs_f64();
                        self.running.insert(id, sequence);
                    }
                    None => {
                        stage.remove_marker(sequence.marker.id);
                        self.finish(id, kind, now);
                    }
                }
                Ok(())
            }
            Ok(StepOutcome::Removed) => {
                self.finish(id, kind, now);
                Ok(())
            }
            Err(error) => {
                stage.remove_marker(sequence.marker.id);
                log::error!("{kind} sequence {id} aborted: {error}");
                self.stats_mut(kind).failed += 1;
                self.emit(SequenceEvent::Failed {
                    id,
                    kind,
                    error: error.clone(),
                    at: now,
                });
                Err(error)
            }
        }
    }

    fn perform(
        step: &Step,
        marker: &mut Marker,
        cursor: &mut RoundRobinCursor,
        stage: &mut dyn Stage,
    ) -> Result<StepOutcome, SequenceError> {
        match &step.action {
            StepAction::Spawn(to) => {
                let (anchor, position) = Self::resolve(to, cursor, stage)?;
                marker.position = position;
                stage.show_marker(marker);
                Ok(StepOutcome::Placed(anchor, position))
            }
            StepAction::Move { to, transition } => {
                let (anchor, position) = Self::resolve(to, cursor, stage)?;
                if transition.is_some() {
                    marker.transition = *transition;
                }
                marker.position = position;
                stage.show_marker(marker);
                Ok(StepOutcome::Placed(anchor, position))
            }
            StepAction::Remove => {
                stage.remove_marker(marker.id);
                Ok(StepOutcome::Removed)
            }
        }
    }

    /// Anchor rectangles are read from the stage on every step, never cached.
    fn resolve(
        waypoint: &Waypoint,
        cursor: &mut RoundRobinCursor,
        stage: &dyn Stage,
    ) -> Result<(AnchorId, Pos2), SequenceError> {
        let anchor = match waypoint.anchor {
            AnchorSelector::Fixed(anchor) => anchor,
            AnchorSelector::NextThread => AnchorId::Thread(cursor.select(stage.thread_count())?),
        };
        let rect = stage
            .anchor_rect(anchor)
            .ok_or(SequenceError::MissingAnchor(anchor))?;
        Ok((anchor, waypoint.resolve(rect, stage.scroll_offset())))
    }

    fn finish(&mut self, id: SequenceId, kind: SequenceKind, now: f64) {
        self.stats_mut(kind).finished += 1;
        log::info!("Finished {kind} sequence {id}");
        self.emit(SequenceEvent::Finished { id, kind, at: now });
    }

    fn reject(&mut self, kind: SequenceKind, error: SequenceError, now: f64) -> SequenceError {
        log::warn!("Rejected {kind} sequence: {error}");
        self.stats_mut(kind).rejected += 1;
        self.emit(SequenceEvent::Rejected {
            kind,
            error: error.clone(),
            at: now,
        });
        error
    }

    fn stats_mut(&mut self, kind: SequenceKind) -> &mut SequenceStats {
        self.stats.entry(kind).or_default()
    }

    fn emit(&self, event: SequenceEvent) {
        if let Some(sender) = &self.event_sender {
            if sender.send(event).is_err() {
                log::debug!("Sequence event receiver is gone");
            }
        }
    }
}
