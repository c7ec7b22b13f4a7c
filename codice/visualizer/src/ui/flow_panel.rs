use crossbeam_channel::{unbounded, Receiver};
use eframe::egui;
use egui::{Color32, Id, ScrollArea};
use sequencer::{AnchorId, SequenceEvent, SequenceKind, Sequencer};
use std::time::Duration;

use crate::config::FlowConfig;
use crate::layout::{anchor_layout, content_size, sections};
use crate::ui::canvas_stage::{paint_anchor, CanvasStage};

const EVENT_LOG_LEN: usize = 200;

/// Both diagrams, their trigger buttons and the statistics readout.
pub struct FlowPanel {
    sequencer: Sequencer,
    stage: CanvasStage,
    event_receiver: Receiver<SequenceEvent>,
    thread_slots: usize,
    max_thread_slots: usize,
    snackbar: Option<(String, f64)>,
    snackbar_duration: f64,
    event_log: Vec<String>,
    show_event_log: bool,
}

impl FlowPanel {
    pub fn new(config: &FlowConfig) -> Self {
        let (event_sender, event_receiver) = unbounded();
        Self {
            sequencer: Sequencer::new(&config.timing).with_event_sender(event_sender),
            stage: CanvasStage::new(),
            event_receiver,
            thread_slots: config.layout.thread_slots,
            max_thread_slots: config.layout.max_thread_slots,
            snackbar: None,
            snackbar_duration: 2.0,
            event_log: Vec::new(),
            show_event_log: false,
        }
    }

    /// How long the window may sleep before the next frame has something to show.
    /// `None` once nothing is in flight and the snackbar is gone.
    pub fn repaint_after(&self, now: f64) -> Option<Duration> {
        if self.stage.is_gliding(now) || !self.event_receiver.is_empty() {
            return Some(Duration::ZERO);
        }
        let snackbar_expiry = self.snackbar.as_ref().map(|(_, expires)| *expires);
        self.sequencer
            .next_due()
            .into_iter()
            .chain(snackbar_expiry)
            .min_by(f64::total_cmp)
            .map(|at| Duration::from_secs_f64((at - now).max(0.0)))
    }

    fn drain_events(&mut self, now: f64) {
        while let Ok(event) = self.event_receiver.try_recv() {
            self.handle_sequence_event(event, now);
        }
    }

    fn trigger(&mut self, kind: SequenceKind, now: f64) {
        // rejections come back as events and end up in the snackbar
        if let Err(error) = self.sequencer.start(kind, now, &mut self.stage) {
            log::debug!("{kind} not started: {error}");
        }
    }

    fn remove_thread(&mut self) {
        if self.thread_slots > 0 {
            self.thread_slots -= 1;
            self.stage.truncate_threads(self.thread_slots);
            self.sequencer.sync_thread_count(self.thread_slots);
        }
    }

    fn handle_sequence_event(&mut self, event: SequenceEvent, now: f64) {
        match &event {
            SequenceEvent::Rejected { kind, error, .. } => {
                self.snackbar = Some((
                    format!("Can't start {kind}: {error}"),
                    self.snackbar_duration + now,
                ));
            }
            SequenceEvent::Failed { id, error, .. } => {
                self.snackbar = Some((
                    format!("Sequence {id} aborted: {error}"),
                    self.snackbar_duration + now,
                ));
            }
            _ => {}
        }

        self.event_log.push(event.to_string());
        if self.event_log.len() > EVENT_LOG_LEN {
            let overflow = self.event_log.len() - EVENT_LOG_LEN;
            self.event_log.drain(..overflow);
        }
    }

    fn controls_ui(&mut self, ui: &mut egui::Ui, now: f64) {
        ui.horizontal(|ui| {
            if ui.button("Simulate request").clicked() {
                self.trigger(SequenceKind::ThreadDispatch, now);
            }
            if ui.button("Simulate proxy request").clicked() {
                self.trigger(SequenceKind::ProxyRelay, now);
            }

            ui.separator();

            if ui.button("Add thread").clicked() {
                if self.thread_slots < self.max_thread_slots {
                    self.thread_slots += 1;
                } else {
                    self.snackbar = Some((
                        format!("Already at {} thread slots", self.max_thread_slots),
                        self.snackbar_duration + now,
                    ));
                }
            }
            if ui.button("Remove thread").clicked() {
                self.remove_thread();
            }

            ui.separator();

            if ui.button("Cancel all").clicked() {
                let cancelled = self.sequencer.cancel_all(now, &mut self.stage);
                log::info!("Cancelled {cancelled} sequences");
            }
        });
    }

    fn stats_ui(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(format!("Thread slots: {}", self.thread_slots));
            ui.label(format!("Next thread: {}", self.sequencer.cursor()));
            ui.label(format!("In flight: {}", self.sequencer.in_flight()));
            ui.label(format!("Markers on stage: {}", self.stage.marker_count()));
        });
        for kind in [SequenceKind::ThreadDispatch, SequenceKind::ProxyRelay] {
            let stats = self.sequencer.stats(kind);
            let lifetime = self.sequencer.choreography(kind).lifetime();
            ui.label(format!(
                "{kind} ({:.1} s): started {}, running {}, finished {}, failed {}, rejected {}, cancelled {}",
                lifetime.as_secs_f64(),
                stats.started,
                stats.in_flight(),
                stats.finished,
                stats.failed,
                stats.rejected,
                stats.cancelled
            ));
        }

        ui.checkbox(&mut self.show_event_log, "Toggle event log");
        if self.show_event_log {
            ScrollArea::vertical()
                .id_salt("event_log")
                .max_height(120.0)
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    for line in &self.event_log {
                        ui.monospace(line);
                    }
                });
        }
    }

    fn stage_ui(&mut self, ui: &mut egui::Ui, now: f64) {
        ScrollArea::both()
            .id_salt("stage")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                let page_origin = ui.max_rect().min;
                self.stage.begin_frame(now, ui.clip_rect().min, page_origin);

                let page = egui::Rect::from_min_size(page_origin, content_size(self.thread_slots));
                ui.allocate_rect(page, egui::Sense::hover());
                let painter = ui.painter();

                let titles = sections(self.thread_slots);
                painter.text(
                    page_origin + titles.dispatch.to_vec2(),
                    egui::Align2::LEFT_TOP,
                    "Thread pool",
                    egui::FontId::proportional(18.0),
                    ui.visuals().text_color(),
                );
                painter.text(
                    page_origin + titles.relay.to_vec2(),
                    egui::Align2::LEFT_TOP,
                    "Reverse proxy",
                    egui::FontId::proportional(18.0),
                    ui.visuals().text_color(),
                );

                for (anchor, rect) in anchor_layout(self.thread_slots) {
                    let screen_rect = rect.translate(page_origin.to_vec2());
                    let (caption, fill) = match anchor {
                        AnchorId::Client => ("Client".to_string(), Color32::from_rgb(192, 57, 43)),
                        AnchorId::Server => ("Server".to_string(), Color32::from_rgb(39, 174, 96)),
                        AnchorId::Thread(index) => {
                            let fill = if index == self.sequencer.cursor() {
                                Color32::from_rgb(41, 128, 185)
                            } else {
                                Color32::from_rgb(44, 62, 80)
                            };
                            (format!("Thread {index}"), fill)
                        }
                        AnchorId::ProxyClient => {
                            ("Client".to_string(), Color32::from_rgb(192, 57, 43))
                        }
                        AnchorId::Proxy => {
                            ("Proxy".to_string(), Color32::from_rgb(142, 68, 173))
                        }
                        AnchorId::MainServer => {
                            ("Main server".to_string(), Color32::from_rgb(39, 174, 96))
                        }
                    };
                    paint_anchor(painter, screen_rect, &caption, fill);
                    self.stage.place_anchor(anchor, screen_rect);
                }

                self.sequencer.tick(now, &mut self.stage);
                self.stage.paint(ui.painter());
            });
    }

    pub fn show_ui(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        let now = ctx.input(|i| i.time);
        self.stage.set_time(now);
        self.drain_events(now);

        self.controls_ui(ui, now);
        ui.separator();
        self.stats_ui(ui);
        ui.separator();
        self.stage_ui(ui, now);

        // steps fired by this frame's tick
        self.drain_events(now);

        match &self.snackbar {
            Some((message, expires)) if now < *expires => show_snackbar(ctx, message),
            Some(_) => self.snackbar = None,
            None => {}
        }
    }
}

fn show_snackbar(ctx: &egui::Context, message: &str) {
    egui::Area::new(Id::new("flow_snackbar"))
        .order(egui::Order::Foreground)
        .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-16.0, -16.0))
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style())
                .fill(Color32::from_rgb(120, 40, 31))
                .show(ui, |ui| {
                    ui.label(egui::RichText::new(message).color(Color32::WHITE).strong());
                });
        });
}
