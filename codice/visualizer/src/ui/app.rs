use eframe::egui;

use crate::ui::flow_panel::FlowPanel;

/// Main application state
pub struct App {
    flow_panel: FlowPanel,
}

impl App {
    /// Create a new application instance
    pub fn new(_cc: &eframe::CreationContext<'_>, flow_panel: FlowPanel) -> Self {
        Self { flow_panel }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            self.flow_panel.show_ui(ctx, ui);
        });

        let now = ctx.input(|i| i.time);
        if let Some(delay) = self.flow_panel.repaint_after(now) {
            ctx.request_repaint_after(delay);
        }
    }
}
