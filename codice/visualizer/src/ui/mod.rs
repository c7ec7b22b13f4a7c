pub mod app;
pub mod canvas_stage;
pub mod flow_panel;
