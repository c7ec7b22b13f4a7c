use super::cli::DEFAULT_CONFIG;
use super::config::FlowConfig;
use super::headless;
use super::ui::app::App;
use super::ui::flow_panel::FlowPanel;
use super::validation::validate_config;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

pub struct FlowInitializer;

impl FlowInitializer {
    /// Reads the TOML configuration at `file_path`.
    pub fn read_config(file_path: &Path) -> Result<FlowConfig, Box<dyn std::error::Error>> {
        let config_str = fs::read_to_string(file_path)
            .map_err(|e| format!("Can't read {}: {e}", file_path.display()))?;
        let config: FlowConfig = toml::from_str(&config_str)?;
        Ok(config)
    }

    /// Reads `flow_config.toml` from the working directory, or the defaults when it is absent.
    pub fn read_default_config() -> Result<FlowConfig, Box<dyn std::error::Error>> {
        match fs::metadata(DEFAULT_CONFIG) {
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::warn!("{DEFAULT_CONFIG} not found, using the default configuration");
                Ok(FlowConfig::default())
            }
            _ => Self::read_config(Path::new(DEFAULT_CONFIG)),
        }
    }

    pub fn initialize_window(config: &FlowConfig) -> Result<(), Box<dyn std::error::Error>> {
        let flow_panel = FlowPanel::new(config);

        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_title(config.window.title.clone())
                .with_inner_size([config.window.width, config.window.height]),
            ..Default::default()
        };

        log::info!(
            "Opening {}x{} window with {} thread slots",
            config.window.width,
            config.window.height,
            config.layout.thread_slots
        );
        eframe::run_native(
            &config.window.title,
            options,
            Box::new(|cc| Ok(Box::new(App::new(cc, flow_panel)))),
        )?;
        Ok(())
    }

    pub fn run(
        file_path: Option<&Path>,
        headless: bool,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let config = match file_path {
            Some(file_path) => Self::read_config(file_path)?,
            None => Self::read_default_config()?,
        };
        validate_config(&config)?;

        if headless {
            headless::trace(&config);
            Ok(())
        } else {
            Self::initialize_window(&config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_missing_config_is_an_error() {
        let error = FlowInitializer::read_config(Path::new("does/not/exist.toml")).unwrap_err();
        assert!(error.to_string().starts_with("Can't read does/not/exist.toml"));
    }

    #[test]
    fn test_run_with_missing_config_fails() {
        assert!(FlowInitializer::run(Some(Path::new("does/not/exist.toml")), true).is_err());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: FlowConfig = toml::from_str(
            r#"
            [layout]
            thread_slots = 3

            [timing]
            relay_across_proxy_ms = 750
            "#,
        )
        .unwrap();

        assert_eq!(config.layout.thread_slots, 3);
        assert_eq!(config.layout.max_thread_slots, 12);
        assert_eq!(config.timing.relay_across_proxy_ms, 750);
        assert_eq!(config.timing.dispatch_to_server_ms, 1000);
        assert_eq!(config.window.title, "Request flow");
    }

    #[test]
    fn test_bundled_config_is_valid() {
        let config_str = include_str!("../flow_config.toml");
        let config: FlowConfig = toml::from_str(config_str).unwrap();
        assert_eq!(validate_config(&config), Ok(()));
        assert_eq!(config.timing, sequencer::Timing::default());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config: FlowConfig = toml::from_str("[layout]\nthread_slots = 40\n").unwrap();
        assert!(validate_config(&config).is_err());
    }
}
