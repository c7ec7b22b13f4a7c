use clap::Parser;
use std::path::PathBuf;

/// Config file looked up when none is given on the command line.
pub const DEFAULT_CONFIG: &str = "flow_config.toml";

/// Animated request flow through a thread pool and a reverse proxy.
#[derive(Debug, Parser)]
#[command(name = "visualizer", version)]
pub struct Cli {
    /// TOML configuration. Must exist when given; without it
    /// `flow_config.toml` is used if present, else the defaults.
    pub config: Option<PathBuf>,

    /// Print the event timeline of a scripted run instead of opening a window.
    #[arg(long)]
    pub headless: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments() {
        let cli = Cli::try_parse_from(["visualizer"]).unwrap();
        assert_eq!(cli.config, None);
        assert!(!cli.headless);
    }

    #[test]
    fn test_config_and_headless() {
        let cli = Cli::try_parse_from(["visualizer", "demo.toml", "--headless"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("demo.toml")));
        assert!(cli.headless);
    }

    #[test]
    fn test_misspelled_flag_is_rejected() {
        let error = Cli::try_parse_from(["visualizer", "--headles"]).unwrap_err();
        assert_eq!(error.kind(), clap::error::ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_help_is_not_a_path() {
        let error = Cli::try_parse_from(["visualizer", "--help"]).unwrap_err();
        assert_eq!(error.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
