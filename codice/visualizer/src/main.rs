// Run using: RUST_LOG=info cargo run -p visualizer -- [flow_config.toml] [--headless]
mod cli;
mod config;
mod headless;
mod initializer;
mod layout;
mod ui;
mod validation;

use clap::Parser;
use cli::Cli;
use initializer::FlowInitializer;

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = FlowInitializer::run(cli.config.as_deref(), cli.headless) {
        eprintln!("Error initializing visualizer: {}", e);
        std::process::exit(1);
    }
}
