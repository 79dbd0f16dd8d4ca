//! keypipe CLI
//!
//! Forwards terminal keyboard input to a USB gadget HID endpoint, either
//! interactively or from a command-line string.

use std::time::Duration;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use keypipe_gadget::GadgetKeyboard;

// CLI definitions
mod cli;
use cli::{Cli, Commands};

// Config file handling
mod config;
use config::Config;

// Interactive forwarder
mod tui;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --log-level when both are set
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config_path = cli.config.unwrap_or_else(Config::default_path);
    info!("Loading config from {:?}", config_path);
    let mut config = Config::load(&config_path)?;
    if let Some(device) = cli.device {
        config.device = device;
    }

    match cli.command {
        Some(Commands::Type { text, delay_ms }) => {
            let delay = Duration::from_millis(delay_ms.unwrap_or(config.type_delay_ms));
            info!("Typing to {}", config.device.display());
            let session = GadgetKeyboard::open(&config.device)?;
            session.type_text(&text, delay)?;
            session.close()?;
            Ok(())
        }
        Some(Commands::Tui) | None => {
            let device_label = config.device.display().to_string();
            let session = GadgetKeyboard::open(&config.device)?;
            tui::run(session, device_label)
        }
    }
}
