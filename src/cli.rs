// CLI definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "keypipe")]
#[command(
    author,
    version,
    about = "Terminal keyboard forwarder for USB gadget HID endpoints"
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Gadget device path (overrides the config file)
    #[arg(long, global = true, value_name = "PATH")]
    pub device: Option<PathBuf>,

    /// Config file path (default: ~/.config/keypipe/keypipe.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Forward terminal keystrokes to the gadget interactively (default)
    #[command(visible_alias = "ui")]
    Tui,

    /// Type a text string on the gadget and exit
    #[command(visible_aliases = ["t", "send"])]
    Type {
        /// Text to type; uppercase and shifted symbols produce
        /// Shift-bracketed pulses, newlines produce Enter
        text: String,

        /// Pause between characters in milliseconds (overrides the config file)
        #[arg(long, value_name = "MS")]
        delay_ms: Option<u64>,
    },
}
