//! CLI argument definitions for netsphere.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use netsphere_core::config::{DEFAULT_CONFIG_PATH, OverlayConfig, polling};
use netsphere_core::process::{DEFAULT_EXECUTABLE, TargetSpec};
use netsphere_core::settings::{AspectRatioIndex, GraphicsQuality};

#[derive(Parser)]
#[command(name = "netsphere")]
#[command(about = "S4 League settings overlay", version)]
pub struct Args {
    /// Executable name of the game process
    #[arg(long, global = true, env = "NETSPHERE_EXE", default_value = DEFAULT_EXECUTABLE)]
    pub exe: String,

    /// Module whose base address anchors the settings pointers (defaults to --exe)
    #[arg(long, global = true, env = "NETSPHERE_MODULE")]
    pub module: Option<String>,

    /// Settings file
    #[arg(
        short,
        long,
        global = true,
        env = "NETSPHERE_CONFIG",
        default_value = DEFAULT_CONFIG_PATH
    )]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Args {
    pub fn target(&self) -> TargetSpec {
        TargetSpec {
            executable_name: self.exe.clone(),
            module_name: self.module.clone().unwrap_or_else(|| self.exe.clone()),
        }
    }

    pub fn overlay_config(&self) -> OverlayConfig {
        OverlayConfig {
            target: self.target(),
            config_path: self.config.clone(),
            ..OverlayConfig::default()
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the live and persisted settings
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change settings in the running game
    Set {
        /// Fullscreen (true) or windowed (false)
        #[arg(long)]
        fullscreen: Option<bool>,
        /// Graphics quality (low, medium, high)
        #[arg(long)]
        quality: Option<GraphicsQuality>,
        /// Aspect ratio (4:3, 16:9, 16:10, 5:3, 5:4 or index 0-4)
        #[arg(long)]
        aspect: Option<AspectRatioIndex>,
        /// Frame rate cap (30-1000, stored in the settings file)
        #[arg(long)]
        fps: Option<i32>,
        /// Field of view; center and sprint follow (50-120, stored in the settings file)
        #[arg(long)]
        fov: Option<i32>,
        /// Write the settings file afterwards
        #[arg(long)]
        save: bool,
    },
    /// Keep the overlay attached and follow the game (default)
    Watch {
        /// Tick interval in milliseconds
        #[arg(long, default_value_t = polling::FRAME_INTERVAL_MS)]
        interval_ms: u64,
        /// Ticks between attach attempts while the game is not running
        #[arg(long, default_value_t = polling::TIMER_ATTACH_INTERVAL_FRAMES)]
        attach_every: u32,
    },
    /// Print the memory layout of the live fields
    Layout {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
