//! Configuration for the overlay and its persisted settings file.
//!
//! - `OverlayConfig` - how the overlay finds the game and reacts to input
//! - `PersistedConfig` / `ConfigStore` - the JSON settings document
//! - Polling constants for hosts without their own frame loop

mod persisted;

pub use persisted::*;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::process::TargetSpec;

/// Relative path of the settings document.
pub const DEFAULT_CONFIG_PATH: &str = "netsphere.json";

/// Virtual-key code of the Delete key.
pub const VK_DELETE: u16 = 0x2E;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub target: TargetSpec,
    pub config_path: PathBuf,
    /// Virtual-key code that shows/hides the overlay.
    pub toggle_key: u16,
    /// Frames between attach attempts while detached. 0 and 1 both mean every frame.
    pub attach_interval_frames: u32,
    pub start_visible: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            target: TargetSpec::default(),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
            toggle_key: VK_DELETE,
            attach_interval_frames: 1,
            start_visible: true,
        }
    }
}

impl OverlayConfig {
    pub fn attach_interval(&self) -> u64 {
        u64::from(self.attach_interval_frames.max(1))
    }
}

/// Frame pacing for hosts that drive the overlay from a timer.
pub mod polling {
    /// Interval between simulated frames (ms), roughly 60 Hz.
    pub const FRAME_INTERVAL_MS: u64 = 16;

    /// Frames between attach attempts for timer-driven hosts (twice a second at 60 Hz).
    pub const TIMER_ATTACH_INTERVAL_FRAMES: u32 = 30;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_defaults() {
        let config = OverlayConfig::default();
        assert_eq!(config.target.executable_name, "S4Client.exe");
        assert_eq!(config.config_path, PathBuf::from("netsphere.json"));
        assert_eq!(config.toggle_key, 0x2E);
        assert!(config.start_visible);
        assert_eq!(config.attach_interval(), 1);
    }

    #[test]
    fn test_zero_interval_means_every_frame() {
        let config = OverlayConfig {
            attach_interval_frames: 0,
            ..OverlayConfig::default()
        };
        assert_eq!(config.attach_interval(), 1);
    }

    #[test]
    fn test_overlay_config_from_partial_json() {
        let config: OverlayConfig =
            serde_json::from_str(r#"{"toggle_key": 45, "target": {"executable_name": "s4.exe"}}"#)
                .unwrap();
        assert_eq!(config.toggle_key, 45);
        assert_eq!(config.target.executable_name, "s4.exe");
        assert_eq!(config.target.module_name, "S4Client.exe");
        assert_eq!(config.attach_interval_frames, 1);
    }

    #[test]
    fn test_polling_constants() {
        assert_eq!(polling::FRAME_INTERVAL_MS, 16);
        assert!(polling::TIMER_ATTACH_INTERVAL_FRAMES > 1);
    }
}
