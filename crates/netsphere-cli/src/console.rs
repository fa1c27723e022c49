//! Console rendering of the overlay panel.

use std::fmt::Write as _;

use netsphere_core::config::ConfigStore;
use netsphere_core::driver::{FrameView, OverlayUi, TargetInfo, UiAction};
use netsphere_core::settings::{GraphicsQuality, SettingsMirror};
use owo_colors::OwoColorize;

/// Format the settings panel with colored output
pub fn format_settings(mirror: &SettingsMirror, target: &TargetInfo) -> String {
    let mut output = String::new();
    let border = "━".repeat(44);
    let fov = mirror.field_of_view();

    let _ = writeln!(output, "{}", border.dimmed());
    let _ = writeln!(
        output,
        "  {} (PID {}, base 0x{:X})",
        "S4 League".bold(),
        target.pid,
        target.base_address
    );
    let _ = writeln!(output, "{}", border.dimmed());
    let _ = writeln!(
        output,
        "  DISPLAY : {}",
        if mirror.fullscreen() {
            "Fullscreen".cyan().to_string()
        } else {
            "Windowed".to_string()
        }
    );
    let _ = writeln!(output, "  QUALITY : {}", format_colored_quality(mirror.quality()));
    let _ = writeln!(output, "  ASPECT  : {}", mirror.aspect_ratio());
    let _ = writeln!(output, "  FPS CAP : {}", mirror.frame_rate_cap());
    let _ = writeln!(
        output,
        "  FOV     : {} / {} / {} (base/center/sprint)",
        fov.base, fov.center, fov.sprint
    );
    let _ = write!(output, "{}", border.dimmed());

    output
}

fn format_colored_quality(quality: GraphicsQuality) -> String {
    let name: &'static str = quality.into();
    match quality {
        GraphicsQuality::Low => name.red().to_string(),
        GraphicsQuality::Medium => name.yellow().to_string(),
        GraphicsQuality::High => name.green().to_string(),
    }
}

/// Panel for hosts without a graphics hook: prints the view whenever it changes.
///
/// Never produces actions; changes go through the `set` command.
pub struct ConsoleUi {
    last_frame: Option<String>,
    config_path: String,
}

impl ConsoleUi {
    pub fn new(store: &ConfigStore) -> Self {
        Self {
            last_frame: None,
            config_path: store.path().display().to_string(),
        }
    }

    fn describe(&self, view: &FrameView<'_>) -> String {
        match view {
            FrameView::Detached { target, last_error } => {
                let mut line = format!(
                    "{} {} not found",
                    "●".red(),
                    target.executable_name
                );
                if let Some(error) = last_error {
                    let _ = write!(line, " ({})", error.dimmed());
                }
                line
            }
            FrameView::Attached { mirror, target } => format!(
                "{}\n  settings file: {}",
                format_settings(mirror, target),
                self.config_path
            ),
        }
    }
}

impl OverlayUi for ConsoleUi {
    fn render(&mut self, view: &FrameView<'_>) -> Vec<UiAction> {
        let frame = self.describe(view);
        if self.last_frame.as_deref() != Some(frame.as_str()) {
            println!("{}", frame);
            self.last_frame = Some(frame);
        }
        Vec::new()
    }
}
