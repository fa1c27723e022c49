//! Data model handed to the widget layer each frame.

use serde::Serialize;

use crate::process::TargetSpec;
use crate::settings::{AspectRatioIndex, FieldOfView, GraphicsQuality, SettingsMirror};

/// Diagnostics about the attached game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TargetInfo {
    pub pid: u32,
    pub base_address: u64,
}

/// What the overlay panel shows this frame.
#[derive(Debug, Clone, Copy)]
pub enum FrameView<'a> {
    /// The game is not attached: a "not found" message and a retry button.
    Detached {
        target: &'a TargetSpec,
        last_error: Option<&'a str>,
    },
    Attached {
        mirror: &'a SettingsMirror,
        target: TargetInfo,
    },
}

impl FrameView<'_> {
    pub fn is_attached(&self) -> bool {
        matches!(self, Self::Attached { .. })
    }
}

/// User input produced by the widget layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UiAction {
    SetFullscreen(bool),
    SetQuality(GraphicsQuality),
    SetAspectRatio(AspectRatioIndex),
    SetFrameRateCap(i32),
    /// Linked slider: moves center and sprint with the base angle.
    SetFieldOfView(i32),
    SetFieldOfViewTriple(FieldOfView),
    /// Write all live-backed fields again.
    Apply,
    /// Persist the settings file, then apply.
    Save,
    /// Re-read the live-backed fields from the game.
    ReloadLive,
    Retry,
    CloseOverlay,
}

impl UiAction {
    /// Whether this action needs an attached game to mean anything.
    pub fn is_live(&self) -> bool {
        matches!(
            self,
            Self::SetFullscreen(_)
                | Self::SetQuality(_)
                | Self::SetAspectRatio(_)
                | Self::Apply
                | Self::ReloadLive
        )
    }
}

/// The widget layer.
///
/// Called only while the overlay is visible. Returns the actions the user
/// triggered during this frame, applied in order.
pub trait OverlayUi {
    fn render(&mut self, view: &FrameView<'_>) -> Vec<UiAction>;
}

impl<F> OverlayUi for F
where
    F: FnMut(&FrameView<'_>) -> Vec<UiAction>,
{
    fn render(&mut self, view: &FrameView<'_>) -> Vec<UiAction> {
        self(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_live_actions() {
        assert!(UiAction::SetFullscreen(true).is_live());
        assert!(UiAction::ReloadLive.is_live());
        assert!(!UiAction::SetFrameRateCap(144).is_live());
        assert!(!UiAction::Save.is_live());
        assert!(!UiAction::Retry.is_live());
    }

    #[test]
    fn test_closure_ui() {
        let target = TargetSpec::default();
        let mut seen = Vec::new();
        let mut ui = |view: &FrameView<'_>| {
            seen.push(view.is_attached());
            vec![UiAction::Retry]
        };

        let actions = ui.render(&FrameView::Detached {
            target: &target,
            last_error: None,
        });

        assert_eq!(actions, [UiAction::Retry]);
        assert_eq!(seen, [false]);
    }
}
