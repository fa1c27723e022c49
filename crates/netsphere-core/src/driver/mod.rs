//! Per-frame state machine tying the process, mirror and UI together.
//!
//! The host calls [`PerFrameDriver::on_frame`] once per rendered frame (or
//! timer tick). Each call does a bounded amount of work and never blocks:
//!
//! ```text
//! Detached --attach ok + first pull ok--> Attached
//!    ^                                       |
//!    +---- process exit / live I/O error ----+
//! ```
//!
//! `Attaching` is the short window between a successful open and the first
//! successful live read.

mod input;
mod ui;

pub use input::{AsyncKeySource, KeyEdge, KeySource, NoKeys};
pub use ui::{FrameView, OverlayUi, TargetInfo, UiAction};

use strum::{Display, IntoStaticStr};
use tracing::{debug, info, warn};

use crate::config::{ConfigStore, OverlayConfig};
use crate::error::Error;
use crate::process::{ProcessInfo, ProcessLocator, ReadMemory};
use crate::settings::SettingsMirror;

/// Frames to wait after the game was found but its settings were not
/// readable yet, as happens while the client is still loading.
pub const SETTINGS_RETRY_FRAMES: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
pub enum DriverState {
    Detached,
    Attaching,
    Attached,
}

/// Summary of one [`PerFrameDriver::on_frame`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    /// Zero-based index of the frame.
    pub frame: u64,
    pub state: DriverState,
    pub visible: bool,
    /// Number of attach calls made during the frame.
    pub attach_attempts: u32,
    pub rendered: bool,
}

pub struct PerFrameDriver<L: ProcessLocator> {
    config: OverlayConfig,
    locator: L,
    store: ConfigStore,
    process: Option<L::Process>,
    mirror: SettingsMirror,
    state: DriverState,
    toggle: KeyEdge,
    visible: bool,
    frame: u64,
    next_attach_frame: u64,
    last_error: Option<String>,
    /// The settings file has been read for the current session.
    settings_loaded: bool,
}

impl<L: ProcessLocator> PerFrameDriver<L> {
    pub fn new(config: OverlayConfig, locator: L) -> Self {
        let store = ConfigStore::new(config.config_path.clone());
        let visible = config.start_visible;
        Self {
            config,
            locator,
            store,
            process: None,
            mirror: SettingsMirror::new(),
            state: DriverState::Detached,
            toggle: KeyEdge::new(),
            visible,
            frame: 0,
            next_attach_frame: 0,
            last_error: None,
            settings_loaded: false,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn is_attached(&self) -> bool {
        self.process.is_some()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn mirror(&self) -> &SettingsMirror {
        &self.mirror
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn locator(&self) -> &L {
        &self.locator
    }

    pub fn process(&self) -> Option<&L::Process> {
        self.process.as_ref()
    }

    /// Message of the most recent attach or live I/O failure.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Number of frames processed so far.
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Run one frame.
    pub fn on_frame<K, U>(&mut self, keys: &K, ui: &mut U) -> FrameReport
    where
        K: KeySource + ?Sized,
        U: OverlayUi + ?Sized,
    {
        let frame = self.frame;
        self.frame += 1;

        let mut report = FrameReport {
            frame,
            state: self.state,
            visible: self.visible,
            attach_attempts: 0,
            rendered: false,
        };

        if self.toggle.update(keys.is_down(self.config.toggle_key)) {
            self.visible = !self.visible;
            debug!("Overlay {}", if self.visible { "shown" } else { "hidden" });
        }

        if self.process.as_ref().is_some_and(|p| !p.is_alive()) {
            self.detach(frame, "Process has exited".to_string());
        }

        if self.process.is_none() && frame >= self.next_attach_frame {
            report.attach_attempts += 1;
            self.try_attach(frame);
        }

        if self.visible {
            let actions = match &self.process {
                Some(process) => ui.render(&FrameView::Attached {
                    mirror: &self.mirror,
                    target: TargetInfo {
                        pid: process.pid(),
                        base_address: process.base_address(),
                    },
                }),
                None => ui.render(&FrameView::Detached {
                    target: &self.config.target,
                    last_error: self.last_error.as_deref(),
                }),
            };
            report.rendered = true;

            for action in actions {
                if action == UiAction::Retry && self.process.is_none() {
                    report.attach_attempts += 1;
                }
                self.apply(frame, action);
            }
        }

        report.state = self.state;
        report.visible = self.visible;
        report
    }

    /// Drop the attached process, closing its handle.
    pub fn shutdown(&mut self) {
        if let Some(process) = self.process.take() {
            info!("Releasing PID {}", process.pid());
        }
        self.settings_loaded = false;
        self.state = DriverState::Detached;
    }

    fn try_attach(&mut self, frame: u64) {
        self.state = DriverState::Attaching;
        debug!(
            "Attaching to {} (frame {})",
            self.config.target.executable_name, frame
        );

        let process = match self.locator.attach(&self.config.target) {
            Ok(process) => process,
            Err(e) => {
                debug!("Attach failed: {}", e);
                self.attach_failed(frame, e);
                return;
            }
        };

        info!(
            "Attached to {} (PID {}, base 0x{:X})",
            self.config.target.executable_name,
            process.pid(),
            process.base_address()
        );

        if !self.settings_loaded {
            self.mirror.load_persisted(&self.store);
            self.settings_loaded = true;
        }
        if let Err(e) = self.mirror.pull_live(&process) {
            self.settings_unreadable(frame, e);
            return;
        }

        self.process = Some(process);
        self.state = DriverState::Attached;
        self.last_error = None;
    }

    fn attach_failed(&mut self, frame: u64, error: Error) {
        self.state = DriverState::Detached;
        self.last_error = Some(error.to_string());
        self.next_attach_frame = frame + self.config.attach_interval();
    }

    /// The process opened but its settings could not be read.
    fn settings_unreadable(&mut self, frame: u64, error: Error) {
        let message = error.to_string();
        if self.last_error.as_deref() == Some(message.as_str()) {
            debug!("Initial settings read failed again: {}", message);
        } else {
            warn!("Initial settings read failed: {}", message);
        }
        self.state = DriverState::Detached;
        self.last_error = Some(message);
        self.next_attach_frame = frame + self.config.attach_interval().max(SETTINGS_RETRY_FRAMES);
    }

    fn detach(&mut self, frame: u64, reason: String) {
        if let Some(process) = self.process.take() {
            info!("Detached from PID {}: {}", process.pid(), reason);
        }
        self.settings_loaded = false;
        self.state = DriverState::Detached;
        self.last_error = Some(reason);
        self.next_attach_frame = frame + 1;
    }

    fn apply(&mut self, frame: u64, action: UiAction) {
        match action {
            UiAction::SetFrameRateCap(fps) => self.mirror.set_frame_rate_cap(fps),
            UiAction::SetFieldOfView(base) => self.mirror.set_field_of_view(base),
            UiAction::SetFieldOfViewTriple(fov) => self.mirror.set_field_of_view_triple(fov),
            UiAction::CloseOverlay => self.visible = false,
            UiAction::Retry if self.process.is_none() => self.try_attach(frame),
            UiAction::Save => {
                if let Err(e) = self.mirror.persist(&self.store) {
                    warn!("Failed to save {}: {}", self.store.path().display(), e);
                }
            }
            _ => {}
        }

        if !matches!(action, UiAction::Save) && !action.is_live() {
            return;
        }

        let Some(process) = self.process.as_ref() else {
            if action.is_live() {
                debug!("Ignoring {:?} while detached", action);
            }
            return;
        };

        let result = match action {
            UiAction::SetFullscreen(fullscreen) => self.mirror.set_fullscreen(process, fullscreen),
            UiAction::SetQuality(quality) => self.mirror.set_quality(process, quality),
            UiAction::SetAspectRatio(aspect) => self.mirror.set_aspect_ratio(process, aspect),
            UiAction::ReloadLive => self.mirror.pull_live(process),
            UiAction::Apply | UiAction::Save => self.mirror.push_live(process),
            _ => Ok(()),
        };

        if let Err(e) = result {
            warn!("Live settings access failed: {}", e);
            self.detach(frame, e.to_string());
        }
    }
}

impl<L: ProcessLocator> Drop for PerFrameDriver<L> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
