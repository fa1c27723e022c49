//! In-overlay cache of the game's settings.
//!
//! Three fields are live-backed (mirrored into the game's memory); the frame
//! rate cap and field of view only exist in the persisted document.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::config::{ConfigStore, PersistedConfig};
use crate::error::{Error, Result};
use crate::memory::layout;
use crate::process::{ReadMemory, WriteMemory};
use crate::settings::aspect::{AspectRatioIndex, resolve_aspect_index};
use crate::settings::quality::GraphicsQuality;

pub const MIN_FRAME_RATE_CAP: i32 = 30;
pub const MAX_FRAME_RATE_CAP: i32 = 1000;
pub const MIN_FIELD_OF_VIEW: i32 = 50;
pub const MAX_FIELD_OF_VIEW: i32 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOfView {
    pub base: i32,
    pub center: i32,
    pub sprint: i32,
}

impl Default for FieldOfView {
    fn default() -> Self {
        Self {
            base: 60,
            center: 66,
            sprint: 80,
        }
    }
}

impl FieldOfView {
    /// All three angles set to the same value.
    pub fn linked(value: i32) -> Self {
        Self {
            base: value,
            center: value,
            sprint: value,
        }
    }

    fn clamped(self) -> Self {
        let clamp = |v: i32| v.clamp(MIN_FIELD_OF_VIEW, MAX_FIELD_OF_VIEW);
        Self {
            base: clamp(self.base),
            center: clamp(self.center),
            sprint: clamp(self.sprint),
        }
    }
}

/// Why the persisted document was replaced by defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapReason {
    Missing,
    Corrupt(String),
    Unreadable(String),
}

/// Result of [`SettingsMirror::load_persisted`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    /// Defaults were applied; `written` tells whether they reached the disk.
    Bootstrapped {
        reason: BootstrapReason,
        written: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingsMirror {
    fullscreen: bool,
    quality: GraphicsQuality,
    aspect_ratio: AspectRatioIndex,
    frame_rate_cap: i32,
    field_of_view: FieldOfView,
    #[serde(skip)]
    unknown_keys: Map<String, Value>,
}

impl Default for SettingsMirror {
    fn default() -> Self {
        let persisted = PersistedConfig::default();
        Self {
            fullscreen: false,
            quality: GraphicsQuality::High,
            aspect_ratio: AspectRatioIndex::default(),
            frame_rate_cap: persisted.max_framerate,
            field_of_view: FieldOfView {
                base: persisted.field_of_view,
                center: persisted.center_field_of_view,
                sprint: persisted.sprint_field_of_view,
            },
            unknown_keys: Map::new(),
        }
    }
}

impl SettingsMirror {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn quality(&self) -> GraphicsQuality {
        self.quality
    }

    pub fn aspect_ratio(&self) -> AspectRatioIndex {
        self.aspect_ratio
    }

    pub fn frame_rate_cap(&self) -> i32 {
        self.frame_rate_cap
    }

    pub fn field_of_view(&self) -> FieldOfView {
        self.field_of_view
    }

    /// Take values from a parsed document.
    ///
    /// Stored live-field values are applied when valid; they are overwritten
    /// by the next live pull anyway.
    pub fn apply_persisted(&mut self, config: &PersistedConfig) {
        self.frame_rate_cap = config.max_framerate;
        self.field_of_view = FieldOfView {
            base: config.field_of_view,
            center: config.center_field_of_view,
            sprint: config.sprint_field_of_view,
        };

        if let Some(mode) = config.display_mode {
            self.fullscreen = mode == 1;
        }
        if let Some(raw) = config.graphic_quality {
            match u8::try_from(raw).ok().map(GraphicsQuality::try_from) {
                Some(Ok(quality)) => self.quality = quality,
                _ => warn!("Ignoring persisted graphics quality {}", raw),
            }
        }
        if let Some(index) = config.aspect_ratio {
            match usize::try_from(index).ok().and_then(AspectRatioIndex::new) {
                Some(aspect) => self.aspect_ratio = aspect,
                None => warn!("Ignoring persisted aspect ratio index {}", index),
            }
        }
        self.unknown_keys = config.extra.clone();
    }

    /// Full document for this mirror, live fields included.
    pub fn to_persisted(&self) -> PersistedConfig {
        PersistedConfig {
            max_framerate: self.frame_rate_cap,
            field_of_view: self.field_of_view.base,
            center_field_of_view: self.field_of_view.center,
            sprint_field_of_view: self.field_of_view.sprint,
            display_mode: Some(i32::from(self.fullscreen)),
            graphic_quality: Some(i32::from(self.quality.as_raw())),
            aspect_ratio: i32::try_from(self.aspect_ratio.get()).ok(),
            extra: self.unknown_keys.clone(),
        }
    }

    /// Load the settings document, bootstrapping defaults when it is unusable.
    ///
    /// Never fails: a missing, unreadable or corrupt file resets the
    /// persisted-only fields to defaults and rewrites the default document.
    pub fn load_persisted(&mut self, store: &ConfigStore) -> LoadOutcome {
        let error = match store.load() {
            Ok(config) => {
                debug!("Loaded settings from {}", store.path().display());
                self.apply_persisted(&config);
                return LoadOutcome::Loaded;
            }
            Err(e) => e,
        };

        let reason = match error {
            Error::ConfigNotFound(_) => {
                info!(
                    "No settings file at {}, creating defaults",
                    store.path().display()
                );
                BootstrapReason::Missing
            }
            Error::ConfigParseError(message) => {
                warn!(
                    "Settings file {} is corrupt ({}), resetting to defaults",
                    store.path().display(),
                    message
                );
                BootstrapReason::Corrupt(message)
            }
            other => {
                warn!(
                    "Failed to read settings file {}: {}",
                    store.path().display(),
                    other
                );
                BootstrapReason::Unreadable(other.to_string())
            }
        };

        let defaults = PersistedConfig::default();
        self.apply_persisted(&defaults);

        let written = match store.save(&defaults) {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    "Failed to write default settings to {}: {}",
                    store.path().display(),
                    e
                );
                false
            }
        };

        LoadOutcome::Bootstrapped { reason, written }
    }

    /// Write the whole mirror to the settings document.
    pub fn persist(&self, store: &ConfigStore) -> Result<()> {
        store.save(&self.to_persisted())?;
        debug!("Saved settings to {}", store.path().display());
        Ok(())
    }

    /// Refresh the live-backed fields from the game.
    ///
    /// All three values are read before any is committed, so a failure leaves
    /// the mirror exactly as it was.
    pub fn pull_live<M: ReadMemory + ?Sized>(&mut self, mem: &M) -> Result<()> {
        let fullscreen = layout::FULLSCREEN.read(mem)? == 1;
        let quality = GraphicsQuality::from_live(layout::GRAPHICS_QUALITY.read(mem)?);
        let ratio = layout::ASPECT_RATIO.read(mem)?;
        let aspect_ratio = resolve_aspect_index(ratio);

        debug!(
            "Live settings: fullscreen={}, quality={}, aspect={} (raw {:.3})",
            fullscreen, quality, aspect_ratio, ratio
        );

        self.fullscreen = fullscreen;
        self.quality = quality;
        self.aspect_ratio = aspect_ratio;
        Ok(())
    }

    /// Write all three live-backed fields to the game.
    pub fn push_live<M: ReadMemory + WriteMemory + ?Sized>(&self, mem: &M) -> Result<()> {
        layout::FULLSCREEN.write(mem, u8::from(self.fullscreen))?;
        layout::GRAPHICS_QUALITY.write(mem, self.quality.as_raw())?;
        layout::ASPECT_RATIO.write(mem, self.aspect_ratio.value())
    }

    // The live setters keep the new value even when the write fails: the
    // mirror shows what the user asked for, the caller decides about the session.

    pub fn set_fullscreen<M>(&mut self, mem: &M, fullscreen: bool) -> Result<()>
    where
        M: ReadMemory + WriteMemory + ?Sized,
    {
        self.fullscreen = fullscreen;
        layout::FULLSCREEN.write(mem, u8::from(fullscreen))
    }

    pub fn set_quality<M>(&mut self, mem: &M, quality: GraphicsQuality) -> Result<()>
    where
        M: ReadMemory + WriteMemory + ?Sized,
    {
        self.quality = quality;
        layout::GRAPHICS_QUALITY.write(mem, quality.as_raw())
    }

    pub fn set_aspect_ratio<M>(&mut self, mem: &M, aspect_ratio: AspectRatioIndex) -> Result<()>
    where
        M: ReadMemory + WriteMemory + ?Sized,
    {
        self.aspect_ratio = aspect_ratio;
        layout::ASPECT_RATIO.write(mem, aspect_ratio.value())
    }

    pub fn set_frame_rate_cap(&mut self, fps: i32) {
        self.frame_rate_cap = fps.clamp(MIN_FRAME_RATE_CAP, MAX_FRAME_RATE_CAP);
    }

    /// Set the base angle and move center and sprint along with it.
    pub fn set_field_of_view(&mut self, base: i32) {
        self.field_of_view = FieldOfView::linked(base).clamped();
    }

    pub fn set_field_of_view_triple(&mut self, field_of_view: FieldOfView) {
        self.field_of_view = field_of_view.clamped();
    }
}
