//! One-shot settings changes.

use anyhow::{Context, Result};
use netsphere_core::config::ConfigStore;
use netsphere_core::driver::TargetInfo;
use netsphere_core::process::TargetSpec;
use netsphere_core::settings::{AspectRatioIndex, GraphicsQuality, LoadOutcome, SettingsMirror};
use tracing::info;

use crate::console::format_settings;

/// Requested changes; `None` leaves a setting alone.
#[derive(Debug, Default)]
pub struct SetRequest {
    pub fullscreen: Option<bool>,
    pub quality: Option<GraphicsQuality>,
    pub aspect: Option<AspectRatioIndex>,
    pub fps: Option<i32>,
    pub fov: Option<i32>,
    pub save: bool,
}

impl SetRequest {
    fn is_empty(&self) -> bool {
        self.fullscreen.is_none()
            && self.quality.is_none()
            && self.aspect.is_none()
            && self.fps.is_none()
            && self.fov.is_none()
            && !self.save
    }
}

/// Run the set command
pub fn run(target: &TargetSpec, store: &ConfigStore, request: SetRequest) -> Result<()> {
    if request.is_empty() {
        println!("Nothing to change (see --help)");
        return Ok(());
    }

    let process = super::attach(target)?;

    let mut mirror = SettingsMirror::new();
    if let LoadOutcome::Bootstrapped { reason, written } = mirror.load_persisted(store) {
        info!("Settings file bootstrapped ({:?}, written: {})", reason, written);
    }
    mirror
        .pull_live(&process)
        .context("Failed to read the current settings")?;

    if let Some(fullscreen) = request.fullscreen {
        mirror.set_fullscreen(&process, fullscreen)?;
    }
    if let Some(quality) = request.quality {
        mirror.set_quality(&process, quality)?;
    }
    if let Some(aspect) = request.aspect {
        mirror.set_aspect_ratio(&process, aspect)?;
    }
    if let Some(fps) = request.fps {
        mirror.set_frame_rate_cap(fps);
    }
    if let Some(fov) = request.fov {
        mirror.set_field_of_view(fov);
    }

    if request.save {
        mirror
            .persist(store)
            .with_context(|| format!("Failed to save {}", store.path().display()))?;
        println!("Saved {}", store.path().display());
    } else if request.fps.is_some() || request.fov.is_some() {
        println!("Frame rate and field of view only take effect with --save");
    }

    let info = TargetInfo {
        pid: process.pid,
        base_address: process.base_address,
    };
    println!("{}", format_settings(&mirror, &info));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_request() {
        assert!(SetRequest::default().is_empty());
        assert!(
            !SetRequest {
                save: true,
                ..SetRequest::default()
            }
            .is_empty()
        );
        assert!(
            !SetRequest {
                fov: Some(90),
                ..SetRequest::default()
            }
            .is_empty()
        );
    }
}
