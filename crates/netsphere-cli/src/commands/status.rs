//! Status command implementation.

use anyhow::Result;
use netsphere_core::config::{ConfigStore, PersistedConfig};
use netsphere_core::driver::TargetInfo;
use netsphere_core::process::TargetSpec;
use netsphere_core::settings::SettingsMirror;
use serde::Serialize;
use tracing::warn;

use crate::console::format_settings;

#[derive(Serialize)]
struct StatusInfo<'a> {
    executable: &'a str,
    target: TargetInfo,
    config_path: String,
    settings: &'a SettingsMirror,
}

/// Run the status command
///
/// Reads the settings file without bootstrapping it, then overlays the live values.
pub fn run(target: &TargetSpec, store: &ConfigStore, json: bool) -> Result<()> {
    let process = super::attach(target)?;

    let mut mirror = SettingsMirror::new();
    match store.load() {
        Ok(config) => mirror.apply_persisted(&config),
        Err(e) => {
            warn!("Failed to load {}: {}, showing defaults", store.path().display(), e);
            mirror.apply_persisted(&PersistedConfig::default());
        }
    }
    mirror.pull_live(&process)?;

    let info = TargetInfo {
        pid: process.pid,
        base_address: process.base_address,
    };

    if json {
        let status = StatusInfo {
            executable: &target.executable_name,
            target: info,
            config_path: store.path().display().to_string(),
            settings: &mirror,
        };
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!();
        println!("{}", format_settings(&mirror, &info));
        println!("  settings file: {}", store.path().display());
    }

    Ok(())
}
