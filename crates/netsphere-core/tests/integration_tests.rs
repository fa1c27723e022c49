//! Integration tests for netsphere-core
//!
//! These drive the public API end to end against the mock process and a
//! temporary settings file.

use netsphere_core::config::{ConfigStore, OverlayConfig, PersistedConfig};
use netsphere_core::driver::{DriverState, FrameView, NoKeys, PerFrameDriver, UiAction};
use netsphere_core::memory::layout;
use netsphere_core::process::mock::{MockLocator, MockMemoryBuilder, MockProcess};
use netsphere_core::process::{ProcessInfo, ProcessLocator, TargetSpec};
use netsphere_core::settings::{
    BootstrapReason, FieldOfView, GraphicsQuality, LoadOutcome, SettingsMirror,
    resolve_aspect_index,
};
use tempfile::TempDir;

fn game() -> MockProcess {
    MockMemoryBuilder::new()
        .base(0x140000000)
        .pid(9001)
        .game_settings(0, 2, 1.777)
        .build()
}

fn config_in(dir: &TempDir) -> OverlayConfig {
    OverlayConfig {
        config_path: dir.path().join("netsphere.json"),
        ..OverlayConfig::default()
    }
}

fn idle(_: &FrameView<'_>) -> Vec<UiAction> {
    Vec::new()
}

mod aspect_tests {
    use super::*;

    #[test]
    fn test_value_between_presets_resolves_to_5_3() {
        assert_eq!(resolve_aspect_index(1.70).get(), 3);
        assert_eq!(resolve_aspect_index(1.70).label(), "5:3");
    }
}

mod persistence_tests {
    use super::*;

    #[test]
    fn test_missing_file_bootstraps_and_writes_defaults() {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::new(dir.path().join("netsphere.json"));
        let mut mirror = SettingsMirror::new();

        let outcome = mirror.load_persisted(&store);

        assert!(matches!(
            outcome,
            LoadOutcome::Bootstrapped {
                reason: BootstrapReason::Missing,
                written: true
            }
        ));
        let written = std::fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "max_framerate": 300,
                "field_of_view": 60,
                "center_field_of_view": 66,
                "sprint_field_of_view": 80
            })
        );
    }

    #[test]
    fn test_empty_file_bootstraps() {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::new(dir.path().join("netsphere.json"));
        std::fs::write(store.path(), "").unwrap();
        let mut mirror = SettingsMirror::new();

        let outcome = mirror.load_persisted(&store);

        assert!(matches!(
            outcome,
            LoadOutcome::Bootstrapped {
                reason: BootstrapReason::Corrupt(_),
                ..
            }
        ));
        assert_eq!(store.load().unwrap(), PersistedConfig::default());
    }

    #[test]
    fn test_persist_then_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::new(dir.path().join("netsphere.json"));
        let mut mirror = SettingsMirror::new();
        mirror.set_frame_rate_cap(240);
        mirror.set_field_of_view_triple(FieldOfView {
            base: 75,
            center: 85,
            sprint: 100,
        });
        mirror.persist(&store).unwrap();

        let mut reloaded = SettingsMirror::new();
        assert_eq!(reloaded.load_persisted(&store), LoadOutcome::Loaded);

        assert_eq!(reloaded.frame_rate_cap(), 240);
        assert_eq!(reloaded.field_of_view(), mirror.field_of_view());
    }
}

mod live_tests {
    use super::*;

    #[test]
    fn test_pull_is_idempotent() {
        let process = game();
        let mut mirror = SettingsMirror::new();

        mirror.pull_live(&process).unwrap();
        let first = mirror.clone();
        mirror.pull_live(&process).unwrap();

        assert_eq!(mirror, first);
    }

    #[test]
    fn test_write_then_read_is_eventually_consistent() {
        let process = game();
        let mut mirror = SettingsMirror::new();
        mirror.pull_live(&process).unwrap();

        mirror.set_quality(&process, GraphicsQuality::Low).unwrap();
        // the game resets the value on its own thread
        let address = process
            .field_address(layout::BaseRegion::Settings, layout::settings::GRAPHICS_QUALITY)
            .unwrap();
        process.poke(address, &[2]);

        assert_eq!(mirror.quality(), GraphicsQuality::Low);
        mirror.pull_live(&process).unwrap();
        assert_eq!(mirror.quality(), GraphicsQuality::High);
    }

    #[test]
    fn test_failed_attach_leaves_existing_process_usable() {
        let process = game();
        let locator = MockLocator::with_process(process.clone());
        let attached = locator.attach(&TargetSpec::default()).unwrap();

        let missing = TargetSpec {
            executable_name: "Other.exe".to_string(),
            ..TargetSpec::default()
        };
        assert!(locator.attach(&missing).is_err());

        assert!(attached.is_alive());
        assert_eq!(layout::GRAPHICS_QUALITY.read(&attached).unwrap(), 2);
    }
}

mod driver_tests {
    use super::*;

    #[test]
    fn test_attach_converges_on_the_frame_the_game_appears() {
        let dir = TempDir::new().unwrap();
        let mut driver = PerFrameDriver::new(config_in(&dir), MockLocator::empty());

        for _ in 0..5 {
            let report = driver.on_frame(&NoKeys, &mut idle);
            assert_eq!(report.state, DriverState::Detached);
        }

        driver.locator().set_process(Some(game()));
        let report = driver.on_frame(&NoKeys, &mut idle);

        assert_eq!(report.frame, 5);
        assert_eq!(report.state, DriverState::Attached);
        assert_eq!(driver.process().map(|p| p.pid()), Some(9001));
    }

    #[test]
    fn test_game_exit_detaches_then_reattaches() {
        let dir = TempDir::new().unwrap();
        let first = game();
        let mut driver =
            PerFrameDriver::new(config_in(&dir), MockLocator::with_process(first.clone()));
        driver.on_frame(&NoKeys, &mut idle);
        assert!(driver.is_attached());

        first.kill();
        driver.locator().set_process(None);
        let report = driver.on_frame(&NoKeys, &mut idle);
        assert_eq!(report.state, DriverState::Detached);
        assert!(driver.last_error().is_some());

        driver.locator().set_process(Some(game()));
        let report = driver.on_frame(&NoKeys, &mut idle);
        assert_eq!(report.state, DriverState::Attached);
        assert!(driver.last_error().is_none());
    }

    #[test]
    fn test_failed_retry_does_not_disturb_attached_session() {
        let dir = TempDir::new().unwrap();
        let process = game();
        let mut driver =
            PerFrameDriver::new(config_in(&dir), MockLocator::with_process(process.clone()));
        driver.on_frame(&NoKeys, &mut idle);
        driver.locator().set_process(None);

        let mut retry = |_: &FrameView<'_>| vec![UiAction::Retry];
        let report = driver.on_frame(&NoKeys, &mut retry);

        assert_eq!(report.state, DriverState::Attached);
        assert_eq!(driver.locator().attempts(), 1);
    }

    #[test]
    fn test_toggle_key_flips_visibility_once_per_press() {
        let dir = TempDir::new().unwrap();
        let mut driver = PerFrameDriver::new(config_in(&dir), MockLocator::empty());
        let pressed = |vk: u16| vk == 0x2E;

        assert!(!driver.on_frame(&pressed, &mut idle).visible);
        // still held
        assert!(!driver.on_frame(&pressed, &mut idle).visible);
        assert!(!driver.on_frame(&NoKeys, &mut idle).visible);
        assert!(driver.on_frame(&pressed, &mut idle).visible);
    }

    #[test]
    fn test_settings_file_seeds_local_fields_on_attach() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        std::fs::write(
            &config.config_path,
            r#"{"max_framerate": 165, "field_of_view": 70, "center_field_of_view": 75,
                "sprint_field_of_view": 90}"#,
        )
        .unwrap();
        let mut driver = PerFrameDriver::new(config, MockLocator::with_process(game()));

        driver.on_frame(&NoKeys, &mut idle);

        assert_eq!(driver.mirror().frame_rate_cap(), 165);
        assert_eq!(
            driver.mirror().field_of_view(),
            FieldOfView {
                base: 70,
                center: 75,
                sprint: 90
            }
        );
        assert_eq!(driver.mirror().quality(), GraphicsQuality::High);
    }
}
