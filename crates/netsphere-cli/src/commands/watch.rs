//! Watch mode: drives the per-frame state machine from a timer.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use netsphere_core::config::OverlayConfig;
use netsphere_core::driver::{AsyncKeySource, DriverState, PerFrameDriver};
use netsphere_core::process::SystemLocator;
use tracing::{debug, info};

use crate::console::ConsoleUi;
use crate::shutdown::ShutdownSignal;

/// Run the watch loop until Ctrl+C
pub fn run(config: OverlayConfig, interval_ms: u64, attach_every: u32) -> Result<()> {
    let shutdown = setup_shutdown_handler()?;
    let tick = Duration::from_millis(interval_ms.max(1));

    let config = OverlayConfig {
        attach_interval_frames: attach_every,
        ..config
    };
    let toggle_key = config.toggle_key;
    let mut driver = PerFrameDriver::new(config, SystemLocator);
    let mut ui = ConsoleUi::new(driver.store());
    let keys = AsyncKeySource;

    println!(
        "Waiting for {}... (Ctrl+C to quit, key 0x{:02X} toggles the panel)",
        driver.config().target.executable_name,
        toggle_key
    );

    let mut last_state = driver.state();
    while !shutdown.is_shutdown() {
        let report = driver.on_frame(&keys, &mut ui);
        if report.state != last_state {
            info!("State changed: {} -> {}", last_state, report.state);
            last_state = report.state;
        }
        if report.attach_attempts > 0 && report.state == DriverState::Detached {
            debug!("Attach attempt on tick {} failed", report.frame);
        }

        if shutdown.wait(tick) {
            break;
        }
    }

    driver.shutdown();
    println!("Shutdown complete.");
    Ok(())
}

fn setup_shutdown_handler() -> Result<Arc<ShutdownSignal>> {
    let shutdown = Arc::new(ShutdownSignal::new());

    let shutdown_ctrlc = Arc::clone(&shutdown);
    ctrlc::set_handler(move || {
        println!("\nShutting down...");
        shutdown_ctrlc.trigger();
    })?;

    println!("Netsphere v{}", env!("CARGO_PKG_VERSION"));
    Ok(shutdown)
}
