pub mod layout;
pub mod set;
pub mod status;
pub mod watch;

use anyhow::{Context, Result};
use netsphere_core::process::{ProcessHandle, ProcessLocator, SystemLocator, TargetSpec};

/// One-shot attach for commands that do not run the frame loop.
pub fn attach(target: &TargetSpec) -> Result<ProcessHandle> {
    println!("Searching for {}...", target.executable_name);
    let process = SystemLocator
        .attach(target)
        .with_context(|| format!("Is {} running?", target.executable_name))?;
    println!(
        "Found process (PID: {}, Base: 0x{:X})",
        process.pid, process.base_address
    );
    Ok(process)
}
