//! Process locator abstraction for testability.
//!
//! The driver only talks to these traits, so the attach/detach state machine
//! can be exercised against [`super::mock::MockLocator`] without a running game.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::process::handle::ProcessHandle;
use crate::process::reader::{ReadMemory, WriteMemory};

/// Executable name of the supported game client.
pub const DEFAULT_EXECUTABLE: &str = "S4Client.exe";

/// Names used to find the target process and its main module.
///
/// Both are compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetSpec {
    pub executable_name: String,
    pub module_name: String,
}

impl Default for TargetSpec {
    fn default() -> Self {
        Self {
            executable_name: DEFAULT_EXECUTABLE.to_string(),
            module_name: DEFAULT_EXECUTABLE.to_string(),
        }
    }
}

/// Properties of an attached process.
///
/// The module base address lives on [`ReadMemory`], which every attached
/// process also implements.
pub trait ProcessInfo {
    /// Get the process ID.
    fn pid(&self) -> u32;

    /// Check if the process is still running.
    fn is_alive(&self) -> bool;
}

/// Finds and opens the target process.
///
/// Implementations must not retry internally; the caller owns the cadence.
pub trait ProcessLocator {
    type Process: ProcessInfo + ReadMemory + WriteMemory;

    /// Attach to the target. Fails as a unit: no partially opened process escapes.
    fn attach(&self, target: &TargetSpec) -> Result<Self::Process>;
}

/// Locator backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLocator;

impl ProcessLocator for SystemLocator {
    type Process = ProcessHandle;

    fn attach(&self, target: &TargetSpec) -> Result<Self::Process> {
        ProcessHandle::attach(target)
    }
}
