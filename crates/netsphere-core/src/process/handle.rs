#![cfg_attr(not(target_os = "windows"), allow(dead_code, unused_variables))]

use crate::error::{Error, Result};
use crate::process::provider::{ProcessInfo, TargetSpec};

#[cfg(target_os = "windows")]
use tracing::warn;

#[cfg(target_os = "windows")]
use windows::Win32::Foundation::{CloseHandle, HANDLE};
#[cfg(target_os = "windows")]
use windows::Win32::System::Diagnostics::ToolHelp::{
    CreateToolhelp32Snapshot, MODULEENTRY32W, Module32FirstW, Module32NextW, PROCESSENTRY32W,
    Process32FirstW, Process32NextW, TH32CS_SNAPMODULE, TH32CS_SNAPMODULE32, TH32CS_SNAPPROCESS,
};
#[cfg(target_os = "windows")]
use windows::Win32::System::Threading::{GetExitCodeProcess, OpenProcess, PROCESS_ALL_ACCESS};

/// An opened handle to the target process.
///
/// Constructed only through [`ProcessHandle::attach`], so `base_address` is
/// never zero. The OS handle is closed when the value is dropped.
#[cfg(target_os = "windows")]
pub struct ProcessHandle {
    handle: HANDLE,
    pub pid: u32,
    pub base_address: u64,
}

#[cfg(not(target_os = "windows"))]
pub struct ProcessHandle {
    pub pid: u32,
    pub base_address: u64,
}

#[cfg(target_os = "windows")]
impl ProcessHandle {
    /// Locate the target, open it with full access and resolve its module base.
    ///
    /// Either every step succeeds or nothing stays open.
    pub fn attach(target: &TargetSpec) -> Result<Self> {
        let pid = find_process_id(&target.executable_name)?;
        tracing::debug!("Found {} with PID {}", target.executable_name, pid);

        // SAFETY: OpenProcess is called with a pid taken from a ToolHelp snapshot.
        // The returned handle is owned by this struct (or closed below on failure).
        let handle = unsafe {
            OpenProcess(PROCESS_ALL_ACCESS, false, pid).map_err(|e| {
                tracing::debug!("OpenProcess failed for PID {}: {}", pid, e);
                Error::ProcessOpenFailed(e.to_string())
            })?
        };

        // From here on the handle is closed by Drop if module lookup fails.
        let mut process = Self {
            handle,
            pid,
            base_address: 0,
        };
        process.base_address = find_module_base(pid, &target.module_name)?;
        Ok(process)
    }

    pub fn handle(&self) -> HANDLE {
        self.handle
    }

    /// Check if the process is still running
    pub fn is_alive(&self) -> bool {
        const STILL_ACTIVE: u32 = 259;

        let mut exit_code: u32 = 0;
        // SAFETY: self.handle is a live handle from OpenProcess and exit_code
        // is a valid out pointer.
        unsafe {
            if GetExitCodeProcess(self.handle, &mut exit_code).is_ok() {
                exit_code == STILL_ACTIVE
            } else {
                false
            }
        }
    }
}

#[cfg(not(target_os = "windows"))]
impl ProcessHandle {
    pub fn attach(_target: &TargetSpec) -> Result<Self> {
        Err(Error::ProcessNotFound(
            "Windows only: process access not supported on this platform".to_string(),
        ))
    }

    pub fn is_alive(&self) -> bool {
        false
    }
}

impl ProcessInfo for ProcessHandle {
    fn pid(&self) -> u32 {
        self.pid
    }

    fn is_alive(&self) -> bool {
        ProcessHandle::is_alive(self)
    }
}

#[cfg(target_os = "windows")]
impl Drop for ProcessHandle {
    fn drop(&mut self) {
        if !self.handle.is_invalid() {
            tracing::debug!("Closing handle for PID {}", self.pid);
            // SAFETY: self.handle came from OpenProcess and is closed exactly once here.
            if let Err(e) = unsafe { CloseHandle(self.handle) } {
                warn!("Failed to close process handle: {}", e);
            }
        }
    }
}

/// Strip the trailing NULs of a fixed-size UTF-16 name buffer.
fn wide_name(buffer: &[u16]) -> String {
    let len = buffer.iter().position(|&c| c == 0).unwrap_or(buffer.len());
    String::from_utf16_lossy(&buffer[..len])
}

/// Find the first running process whose executable name matches, ignoring case.
#[cfg(target_os = "windows")]
pub fn find_process_id(name: &str) -> Result<u32> {
    // SAFETY: the snapshot handle is closed before returning.
    let snapshot = unsafe {
        CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0)
            .map_err(|e| Error::ProcessNotFound(e.to_string()))?
    };

    let mut entry = PROCESSENTRY32W {
        dwSize: std::mem::size_of::<PROCESSENTRY32W>() as u32,
        ..Default::default()
    };

    let mut found = None;
    // SAFETY: valid snapshot handle and a PROCESSENTRY32W with dwSize set.
    unsafe {
        if Process32FirstW(snapshot, &mut entry).is_ok() {
            loop {
                if wide_name(&entry.szExeFile).eq_ignore_ascii_case(name) {
                    found = Some(entry.th32ProcessID);
                    break;
                }
                if Process32NextW(snapshot, &mut entry).is_err() {
                    break;
                }
            }
        }
        let _ = CloseHandle(snapshot);
    }

    found.ok_or_else(|| Error::ProcessNotFound(format!("Process '{}' not found", name)))
}

/// Resolve the load address of a module inside `pid`, ignoring case.
#[cfg(target_os = "windows")]
pub fn find_module_base(pid: u32, module_name: &str) -> Result<u64> {
    // SAFETY: the snapshot handle is closed before returning.
    let snapshot = unsafe {
        CreateToolhelp32Snapshot(TH32CS_SNAPMODULE | TH32CS_SNAPMODULE32, pid)
            .map_err(|e| Error::ModuleNotFound(format!("{} (PID {}): {}", module_name, pid, e)))?
    };

    let mut entry = MODULEENTRY32W {
        dwSize: std::mem::size_of::<MODULEENTRY32W>() as u32,
        ..Default::default()
    };

    let mut found = None;
    // SAFETY: valid snapshot handle and a MODULEENTRY32W with dwSize set.
    unsafe {
        if Module32FirstW(snapshot, &mut entry).is_ok() {
            loop {
                if wide_name(&entry.szModule).eq_ignore_ascii_case(module_name) {
                    found = Some(entry.modBaseAddr as u64);
                    break;
                }
                if Module32NextW(snapshot, &mut entry).is_err() {
                    break;
                }
            }
        }
        let _ = CloseHandle(snapshot);
    }

    match found {
        Some(base) if base != 0 => Ok(base),
        _ => Err(Error::ModuleNotFound(format!(
            "Module '{}' not found in PID {}",
            module_name, pid
        ))),
    }
}

#[cfg(not(target_os = "windows"))]
pub fn find_process_id(name: &str) -> Result<u32> {
    Err(Error::ProcessNotFound(format!(
        "Windows only: cannot enumerate processes for '{}'",
        name
    )))
}

#[cfg(not(target_os = "windows"))]
pub fn find_module_base(pid: u32, module_name: &str) -> Result<u64> {
    Err(Error::ModuleNotFound(format!(
        "Windows only: cannot enumerate modules of PID {} for '{}'",
        pid, module_name
    )))
}
