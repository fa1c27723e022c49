//! Mock target process for testing
//!
//! Provides a sparse, byte-addressed address space implementing
//! [`ReadMemory`] and [`WriteMemory`]. Clones share the same memory, so a test
//! can hold one clone as "the game" (mutating values, exiting) while the
//! driver owns another.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashSet};
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::memory::layout::{self, BaseRegion};
use crate::process::provider::{ProcessInfo, ProcessLocator, TargetSpec};
use crate::process::{ReadMemory, WriteMemory};

#[derive(Debug)]
struct MockState {
    memory: BTreeMap<u64, u8>,
    alive: bool,
    failing: HashSet<u64>,
    writes: usize,
}

/// Mock process
///
/// Only explicitly written addresses are mapped; touching anything else fails
/// like a read of an unmapped page would.
#[derive(Debug, Clone)]
pub struct MockProcess {
    pid: u32,
    base: u64,
    executable_name: String,
    module_name: String,
    state: Rc<RefCell<MockState>>,
}

impl MockProcess {
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Simulate the game exiting: every later access fails.
    pub fn kill(&self) {
        self.state.borrow_mut().alive = false;
    }

    /// Make accesses touching `address` fail while the process stays alive.
    pub fn fail_at(&self, address: u64) {
        self.state.borrow_mut().failing.insert(address);
    }

    pub fn clear_failures(&self) {
        self.state.borrow_mut().failing.clear();
    }

    /// Change memory behind the overlay's back, as the game itself would.
    pub fn poke(&self, address: u64, bytes: &[u8]) {
        let mut state = self.state.borrow_mut();
        for (i, byte) in bytes.iter().enumerate() {
            state.memory.insert(address + i as u64, *byte);
        }
    }

    /// Inspect memory without going through the failure rules.
    pub fn peek(&self, address: u64, size: usize) -> Option<Vec<u8>> {
        let state = self.state.borrow();
        (0..size as u64)
            .map(|i| state.memory.get(&(address + i)).copied())
            .collect()
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.state.borrow().writes
    }

    /// Address of a live field after following its pointer slot.
    pub fn field_address(&self, region: BaseRegion, sub_offset: u64) -> Option<u64> {
        let slot = self.peek(self.base + region.offset(), 8)?;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(&slot);
        Some(u64::from_le_bytes(raw) + sub_offset)
    }

    fn check(
        &self,
        state: &MockState,
        address: u64,
        size: usize,
    ) -> std::result::Result<(), String> {
        if !state.alive {
            return Err("Process has exited".to_string());
        }
        let end = address + size as u64;
        if state.failing.iter().any(|&a| a >= address && a < end) {
            return Err(format!("Injected failure in 0x{:X}..0x{:X}", address, end));
        }
        if (address..end).any(|a| !state.memory.contains_key(&a)) {
            return Err(format!("Unmapped memory in 0x{:X}..0x{:X}", address, end));
        }
        Ok(())
    }
}

impl ProcessInfo for MockProcess {
    fn pid(&self) -> u32 {
        self.pid
    }

    fn is_alive(&self) -> bool {
        self.state.borrow().alive
    }
}

impl ReadMemory for MockProcess {
    fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>> {
        let state = self.state.borrow();
        self.check(&state, address, size)
            .map_err(|message| Error::MemoryReadFailed { address, message })?;
        Ok((0..size as u64)
            .map(|i| state.memory[&(address + i)])
            .collect())
    }

    fn base_address(&self) -> u64 {
        self.base
    }
}

impl WriteMemory for MockProcess {
    fn write_bytes(&self, address: u64, data: &[u8]) -> Result<()> {
        let mut state = self.state.borrow_mut();
        self.check(&state, address, data.len())
            .map_err(|message| Error::MemoryWriteFailed { address, message })?;
        for (i, byte) in data.iter().enumerate() {
            state.memory.insert(address + i as u64, *byte);
        }
        state.writes += 1;
        Ok(())
    }
}

/// Builder for mock process memory
///
/// Offsets passed to the `write_*` methods are relative to the module base;
/// `write_at*` take absolute addresses.
#[derive(Debug, Clone)]
pub struct MockMemoryBuilder {
    memory: BTreeMap<u64, u8>,
    base: u64,
    pid: u32,
    executable_name: String,
}

impl Default for MockMemoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMemoryBuilder {
    /// Create a new builder with default base address (0x1000)
    pub fn new() -> Self {
        Self {
            memory: BTreeMap::new(),
            base: 0x1000,
            pid: 4242,
            executable_name: TargetSpec::default().executable_name,
        }
    }

    pub fn base(mut self, base: u64) -> Self {
        self.base = base;
        self
    }

    pub fn pid(mut self, pid: u32) -> Self {
        self.pid = pid;
        self
    }

    /// Name reported for both the executable and its main module.
    pub fn executable_name(mut self, name: &str) -> Self {
        self.executable_name = name.to_string();
        self
    }

    /// Map `size` zero bytes starting at the base
    pub fn with_size(self, size: usize) -> Self {
        let base = self.base;
        self.write_at(base, &vec![0; size])
    }

    pub fn write_u8(self, offset: u64, value: u8) -> Self {
        let base = self.base;
        self.write_at(base + offset, &[value])
    }

    pub fn write_u64(self, offset: u64, value: u64) -> Self {
        let base = self.base;
        self.write_at(base + offset, &value.to_le_bytes())
    }

    pub fn write_at_u64(self, address: u64, value: u64) -> Self {
        self.write_at(address, &value.to_le_bytes())
    }

    pub fn write_at(mut self, address: u64, bytes: &[u8]) -> Self {
        for (i, byte) in bytes.iter().enumerate() {
            self.memory.insert(address + i as u64, *byte);
        }
        self
    }

    /// Lay out both settings structures with the given raw values.
    ///
    /// The settings structure lives at `0x2000_0000` and the camera structure
    /// at `0x3000_0000`.
    pub fn game_settings(self, fullscreen: u8, quality: u8, aspect_ratio: f32) -> Self {
        const SETTINGS_STRUCT: u64 = 0x2000_0000;
        const CAMERA_STRUCT: u64 = 0x3000_0000;

        let base = self.base;
        self.write_at_u64(base + layout::region::SETTINGS, SETTINGS_STRUCT)
            .write_at_u64(base + layout::region::ASPECT_RATIO, CAMERA_STRUCT)
            .write_at(SETTINGS_STRUCT + layout::settings::FULLSCREEN, &[fullscreen])
            .write_at(
                SETTINGS_STRUCT + layout::settings::GRAPHICS_QUALITY,
                &[quality],
            )
            .write_at(
                CAMERA_STRUCT + layout::aspect::RATIO,
                &aspect_ratio.to_le_bytes(),
            )
    }

    pub fn build(self) -> MockProcess {
        MockProcess {
            pid: self.pid,
            base: self.base,
            module_name: self.executable_name.clone(),
            executable_name: self.executable_name,
            state: Rc::new(RefCell::new(MockState {
                memory: self.memory,
                alive: true,
                failing: HashSet::new(),
                writes: 0,
            })),
        }
    }
}

/// Locator that hands out clones of a configurable mock process.
#[derive(Debug, Default)]
pub struct MockLocator {
    process: RefCell<Option<MockProcess>>,
    attempts: Cell<u32>,
}

impl MockLocator {
    /// A locator whose target is not running yet.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_process(process: MockProcess) -> Self {
        let locator = Self::default();
        locator.set_process(Some(process));
        locator
    }

    /// Start (`Some`) or remove (`None`) the target.
    pub fn set_process(&self, process: Option<MockProcess>) {
        *self.process.borrow_mut() = process;
    }

    /// Number of attach calls so far, successful or not.
    pub fn attempts(&self) -> u32 {
        self.attempts.get()
    }
}

impl ProcessLocator for MockLocator {
    type Process = MockProcess;

    fn attach(&self, target: &TargetSpec) -> Result<Self::Process> {
        self.attempts.set(self.attempts.get() + 1);

        let process = self.process.borrow();
        let process = process
            .as_ref()
            .filter(|p| p.is_alive())
            .filter(|p| p.executable_name.eq_ignore_ascii_case(&target.executable_name))
            .ok_or_else(|| {
                Error::ProcessNotFound(format!("Process '{}' not found", target.executable_name))
            })?;

        if !process.module_name.eq_ignore_ascii_case(&target.module_name) {
            return Err(Error::ModuleNotFound(format!(
                "Module '{}' not found in PID {}",
                target.module_name, process.pid
            )));
        }

        Ok(process.clone())
    }
}
