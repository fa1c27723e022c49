#![cfg_attr(not(target_os = "windows"), allow(dead_code, unused_variables))]

use crate::error::{Error, Result};
use crate::process::ProcessHandle;

#[cfg(target_os = "windows")]
use windows::Win32::System::Diagnostics::Debug::{ReadProcessMemory, WriteProcessMemory};

/// Trait for reading memory from a process or buffer
///
/// This trait enables mocking for tests and abstracts over different memory sources.
pub trait ReadMemory {
    /// Read exactly `size` bytes at `address`; a short transfer is an error.
    fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>>;

    /// Get the base address of the main module
    fn base_address(&self) -> u64;

    /// Read a pointer-width (64-bit) value
    fn read_u64(&self, address: u64) -> Result<u64> {
        let bytes = self.read_bytes(address, 8)?;
        Ok(u64::from_le_bytes([
            bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
        ]))
    }
}

/// Trait for writing memory into a process or buffer.
pub trait WriteMemory {
    /// Write all of `data` at `address`; a short transfer is an error.
    fn write_bytes(&self, address: u64, data: &[u8]) -> Result<()>;
}

#[cfg(target_os = "windows")]
impl ReadMemory for ProcessHandle {
    fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>> {
        let mut buffer = vec![0u8; size];
        let mut bytes_read = 0;

        // SAFETY: ReadProcessMemory is called with:
        // - A valid process handle obtained via OpenProcess
        // - A properly allocated buffer of the requested size
        // - A pointer to receive the actual bytes read
        // An invalid target address is reported through the Result.
        unsafe {
            ReadProcessMemory(
                self.handle(),
                address as *const _,
                buffer.as_mut_ptr() as *mut _,
                size,
                Some(&mut bytes_read),
            )
            .map_err(|e| Error::MemoryReadFailed {
                address,
                message: e.to_string(),
            })?;
        }

        if bytes_read != size {
            return Err(Error::MemoryReadFailed {
                address,
                message: format!("Expected {} bytes, read {}", size, bytes_read),
            });
        }

        Ok(buffer)
    }

    fn base_address(&self) -> u64 {
        self.base_address
    }
}

#[cfg(target_os = "windows")]
impl WriteMemory for ProcessHandle {
    fn write_bytes(&self, address: u64, data: &[u8]) -> Result<()> {
        let mut bytes_written = 0;

        // SAFETY: WriteProcessMemory reads `data.len()` bytes from a live slice and
        // writes them into the target through a handle opened with PROCESS_ALL_ACCESS.
        unsafe {
            WriteProcessMemory(
                self.handle(),
                address as *const _,
                data.as_ptr() as *const _,
                data.len(),
                Some(&mut bytes_written),
            )
            .map_err(|e| Error::MemoryWriteFailed {
                address,
                message: e.to_string(),
            })?;
        }

        if bytes_written != data.len() {
            return Err(Error::MemoryWriteFailed {
                address,
                message: format!("Expected {} bytes, wrote {}", data.len(), bytes_written),
            });
        }

        Ok(())
    }
}

#[cfg(not(target_os = "windows"))]
impl ReadMemory for ProcessHandle {
    fn read_bytes(&self, address: u64, _size: usize) -> Result<Vec<u8>> {
        Err(Error::MemoryReadFailed {
            address,
            message: "Windows only: memory reading not supported on this platform".to_string(),
        })
    }

    fn base_address(&self) -> u64 {
        self.base_address
    }
}

#[cfg(not(target_os = "windows"))]
impl WriteMemory for ProcessHandle {
    fn write_bytes(&self, address: u64, _data: &[u8]) -> Result<()> {
        Err(Error::MemoryWriteFailed {
            address,
            message: "Windows only: memory writing not supported on this platform".to_string(),
        })
    }
}
