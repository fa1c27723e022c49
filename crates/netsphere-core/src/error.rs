use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Process not found: {0}")]
    ProcessNotFound(String),

    #[error("Module not found: {0}")]
    ModuleNotFound(String),

    #[error("Failed to open process: {0}")]
    ProcessOpenFailed(String),

    #[error("Failed to read process memory at address {address:#x}: {message}")]
    MemoryReadFailed { address: u64, message: String },

    #[error("Failed to write process memory at address {address:#x}: {message}")]
    MemoryWriteFailed { address: u64, message: String },

    #[error("Null pointer read at address {address:#x}")]
    NullPointer { address: u64 },

    #[error("Config file not found: {0}")]
    ConfigNotFound(String),

    #[error("Config parse error: {0}")]
    ConfigParseError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Failures that leave the overlay detached and retrying every frame.
    pub fn is_attach_failure(&self) -> bool {
        matches!(
            self,
            Self::ProcessNotFound(_) | Self::ModuleNotFound(_) | Self::ProcessOpenFailed(_)
        )
    }

    /// Failures that mean the attached session is lost.
    pub fn is_memory_failure(&self) -> bool {
        matches!(
            self,
            Self::MemoryReadFailed { .. }
                | Self::MemoryWriteFailed { .. }
                | Self::NullPointer { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
