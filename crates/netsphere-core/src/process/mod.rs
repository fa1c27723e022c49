mod handle;
pub mod provider;
mod reader;

// Mock process for testing (always available for unit and integration tests)
#[doc(hidden)]
pub mod mock;

pub use handle::{ProcessHandle, find_module_base, find_process_id};
pub use provider::{DEFAULT_EXECUTABLE, ProcessInfo, ProcessLocator, SystemLocator, TargetSpec};
pub use reader::{ReadMemory, WriteMemory};

#[doc(hidden)]
pub use mock::{MockLocator, MockMemoryBuilder, MockProcess};
