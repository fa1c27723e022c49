pub mod config;
pub mod driver;
pub mod error;
pub mod memory;
pub mod process;
pub mod settings;

pub use config::{ConfigStore, OverlayConfig, PersistedConfig};
pub use driver::{
    AsyncKeySource, DriverState, FrameReport, FrameView, KeyEdge, KeySource, NoKeys, OverlayUi,
    PerFrameDriver, TargetInfo, UiAction,
};
pub use error::{Error, Result};
pub use memory::{Field, FieldKind, read_field, write_field};
pub use process::{
    ProcessHandle, ProcessInfo, ProcessLocator, ReadMemory, SystemLocator, TargetSpec, WriteMemory,
};
pub use settings::{
    AspectRatioIndex, BootstrapReason, FieldOfView, GraphicsQuality, LoadOutcome, SettingsMirror,
    resolve_aspect_index,
};
