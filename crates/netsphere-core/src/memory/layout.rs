//! Memory layout constants for the S4 League client settings structures
//!
//! Every value here is tied to one exact build of `S4Client.exe`. Nothing is
//! validated at runtime: against a different build the pointer chains still
//! resolve, but they land on unrelated data and writes corrupt it silently.
//!
//! # Pointer Chains
//!
//! Each live field is reached through two reads:
//!
//! ```text
//! module base + region offset  ->  8-byte pointer P
//! P + field offset             ->  field value
//! ```
//!
//! Only the field is ever written; the intermediate pointer is read-only.

use crate::memory::bridge::{Field, FieldDescriptor, FieldKind};

/// Base-relative pointer slots holding the settings structures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseRegion {
    /// Display and quality options.
    Settings,
    /// Camera projection parameters.
    AspectRatio,
}

impl BaseRegion {
    /// Offset of the pointer slot from the module base.
    pub const fn offset(self) -> u64 {
        match self {
            Self::Settings => region::SETTINGS,
            Self::AspectRatio => region::ASPECT_RATIO,
        }
    }
}

/// Pointer slot offsets relative to the module base
pub mod region {
    pub const SETTINGS: u64 = 0x0172_9488;
    pub const ASPECT_RATIO: u64 = 0x0172_8D60;
}

/// Memory layout of the structure behind [`region::SETTINGS`]
///
/// ```text
/// Offset   Field              Size    Description
/// ──────────────────────────────────────────────────────
/// 0x2C     Fullscreen         1       1 = fullscreen, anything else windowed
/// 0x38     GraphicsQuality    1       0 = Low, 1 = Medium, 2 = High
/// ```
pub mod settings {
    pub const FULLSCREEN: u64 = 0x2C;
    pub const GRAPHICS_QUALITY: u64 = 0x38;
}

/// Memory layout of the structure behind [`region::ASPECT_RATIO`]
///
/// ```text
/// Offset   Field              Size    Description
/// ──────────────────────────────────────────────────────
/// 0x1C     Ratio              4       width / height as f32
/// ```
pub mod aspect {
    pub const RATIO: u64 = 0x1C;
}

pub const FULLSCREEN: Field<u8> = Field::new(
    "fullscreen",
    FieldKind::Fullscreen,
    BaseRegion::Settings,
    settings::FULLSCREEN,
);

pub const GRAPHICS_QUALITY: Field<u8> = Field::new(
    "graphics_quality",
    FieldKind::GraphicsQuality,
    BaseRegion::Settings,
    settings::GRAPHICS_QUALITY,
);

// A single f32, so no tearing is possible. Any multi-word field added here
// can be observed half-written by the game's own threads.
pub const ASPECT_RATIO: Field<f32> = Field::new(
    "aspect_ratio",
    FieldKind::AspectRatio,
    BaseRegion::AspectRatio,
    aspect::RATIO,
);

/// Every live field, in display order.
pub fn descriptors() -> [FieldDescriptor; 3] {
    [
        FULLSCREEN.descriptor(),
        GRAPHICS_QUALITY.descriptor(),
        ASPECT_RATIO.descriptor(),
    ]
}
