pub mod aspect;
mod mirror;
pub mod quality;

pub use aspect::{
    ASPECT_RATIOS, AspectRatio, AspectRatioIndex, nearest_index, resolve_aspect_index,
};
pub use mirror::*;
pub use quality::GraphicsQuality;
