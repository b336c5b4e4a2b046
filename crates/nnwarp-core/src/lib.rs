//! nnwarp Core - nearest-neighbor image rotation
//!
//! This crate rotates and translates raster images by inverse mapping every
//! destination pixel through a 3x3 homogeneous transform and copying the
//! nearest source pixel. Loading and writing image files are thin wrappers
//! around the `image` crate.

pub mod decode;
pub mod encode;
pub mod raster;
pub mod transform;

pub use raster::RasterImage;
pub use transform::{
    build_transform, map_backward, resample, resample_into, rotate_expanded, rotate_legacy,
    rotate_without_crop, ExecutionStrategy, InverseMapper, Pivot, ResampleOptions, RoundingMode,
    SingularPolicy, Transform, TransformError,
};
