//! Geometric transforms and nearest-neighbor resampling.
//!
//! # Pipeline
//!
//! 1. Build a [`Transform`] from an angle and a pivot ([`build_transform`]).
//! 2. Resample a source image through it ([`resample`]). The transform is
//!    inverted once per pass and every destination pixel is mapped back into
//!    source space ([`InverseMapper`]).
//! 3. Optionally chain passes; the output of one pass is the source of the
//!    next ([`rotate_without_crop`]).
//!
//! # Coordinate System
//!
//! - Origin is the top-left pixel, x to the right, y down
//! - Angles are in degrees and are not normalized
//! - Pixels outside the source are filled with zero

mod error;
mod mapping;
mod matrix;
mod options;
mod resample;
mod rotation;

pub use error::TransformError;
pub use mapping::{map_backward, InverseMapper};
pub use matrix::{build_transform, Pivot, Transform, SINGULAR_EPSILON};
pub use options::{ExecutionStrategy, ResampleOptions, RoundingMode, SingularPolicy};
pub use resample::{resample, resample_into, source_index};
pub use rotation::{
    compute_rotated_bounds, recenter, rotate_expanded, rotate_legacy, rotate_onto_canvas,
    rotate_without_crop, rotation_about,
};
