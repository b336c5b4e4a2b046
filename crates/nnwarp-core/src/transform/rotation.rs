//! Whole-image rotations built from one or two resampling passes.
//!
//! - [`rotate_without_crop`]: rotate about the image center onto a doubled
//!   canvas, then translate back and crop to the original size.
//! - [`rotate_expanded`]: a single pass into the bounding box of the
//!   rotated image.
//! - [`rotate_legacy`]: two passes with fixed off-center pivots, kept for
//!   byte-compatible output.
//!
//! Angles are in degrees. Image y points down, so positive angles turn the
//! content clockwise on screen.

use super::{build_transform, resample, Pivot, ResampleOptions, Transform, TransformError};
use crate::raster::RasterImage;

/// Compute the dimensions of the bounding box for a rotated image.
///
/// # Arguments
///
/// * `width` - Original image width
/// * `height` - Original image height
/// * `angle_degrees` - Rotation angle in degrees
///
/// # Returns
///
/// Tuple of (new_width, new_height). Never zero for a non-empty input.
pub fn compute_rotated_bounds(width: u32, height: u32, angle_degrees: f64) -> (u32, u32) {
    if width == 0 || height == 0 || !angle_degrees.is_finite() {
        return (width, height);
    }

    // Normalize angle to handle 360, 720, etc.
    let abs_angle = (angle_degrees % 360.0).abs();

    // Fast paths: multiples of 90 degrees
    if abs_angle < 0.001 || (360.0 - abs_angle) < 0.001 || (abs_angle - 180.0).abs() < 0.001 {
        return (width, height);
    }
    if (abs_angle - 90.0).abs() < 0.001 || (abs_angle - 270.0).abs() < 0.001 {
        return (height, width);
    }

    let angle_rad = angle_degrees.to_radians();
    let cos = angle_rad.cos().abs();
    let sin = angle_rad.sin().abs();

    let w = width as f64;
    let h = height as f64;

    // new_w = |w*cos| + |h*sin|, new_h = |w*sin| + |h*cos|
    let new_w = (w * cos + h * sin).round() as u32;
    let new_h = (w * sin + h * cos).round() as u32;

    (new_w.max(1), new_h.max(1))
}

/// Transform rotating by `angle_degrees` about `src_center` and placing that
/// point at `dst_center`.
pub fn rotation_about(angle_degrees: f64, src_center: Pivot, dst_center: Pivot) -> Transform {
    let rotate = build_transform(angle_degrees, (0.0, 0.0));
    let (rx, ry) = rotate.apply(src_center.x, src_center.y);
    build_transform(angle_degrees, (dst_center.x - rx, dst_center.y - ry))
}

/// Center of the pixel grid: `((W - 1) / 2, (H - 1) / 2)`.
fn grid_center(width: u32, height: u32) -> Pivot {
    Pivot::new((width as f64 - 1.0) / 2.0, (height as f64 - 1.0) / 2.0)
}

/// Integer offset that moves the source onto the middle of the doubled
/// canvas.
fn canvas_offset(width: u32, height: u32) -> (u32, u32) {
    (width - width / 2, height - height / 2)
}

/// First pass of [`rotate_without_crop`]: rotate about the source center
/// onto a `2W x 2H` canvas.
pub fn rotate_onto_canvas(
    source: &RasterImage,
    angle_degrees: f64,
    options: &ResampleOptions,
) -> Result<RasterImage, TransformError> {
    let (w, h) = (source.width, source.height);
    let src_center = grid_center(w, h);
    let (ox, oy) = canvas_offset(w, h);
    let canvas_center = Pivot::new(src_center.x + ox as f64, src_center.y + oy as f64);

    let t = rotation_about(angle_degrees, src_center, canvas_center);
    resample(source, &t, w.saturating_mul(2), h.saturating_mul(2), options)
}

/// Second pass of [`rotate_without_crop`]: translate the canvas back so its
/// center lands on the center of a `width x height` image.
pub fn recenter(
    canvas: &RasterImage,
    width: u32,
    height: u32,
    options: &ResampleOptions,
) -> Result<RasterImage, TransformError> {
    let (ox, oy) = canvas_offset(width, height);
    let t = build_transform(0.0, (-(ox as f64), -(oy as f64)));
    resample(canvas, &t, width, height, options)
}

/// Rotate about the image center, keeping the original dimensions.
///
/// The rotation is rendered onto a doubled canvas first so no content is
/// lost before the final crop; the second pass is an integer translation.
pub fn rotate_without_crop(
    source: &RasterImage,
    angle_degrees: f64,
    options: &ResampleOptions,
) -> Result<RasterImage, TransformError> {
    let canvas = rotate_onto_canvas(source, angle_degrees, options)?;
    recenter(&canvas, source.width, source.height, options)
}

/// Rotate about the image center onto a canvas just large enough to hold
/// the whole rotated image.
pub fn rotate_expanded(
    source: &RasterImage,
    angle_degrees: f64,
    options: &ResampleOptions,
) -> Result<RasterImage, TransformError> {
    let (dst_w, dst_h) = compute_rotated_bounds(source.width, source.height, angle_degrees);

    let src_center = grid_center(source.width, source.height);
    let dst_center = grid_center(dst_w, dst_h);

    let t = rotation_about(angle_degrees, src_center, dst_center);
    resample(source, &t, dst_w, dst_h, options)
}

/// Two-pass rotation with fixed off-center pivots.
///
/// Pass one rotates onto a `2W x 2H` canvas with the source origin placed
/// at `(W/2 + 1, H/2 + 1)`. Pass two translates by `(0, -H/2 - 4)` into a
/// `W x H` image. The result is not centered; use [`rotate_without_crop`]
/// unless byte-compatible output is needed.
pub fn rotate_legacy(
    source: &RasterImage,
    angle_degrees: f64,
    options: &ResampleOptions,
) -> Result<RasterImage, TransformError> {
    let (w, h) = (source.width, source.height);

    let first = build_transform(angle_degrees, (w / 2 + 1, h / 2 + 1));
    let canvas = resample(source, &first, w.saturating_mul(2), h.saturating_mul(2), options)?;

    let second = build_transform(0.0, (0.0, -((h / 2) as f64) - 4.0));
    resample(&canvas, &second, w, h, options)
}
