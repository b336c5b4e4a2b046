//! Nearest-neighbor resampling through an inverse-mapped transform.
//!
//! For every destination pixel the source coordinate is computed with the
//! inverse transform, snapped to the nearest source pixel, and copied. Pixels
//! that land outside the source are filled with zero in every channel. There
//! is no wrapping, clamping, or extrapolation at the border.
//!
//! Destination rows are independent, so rows are distributed across rayon
//! workers. The source is only read; each worker writes a disjoint row.

use rayon::prelude::*;

use super::{ExecutionStrategy, InverseMapper, ResampleOptions, RoundingMode, Transform, TransformError};
use crate::raster::RasterImage;

/// Resample `source` through `transform` into a new `dest_width x dest_height`
/// image with the same channel count.
///
/// # Errors
///
/// Returns `TransformError::InvalidBuffer` or `TransformError::InvalidChannels`
/// if `source` is malformed, `TransformError::InvalidTransform` for a
/// singular transform under `SingularPolicy::Reject`, and thread pool errors
/// from `ExecutionStrategy::Fixed`.
pub fn resample(
    source: &RasterImage,
    transform: &Transform,
    dest_width: u32,
    dest_height: u32,
    options: &ResampleOptions,
) -> Result<RasterImage, TransformError> {
    validate(source)?;
    let mut dest = RasterImage::zeros(dest_width, dest_height, source.channels);
    resample_into(source, transform, &mut dest, options)?;
    Ok(dest)
}

/// Resample `source` through `transform`, overwriting every pixel of `dest`.
///
/// The destination keeps its dimensions; its channel count must match the
/// source.
pub fn resample_into(
    source: &RasterImage,
    transform: &Transform,
    dest: &mut RasterImage,
    options: &ResampleOptions,
) -> Result<(), TransformError> {
    validate(source)?;
    validate(dest)?;
    if source.channels != dest.channels {
        return Err(TransformError::ChannelMismatch {
            source_channels: source.channels,
            dest_channels: dest.channels,
        });
    }
    if let ExecutionStrategy::Fixed(0) = options.execution {
        return Err(TransformError::InvalidThreadCount(0));
    }

    // Inverted exactly once per pass.
    let mapper = InverseMapper::new(transform, options.singular)?;

    log::debug!(
        "resampling {}x{} -> {}x{} ({} channels, {:?})",
        source.width,
        source.height,
        dest.width,
        dest.height,
        source.channels,
        options.execution
    );

    if dest.is_empty() {
        return Ok(());
    }

    let stride = dest.row_stride();
    let rounding = options.rounding;
    let fill = |(row, out): (usize, &mut [u8])| {
        resample_row(source, &mapper, rounding, row as u32, out);
    };

    match options.execution {
        ExecutionStrategy::Serial => {
            dest.pixels.chunks_exact_mut(stride).enumerate().for_each(fill);
        }
        ExecutionStrategy::ParallelRows => {
            dest.pixels
                .par_chunks_exact_mut(stride)
                .enumerate()
                .for_each(fill);
        }
        ExecutionStrategy::Fixed(n) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| TransformError::ThreadPool(e.to_string()))?;
            pool.install(|| {
                dest.pixels
                    .par_chunks_exact_mut(stride)
                    .enumerate()
                    .for_each(fill);
            });
        }
    }

    Ok(())
}

/// Source pixel index for destination pixel `(col, row)`, or `None` if it
/// falls outside the source.
#[inline]
pub fn source_index(
    source: &RasterImage,
    mapper: &InverseMapper,
    rounding: RoundingMode,
    col: u32,
    row: u32,
) -> Option<(u32, u32)> {
    let (sx, sy) = mapper.map(col as f64, row as f64);
    let xi = rounding.round(sx)?;
    let yi = rounding.round(sy)?;
    if xi >= 0 && xi < source.width as i64 && yi >= 0 && yi < source.height as i64 {
        Some((xi as u32, yi as u32))
    } else {
        None
    }
}

fn resample_row(
    source: &RasterImage,
    mapper: &InverseMapper,
    rounding: RoundingMode,
    row: u32,
    out: &mut [u8],
) {
    let channels = source.channels;
    for (col, dst_px) in out.chunks_exact_mut(channels).enumerate() {
        match source_index(source, mapper, rounding, col as u32, row) {
            Some((x, y)) => {
                let idx = (y as usize * source.width as usize + x as usize) * channels;
                dst_px.copy_from_slice(&source.pixels[idx..idx + channels]);
            }
            None => dst_px.fill(0),
        }
    }
}

fn validate(image: &RasterImage) -> Result<(), TransformError> {
    if image.channels == 0 {
        return Err(TransformError::InvalidChannels(0));
    }
    if !image.is_consistent() {
        return Err(TransformError::InvalidBuffer {
            expected: image.expected_len(),
            actual: image.pixels.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{build_transform, SingularPolicy};

    const R: [u8; 3] = [255, 0, 0];
    const G: [u8; 3] = [0, 255, 0];
    const B: [u8; 3] = [0, 0, 255];
    const W: [u8; 3] = [255, 255, 255];

    /// Create a test image where each pixel has a unique value based on position.
    fn test_image(width: u32, height: u32) -> RasterImage {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(((y * width + x) % 251) as u8 + 1);
                pixels.push((x % 256) as u8);
                pixels.push((y % 256) as u8);
            }
        }
        RasterImage::new(width, height, 3, pixels)
    }

    fn corners() -> RasterImage {
        RasterImage::new(2, 2, 3, [R, G, B, W].concat())
    }

    #[test]
    fn test_identity_reproduces_source() {
        let img = test_image(17, 9);
        let t = build_transform(0.0, (0, 0));
        let out = resample(&img, &t, 17, 9, &ResampleOptions::default()).unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn test_integer_translation_shifts() {
        let img = test_image(8, 6);
        let t = build_transform(0.0, (2, 1));
        let out = resample(&img, &t, 8, 6, &ResampleOptions::default()).unwrap();

        for y in 0..6 {
            for x in 0..8 {
                let expected = if x >= 2 && y >= 1 {
                    img.pixel(x - 2, y - 1).unwrap().to_vec()
                } else {
                    vec![0, 0, 0]
                };
                assert_eq!(out.pixel(x, y).unwrap(), &expected[..], "at ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_quarter_turn_of_corners() {
        // dst = R(90) * src + (1, 0): (x, y) -> (1 - y, x).
        let t = build_transform(90.0, (1, 0));
        let out = resample(&corners(), &t, 2, 2, &ResampleOptions::default()).unwrap();

        assert_eq!(out.pixel(0, 0).unwrap(), &B);
        assert_eq!(out.pixel(1, 0).unwrap(), &R);
        assert_eq!(out.pixel(0, 1).unwrap(), &W);
        assert_eq!(out.pixel(1, 1).unwrap(), &G);
    }

    #[test]
    fn test_quarter_turn_about_unit_pivot() {
        // Destination (0, 0) maps back to (-1, 1), outside the 2x2 source.
        let t = build_transform(90.0, (1, 1));
        let out = resample(&corners(), &t, 2, 2, &ResampleOptions::default()).unwrap();

        assert_eq!(out.pixel(0, 0).unwrap(), &[0, 0, 0]);
        // (1, 1) maps back to (0, 0).
        assert_eq!(out.pixel(1, 1).unwrap(), &R);
        // (1, 0) maps back to (-1, 0): outside.
        assert_eq!(out.pixel(1, 0).unwrap(), &[0, 0, 0]);
        // (0, 1) maps back to (0, 1).
        assert_eq!(out.pixel(0, 1).unwrap(), &B);
    }

    #[test]
    fn test_destination_size_is_respected() {
        let img = test_image(4, 4);
        let t = build_transform(0.0, (0, 0));
        let out = resample(&img, &t, 6, 2, &ResampleOptions::default()).unwrap();

        assert_eq!((out.width, out.height, out.channels), (6, 2, 3));
        assert_eq!(out.pixel(3, 1).unwrap(), img.pixel(3, 1).unwrap());
        assert_eq!(out.pixel(4, 0).unwrap(), &[0, 0, 0]);
        assert_eq!(out.pixel(5, 1).unwrap(), &[0, 0, 0]);
    }

    #[test]
    fn test_single_channel() {
        let img = RasterImage::new(3, 1, 1, vec![10, 20, 30]);
        let t = build_transform(180.0, (2, 0));
        let out = resample(&img, &t, 3, 1, &ResampleOptions::default()).unwrap();
        assert_eq!(out.pixels, vec![30, 20, 10]);
    }

    #[test]
    fn test_zero_sized_source_gives_background() {
        let img = RasterImage::zeros(0, 0, 3);
        let t = build_transform(30.0, (1, 1));
        let out = resample(&img, &t, 4, 3, &ResampleOptions::default()).unwrap();
        assert_eq!(out.byte_size(), 4 * 3 * 3);
        assert!(out.pixels.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_zero_sized_destination() {
        let img = test_image(4, 4);
        let t = build_transform(30.0, (1, 1));
        let out = resample(&img, &t, 0, 5, &ResampleOptions::default()).unwrap();
        assert!(out.is_empty());
        assert_eq!(out.height, 5);
    }

    #[test]
    fn test_singular_fail_soft_is_all_background() {
        let img = test_image(5, 5);
        let t = Transform::from_matrix([[0.0; 3]; 3]);
        let out = resample(&img, &t, 5, 5, &ResampleOptions::default()).unwrap();
        assert!(out.pixels.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_singular_reject() {
        let img = test_image(5, 5);
        let t = Transform::from_matrix([[0.0; 3]; 3]);
        let opts = ResampleOptions::new().with_singular(SingularPolicy::Reject);
        assert!(matches!(
            resample(&img, &t, 5, 5, &opts),
            Err(TransformError::InvalidTransform { .. })
        ));
    }

    #[test]
    fn test_nan_angle_is_all_background() {
        let img = test_image(5, 5);
        let t = build_transform(f64::NAN, (0, 0));
        let out = resample(&img, &t, 5, 5, &ResampleOptions::default()).unwrap();
        assert!(out.pixels.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_invalid_buffer_rejected() {
        let img = RasterImage {
            width: 3,
            height: 3,
            channels: 3,
            pixels: vec![0u8; 10],
        };
        let t = Transform::identity();
        assert_eq!(
            resample(&img, &t, 3, 3, &ResampleOptions::default()),
            Err(TransformError::InvalidBuffer {
                expected: 27,
                actual: 10
            })
        );
    }

    #[test]
    fn test_zero_channels_rejected() {
        let img = RasterImage {
            width: 0,
            height: 0,
            channels: 0,
            pixels: vec![],
        };
        assert_eq!(
            resample(&img, &Transform::identity(), 1, 1, &ResampleOptions::default()),
            Err(TransformError::InvalidChannels(0))
        );
    }

    #[test]
    fn test_channel_mismatch_rejected() {
        let img = test_image(2, 2);
        let mut dest = RasterImage::zeros(2, 2, 4);
        let result = resample_into(&img, &Transform::identity(), &mut dest, &ResampleOptions::default());
        assert_eq!(
            result,
            Err(TransformError::ChannelMismatch {
                source_channels: 3,
                dest_channels: 4
            })
        );
    }

    #[test]
    fn test_resample_into_overwrites() {
        let img = test_image(3, 3);
        let mut dest = RasterImage::new(3, 3, 3, vec![99u8; 27]);
        let t = build_transform(0.0, (1, 0));
        resample_into(&img, &t, &mut dest, &ResampleOptions::default()).unwrap();

        assert_eq!(dest.pixel(0, 0).unwrap(), &[0, 0, 0]);
        assert_eq!(dest.pixel(1, 2).unwrap(), img.pixel(0, 2).unwrap());
        assert!(!dest.pixels.contains(&99));
    }

    #[test]
    fn test_fixed_zero_threads_rejected() {
        let img = test_image(3, 3);
        let opts = ResampleOptions::new().with_execution(ExecutionStrategy::Fixed(0));
        assert_eq!(
            resample(&img, &Transform::identity(), 3, 3, &opts),
            Err(TransformError::InvalidThreadCount(0))
        );
    }

    #[test]
    fn test_strategies_are_bit_identical() {
        let img = test_image(31, 23);
        let t = build_transform(27.5, (10.0, -3.0));
        let run = |execution| {
            let opts = ResampleOptions::new().with_execution(execution);
            resample(&img, &t, 40, 35, &opts).unwrap()
        };

        let serial = run(ExecutionStrategy::Serial);
        assert_eq!(serial, run(ExecutionStrategy::ParallelRows));
        assert_eq!(serial, run(ExecutionStrategy::Fixed(3)));
    }

    #[test]
    fn test_repeat_is_deterministic() {
        let img = test_image(20, 20);
        let t = build_transform(-61.0, (4, 18));
        let opts = ResampleOptions::default();
        let a = resample(&img, &t, 25, 25, &opts).unwrap();
        let b = resample(&img, &t, 25, 25, &opts).unwrap();
        assert_eq!(a.pixels, b.pixels);
    }

    #[test]
    fn test_truncating_rounding_bleeds_first_column() {
        // Destination column 0 maps to source x = -0.7.
        let img = test_image(4, 1);
        let t = build_transform(0.0, (0.7, 0.0));

        let nearest = resample(&img, &t, 4, 1, &ResampleOptions::default()).unwrap();
        assert_eq!(nearest.pixel(0, 0).unwrap(), &[0, 0, 0]);

        let opts = ResampleOptions::new().with_rounding(RoundingMode::TruncateHalfUp);
        let legacy = resample(&img, &t, 4, 1, &opts).unwrap();
        assert_eq!(legacy.pixel(0, 0).unwrap(), img.pixel(0, 0).unwrap());
    }
}
