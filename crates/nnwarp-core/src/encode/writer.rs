//! JPEG and PNG encoding.
//!
//! Encoding uses the `image` crate's encoders. [`save_image`] picks the
//! encoder from the file extension.

use std::io::Cursor;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::ExtendedColorType;
use image::ImageFormat;
use image::ImageEncoder;
use thiserror::Error;

use crate::raster::RasterImage;

/// Errors that can occur during encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes, got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The encoder cannot store this many channels
    #[error("Unsupported channel count {channels} for {format}")]
    UnsupportedChannels { channels: usize, format: &'static str },

    /// The output path names no format, or one that cannot be written
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    /// Encoding failed
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    /// I/O error during file writing
    #[error("I/O error: {0}")]
    IoError(String),
}

/// Encode an image to JPEG bytes.
///
/// # Arguments
///
/// * `image` - Gray (1 channel) or RGB (3 channel) image
/// * `quality` - JPEG quality, clamped to 1-100
pub fn encode_jpeg(image: &RasterImage, quality: u8) -> Result<Vec<u8>, EncodeError> {
    validate(image)?;
    let color = match image.channels {
        1 => ExtendedColorType::L8,
        3 => ExtendedColorType::Rgb8,
        channels => {
            return Err(EncodeError::UnsupportedChannels {
                channels,
                format: "JPEG",
            })
        }
    };

    let quality = quality.clamp(1, 100);
    let mut buffer = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buffer, quality)
        .write_image(&image.pixels, image.width, image.height, color)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

/// Encode an image to PNG bytes. Supports 1 to 4 channels.
pub fn encode_png(image: &RasterImage) -> Result<Vec<u8>, EncodeError> {
    validate(image)?;
    let color = match image.channels {
        1 => ExtendedColorType::L8,
        2 => ExtendedColorType::La8,
        3 => ExtendedColorType::Rgb8,
        4 => ExtendedColorType::Rgba8,
        channels => {
            return Err(EncodeError::UnsupportedChannels {
                channels,
                format: "PNG",
            })
        }
    };

    let mut buffer = Cursor::new(Vec::new());
    PngEncoder::new(&mut buffer)
        .write_image(&image.pixels, image.width, image.height, color)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

/// Encode `image` and write it to `path`.
///
/// The format is chosen from the extension, case-insensitively. JPEG is
/// written with `quality`; PNG ignores it. Any other format the extension
/// names is rejected with that format in the error.
pub fn save_image(image: &RasterImage, path: impl AsRef<Path>, quality: u8) -> Result<(), EncodeError> {
    let path = path.as_ref();
    let format = ImageFormat::from_path(path)
        .map_err(|_| EncodeError::UnsupportedFormat(path.display().to_string()))?;

    let bytes = match format {
        ImageFormat::Jpeg => encode_jpeg(image, quality)?,
        ImageFormat::Png => encode_png(image)?,
        other => {
            return Err(EncodeError::UnsupportedFormat(format!(
                "{} ({other:?})",
                path.display()
            )));
        }
    };

    std::fs::write(path, &bytes)
        .map_err(|e| EncodeError::IoError(format!("{}: {}", path.display(), e)))?;
    log::debug!("wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

fn validate(image: &RasterImage) -> Result<(), EncodeError> {
    if image.width == 0 || image.height == 0 {
        return Err(EncodeError::InvalidDimensions {
            width: image.width,
            height: image.height,
        });
    }
    if !image.is_consistent() {
        return Err(EncodeError::InvalidPixelData {
            expected: image.expected_len(),
            actual: image.pixels.len(),
        });
    }
    Ok(())
}
