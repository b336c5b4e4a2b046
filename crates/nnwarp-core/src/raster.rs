//! Row-major interleaved pixel buffer shared by the loader, the resampler and
//! the writer.

/// A raster image with interleaved 8-bit channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Number of channels per pixel (3 for RGB).
    pub channels: usize,
    /// Pixel data in row-major order.
    /// Length should be width * height * channels.
    pub pixels: Vec<u8>,
}

impl RasterImage {
    /// Create a new RasterImage with the given dimensions and pixel data.
    pub fn new(width: u32, height: u32, channels: usize, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            expected_len(width, height, channels),
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            channels,
            pixels,
        }
    }

    /// Create a RasterImage, returning `None` if the buffer length does not
    /// match the dimensions or `channels` is zero.
    pub fn from_raw(width: u32, height: u32, channels: usize, pixels: Vec<u8>) -> Option<Self> {
        if channels == 0 || pixels.len() != expected_len(width, height, channels) {
            return None;
        }
        Some(Self {
            width,
            height,
            channels,
            pixels,
        })
    }

    /// Create an all-background (zero) image.
    pub fn zeros(width: u32, height: u32, channels: usize) -> Self {
        Self {
            width,
            height,
            channels,
            pixels: vec![0u8; expected_len(width, height, channels)],
        }
    }

    /// Create a RasterImage from an image::RgbImage.
    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            channels: 3,
            pixels: img.into_raw(),
        }
    }

    /// Convert to an image::RgbImage. Returns `None` unless the image has
    /// exactly three channels.
    pub fn to_rgb_image(&self) -> Option<image::RgbImage> {
        if self.channels != 3 {
            return None;
        }
        image::RgbImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    /// Channel values of the pixel at column `x`, row `y`.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * self.channels;
        self.pixels.get(idx..idx + self.channels)
    }

    /// Number of bytes in one row.
    #[inline]
    pub fn row_stride(&self) -> usize {
        self.width as usize * self.channels
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Get the size of the pixel buffer in bytes.
    pub fn byte_size(&self) -> usize {
        self.pixels.len()
    }

    /// Check if this image holds no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }

    /// Check that the buffer length agrees with the header.
    pub fn is_consistent(&self) -> bool {
        self.channels > 0 && self.pixels.len() == expected_len(self.width, self.height, self.channels)
    }

    /// Buffer length implied by the header.
    pub fn expected_len(&self) -> usize {
        expected_len(self.width, self.height, self.channels)
    }
}

#[inline]
fn expected_len(width: u32, height: u32, channels: usize) -> usize {
    width as usize * height as usize * channels
}
