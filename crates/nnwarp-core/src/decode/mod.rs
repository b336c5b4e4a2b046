//! Image loading.
//!
//! Reads a file (or an in-memory buffer), decodes it with the `image` crate,
//! applies the EXIF orientation if present and returns an RGB
//! [`RasterImage`](crate::raster::RasterImage).
//!
//! # Examples
//!
//! ```ignore
//! use nnwarp_core::decode::load_image;
//!
//! let image = load_image("photo.jpg")?;
//! println!("Loaded {}x{} image", image.width, image.height);
//! ```

mod loader;
mod types;

pub use loader::{decode_image, decode_image_no_orientation, get_orientation, load_image};
pub use types::{DecodeError, Orientation};
