//! Image writing.
//!
//! # Examples
//!
//! ```ignore
//! use nnwarp_core::encode::save_image;
//!
//! save_image(&rotated, "out.png", 90)?;
//! ```

mod writer;

pub use writer::{encode_jpeg, encode_png, save_image, EncodeError};
