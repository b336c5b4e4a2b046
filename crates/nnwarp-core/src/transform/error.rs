//! Error types for transform and resampling operations.

use thiserror::Error;

/// Errors that can occur while building a mapper or resampling an image.
#[derive(Debug, Error, PartialEq)]
pub enum TransformError {
    /// The transform cannot be inverted and singular transforms are rejected.
    #[error("Transform is not invertible (determinant {determinant})")]
    InvalidTransform { determinant: f64 },

    /// Pixel buffer length doesn't match the image header.
    #[error("Invalid pixel buffer: expected {expected} bytes, got {actual}")]
    InvalidBuffer { expected: usize, actual: usize },

    /// Channel count is zero.
    #[error("Invalid channel count: {0}")]
    InvalidChannels(usize),

    /// Source and destination disagree on the number of channels.
    #[error("Channel mismatch: source has {source_channels}, destination has {dest_channels}")]
    ChannelMismatch {
        source_channels: usize,
        dest_channels: usize,
    },

    /// The requested thread count is invalid.
    #[error("Thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),

    /// The local thread pool failed to build.
    #[error("Failed to build thread pool: {0}")]
    ThreadPool(String),
}
