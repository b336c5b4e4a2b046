//! Resampling options.
//!
//! All option types are serde-serializable so callers can load them from a
//! configuration file. Missing fields fall back to their defaults.

use serde::{Deserialize, Serialize};

/// Rule used to snap a fractional source coordinate to a pixel index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoundingMode {
    /// Round to nearest, ties away from zero (`f64::round`).
    #[default]
    NearestTiesAway,
    /// `floor(v + 0.5)`: ties always round up.
    HalfUp,
    /// `trunc(v + 0.5)`: matches a C-style integer cast after adding one half.
    /// Values in `(-1.5, -0.5]` snap to index 0, which pulls a band of
    /// out-of-bounds coordinates onto the first row and column.
    TruncateHalfUp,
}

impl RoundingMode {
    /// Snap `v` to an integer index. Non-finite input yields `None`.
    #[inline]
    pub fn round(self, v: f64) -> Option<i64> {
        if !v.is_finite() {
            return None;
        }
        let r = match self {
            RoundingMode::NearestTiesAway => v.round(),
            RoundingMode::HalfUp => (v + 0.5).floor(),
            RoundingMode::TruncateHalfUp => (v + 0.5).trunc(),
        };
        // Saturating cast; anything this large is out of bounds anyway.
        Some(r as i64)
    }
}

/// What to do when the transform cannot be inverted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SingularPolicy {
    /// Map every pixel to NaN, producing an all-background image.
    #[default]
    FailSoft,
    /// Return `TransformError::InvalidTransform`.
    Reject,
}

/// Controls how the per-row resampling loop is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExecutionStrategy {
    /// Use the global rayon thread pool, one task per destination row.
    #[default]
    ParallelRows,

    /// Run sequentially on the current thread.
    Serial,

    /// Run on a local thread pool with `n` threads.
    ///
    /// Creates a new pool on every call.
    Fixed(usize),
}

/// Options for a single resampling pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResampleOptions {
    pub rounding: RoundingMode,
    pub singular: SingularPolicy,
    pub execution: ExecutionStrategy,
}

impl ResampleOptions {
    /// Create options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rounding(mut self, rounding: RoundingMode) -> Self {
        self.rounding = rounding;
        self
    }

    pub fn with_singular(mut self, singular: SingularPolicy) -> Self {
        self.singular = singular;
        self
    }

    pub fn with_execution(mut self, execution: ExecutionStrategy) -> Self {
        self.execution = execution;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest_ties_away() {
        let mode = RoundingMode::NearestTiesAway;
        assert_eq!(mode.round(0.5), Some(1));
        assert_eq!(mode.round(-0.5), Some(-1));
        assert_eq!(mode.round(-0.4), Some(0));
        assert_eq!(mode.round(2.49), Some(2));
    }

    #[test]
    fn test_half_up() {
        let mode = RoundingMode::HalfUp;
        assert_eq!(mode.round(0.5), Some(1));
        assert_eq!(mode.round(-0.5), Some(0));
        assert_eq!(mode.round(-0.7), Some(-1));
    }

    #[test]
    fn test_truncate_half_up_pulls_negatives_to_zero() {
        let mode = RoundingMode::TruncateHalfUp;
        assert_eq!(mode.round(-0.7), Some(0));
        assert_eq!(mode.round(-1.4), Some(0));
        assert_eq!(mode.round(-1.6), Some(-1));
        assert_eq!(mode.round(1.5), Some(2));
    }

    #[test]
    fn test_non_finite_never_rounds() {
        for mode in [
            RoundingMode::NearestTiesAway,
            RoundingMode::HalfUp,
            RoundingMode::TruncateHalfUp,
        ] {
            assert_eq!(mode.round(f64::NAN), None);
            assert_eq!(mode.round(f64::INFINITY), None);
            assert_eq!(mode.round(f64::NEG_INFINITY), None);
        }
    }

    #[test]
    fn test_options_deserialize_defaults() {
        let opts: ResampleOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts, ResampleOptions::default());

        let opts: ResampleOptions =
            serde_json::from_str(r#"{"rounding":"half-up","execution":{"fixed":2}}"#).unwrap();
        assert_eq!(opts.rounding, RoundingMode::HalfUp);
        assert_eq!(opts.execution, ExecutionStrategy::Fixed(2));
        assert_eq!(opts.singular, SingularPolicy::FailSoft);
    }
}
