//! Inverse coordinate mapping from destination pixels to source coordinates.

use super::{SingularPolicy, Transform, TransformError};

/// Maps destination coordinates back into source space.
///
/// The transform is inverted once on construction and reused for every
/// call to [`InverseMapper::map`].
#[derive(Debug, Clone, Copy)]
pub struct InverseMapper {
    inverse: Option<Transform>,
}

impl InverseMapper {
    /// Invert `transform` according to `policy`.
    ///
    /// # Errors
    ///
    /// With `SingularPolicy::Reject`, returns
    /// `TransformError::InvalidTransform` for a singular transform. With
    /// `SingularPolicy::FailSoft` this never fails; the mapper then returns
    /// NaN for every coordinate.
    pub fn new(transform: &Transform, policy: SingularPolicy) -> Result<Self, TransformError> {
        match transform.inverse() {
            Ok(inverse) => Ok(Self {
                inverse: Some(inverse),
            }),
            Err(err) => match policy {
                SingularPolicy::Reject => Err(err),
                SingularPolicy::FailSoft => {
                    log::warn!("{err}; every pixel will be background");
                    Ok(Self { inverse: None })
                }
            },
        }
    }

    /// Whether the wrapped transform was invertible.
    pub fn is_degenerate(&self) -> bool {
        self.inverse.is_none()
    }

    /// Source coordinate of destination point `(x, y)`.
    #[inline]
    pub fn map(&self, x: f64, y: f64) -> (f64, f64) {
        match &self.inverse {
            Some(inv) => inv.apply(x, y),
            None => (f64::NAN, f64::NAN),
        }
    }
}

/// Source coordinate of destination pixel `(dest_x, dest_y)`.
///
/// Inverts `transform` on every call; loops should build an
/// [`InverseMapper`] once instead. A singular transform yields `(NaN, NaN)`.
pub fn map_backward(transform: &Transform, dest_x: i64, dest_y: i64) -> (f64, f64) {
    match transform.inverse() {
        Ok(inv) => inv.apply(dest_x as f64, dest_y as f64),
        Err(_) => (f64::NAN, f64::NAN),
    }
}
