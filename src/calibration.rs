//! Focal length calibration
//!
//! A single lens is calibrated from one observation: the magnification `M0` of an
//! object placed at `u0`. The reference image distance is `I0 = -M0.u0` and the
//! focal length follows from the thin lens relation `1/F = 1/u0 + 1/I0`:
//!
//! ```text
//! F = I0.u0 / (I0 + u0)
//! ```
//!
//! This is the same relation [image_distance](crate::lens::image_distance) inverts:
//! with `u0 - F = u0^2/(I0 + u0)`,
//! `F.u0/(u0 - F) = I0.u0^2/(I0 + u0) . (I0 + u0)/u0^2 = I0`,
//! so the calibrated lens images `u0` exactly onto `I0`.

use crate::{
    error::{ConfigurationError, Degenerate, Error},
    lens::LensElement,
};

type Result<T> = std::result::Result<T, Error>;

/// Calibrated single lens
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    /// Reference magnification `M0`
    pub magnification: f64,
    /// Reference object distance `u0`
    pub object_distance: f64,
    /// Reference image distance `I0 = -M0.u0`
    pub image_distance: f64,
    /// Calibrated focal length
    pub focal_length: f64,
}
impl Calibration {
    /// Calibrates the focal length from the reference magnification and object distance
    pub fn new(magnification: f64, object_distance: f64) -> Result<Self> {
        if !(magnification.is_finite() && object_distance.is_finite())
            || magnification == 0f64
            || object_distance == 0f64
        {
            return Err(ConfigurationError::Calibration {
                magnification,
                object_distance,
            }
            .into());
        }
        let image_distance = -magnification * object_distance;
        let sum = image_distance + object_distance;
        if sum == 0f64 {
            return Err(Degenerate::Calibration { object_distance }.into());
        }
        let focal_length = image_distance * object_distance / sum;
        log::debug!(
            "calibration: M0={magnification}, u0={object_distance} -> I0={image_distance}, F={focal_length}"
        );
        Ok(Self {
            magnification,
            object_distance,
            image_distance,
            focal_length,
        })
    }
    /// The calibrated lens, at the origin of the optical axis
    pub fn lens(&self) -> Result<LensElement> {
        Ok(LensElement::new(self.focal_length)?)
    }
}

/// Focal length of a lens giving a magnification `magnification` for an object at `object_distance`
pub fn calibrate(magnification: f64, object_distance: f64) -> Result<f64> {
    Calibration::new(magnification, object_distance).map(|c| c.focal_length)
}
