//! Diffraction limited resolution
//!
//! Rayleigh criterion for a circular aperture of diameter `D` at wavelength `λ`:
//! `θ = 1.22 λ/D` [rd]; the smallest resolved separation at a distance `S` is `θ.S`.
//! Wavelength, aperture and distance share the same length unit.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, Degenerate};

/// First zero of the Airy pattern in units of `λ/D`
pub const RAYLEIGH_FACTOR: f64 = 1.22;
/// Reference wavelength: 550nm in cm
pub const DEFAULT_WAVELENGTH: f64 = 0.000055;

/// Diffraction limited resolution at a given distance
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Resolution {
    /// Angular resolution [rd]
    pub angular_rad: f64,
    /// Angular resolution [deg]
    pub angular_deg: f64,
    /// Linear resolution at the distance
    pub linear: f64,
}

/// Rayleigh resolution of an aperture `aperture_diameter` at `wavelength`, evaluated at `distance`
pub fn resolution(
    wavelength: f64,
    aperture_diameter: f64,
    distance: f64,
) -> Result<Resolution, Degenerate> {
    if aperture_diameter == 0f64 {
        return Err(Degenerate::Aperture);
    }
    let angular_rad = RAYLEIGH_FACTOR * wavelength / aperture_diameter;
    Ok(Resolution {
        angular_rad,
        angular_deg: angular_rad * 180f64 / PI,
        linear: angular_rad * distance,
    })
}

/// Wavelength and aperture diameter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiffractionLimit {
    pub wavelength: f64,
    pub aperture_diameter: f64,
}
impl DiffractionLimit {
    pub fn new(wavelength: f64, aperture_diameter: f64) -> Result<Self, ConfigurationError> {
        if !(wavelength.is_finite() && wavelength > 0f64) {
            return Err(ConfigurationError::Wavelength(wavelength));
        }
        if !(aperture_diameter.is_finite() && aperture_diameter > 0f64) {
            return Err(ConfigurationError::Aperture(aperture_diameter));
        }
        Ok(Self {
            wavelength,
            aperture_diameter,
        })
    }
    /// Aperture of diameter `aperture_diameter` at the reference wavelength
    pub fn with_aperture(aperture_diameter: f64) -> Result<Self, ConfigurationError> {
        Self::new(DEFAULT_WAVELENGTH, aperture_diameter)
    }
    /// Resolution at `distance`
    pub fn at(&self, distance: f64) -> Result<Resolution, Degenerate> {
        resolution(self.wavelength, self.aperture_diameter, distance)
    }
}
