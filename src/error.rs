use crate::export::ExportError;

/// An imaging or diffraction stage with a zero denominator
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum Degenerate {
    #[error("object at the focal plane (u = f = {focal_length}), the image is at infinity")]
    FocalPlane { focal_length: f64 },
    #[error("object on the lens plane (u = 0), the magnification is undefined")]
    LensPlane,
    #[error("reference image and object distances cancel out (I0 + u0 = 0 with u0 = {object_distance})")]
    Calibration { object_distance: f64 },
    #[error("zero aperture diameter")]
    Aperture,
    #[error("lens #{index} (f = {focal_length}) with object distance {object_distance} is degenerate")]
    Element {
        index: usize,
        focal_length: f64,
        object_distance: f64,
    },
}

/// A configuration rejected before anything is evaluated
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("focal length {0} is not a finite non-zero value")]
    FocalLength(f64),
    #[error("aperture diameter {0} must be finite and positive")]
    Aperture(f64),
    #[error("wavelength {0} must be finite and positive")]
    Wavelength(f64),
    #[error("the optical system has no lens")]
    EmptySystem,
    #[error("{elements} lens(es) require {} separation(s), found {separations}", .elements.saturating_sub(1))]
    SeparationCount { elements: usize, separations: usize },
    #[error("separation {0} is not finite")]
    Separation(f64),
    #[error("object distance range [{start}, {end}] is malformed")]
    SweepRange { start: f64, end: f64 },
    #[error("sweep step {0} must be finite and positive")]
    SweepStep(f64),
    #[error("object distance range [{start}, {end}] with step {step} exceeds {max} points")]
    SweepSize {
        start: f64,
        end: f64,
        step: f64,
        max: usize,
    },
    #[error("calibration reference (M0 = {magnification}, u0 = {object_distance}) must be finite and non-zero")]
    Calibration {
        magnification: f64,
        object_distance: f64,
    },
    #[error("minimum {min} of {field} bounds is greater than the maximum {max}")]
    Bounds { field: String, min: f64, max: f64 },
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid configuration")]
    InvalidConfiguration(#[from] ConfigurationError),
    #[error("degenerate optical system")]
    DegenerateSystem(#[from] Degenerate),
    #[error("failed to read or write the results table")]
    ExternalIo(#[from] ExportError),
}
