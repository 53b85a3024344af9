//! Thin lens imaging
//!
//! Distances follow the "real is positive" convention everywhere in the crate:
//! the object distance `u` is positive for a real object in front of the lens,
//! the image distance `v` is positive for a real image behind it and a converging
//! lens has a positive focal length. The thin lens relation then reads
//! `1/u + 1/v = 1/f`, that is `v = f.u/(u-f)`.
//!
//! Written with the signed axis coordinate of the object `x = -u`, it is the
//! Cartesian form `1/f = 1/v - 1/x`, so both forms describe the same conjugate points.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, Degenerate};

/// Image distance of an object at `object_distance` from a lens of focal length `focal_length`
///
/// Fails when the object sits on the focal plane, the image is then at infinity;
/// use [conjugate] to get that case as a value.
pub fn image_distance(focal_length: f64, object_distance: f64) -> Result<f64, Degenerate> {
    let denominator = object_distance - focal_length;
    if denominator == 0f64 {
        return Err(Degenerate::FocalPlane { focal_length });
    }
    Ok(focal_length * object_distance / denominator)
}

/// Lateral magnification `-v/u` of a conjugate pair
pub fn magnification(object_distance: f64, image_distance: f64) -> Result<f64, Degenerate> {
    if object_distance == 0f64 {
        return Err(Degenerate::LensPlane);
    }
    Ok(-image_distance / object_distance)
}

/// Image location of a thin lens
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImagePlane {
    /// Image at a finite distance from the lens
    Finite(f64),
    /// Object on the focal plane: the emerging rays are parallel
    Infinity,
}
impl ImagePlane {
    /// `true` unless the image is at infinity
    pub fn is_finite(&self) -> bool {
        matches!(self, ImagePlane::Finite(_))
    }
    /// Image distance from the lens, `None` at infinity
    pub fn distance(&self) -> Option<f64> {
        match self {
            ImagePlane::Finite(v) => Some(*v),
            ImagePlane::Infinity => None,
        }
    }
}

/// Same as [image_distance] but the focal plane case is returned as [ImagePlane::Infinity]
pub fn conjugate(focal_length: f64, object_distance: f64) -> ImagePlane {
    match image_distance(focal_length, object_distance) {
        Ok(v) => ImagePlane::Finite(v),
        Err(_) => ImagePlane::Infinity,
    }
}

/// A thin lens on the optical axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LensElement {
    /// Focal length, positive for a converging lens
    pub focal_length: f64,
    /// Location of the lens on the optical axis
    pub position: f64,
}
impl LensElement {
    /// A new lens at the origin of the optical axis
    pub fn new(focal_length: f64) -> Result<Self, ConfigurationError> {
        if focal_length == 0f64 || !focal_length.is_finite() {
            return Err(ConfigurationError::FocalLength(focal_length));
        }
        Ok(Self {
            focal_length,
            position: 0f64,
        })
    }
    /// Moves the lens to `position` on the optical axis
    pub fn at(self, position: f64) -> Self {
        Self { position, ..self }
    }
    /// Optical power `1/f`
    pub fn power(&self) -> f64 {
        self.focal_length.recip()
    }
    /// Images an object at `object_distance` from the lens
    pub fn image(&self, object_distance: f64) -> Result<Conjugate, Degenerate> {
        let image_distance = image_distance(self.focal_length, object_distance)?;
        Ok(Conjugate {
            object_distance,
            image_distance,
            magnification: magnification(object_distance, image_distance)?,
        })
    }
}

/// Object and image distances related by a lens
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conjugate {
    pub object_distance: f64,
    pub image_distance: f64,
    pub magnification: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn thin_lens_relation() {
        let mut rng = rand::thread_rng();
        for _ in 0..1000 {
            let f: f64 = rng.gen_range(1f64..100f64);
            let u: f64 = rng.gen_range(1f64..500f64);
            if (u - f).abs() < 1e-3 {
                continue;
            }
            let v = image_distance(f, u).unwrap();
            assert!((1. / u + 1. / v - 1. / f).abs() < 1e-9);
            // signed object coordinate
            let x = -u;
            assert!((1. / v - 1. / x - 1. / f).abs() < 1e-9);
        }
    }

    #[test]
    fn focal_plane() {
        assert_eq!(
            image_distance(25., 25.),
            Err(Degenerate::FocalPlane { focal_length: 25. })
        );
        let at_infinity = conjugate(25., 25.);
        assert_eq!(at_infinity, ImagePlane::Infinity);
        assert!(!at_infinity.is_finite());
        assert_eq!(at_infinity.distance(), None);
        let finite = conjugate(50., 300.);
        assert_eq!(finite, ImagePlane::Finite(60.));
        assert!(finite.is_finite());
        assert_eq!(finite.distance(), Some(60.));
    }

    #[test]
    fn virtual_image() {
        // object inside the focal length of a converging lens
        let v = image_distance(20., 10.).unwrap();
        assert_eq!(v, -20.);
        assert_eq!(magnification(10., v).unwrap(), 2.);
    }

    #[test]
    fn lens_plane() {
        let lens = LensElement::new(10.).unwrap();
        assert_eq!(lens.image(0.), Err(Degenerate::LensPlane));
    }

    #[test]
    fn invalid_focal_length() {
        assert_eq!(
            LensElement::new(0.),
            Err(ConfigurationError::FocalLength(0.))
        );
        assert!(LensElement::new(f64::NAN).is_err());
        assert!(LensElement::new(-15.).is_ok());
    }
}
