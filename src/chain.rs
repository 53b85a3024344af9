//! Multi-element imaging chain
//!
//! The image formed by lens #i is the object of lens #i+1: with the lenses
//! `separation_i` apart, `u_{i+1} = separation_i - v_i`. A negative object distance
//! is a virtual object, i.e. the rays converge toward a point behind the next lens.

use nalgebra::Matrix2;
use serde::{Deserialize, Serialize};

use crate::{
    error::{ConfigurationError, Degenerate},
    lens::{image_distance, magnification, LensElement},
};

/// Object on the optical axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectSpec {
    /// Distance from the first lens
    pub distance: f64,
    /// Object height, only needed to locate the image off axis
    pub height: Option<f64>,
}
impl ObjectSpec {
    pub fn new(distance: f64) -> Self {
        Self {
            distance,
            height: None,
        }
    }
    pub fn height(self, height: f64) -> Self {
        Self {
            height: Some(height),
            ..self
        }
    }
}

/// Ordered lenses with the gaps between consecutive lenses
#[derive(Debug, Clone, PartialEq)]
pub struct OpticalSystem {
    elements: Vec<LensElement>,
    separations: Vec<f64>,
}
impl OpticalSystem {
    /// A new system from the lens focal lengths and the `n-1` separations between them
    ///
    /// The first lens is set at the origin of the optical axis
    pub fn new(focal_lengths: &[f64], separations: &[f64]) -> Result<Self, ConfigurationError> {
        if focal_lengths.is_empty() {
            return Err(ConfigurationError::EmptySystem);
        }
        if separations.len() + 1 != focal_lengths.len() {
            return Err(ConfigurationError::SeparationCount {
                elements: focal_lengths.len(),
                separations: separations.len(),
            });
        }
        if let Some(&d) = separations.iter().find(|d| !d.is_finite()) {
            return Err(ConfigurationError::Separation(d));
        }
        let positions = std::iter::once(0f64).chain(separations.iter().scan(0f64, |z, d| {
            *z += d;
            Some(*z)
        }));
        let elements = focal_lengths
            .iter()
            .zip(positions)
            .map(|(&f, z)| LensElement::new(f).map(|lens| lens.at(z)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            elements,
            separations: separations.to_vec(),
        })
    }
    /// A system made of a single lens
    pub fn single(focal_length: f64) -> Result<Self, ConfigurationError> {
        Self::new(&[focal_length], &[])
    }
    pub fn len(&self) -> usize {
        self.elements.len()
    }
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
    pub fn elements(&self) -> &[LensElement] {
        &self.elements
    }
    pub fn separations(&self) -> &[f64] {
        &self.separations
    }
    /// Paraxial ray transfer matrix from the first to the last lens
    pub fn ray_transfer_matrix(&self) -> Matrix2<f64> {
        let lens = |f: f64| Matrix2::new(1f64, 0f64, -f.recip(), 1f64);
        let gap = |d: f64| Matrix2::new(1f64, d, 0f64, 1f64);
        let mut elements = self.elements.iter();
        let first = elements
            .next()
            .map_or_else(Matrix2::identity, |e| lens(e.focal_length));
        elements
            .zip(&self.separations)
            .fold(first, |m, (e, &d)| lens(e.focal_length) * gap(d) * m)
    }
    /// Effective focal length of the whole system, `None` if the system is afocal
    pub fn effective_focal_length(&self) -> Option<f64> {
        let c = self.ray_transfer_matrix()[(1, 0)];
        let scale: f64 = self.elements.iter().map(|e| e.power().abs()).sum();
        if c.abs() <= 1e-12 * scale {
            None
        } else {
            Some(-c.recip())
        }
    }
    /// Images an object at `object_distance` from the first lens through every lens
    pub fn trace(&self, object_distance: f64) -> Result<ImagingTrace, Degenerate> {
        let mut stages = Vec::with_capacity(self.len());
        let mut u = object_distance;
        for (k, lens) in self.elements.iter().enumerate() {
            let degenerate = |_| Degenerate::Element {
                index: k + 1,
                focal_length: lens.focal_length,
                object_distance: u,
            };
            let v = image_distance(lens.focal_length, u).map_err(degenerate)?;
            let m = magnification(u, v).map_err(degenerate)?;
            log::debug!(
                "lens #{}: f={}, u={u}, v={v}, m={m}",
                k + 1,
                lens.focal_length
            );
            stages.push(Stage {
                focal_length: lens.focal_length,
                object_distance: u,
                image_distance: v,
                magnification: m,
                image_position: lens.position + v,
            });
            if let Some(d) = self.separations.get(k) {
                u = d - v;
            }
        }
        let total_magnification = stages.iter().map(|s| s.magnification).product();
        let final_image_position = stages.last().map_or(0f64, |s| s.image_position);
        Ok(ImagingTrace {
            stages,
            total_magnification,
            final_image_position,
        })
    }
    /// Images `object` through every lens
    pub fn image(&self, object: &ObjectSpec) -> Result<ImagingTrace, Degenerate> {
        self.trace(object.distance)
    }
}

/// One lens of an [ImagingTrace]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stage {
    pub focal_length: f64,
    pub object_distance: f64,
    pub image_distance: f64,
    pub magnification: f64,
    /// Location of the image on the optical axis
    pub image_position: f64,
}

/// Record of an object imaged through an [OpticalSystem]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImagingTrace {
    pub stages: Vec<Stage>,
    /// Product of the lens magnifications, negative for an inverted image
    pub total_magnification: f64,
    /// Location of the final image on the optical axis
    pub final_image_position: f64,
}
impl ImagingTrace {
    /// Absolute value of the total magnification
    pub fn magnification_scale(&self) -> f64 {
        self.total_magnification.abs()
    }
    /// Distance of the final image from the last lens
    pub fn image_distance(&self) -> f64 {
        self.stages.last().map_or(0f64, |s| s.image_distance)
    }
    /// Height of the final image
    pub fn image_height(&self, object: &ObjectSpec) -> Option<f64> {
        object.height.map(|h| h * self.total_magnification)
    }
    pub fn is_inverted(&self) -> bool {
        self.total_magnification < 0f64
    }
}
