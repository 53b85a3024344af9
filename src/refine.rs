//! Refinement of the sweep results
//!
//! Rows are retained if the absolute value of every bounded field lies within
//! its bounds. A field is bounded only when both its minimum and its maximum are given.

use std::{collections::BTreeMap, fmt};

use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use crate::{error::ConfigurationError, sweep::SystemResult};

type Result<T> = std::result::Result<T, ConfigurationError>;

/// Sweep result fields available for refinement
#[derive(EnumIter, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum Field {
    /// Total magnification
    MTotal,
    /// Image distance from the last lens
    ImageDistance,
    /// Angular resolution [deg]
    Resolution,
    /// Linear resolution
    LinearFov,
}
impl Field {
    /// Value of the field in a sweep row
    pub fn value(&self, row: &SystemResult) -> f64 {
        use Field::*;
        match self {
            MTotal => row.magnification,
            ImageDistance => row.image_distance,
            Resolution => row.angular_resolution_deg,
            LinearFov => row.linear_resolution,
        }
    }
}
impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Field::*;
        match self {
            MTotal => write!(f, "M_total"),
            ImageDistance => write!(f, "I2"),
            Resolution => write!(f, "Resolution"),
            LinearFov => write!(f, "Linear_FOV"),
        }
    }
}

/// Optional inclusive bounds
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
}
impl Bounds {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }
    /// Both bounds are given
    pub fn is_constraining(&self) -> bool {
        self.min.is_some() && self.max.is_some()
    }
    /// `min <= |value| <= max`, always `true` if the bounds are not constraining
    pub fn contains(&self, value: f64) -> bool {
        match (self.min, self.max) {
            (Some(min), Some(max)) => (min..=max).contains(&value.abs()),
            _ => true,
        }
    }
}

/// Filter of the sweep results
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Refiner {
    bounds: BTreeMap<Field, Bounds>,
}
impl Refiner {
    /// Sets the bounds of `field`
    pub fn bounds(mut self, field: Field, min: Option<f64>, max: Option<f64>) -> Self {
        self.bounds.insert(field, Bounds::new(min, max));
        self
    }
    pub fn m_total(self, min: Option<f64>, max: Option<f64>) -> Self {
        self.bounds(Field::MTotal, min, max)
    }
    pub fn image_distance(self, min: Option<f64>, max: Option<f64>) -> Self {
        self.bounds(Field::ImageDistance, min, max)
    }
    pub fn resolution(self, min: Option<f64>, max: Option<f64>) -> Self {
        self.bounds(Field::Resolution, min, max)
    }
    pub fn linear_fov(self, min: Option<f64>, max: Option<f64>) -> Self {
        self.bounds(Field::LinearFov, min, max)
    }
    /// Bounds of `field`, unconstrained if never set
    pub fn get(&self, field: Field) -> Bounds {
        self.bounds.get(&field).copied().unwrap_or_default()
    }
    /// Checks that no minimum is greater than its maximum
    pub fn validate(&self) -> Result<()> {
        for (field, bounds) in &self.bounds {
            if let (Some(min), Some(max)) = (bounds.min, bounds.max) {
                if min > max {
                    return Err(ConfigurationError::Bounds {
                        field: field.to_string(),
                        min,
                        max,
                    });
                }
            }
        }
        Ok(())
    }
    /// `true` if `row` satisfies every bounded field
    pub fn retains(&self, row: &SystemResult) -> bool {
        Field::iter().all(|field| self.get(field).contains(field.value(row)))
    }
    /// Rows satisfying every bounded field, in their original order
    pub fn refine<'a, I>(&self, rows: I) -> Result<Vec<SystemResult>>
    where
        I: IntoIterator<Item = &'a SystemResult>,
    {
        self.validate()?;
        let refined: Vec<_> = rows
            .into_iter()
            .filter(|row| self.retains(row))
            .copied()
            .collect();
        log::info!("{} row(s) retained", refined.len());
        Ok(refined)
    }
}
impl fmt::Display for Refiner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let constraints: Vec<_> = Field::iter()
            .filter_map(|field| match self.get(field) {
                Bounds {
                    min: Some(min),
                    max: Some(max),
                } => Some(format!("{min} <= |{field}| <= {max}")),
                _ => None,
            })
            .collect();
        if constraints.is_empty() {
            write!(f, "unconstrained")
        } else {
            write!(f, "{}", constraints.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(magnification: f64) -> SystemResult {
        SystemResult {
            object_distance: 10.,
            image_distance: -10. * magnification,
            magnification,
            focal_length: Some(25.),
            angular_resolution_deg: 0.003845,
            linear_resolution: 0.000671,
        }
    }

    #[test]
    fn m_total_bounds() {
        let rows = vec![row(1.), row(5.), row(10.)];
        let refined = Refiner::default()
            .m_total(Some(2.), Some(8.))
            .refine(&rows)
            .unwrap();
        assert_eq!(refined, vec![row(5.)]);
    }

    #[test]
    fn absolute_values() {
        let rows = vec![row(-5.), row(-0.5)];
        let refined = Refiner::default()
            .m_total(Some(2.), Some(8.))
            .refine(&rows)
            .unwrap();
        assert_eq!(refined, vec![row(-5.)]);
    }

    #[test]
    fn unconstrained() {
        let rows = vec![row(1.), row(5.), row(10.)];
        assert_eq!(Refiner::default().refine(&rows).unwrap(), rows);
        let refined = Refiner::default()
            .m_total(None, None)
            .image_distance(None, None)
            .resolution(None, None)
            .linear_fov(None, None)
            .refine(&rows)
            .unwrap();
        assert_eq!(refined, rows);
        assert_eq!(Refiner::default().to_string(), "unconstrained");
    }

    #[test]
    fn half_bounds_do_not_constrain() {
        let rows = vec![row(1.), row(5.), row(10.)];
        let refined = Refiner::default()
            .m_total(Some(2.), None)
            .image_distance(None, Some(1.))
            .refine(&rows)
            .unwrap();
        assert_eq!(refined, rows);
    }

    #[test]
    fn every_field_must_hold() {
        let rows = vec![row(1.), row(5.), row(10.)];
        let refined = Refiner::default()
            .m_total(Some(0.), Some(20.))
            .image_distance(Some(40.), Some(200.))
            .refine(&rows)
            .unwrap();
        assert_eq!(refined, vec![row(5.), row(10.)]);
        let refined = Refiner::default()
            .m_total(Some(0.), Some(20.))
            .linear_fov(Some(0.), Some(1e-4))
            .refine(&rows)
            .unwrap();
        assert!(refined.is_empty());
    }

    #[test]
    fn inverted_bounds() {
        let rows = vec![row(1.)];
        assert!(matches!(
            Refiner::default().resolution(Some(2.), Some(1.)).refine(&rows),
            Err(ConfigurationError::Bounds { .. })
        ));
    }
}
