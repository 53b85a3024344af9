//! Sweep configuration
//!
//! An [OpticalSystemConfig] is validated as a whole by [OpticalSystemConfig::build]
//! before any object distance is evaluated.

use std::{fs::File, io, path::Path};

use serde::Deserialize;

use crate::{
    chain::OpticalSystem,
    diffraction::{DiffractionLimit, DEFAULT_WAVELENGTH},
    error::ConfigurationError,
    export::ExportError,
    sweep::{Imaging, Sweep, SweepRange},
};

/// A lens and its distance to the next lens
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct LensRecord {
    #[serde(rename = "Focal Length")]
    pub focal_length: f64,
    /// Distance to the next lens, none for the last lens
    #[serde(rename = "Separation")]
    pub separation: Option<f64>,
}
impl LensRecord {
    pub fn new(focal_length: f64, separation: Option<f64>) -> Self {
        Self {
            focal_length,
            separation,
        }
    }
    /// The last (or only) lens of a system
    pub fn last(focal_length: f64) -> Self {
        Self::new(focal_length, None)
    }
}

/// Reads the lens records, one lens per CSV record
///
/// The CSV header is `Focal Length,Separation`
pub fn read_lenses<R: io::Read>(reader: R) -> Result<Vec<LensRecord>, ExportError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut lenses = Vec::new();
    for result in rdr.deserialize() {
        lenses.push(result?);
    }
    Ok(lenses)
}

/// Reads the lens records from the CSV file `path`
pub fn load_lenses<P: AsRef<Path>>(path: P) -> Result<Vec<LensRecord>, ExportError> {
    let path = path.as_ref();
    let file =
        File::open(path).map_err(|e| ExportError::Io(e, path.to_string_lossy().into_owned()))?;
    log::info!("Loading {:?}...", path);
    read_lenses(file)
}

/// Lenses, diffraction parameters and object distances of a sweep
#[derive(Debug, Clone, PartialEq)]
pub struct OpticalSystemConfig {
    pub lenses: Vec<LensRecord>,
    pub wavelength: f64,
    pub aperture_diameter: f64,
    pub start: f64,
    pub end: f64,
    pub step: f64,
}
impl OpticalSystemConfig {
    /// A new configuration at the reference wavelength over the default object distances
    pub fn new(lenses: Vec<LensRecord>, aperture_diameter: f64) -> Self {
        let range = SweepRange::default();
        Self {
            lenses,
            wavelength: DEFAULT_WAVELENGTH,
            aperture_diameter,
            start: range.start(),
            end: range.end(),
            step: range.step(),
        }
    }
    /// A single lens configuration
    pub fn single(focal_length: f64, aperture_diameter: f64) -> Self {
        Self::new(vec![LensRecord::last(focal_length)], aperture_diameter)
    }
    pub fn wavelength(self, wavelength: f64) -> Self {
        Self { wavelength, ..self }
    }
    pub fn start(self, start: f64) -> Self {
        Self { start, ..self }
    }
    pub fn end(self, end: f64) -> Self {
        Self { end, ..self }
    }
    pub fn step(self, step: f64) -> Self {
        Self { step, ..self }
    }
    /// The optical system described by the lens records
    ///
    /// Every lens but the last one must give its distance to the next lens
    pub fn system(&self) -> Result<OpticalSystem, ConfigurationError> {
        let (last, others) = self
            .lenses
            .split_last()
            .ok_or(ConfigurationError::EmptySystem)?;
        let separations: Option<Vec<f64>> = others.iter().map(|l| l.separation).collect();
        match separations {
            Some(separations) if last.separation.is_none() => {
                let focal_lengths: Vec<_> = self.lenses.iter().map(|l| l.focal_length).collect();
                OpticalSystem::new(&focal_lengths, &separations)
            }
            _ => Err(ConfigurationError::SeparationCount {
                elements: self.lenses.len(),
                separations: self.lenses.iter().filter(|l| l.separation.is_some()).count(),
            }),
        }
    }
    /// Validates the configuration and returns the sweep
    pub fn build(&self) -> Result<Sweep, ConfigurationError> {
        let diffraction = DiffractionLimit::new(self.wavelength, self.aperture_diameter)?;
        let range = SweepRange::new(self.start, self.end, self.step)?;
        let system = self.system()?;
        let imaging = if system.len() == 1 {
            Imaging::Lens(system.elements()[0])
        } else {
            Imaging::System(system)
        };
        Ok(Sweep::new(imaging, range, diffraction))
    }
}
