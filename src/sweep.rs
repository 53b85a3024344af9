//! Object distance sweeps
//!
//! A [Sweep] images every object distance of a [SweepRange] through a single lens
//! or an [OpticalSystem] and pairs it with the diffraction limited resolution at that
//! distance. Degenerate points are recorded as [Skip]s, they never abort the sweep.

use std::time::Instant;

use indicatif::{ParallelProgressIterator, ProgressBar};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    chain::OpticalSystem,
    diffraction::DiffractionLimit,
    error::{ConfigurationError, Degenerate},
    lens::LensElement,
};

/// Largest number of object distances in a sweep
pub const MAX_POINTS: usize = 10_000_000;

/// Inclusive range of object distances
///
/// A range holds at least one and at most [MAX_POINTS] object distances.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SweepRange {
    start: f64,
    end: f64,
    step: f64,
}
impl Default for SweepRange {
    fn default() -> Self {
        Self {
            start: 10f64,
            end: 99f64,
            step: 1f64,
        }
    }
}
impl SweepRange {
    /// Object distances from `start` to `end`, both included, every `step`
    pub fn new(start: f64, end: f64, step: f64) -> Result<Self, ConfigurationError> {
        if !(start.is_finite() && end.is_finite()) || start > end {
            return Err(ConfigurationError::SweepRange { start, end });
        }
        if !(step.is_finite() && step > 0f64) {
            return Err(ConfigurationError::SweepStep(step));
        }
        let intervals = Self::intervals(start, end, step);
        if !(intervals.is_finite() && intervals < MAX_POINTS as f64) {
            return Err(ConfigurationError::SweepSize {
                start,
                end,
                step,
                max: MAX_POINTS,
            });
        }
        Ok(Self { start, end, step })
    }
    // tolerates the rounding of (end-start)/step just below an integer
    fn intervals(start: f64, end: f64, step: f64) -> f64 {
        ((end - start) / step + 1e-9).floor()
    }
    pub fn start(&self) -> f64 {
        self.start
    }
    pub fn end(&self) -> f64 {
        self.end
    }
    pub fn step(&self) -> f64 {
        self.step
    }
    /// Number of object distances
    pub fn len(&self) -> usize {
        Self::intervals(self.start, self.end, self.step) as usize + 1
    }
    /// Always `false`, `start` itself belongs to the range
    pub fn is_empty(&self) -> bool {
        false
    }
    /// The `k`th object distance
    pub fn point(&self, k: usize) -> f64 {
        self.start + k as f64 * self.step
    }
    /// Iterator over the object distances
    pub fn points(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.len()).map(|k| self.point(k))
    }
}

/// The optics the object distances are swept through
#[derive(Debug, Clone, PartialEq)]
pub enum Imaging {
    Lens(LensElement),
    System(OpticalSystem),
}
impl Imaging {
    /// Image distance from the last lens and total magnification for an object at `object_distance`
    pub fn image(&self, object_distance: f64) -> Result<(f64, f64), Degenerate> {
        match self {
            Imaging::Lens(lens) => lens
                .image(object_distance)
                .map(|c| (c.image_distance, c.magnification)),
            Imaging::System(system) => system
                .trace(object_distance)
                .map(|t| (t.image_distance(), t.total_magnification)),
        }
    }
    /// Focal length of the lens or effective focal length of the system
    pub fn focal_length(&self) -> Option<f64> {
        match self {
            Imaging::Lens(lens) => Some(lens.focal_length),
            Imaging::System(system) if system.len() == 1 => {
                system.elements().first().map(|e| e.focal_length)
            }
            Imaging::System(system) => system.effective_focal_length(),
        }
    }
}
impl From<LensElement> for Imaging {
    fn from(lens: LensElement) -> Self {
        Imaging::Lens(lens)
    }
}
impl From<OpticalSystem> for Imaging {
    fn from(system: OpticalSystem) -> Self {
        Imaging::System(system)
    }
}

/// One row of a sweep
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SystemResult {
    #[serde(rename = "Object Distance")]
    pub object_distance: f64,
    #[serde(rename = "Image Distance")]
    pub image_distance: f64,
    #[serde(rename = "Magnification")]
    pub magnification: f64,
    /// Lens focal length or system effective focal length, `None` for an afocal system
    #[serde(rename = "Focal Length")]
    pub focal_length: Option<f64>,
    #[serde(rename = "Angular Resolution (deg)")]
    pub angular_resolution_deg: f64,
    #[serde(rename = "Linear Resolution")]
    pub linear_resolution: f64,
}

/// An object distance left out of the sweep results
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Skip {
    pub object_distance: f64,
    pub reason: Degenerate,
}

/// Outcome of a single sweep point
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SweepPoint {
    Success(SystemResult),
    Skipped(Skip),
}

/// Fixed optics, object distances and diffraction parameters
#[derive(Debug, Clone, PartialEq)]
pub struct Sweep {
    imaging: Imaging,
    range: SweepRange,
    diffraction: DiffractionLimit,
    focal_length: Option<f64>,
}
impl Sweep {
    pub fn new<I: Into<Imaging>>(imaging: I, range: SweepRange, diffraction: DiffractionLimit) -> Self {
        let imaging = imaging.into();
        let focal_length = imaging.focal_length();
        Self {
            imaging,
            range,
            diffraction,
            focal_length,
        }
    }
    pub fn imaging(&self) -> &Imaging {
        &self.imaging
    }
    pub fn range(&self) -> &SweepRange {
        &self.range
    }
    pub fn diffraction(&self) -> &DiffractionLimit {
        &self.diffraction
    }
    pub fn focal_length(&self) -> Option<f64> {
        self.focal_length
    }
    fn result(&self, object_distance: f64) -> Result<SystemResult, Degenerate> {
        let (image_distance, magnification) = self.imaging.image(object_distance)?;
        let resolution = self.diffraction.at(object_distance)?;
        Ok(SystemResult {
            object_distance,
            image_distance,
            magnification,
            focal_length: self.focal_length,
            angular_resolution_deg: resolution.angular_deg,
            linear_resolution: resolution.linear,
        })
    }
    /// Evaluates the sweep at `object_distance`
    pub fn evaluate(&self, object_distance: f64) -> SweepPoint {
        match self.result(object_distance) {
            Ok(result) => SweepPoint::Success(result),
            Err(reason) => {
                log::warn!("Skipping object distance S = {object_distance}: {reason}");
                SweepPoint::Skipped(Skip {
                    object_distance,
                    reason,
                })
            }
        }
    }
    /// Evaluates every point of the sweep, in increasing object distance order
    pub fn points(&self) -> Vec<SweepPoint> {
        (0..self.range.len())
            .into_par_iter()
            .map(|k| self.evaluate(self.range.point(k)))
            .collect()
    }
    /// Same as [Sweep::points] with a progress bar
    pub fn points_with_progress(&self, pb: ProgressBar) -> Vec<SweepPoint> {
        (0..self.range.len())
            .into_par_iter()
            .progress_with(pb)
            .map(|k| self.evaluate(self.range.point(k)))
            .collect()
    }
    /// Runs the sweep
    pub fn run(&self) -> SweepOutcome {
        self.gather(|| self.points())
    }
    /// Runs the sweep, reporting the progress in `pb`
    pub fn run_with_progress(&self, pb: ProgressBar) -> SweepOutcome {
        self.gather(|| self.points_with_progress(pb))
    }
    fn gather<F: FnOnce() -> Vec<SweepPoint>>(&self, points: F) -> SweepOutcome {
        log::info!(
            "Sweeping {} object distances in [{}, {}]...",
            self.range.len(),
            self.range.start,
            self.range.end
        );
        let now = Instant::now();
        let outcome: SweepOutcome = points().into_iter().collect();
        log::info!(
            "... {} rows, {} skipped in {}ms",
            outcome.results.len(),
            outcome.skipped.len(),
            now.elapsed().as_millis()
        );
        outcome
    }
}

/// Sweep rows and the skipped object distances
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SweepOutcome {
    pub results: Vec<SystemResult>,
    pub skipped: Vec<Skip>,
}
impl FromIterator<SweepPoint> for SweepOutcome {
    fn from_iter<T: IntoIterator<Item = SweepPoint>>(iter: T) -> Self {
        let mut this = Self::default();
        for point in iter {
            match point {
                SweepPoint::Success(result) => this.results.push(result),
                SweepPoint::Skipped(skip) => this.skipped.push(skip),
            }
        }
        this
    }
}
impl SweepOutcome {
    pub fn len(&self) -> usize {
        self.results.len()
    }
    /// `true` if every point was skipped
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
    pub fn summary(&self) {
        let max_value = |x: &[f64]| x.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let min_value = |x: &[f64]| x.iter().cloned().fold(f64::INFINITY, f64::min);

        println!("SUMMARY:");
        println!(" - # of rows: {}", self.len());
        println!(" - # of skipped object distances: {}", self.skipped.len());
        for skip in &self.skipped {
            println!("  - S = {:>10.3}: {}", skip.object_distance, skip.reason);
        }
        if self.is_empty() {
            println!(" - no object distance could be imaged");
            return;
        }
        if let Some(f) = self.results[0].focal_length {
            println!(" - focal length: {:.2}", f);
        } else {
            println!(" - focal length: afocal");
        }
        println!(
            "    {:^16}: ({:^12}, {:^12})",
            "QUANTITY", "MIN", "MAX"
        );
        let columns: [(&str, fn(&SystemResult) -> f64); 4] = [
            ("object distance", |r| r.object_distance),
            ("image distance", |r| r.image_distance),
            ("magnification", |r| r.magnification),
            ("linear res.", |r| r.linear_resolution),
        ];
        for (name, value) in columns {
            let values: Vec<f64> = self.results.iter().map(value).collect();
            println!(
                "  - {:16}: ({:>12.6}, {:>12.6})",
                name,
                min_value(&values),
                max_value(&values)
            );
        }
        println!(
            " - angular resolution: {:.6} deg",
            self.results[0].angular_resolution_deg
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    fn single_lens_sweep(focal_length: f64) -> Result<Sweep, Box<dyn Error>> {
        Ok(Sweep::new(
            LensElement::new(focal_length)?,
            SweepRange::new(10., 99., 1.)?,
            DiffractionLimit::new(0.000055, 1.)?,
        ))
    }

    #[test]
    fn skips_focal_plane() -> Result<(), Box<dyn Error>> {
        let outcome = single_lens_sweep(25.)?.run();
        let s: Vec<_> = outcome.results.iter().map(|r| r.object_distance).collect();
        let expected: Vec<_> = (10..=99).filter(|&s| s != 25).map(|s| s as f64).collect();
        assert_eq!(s, expected);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].object_distance, 25.);
        assert_eq!(
            outcome.skipped[0].reason,
            Degenerate::FocalPlane { focal_length: 25. }
        );
        Ok(())
    }

    #[test]
    fn magnification_invariant() -> Result<(), Box<dyn Error>> {
        let outcome = single_lens_sweep(25.)?.run();
        for r in &outcome.results {
            assert!(
                (r.magnification * r.object_distance + r.image_distance).abs() < 1e-9,
                "{r:?}"
            );
            assert_eq!(r.focal_length, Some(25.));
        }
        Ok(())
    }

    #[test]
    fn linear_resolution_follows_distance() -> Result<(), Box<dyn Error>> {
        let outcome = single_lens_sweep(25.)?.run();
        let at = |s: f64| {
            outcome
                .results
                .iter()
                .find(|r| r.object_distance == s)
                .map(|r| r.linear_resolution)
        };
        assert_eq!(at(20.).unwrap(), 2. * at(10.).unwrap());
        Ok(())
    }

    #[test]
    fn tagged_points() -> Result<(), Box<dyn Error>> {
        let sweep = single_lens_sweep(25.)?;
        assert!(matches!(sweep.evaluate(30.), SweepPoint::Success(_)));
        assert_eq!(
            sweep.evaluate(25.),
            SweepPoint::Skipped(Skip {
                object_distance: 25.,
                reason: Degenerate::FocalPlane { focal_length: 25. }
            })
        );
        let points = sweep.points();
        assert_eq!(points.len(), 90);
        Ok(())
    }

    #[test]
    fn object_on_lens_is_skipped() -> Result<(), Box<dyn Error>> {
        let sweep = Sweep::new(
            LensElement::new(5.)?,
            SweepRange::new(-2., 2., 1.)?,
            DiffractionLimit::new(0.000055, 1.)?,
        );
        let outcome = sweep.run();
        assert_eq!(outcome.len(), 4);
        assert_eq!(outcome.skipped[0].reason, Degenerate::LensPlane);
        Ok(())
    }

    #[test]
    fn all_points_degenerate() -> Result<(), Box<dyn Error>> {
        let sweep = Sweep::new(
            LensElement::new(25.)?,
            SweepRange::new(25., 25., 1.)?,
            DiffractionLimit::new(0.000055, 1.)?,
        );
        let outcome = sweep.run();
        assert!(outcome.is_empty());
        assert_eq!(outcome.skipped.len(), 1);
        Ok(())
    }

    #[test]
    fn system_sweep() -> Result<(), Box<dyn Error>> {
        let system = OpticalSystem::new(&[50., 20.], &[30.])?;
        let sweep = Sweep::new(
            system,
            SweepRange::new(100., 300., 50.)?,
            DiffractionLimit::new(0.000055, 1.)?,
        );
        let outcome = sweep.run();
        // u1 = 50 is never visited, every point is imaged
        assert_eq!(outcome.len(), 5);
        let last = outcome.results.last().unwrap();
        assert_eq!(last.object_distance, 300.);
        assert!((last.image_distance - 12.).abs() < 1e-9);
        assert!((last.magnification + 0.08).abs() < 1e-9);
        assert!((last.focal_length.unwrap() - 25.).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn system_degenerate_point() -> Result<(), Box<dyn Error>> {
        let system = OpticalSystem::new(&[50., 20.], &[30.])?;
        let sweep = Sweep::new(
            system,
            SweepRange::new(40., 60., 10.)?,
            DiffractionLimit::new(0.000055, 1.)?,
        );
        let outcome = sweep.run();
        assert_eq!(outcome.len(), 2);
        assert_eq!(outcome.skipped.len(), 1);
        assert!(matches!(
            outcome.skipped[0].reason,
            Degenerate::Element { index: 1, .. }
        ));
        Ok(())
    }

    #[test]
    fn range() -> Result<(), Box<dyn Error>> {
        let range = SweepRange::new(0., 1., 0.1)?;
        assert_eq!(range.len(), 11);
        assert!((range.points().last().unwrap() - 1.).abs() < 1e-12);
        assert_eq!(SweepRange::default().len(), 90);
        assert_eq!(SweepRange::new(5., 5., 1.)?.len(), 1);
        assert!(matches!(
            SweepRange::new(10., 5., 1.),
            Err(ConfigurationError::SweepRange { .. })
        ));
        assert!(matches!(
            SweepRange::new(5., 10., 0.),
            Err(ConfigurationError::SweepStep(_))
        ));
        assert!(SweepRange::new(f64::NAN, 10., 1.).is_err());
        Ok(())
    }

    #[test]
    fn range_size() -> Result<(), Box<dyn Error>> {
        assert!(matches!(
            SweepRange::new(0., 1e300, 1e-300),
            Err(ConfigurationError::SweepSize { .. })
        ));
        assert!(matches!(
            SweepRange::new(-f64::MAX, f64::MAX, 1.),
            Err(ConfigurationError::SweepSize { .. })
        ));
        assert!(SweepRange::new(0., MAX_POINTS as f64, 1.).is_err());
        let range = SweepRange::new(1., MAX_POINTS as f64, 1.)?;
        assert_eq!(range.len(), MAX_POINTS);
        assert!(!range.is_empty());
        Ok(())
    }

    #[test]
    fn progress_bar_sweep() -> Result<(), Box<dyn Error>> {
        let sweep = single_lens_sweep(25.)?;
        let outcome = sweep.run_with_progress(ProgressBar::hidden());
        assert_eq!(outcome, sweep.run());
        assert!(outcome
            .results
            .windows(2)
            .all(|w| w[0].object_distance < w[1].object_distance));
        assert_eq!(
            sweep.points_with_progress(ProgressBar::hidden()),
            sweep.points()
        );
        Ok(())
    }
}
