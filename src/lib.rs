//! # Thin lens imaging calculator
//!
//! Image formation through chains of ideal thin lenses, with the diffraction
//! limited resolution of the aperture, swept over a range of object distances.
//!
//! ```
//! use thin_lens::{Calibration, DiffractionLimit, Sweep, SweepRange};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // lens giving an inverted image twice as large for an object 40 away
//! let calibration = Calibration::new(-2., 40.)?;
//! let sweep = Sweep::new(
//!     calibration.lens()?,
//!     SweepRange::new(10., 99., 1.)?,
//!     DiffractionLimit::with_aperture(1.)?,
//! );
//! let outcome = sweep.run();
//! assert_eq!(outcome.len() + outcome.skipped.len(), 90);
//! # Ok(())
//! # }
//! ```

pub mod calibration;
pub mod chain;
pub mod config;
pub mod diffraction;
pub mod error;
pub mod export;
pub mod lens;
pub mod refine;
pub mod sweep;

pub use calibration::{calibrate, Calibration};
pub use chain::{ImagingTrace, ObjectSpec, OpticalSystem, Stage};
pub use config::{LensRecord, OpticalSystemConfig};
pub use diffraction::{resolution, DiffractionLimit, Resolution};
pub use error::{ConfigurationError, Degenerate, Error};
pub use lens::{conjugate, image_distance, ImagePlane, LensElement};
pub use refine::{Bounds, Field, Refiner};
pub use sweep::{Imaging, Skip, Sweep, SweepOutcome, SweepPoint, SweepRange, SystemResult};
