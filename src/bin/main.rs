use indicatif::ProgressBar;
use structopt::{clap::AppSettings, StructOpt};
use thin_lens::{config, export, Calibration, LensRecord, OpticalSystemConfig};

#[derive(Debug, StructOpt)]
#[structopt(
    name = "thin-lens",
    about = "Thin lens imaging and diffraction limit over a range of object distances",
    setting = AppSettings::AllowNegativeNumbers
)]
struct Opt {
    /// Reference magnification for the focal length calibration
    #[structopt(short, long)]
    magnification: Option<f64>,
    /// Reference object distance for the focal length calibration
    #[structopt(short = "u", long)]
    object_distance: Option<f64>,
    /// Focal length of a single lens, bypassing the calibration
    #[structopt(short, long)]
    focal_length: Option<f64>,
    /// CSV lens table with "Focal Length" and "Separation" columns
    #[structopt(long)]
    lenses: Option<String>,
    /// Aperture diameter
    #[structopt(short = "d", long)]
    aperture: f64,
    /// Wavelength, in the same unit as the distances
    #[structopt(short, long, default_value = "0.000055")]
    wavelength: f64,
    /// First object distance
    #[structopt(short, long, default_value = "10")]
    start: f64,
    /// Last object distance
    #[structopt(short, long, default_value = "99")]
    end: f64,
    /// Object distance step
    #[structopt(long, default_value = "1")]
    step: f64,
    /// Save the results to a CSV file
    #[structopt(long)]
    csv: Option<String>,
    /// Display a progress bar
    #[structopt(long)]
    progress: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let opt = Opt::from_args();

    let lenses = match (&opt.lenses, opt.focal_length, opt.magnification, opt.object_distance) {
        (Some(path), _, _, _) => config::load_lenses(path)?,
        (None, Some(focal_length), _, _) => vec![LensRecord::last(focal_length)],
        (None, None, Some(magnification), Some(object_distance)) => {
            let calibration = Calibration::new(magnification, object_distance)?;
            println!(
                "Calibration: M0={}, u0={} -> I0={:.2}, F={:.2}",
                magnification,
                object_distance,
                calibration.image_distance,
                calibration.focal_length
            );
            vec![LensRecord::last(calibration.focal_length)]
        }
        _ => {
            return Err(
                "either a lens table, a focal length or a calibration reference (magnification and object distance) is required"
                    .into(),
            )
        }
    };

    let sweep = OpticalSystemConfig::new(lenses, opt.aperture)
        .wavelength(opt.wavelength)
        .start(opt.start)
        .end(opt.end)
        .step(opt.step)
        .build()?;

    let outcome = if opt.progress {
        sweep.run_with_progress(ProgressBar::new(sweep.range().len() as u64))
    } else {
        sweep.run()
    };
    outcome.summary();

    if let Some(filename) = opt.csv {
        if outcome.is_empty() {
            println!("No data to export.");
        } else {
            export::to_csv(&filename, &outcome.results)?;
            println!("Results written to {:?}", filename);
        }
    }

    Ok(())
}
