use structopt::{clap::AppSettings, StructOpt};
use thin_lens::{ObjectSpec, OpticalSystem};

#[derive(Debug, StructOpt)]
#[structopt(
    name = "trace",
    about = "Imaging through a two-lens system (objective and eyepiece)",
    setting = AppSettings::AllowNegativeNumbers
)]
struct Opt {
    /// Objective focal length
    #[structopt(long, default_value = "50")]
    objective: f64,
    /// Eyepiece focal length
    #[structopt(long, default_value = "20")]
    eyepiece: f64,
    /// Distance between the objective and the eyepiece
    #[structopt(short = "d", long, default_value = "30")]
    separation: f64,
    /// Object distance from the objective
    #[structopt(short = "u", long, default_value = "300")]
    object_distance: f64,
    /// Object height
    #[structopt(long)]
    height: Option<f64>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opt = Opt::from_args();

    let system = OpticalSystem::new(&[opt.objective, opt.eyepiece], &[opt.separation])?;
    let object = ObjectSpec {
        distance: opt.object_distance,
        height: opt.height,
    };
    let trace = system.image(&object)?;

    println!(
        "    {:^8}: {:>10} {:>10} {:>10} {:>10} {:>12}",
        "LENS", "POSITION", "F", "U", "V", "M"
    );
    for (k, (stage, lens)) in trace.stages.iter().zip(system.elements()).enumerate() {
        println!(
            "  - {:^8}: {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>12.4}",
            format!("#{}", k + 1),
            lens.position,
            stage.focal_length,
            stage.object_distance,
            stage.image_distance,
            stage.magnification
        );
    }
    for (k, stage) in trace.stages.iter().enumerate() {
        println!(" - image #{} at {:.2}", k + 1, stage.image_position);
    }
    println!(
        " - total magnification: {:.4} ({:.2}x, {})",
        trace.total_magnification,
        trace.magnification_scale(),
        if trace.is_inverted() {
            "inverted"
        } else {
            "upright"
        }
    );
    if let Some(height) = trace.image_height(&object) {
        println!(" - image height: {:.3}", height);
    }
    match system.effective_focal_length() {
        Some(efl) => println!(" - effective focal length: {:.2}", efl),
        None => println!(" - effective focal length: afocal"),
    }

    Ok(())
}
