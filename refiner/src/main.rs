use structopt::{clap::AppSettings, StructOpt};
use thin_lens::{export, Refiner};

#[derive(Debug, StructOpt)]
#[structopt(
    name = "refiner",
    about = "Selects the sweep results within bounds",
    setting = AppSettings::AllowNegativeNumbers
)]
struct Opt {
    /// Sweep results CSV file
    path: String,
    /// Refined results CSV file
    #[structopt(short, long, default_value = "refined_results.csv")]
    output: String,
    /// Minimum absolute total magnification
    #[structopt(long)]
    min_m_total: Option<f64>,
    /// Maximum absolute total magnification
    #[structopt(long)]
    max_m_total: Option<f64>,
    /// Minimum absolute final image distance
    #[structopt(long)]
    min_i2: Option<f64>,
    /// Maximum absolute final image distance
    #[structopt(long)]
    max_i2: Option<f64>,
    /// Minimum angular resolution [deg]
    #[structopt(long)]
    min_resolution: Option<f64>,
    /// Maximum angular resolution [deg]
    #[structopt(long)]
    max_resolution: Option<f64>,
    /// Minimum linear resolution
    #[structopt(long)]
    min_linear_fov: Option<f64>,
    /// Maximum linear resolution
    #[structopt(long)]
    max_linear_fov: Option<f64>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opt = Opt::from_args();

    let refiner = Refiner::default()
        .m_total(opt.min_m_total, opt.max_m_total)
        .image_distance(opt.min_i2, opt.max_i2)
        .resolution(opt.min_resolution, opt.max_resolution)
        .linear_fov(opt.min_linear_fov, opt.max_linear_fov);
    println!("Refining {} with: {}", opt.path, refiner);

    let rows = export::from_csv(&opt.path)?;
    let refined = refiner.refine(&rows)?;
    if refined.is_empty() {
        println!("No data matched the filtering criteria.");
        return Ok(());
    }

    export::to_csv(&opt.output, &refined)?;
    println!(
        "{}/{} rows saved to {:?}",
        refined.len(),
        rows.len(),
        opt.output
    );

    Ok(())
}
