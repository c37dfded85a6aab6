use std::path::PathBuf;

use clap::Parser;
use glace::output::{BackgroundWriter, CborWriter};
use glace::{Config, Simulation};
use log::LevelFilter;
use simple_logger::SimpleLogger;




#[derive(Debug, Parser)]
#[clap(version = "0.1", about = "Sod shock tube with the GLACE Lagrangian scheme")]
struct Opts {
    /// YAML run configuration; defaults reproduce the 100x10 Sod problem
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Size of the Rayon thread pool (0 uses one per core)
    #[clap(short = 't', long, default_value = "0")]
    threads: usize,

    #[clap(short, long, default_value = "frames")]
    output_dir: PathBuf,

    /// Run without writing any frames
    #[clap(long)]
    no_output: bool,

    #[clap(long, default_value = "info")]
    log_level: LevelFilter,
}




fn main() -> Result<(), Box<dyn std::error::Error>> {
    let opts = Opts::parse();
    SimpleLogger::new().with_level(opts.log_level).init()?;

    let config = match &opts.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(opts.threads)
        .build()?;

    let summary = pool.install(|| {
        let mut simulation = Simulation::new(config)?;

        if opts.no_output {
            simulation.run(&mut ())
        } else {
            let mut writer = BackgroundWriter::spawn(CborWriter::new(&opts.output_dir, "glace2d")?);
            let summary = simulation.run(&mut writer)?;
            writer.finish()?;
            Ok(summary)
        }
    })?;

    println!();
    println!("{}", summary);
    println!("iterations ............ {}", summary.iterations);
    println!("final time ............ {}", summary.final_time);
    println!("cpu ................... {:.3}s", summary.cpu_seconds);
    println!("io .................... {:.3}s", summary.io_seconds);
    Ok(())
}
