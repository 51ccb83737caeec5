//! Lensblank command-line interface.
//!
//! Compute lens blank geometry from TOML job files or direct arguments:
//! ```sh
//! lensblank-cli run job.toml
//! lensblank-cli validate job.toml
//! lensblank-cli calc --index 1.56 --blank-size 70 --base-curve 4.5 --sphere -6
//! ```

mod config;
mod runner;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use config::OutputFormat;
use lensblank_core::types::LensParams;

#[derive(Parser)]
#[command(name = "lensblank-cli")]
#[command(about = "Lensblank: spectacle lens surfacing calculator")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute every lens in a TOML job file.
    Run {
        /// Path to the job configuration file.
        config: PathBuf,
        /// Report format (overrides config file setting).
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Check that every lens in a job file can be constructed.
    Validate {
        /// Path to the job configuration file.
        config: PathBuf,
    },
    /// Compute a single lens from command-line parameters.
    Calc {
        /// Refractive index of the lens material.
        #[arg(long)]
        index: f64,
        /// Blank diameter (mm).
        #[arg(long)]
        blank_size: f64,
        /// Front base curve (D).
        #[arg(long)]
        base_curve: f64,
        /// Spherical power (D).
        #[arg(long, allow_hyphen_values = true)]
        sphere: f64,
        /// Cylindrical power (D).
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        cylinder: f64,
        /// Cylinder axis (degrees).
        #[arg(long, default_value_t = 0.0)]
        axis: f64,
        /// Minimum thickness (mm). Defaults from the index.
        #[arg(long)]
        min_thickness: Option<f64>,
        /// Report format.
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Decimal places in the text report.
        #[arg(long, default_value_t = 2)]
        precision: usize,
    },
}

fn print_reports(
    reports: &[runner::LensReport],
    format: OutputFormat,
    precision: usize,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => print!("{}", runner::render_text(reports, precision)?),
        OutputFormat::Json => println!("{}", runner::render_json(reports)?),
    }
    let failed = reports.iter().filter(|r| !r.is_ok()).count();
    if failed > 0 {
        anyhow::bail!("{} of {} lens(es) could not be computed", failed, reports.len());
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, format } => {
            let job = config::load_config(&config)?;
            log::info!("Configuration: {}", config.display());

            let reports = runner::run_job(&job);
            let format = format.unwrap_or(job.output.format);
            print_reports(&reports, format, job.output.precision)
        }
        Commands::Validate { config } => {
            let job = config::load_config(&config)?;
            let mut invalid = 0;
            for (name, result) in runner::validate_job(&job) {
                match result {
                    Ok(()) => println!("  ok       {}", name),
                    Err(e) => {
                        invalid += 1;
                        println!("  invalid  {}: {}", name, e);
                    }
                }
            }
            if invalid > 0 {
                anyhow::bail!("{} invalid lens(es) in {}", invalid, config.display());
            }
            println!("Configuration is valid: {}", config.display());
            Ok(())
        }
        Commands::Calc {
            index,
            blank_size,
            base_curve,
            sphere,
            cylinder,
            axis,
            min_thickness,
            format,
            precision,
        } => {
            let params = LensParams {
                cylinder,
                axis,
                min_thickness,
                ..LensParams::new(index, blank_size, base_curve, sphere)
            };
            let report = runner::run_lens("calc", &params);
            print_reports(&[report], format, precision)
        }
    }
}
