use std::fs;
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{ArgAction, Parser};

use kmc_rs::input::InputReader;
use kmc_rs::output::export::{CsvConfig, CsvExporter, CsvMetadata, Exporter, HeightMapExporter};
use kmc_rs::output::visualization::{plot_mean_height, plot_roughness};
use kmc_rs::solver::{KmcSolver, RunLimit, Scenario, Solver, SolverConfiguration};

/// Samples taken over a timed run when no interval is given
const DEFAULT_SAMPLES: f64 = 100.0;

#[derive(Parser)]
#[command(name = "kmc")]
#[command(about = "Kinetic Monte Carlo simulation of surface growth", long_about = None)]
struct Cli {
    /// Input description file
    input: PathBuf,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Random seed (0 or absent seeds from the clock)
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many events
    #[arg(long)]
    max_steps: Option<usize>,

    /// Simulated end time in seconds, overrides the `time` keyword
    #[arg(long)]
    end_time: Option<f64>,

    /// Sampling interval in simulated seconds
    #[arg(long, value_name = "SECONDS")]
    report_every: Option<f64>,

    /// Write SVG plots of roughness and mean height
    #[arg(long, action = ArgAction::SetTrue)]
    plot: bool,

    /// Write the final height map
    #[arg(long, action = ArgAction::SetTrue)]
    heights: bool,

    /// Verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG, when set, decides everything. Otherwise the logger passes
    // every record and the global maximum level is the switch.
    let from_env = std::env::var_os(env_logger::DEFAULT_FILTER_ENV).is_some();
    if from_env {
        env_logger::Builder::from_env(env_logger::Env::default()).init();
    } else {
        env_logger::Builder::new().filter_level(log::LevelFilter::Trace).init();
        log::set_max_level(match cli.verbose {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        });
    }

    // ====== Input ======

    let input = InputReader::new()
        .read_file(&cli.input)
        .with_context(|| format!("Failed to read {}", cli.input.display()))?;

    if !input.warnings.is_empty() {
        log::warn!("{} input line(s) were skipped", input.warnings.len());
    }
    if input.debug && !from_env && log::max_level() < log::LevelFilter::Debug {
        log::set_max_level(log::LevelFilter::Debug);
    }

    let scenario = Scenario::from_input(&input).context("Failed to set up the simulation")?;
    log::debug!("{:?}", scenario);

    // ====== Run configuration ======

    let end_time = cli.end_time.or(input.end_time);
    let limit = match (end_time, cli.max_steps) {
        (Some(end_time), Some(max_steps)) => RunLimit::TimeOrSteps { end_time, max_steps },
        (Some(end_time), None) => RunLimit::Time { end_time },
        (None, Some(max_steps)) => RunLimit::Steps { max_steps },
        (None, None) => bail!("No end time: add `time` to the input, or pass --end-time or --max-steps"),
    };

    let mut config = SolverConfiguration::new(limit)
        .with_metadata("input", &cli.input.display().to_string());
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    match (cli.report_every, end_time) {
        (Some(interval), _) => config = config.with_report_interval(interval),
        (None, Some(end_time)) => config = config.with_report_interval(end_time / DEFAULT_SAMPLES),
        (None, None) => {}
    }

    // ====== Run ======

    let solver = KmcSolver::new();
    let result = solver.solve(&scenario, &config).context("Simulation failed")?;

    if result.stop_reason.is_stalled() {
        bail!(
            "Simulation terminated at step {} (t = {:e} s): {}",
            result.steps,
            result.time,
            result.stop_reason
        );
    }

    println!("Solver:      {}", solver.name());
    println!("Seed:        {}", result.seed);
    println!("Events:      {}", result.steps);
    println!("Final time:  {:e} s", result.time);
    println!("Stopped:     {}", result.stop_reason);
    for (name, count) in result.process_names.iter().zip(&result.event_counts) {
        println!("  {:<20} {}", name, count);
    }
    if let Some(last) = result.last_sample() {
        println!("Roughness:   {:.6}", last.surface.roughness);
        println!("RMS:         {:.6}", last.surface.rms);
        println!("Growth rate: {:.6} ML/s", last.growth_rate);
    }

    // ====== Output ======

    fs::create_dir_all(&cli.output)
        .with_context(|| format!("Cannot create output directory {}", cli.output.display()))?;

    let csv_path = cli.output.join("growth.csv");
    let csv = CsvExporter::new(CsvConfig::default().with_metadata(CsvMetadata::from_result(&result)));
    csv.export(&result, None, &csv_path)
        .with_context(|| format!("Cannot write {}", csv_path.display()))?;

    if cli.heights {
        let path = cli.output.join("heights.dat");
        HeightMapExporter::default()
            .export(&result, None, &path)
            .with_context(|| format!("Cannot write {}", path.display()))?;
    }

    if cli.plot {
        plot_roughness(&result, cli.output.join("roughness.svg"), None)
            .map_err(|e| anyhow::anyhow!("Cannot plot roughness: {}", e))?;
        plot_mean_height(&result, cli.output.join("mean_height.svg"), None)
            .map_err(|e| anyhow::anyhow!("Cannot plot mean height: {}", e))?;
    }

    Ok(())
}
