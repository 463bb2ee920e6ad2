//! SwarmSim batch runner
//!
//! Reads a configuration file, runs the configured number of simulation
//! runs, and appends per-run statistics to the results file.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use swarmsim_core::config;
use swarmsim_core::results::ResultsWriter;
use swarmsim_engine::Simulator;

#[derive(Parser, Debug)]
#[command(name = "swarmsim", about = "Parallel lock-step robotic swarm simulator")]
struct Cli {
    /// Configuration file
    config: PathBuf,

    /// Override the worker thread count from the configuration
    #[arg(long)]
    threads: Option<usize>,

    /// Write the effective configuration to a file and exit
    #[arg(long, value_name = "PATH")]
    dump_config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut params = config::load_params(&cli.config)
        .with_context(|| format!("reading {}", cli.config.display()))?;
    if let Some(threads) = cli.threads {
        params.worker_threads = threads;
    }

    if let Some(path) = cli.dump_config {
        config::save_params(&params, &path)
            .with_context(|| format!("writing {}", path.display()))?;
        return Ok(());
    }

    let mut results = ResultsWriter::create(Path::new(&params.results_filename), &params)
        .with_context(|| format!("creating {}", params.results_filename))?;

    let sim = if params.initialize_from_file {
        Simulator::from_scenario(params.clone(), Path::new(&params.scenario_filename))
            .with_context(|| format!("loading scenario {}", params.scenario_filename))?
    } else {
        Simulator::new(params.clone()).context("building simulator")?
    };

    for run in 0..params.runs_number {
        if run > 0 {
            sim.restart();
        }
        sim.run();

        let stats = sim.statistics();
        info!(
            run,
            time_step = stats.time_step,
            reached_goal = stats.reached_goal,
            reach_ratio = stats.reach_ratio,
            collisions = stats.collisions,
            "run complete"
        );
        results.record_run(run, &stats).context("writing results")?;
    }

    let metrics = sim.metrics();
    info!(
        total_steps = metrics.total_steps,
        avg_step_time_ms = metrics.avg_step_time_ms,
        steps_per_second = metrics.steps_per_second,
        "batch complete"
    );

    Ok(())
}
