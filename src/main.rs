// File: src/main.rs
//
// Main entry point for the speedup benchmark harness.
// Resolves the run configuration, drives the external benchmark target
// through every (mode, size, thread count) combination, and writes one
// speedup plot per mode.

use clap::Parser as ClapParser;
use speedup_bench::benchmarks::{
    Orchestrator, ProcessTimingSource, Reporter, SpeedupReport, Timer, TrialRunner,
};
use speedup_bench::config::{Overrides, Preset, Settings, SettingsFile};
use speedup_bench::errors::BenchResult;
use speedup_bench::graph::GraphRenderer;
use std::path::PathBuf;
use std::process;

#[derive(ClapParser)]
#[command(
    name = "speedup-bench",
    about = "Measure how a program's run time scales with thread count and plot the speedups",
    version = env!("CARGO_PKG_VERSION"),
    long_about = None
)]
struct Cli {
    /// Omit for the full matrix; `small` runs one size, one mode, one thread count
    preset: Option<String>,

    /// TOML file with program, runs, output_dir and a [matrix] table
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Benchmark target executable (default: go run ../editor/editor.go)
    #[arg(long, value_name = "PROGRAM")]
    program: Option<String>,

    /// Fixed argument passed to the target before the size (repeatable)
    #[arg(long = "program-arg", value_name = "ARG", allow_hyphen_values = true)]
    program_args: Vec<String>,

    /// Invocations averaged per trial
    #[arg(long)]
    runs: Option<usize>,

    /// Directory the plots are written to
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Print the speedup matrix as JSON instead of the progress report
    #[arg(long)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprint!("{}", err);
        process::exit(1);
    }
}

fn run(cli: Cli) -> BenchResult<()> {
    // Validated before anything is spawned.
    let preset = Preset::from_arg(cli.preset.as_deref())?;
    let file = match &cli.config {
        Some(path) => SettingsFile::load(path)?,
        None => SettingsFile::default(),
    };
    let overrides = Overrides {
        program: cli.program,
        program_args: cli.program_args,
        runs: cli.runs,
        output_dir: cli.output_dir,
    };
    let settings = Settings::resolve(file, overrides, preset)?;
    let config = &settings.configuration;
    let human = !cli.json;

    if human {
        Reporter::print_header("Thread Scaling Benchmark");
        Reporter::print_settings(&settings);
    }

    let timer = Timer::start();
    let source = ProcessTimingSource::new(settings.program.clone());
    let runner = TrialRunner::new(source).with_runs(settings.runs);
    let mut orchestrator = Orchestrator::new(config, runner);
    let run = orchestrator.run_with_progress(|invocation, mean, stats| {
        if human {
            Reporter::print_trial(invocation, mean, stats);
        }
    })?;

    let speedups = run.speedups(config)?;
    let written = GraphRenderer::new(&settings.output_dir).render(&speedups, config)?;

    if human {
        Reporter::print_speedup_table(config, &run.baseline, &speedups);
        Reporter::print_artifacts(&written);
        Reporter::print_summary(
            config.sizes().len() + config.parallel_cells(),
            settings.runs,
            timer.elapsed_secs(),
        );
    } else {
        println!("{}", SpeedupReport::new(config, &run.baseline, &speedups).to_json()?);
    }

    Ok(())
}
