// Results formatting and reporting

use crate::benchmarks::{Baseline, SpeedupMatrix, Statistics, TrialInvocation};
use crate::config::{Configuration, Settings};
use crate::errors::{BenchError, BenchResult, ErrorKind};
use chrono::Local;
use colored::*;
use serde::Serialize;
use std::path::PathBuf;

/// Machine-readable summary printed by `--json`.
#[derive(Debug, Serialize)]
pub struct SpeedupReport<'a> {
    pub sizes: &'a [String],
    pub modes: &'a [String],
    pub threads: &'a [usize],
    pub baseline: Vec<f64>,
    pub speedups: &'a SpeedupMatrix,
}

impl<'a> SpeedupReport<'a> {
    pub fn new(
        config: &'a Configuration,
        baseline: &Baseline,
        speedups: &'a SpeedupMatrix,
    ) -> Self {
        Self {
            sizes: config.sizes(),
            modes: config.modes(),
            threads: config.threads(),
            baseline: baseline.iter().map(|(_, t)| t).collect(),
            speedups,
        }
    }

    pub fn to_json(&self) -> BenchResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| BenchError::new(ErrorKind::Io, format!("Failed to encode report: {}", e)))
    }
}

pub struct Reporter;

impl Reporter {
    pub fn print_header(title: &str) {
        let width = 80;
        println!("{}", "=".repeat(width).bright_blue());
        println!("{:^width$}", title.bright_white().bold(), width = width);
        println!("{}", "=".repeat(width).bright_blue());
        println!();
    }

    pub fn print_separator() {
        println!("{}", "-".repeat(80).blue());
    }

    pub fn print_settings(settings: &Settings) {
        let config = &settings.configuration;
        let started = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let program = settings.program.display_for(&TrialInvocation::serial("<size>"));
        println!("Started:    {}", started.bright_white());
        println!("Program:    {}", program.cyan());
        println!("Sizes:      {}", config.sizes().join(", ").yellow());
        println!("Modes:      {}", config.modes().join(", ").yellow());
        println!(
            "Threads:    {}",
            config.threads().iter().map(|t| t.to_string()).collect::<Vec<_>>().join(", ").yellow()
        );
        println!("Runs/trial: {}", settings.runs.to_string().yellow());
        println!(
            "Trials:     {} serial + {} parallel",
            config.sizes().len(),
            config.parallel_cells()
        );
        Self::print_separator();
    }

    pub fn print_trial(invocation: &TrialInvocation, mean: f64, stats: &Statistics) {
        let threads = match invocation.execution.threads() {
            Some(t) => format!("{:>2} threads", t),
            None => "          ".to_string(),
        };
        println!(
            "{} {:<10} {:<10} {} {:>12}  {}",
            "✓".green().bold(),
            invocation.execution.name().cyan(),
            invocation.size.bright_white(),
            threads,
            format!("{:.3} s", mean).yellow(),
            format!(
                "(median {}, min {}, max {}, σ {})",
                Statistics::format_seconds(stats.median),
                Statistics::format_seconds(stats.min),
                Statistics::format_seconds(stats.max),
                Statistics::format_seconds(stats.stddev)
            )
            .dimmed()
        );
    }

    pub fn print_speedup_table(
        config: &Configuration,
        baseline: &Baseline,
        speedups: &SpeedupMatrix,
    ) {
        println!();
        Self::print_header("Speedup vs Serial");

        for (m, mode) in config.modes().iter().enumerate() {
            println!("{}", mode.bright_white().bold());

            let mut header = format!("  {:<12} {:>10}", "size", "serial");
            for threads in config.threads() {
                header.push_str(&format!(" {:>8}", format!("t={}", threads)));
            }
            println!("{}", header.bright_white());

            for (s, size) in config.sizes().iter().enumerate() {
                let serial = baseline.at(s).map_or("N/A".to_string(), |t| format!("{:.3}s", t));
                let mut line = format!("  {:<12} {:>10}", size, serial);
                for value in speedups.row(m, s) {
                    let cell = format!(" {:>8}", format!("{:.2}x", value));
                    if *value >= 1.0 {
                        line.push_str(&cell.bright_green().to_string());
                    } else {
                        line.push_str(&cell.red().to_string());
                    }
                }
                println!("{}", line);
            }
            println!();
        }
    }

    pub fn print_artifacts(paths: &[PathBuf]) {
        for path in paths {
            let path = path.display().to_string();
            println!("{} wrote {}", "✓".green().bold(), path.bright_white());
        }
    }

    pub fn print_summary(trials: usize, runs: usize, elapsed_secs: f64) {
        println!();
        Self::print_separator();
        println!(
            "Trials: {}   Invocations: {}   Wall time: {}",
            trials.to_string().bright_white().bold(),
            (trials * runs).to_string().bright_white().bold(),
            Statistics::format_seconds(elapsed_secs).yellow()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::benchmarks::Matrix;

    #[test]
    fn test_json_report_layout() {
        let config =
            Configuration::new(vec!["small".into()], vec!["pipeline".into()], vec![2, 4])
                .unwrap();
        let baseline = Baseline::new(vec![("small".into(), 2.0)]);
        let speedups = Matrix::from_nested(vec![vec![vec![2.0, 4.0]]]);

        let json = SpeedupReport::new(&config, &baseline, &speedups).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["modes"][0], "pipeline");
        assert_eq!(value["threads"], serde_json::json!([2, 4]));
        assert_eq!(value["baseline"], serde_json::json!([2.0]));
        assert_eq!(value["speedups"], serde_json::json!([[[2.0, 4.0]]]));
    }
}
