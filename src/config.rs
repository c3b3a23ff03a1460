// File: src/config.rs
//
// Run configuration for the harness.
// The benchmark matrix (sizes x modes x thread counts) is built once at
// startup and handed to the orchestrator by reference; it is never mutated
// afterwards. Settings layer a TOML file and command-line flags on top of
// the built-in defaults.

use crate::benchmarks::process::ProgramCommand;
use crate::errors::{BenchError, BenchResult};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Label reserved for the serial baseline; no parallel mode may use it.
pub const SERIAL_LABEL: &str = "serial";

/// Positional argument that selects the reduced single-cell run.
pub const REDUCED_KEYWORD: &str = "small";

pub const DEFAULT_RUNS: usize = 5;
pub const DEFAULT_OUTPUT_DIR: &str = "graphs";
pub const DEFAULT_SIZES: [&str; 3] = ["small", "mixture", "big"];
pub const DEFAULT_MODES: [&str; 2] = ["pipeline", "bsp"];
pub const DEFAULT_THREADS: [usize; 5] = [2, 4, 6, 8, 12];

/// The benchmark matrix: ordered size labels, mode labels and thread counts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawConfiguration")]
pub struct Configuration {
    sizes: Vec<String>,
    modes: Vec<String>,
    threads: Vec<usize>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfiguration {
    sizes: Vec<String>,
    modes: Vec<String>,
    threads: Vec<usize>,
}

impl TryFrom<RawConfiguration> for Configuration {
    type Error = BenchError;

    fn try_from(raw: RawConfiguration) -> BenchResult<Self> {
        Configuration::new(raw.sizes, raw.modes, raw.threads)
    }
}

impl Configuration {
    pub fn new(sizes: Vec<String>, modes: Vec<String>, threads: Vec<usize>) -> BenchResult<Self> {
        validate_labels("size", &sizes)?;
        validate_labels("mode", &modes)?;

        if let Some(mode) = modes.iter().find(|m| m.as_str() == SERIAL_LABEL) {
            return Err(BenchError::invalid_configuration(format!(
                "Mode label '{}' is reserved for the serial baseline",
                mode
            )));
        }

        if threads.is_empty() {
            return Err(BenchError::invalid_configuration("At least one thread count is required"));
        }
        if threads.contains(&0) {
            return Err(BenchError::invalid_configuration("Thread counts must be positive"));
        }
        for (i, count) in threads.iter().enumerate() {
            if threads[..i].contains(count) {
                return Err(BenchError::invalid_configuration(format!(
                    "Thread count {} is listed more than once",
                    count
                )));
            }
        }

        Ok(Self { sizes, modes, threads })
    }

    pub fn sizes(&self) -> &[String] {
        &self.sizes
    }

    pub fn modes(&self) -> &[String] {
        &self.modes
    }

    pub fn threads(&self) -> &[usize] {
        &self.threads
    }

    /// Single size, single mode, single thread count: the first of each.
    pub fn reduced(&self) -> Self {
        Self {
            sizes: self.sizes[..1].to_vec(),
            modes: self.modes[..1].to_vec(),
            threads: self.threads[..1].to_vec(),
        }
    }

    pub fn apply(&self, preset: Preset) -> Self {
        match preset {
            Preset::Full => self.clone(),
            Preset::Reduced => self.reduced(),
        }
    }

    /// Number of parallel trial configurations (excluding the serial baseline).
    pub fn parallel_cells(&self) -> usize {
        self.modes.len() * self.sizes.len() * self.threads.len()
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            sizes: DEFAULT_SIZES.iter().map(|s| s.to_string()).collect(),
            modes: DEFAULT_MODES.iter().map(|s| s.to_string()).collect(),
            threads: DEFAULT_THREADS.to_vec(),
        }
    }
}

fn validate_labels(what: &str, labels: &[String]) -> BenchResult<()> {
    if labels.is_empty() {
        return Err(BenchError::invalid_configuration(format!(
            "At least one {} label is required",
            what
        )));
    }
    for (i, label) in labels.iter().enumerate() {
        if label.trim().is_empty() {
            return Err(BenchError::invalid_configuration(format!("Empty {} label", what)));
        }
        if label.contains('/') || label.contains('\\') {
            return Err(BenchError::invalid_configuration(format!(
                "{} label '{}' must not contain path separators",
                what, label
            )));
        }
        if labels[..i].contains(label) {
            return Err(BenchError::invalid_configuration(format!(
                "{} label '{}' is listed more than once",
                what, label
            )));
        }
    }
    Ok(())
}

/// Which slice of the configured matrix to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Full,
    Reduced,
}

impl Preset {
    pub fn from_arg(arg: Option<&str>) -> BenchResult<Self> {
        match arg {
            None => Ok(Preset::Full),
            Some(REDUCED_KEYWORD) => Ok(Preset::Reduced),
            Some(other) => Err(BenchError::invalid_argument(other).with_help(format!(
                "run with no arguments for the full matrix, or '{}' for a quick single-cell run",
                REDUCED_KEYWORD
            ))),
        }
    }
}

/// Contents of a `--config` TOML file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsFile {
    pub program: Option<Vec<String>>,
    pub runs: Option<usize>,
    pub output_dir: Option<PathBuf>,
    pub matrix: Option<Configuration>,
}

impl SettingsFile {
    pub fn load(path: &Path) -> BenchResult<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| BenchError::io(format!("Failed to read config '{}'", path.display()), e))?;
        Self::parse(&text).map_err(|e| e.with_command(path.display().to_string()))
    }

    pub fn parse(text: &str) -> BenchResult<Self> {
        toml::from_str(text).map_err(|e| BenchError::invalid_configuration(e.to_string()))
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub program: Option<String>,
    pub program_args: Vec<String>,
    pub runs: Option<usize>,
    pub output_dir: Option<PathBuf>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub configuration: Configuration,
    pub program: ProgramCommand,
    pub runs: usize,
    pub output_dir: PathBuf,
}

impl Settings {
    pub fn resolve(file: SettingsFile, overrides: Overrides, preset: Preset) -> BenchResult<Self> {
        let mut program = match file.program {
            Some(argv) => ProgramCommand::from_argv(argv)?,
            None => ProgramCommand::default(),
        };
        if let Some(path) = overrides.program {
            program = ProgramCommand::new(path, overrides.program_args);
        } else if !overrides.program_args.is_empty() {
            program = ProgramCommand::new(program.program, overrides.program_args);
        }

        let runs = overrides.runs.or(file.runs).unwrap_or(DEFAULT_RUNS);
        if runs == 0 {
            return Err(BenchError::invalid_configuration("runs must be at least 1"));
        }

        let output_dir = overrides
            .output_dir
            .or(file.output_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

        let configuration = file.matrix.unwrap_or_default().apply(preset);

        Ok(Self { configuration, program, runs, output_dir })
    }
}
