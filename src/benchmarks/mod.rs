// Benchmarking pipeline for thread-scaling measurements
//
// This module drives the external benchmark target through every
// configuration and turns the timings into speedups:
// - Serial baseline per workload size
// - One averaged timing per (mode, size, thread count)
// - Speedup = baseline / parallel timing
//
// Usage:
//   let source = ProcessTimingSource::new(ProgramCommand::default());
//   let mut orchestrator = Orchestrator::new(&config, TrialRunner::new(source));
//   let run = orchestrator.run()?;
//   let speedups = run.speedups(&config)?;

pub mod matrix;
pub mod orchestrator;
pub mod plan;
pub mod process;
pub mod reporter;
pub mod runner;
pub mod speedup;
pub mod stats;
pub mod timer;

pub use matrix::{Baseline, CellIndex, Matrix, ResultMatrix, Shape, SpeedupMatrix};
pub use orchestrator::{BenchmarkRun, Orchestrator};
pub use plan::TrialPlan;
pub use process::{ProcessTimingSource, ProgramCommand, TimingSource};
pub use reporter::{Reporter, SpeedupReport};
pub use runner::TrialRunner;
pub use speedup::compute_speedups;
pub use stats::Statistics;
pub use timer::Timer;

use crate::config::SERIAL_LABEL;

/// How the target is asked to execute a workload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Execution {
    Serial,
    Parallel { mode: String, threads: usize },
}

impl Execution {
    pub fn name(&self) -> &str {
        match self {
            Execution::Serial => SERIAL_LABEL,
            Execution::Parallel { mode, .. } => mode.as_str(),
        }
    }

    pub fn threads(&self) -> Option<usize> {
        match self {
            Execution::Serial => None,
            Execution::Parallel { threads, .. } => Some(*threads),
        }
    }
}

/// One execution of the external program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialInvocation {
    pub size: String,
    pub execution: Execution,
}

impl TrialInvocation {
    pub fn serial(size: impl Into<String>) -> Self {
        Self { size: size.into(), execution: Execution::Serial }
    }

    pub fn parallel(size: impl Into<String>, mode: impl Into<String>, threads: usize) -> Self {
        Self {
            size: size.into(),
            execution: Execution::Parallel { mode: mode.into(), threads },
        }
    }

    /// Arguments passed to the target: `<size>` or `<size> <mode> <threads>`.
    pub fn arguments(&self) -> Vec<String> {
        match &self.execution {
            Execution::Serial => vec![self.size.clone()],
            Execution::Parallel { mode, threads } => {
                vec![self.size.clone(), mode.clone(), threads.to_string()]
            }
        }
    }

    pub fn is_serial(&self) -> bool {
        matches!(self.execution, Execution::Serial)
    }
}
