// Benchmark orchestrator - runs the baseline and the full parallel sweep

use crate::benchmarks::{
    compute_speedups, Baseline, Matrix, ResultMatrix, Shape, SpeedupMatrix, Statistics,
    TimingSource, TrialInvocation, TrialPlan, TrialRunner,
};
use crate::config::Configuration;
use crate::errors::BenchResult;

/// Everything measured in one sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkRun {
    pub baseline: Baseline,
    pub results: ResultMatrix,
}

impl BenchmarkRun {
    pub fn speedups(&self, config: &Configuration) -> BenchResult<SpeedupMatrix> {
        compute_speedups(&self.results, &self.baseline, config)
    }
}

/// Walks the configuration strictly sequentially, one child process at a time.
pub struct Orchestrator<'a, S> {
    config: &'a Configuration,
    runner: TrialRunner<S>,
}

impl<'a, S: TimingSource> Orchestrator<'a, S> {
    pub fn new(config: &'a Configuration, runner: TrialRunner<S>) -> Self {
        Self { config, runner }
    }

    pub fn runner(&self) -> &TrialRunner<S> {
        &self.runner
    }

    pub fn run(&mut self) -> BenchResult<BenchmarkRun> {
        self.run_with_progress(|_, _, _| {})
    }

    /// Baseline first, then every (mode, size, thread) cell in plan order.
    /// `on_trial` sees each invocation with its rounded mean and raw spread.
    /// Any failure aborts the sweep; there are no partial results.
    pub fn run_with_progress<F>(&mut self, mut on_trial: F) -> BenchResult<BenchmarkRun>
    where
        F: FnMut(&TrialInvocation, f64, &Statistics),
    {
        let mut entries = Vec::with_capacity(self.config.sizes().len());
        for invocation in TrialPlan::baseline(self.config) {
            let (mean, stats) = self.runner.run_detailed(&invocation)?;
            on_trial(&invocation, mean, &stats);
            entries.push((invocation.size, mean));
        }
        let baseline = Baseline::new(entries);

        let mut results = Matrix::zeros(Shape::of(self.config));
        for (index, invocation) in TrialPlan::new(self.config) {
            let (mean, stats) = self.runner.run_detailed(&invocation)?;
            on_trial(&invocation, mean, &stats);
            results.set(index, mean);
        }

        Ok(BenchmarkRun { baseline, results })
    }
}
