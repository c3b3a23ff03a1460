// Trial runner - repeats one invocation and averages the timings

use crate::benchmarks::stats::{round_to, Statistics};
use crate::benchmarks::{TimingSource, TrialInvocation};
use crate::config::DEFAULT_RUNS;
use crate::errors::{BenchError, BenchResult};

/// Decimal places kept on every averaged timing.
pub const MEAN_DIGITS: usize = 3;

pub struct TrialRunner<S> {
    source: S,
    runs: usize,
}

impl<S: TimingSource> TrialRunner<S> {
    pub fn new(source: S) -> Self {
        Self { source, runs: DEFAULT_RUNS }
    }

    /// Zero is clamped to one run.
    pub fn with_runs(mut self, runs: usize) -> Self {
        self.runs = runs.max(1);
        self
    }

    pub fn runs(&self) -> usize {
        self.runs
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Run the invocation `runs` times and return every sample.
    /// The first failure aborts the trial.
    pub fn collect(&mut self, invocation: &TrialInvocation) -> BenchResult<Vec<f64>> {
        let mut samples = Vec::with_capacity(self.runs);
        for _ in 0..self.runs {
            samples.push(self.source.measure(invocation)?);
        }
        Ok(samples)
    }

    /// Arithmetic mean of `runs` measurements, rounded to 3 decimals.
    pub fn run(&mut self, invocation: &TrialInvocation) -> BenchResult<f64> {
        Ok(self.run_detailed(invocation)?.0)
    }

    /// Rounded mean together with the spread of the raw samples.
    pub fn run_detailed(&mut self, invocation: &TrialInvocation) -> BenchResult<(f64, Statistics)> {
        let samples = self.collect(invocation)?;
        let stats = Statistics::from_samples(&samples)
            .ok_or_else(|| BenchError::invocation_failed("Trial produced no samples"))?;
        Ok((round_to(stats.mean, MEAN_DIGITS), stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    /// Replays a fixed sequence of timings and records what it was asked.
    struct ScriptedSource {
        timings: Vec<f64>,
        calls: Vec<TrialInvocation>,
        fail_at: Option<usize>,
    }

    impl ScriptedSource {
        fn new(timings: Vec<f64>) -> Self {
            Self { timings, calls: Vec::new(), fail_at: None }
        }
    }

    impl TimingSource for ScriptedSource {
        fn measure(&mut self, invocation: &TrialInvocation) -> BenchResult<f64> {
            let index = self.calls.len();
            self.calls.push(invocation.clone());
            if self.fail_at == Some(index) {
                return Err(BenchError::invocation_failed("exited with status 1"));
            }
            Ok(self.timings[index % self.timings.len()])
        }
    }

    #[test]
    fn test_default_is_five_runs() {
        let runner = TrialRunner::new(ScriptedSource::new(vec![1.0]));
        assert_eq!(runner.runs(), 5);
    }

    #[test]
    fn test_mean_of_five_runs() {
        let mut runner = TrialRunner::new(ScriptedSource::new(vec![1.0, 2.0, 3.0, 4.0, 5.5]));
        let mean = runner.run(&TrialInvocation::serial("small")).unwrap();
        assert!((mean - 3.1).abs() < 1e-9);
        assert_eq!(runner.source().calls.len(), 5);
    }

    #[test]
    fn test_mean_just_below_tie_rounds_down() {
        let mut runner = TrialRunner::new(ScriptedSource::new(vec![1.0005])).with_runs(1);
        let mean = runner.run(&TrialInvocation::serial("small")).unwrap();
        assert_eq!(mean, 1.0);
    }

    #[test]
    fn test_mean_is_rounded_to_three_decimals() {
        let timings = vec![0.12345, 0.12346, 0.12344, 0.12345, 0.12345];
        let mut runner = TrialRunner::new(ScriptedSource::new(timings));
        let mean = runner.run(&TrialInvocation::parallel("big", "bsp", 4)).unwrap();
        assert_eq!(mean, 0.123);
    }

    #[test]
    fn test_every_run_uses_identical_parameters() {
        let mut runner = TrialRunner::new(ScriptedSource::new(vec![1.0]));
        let invocation = TrialInvocation::parallel("mixture", "pipeline", 6);
        runner.run(&invocation).unwrap();
        assert!(runner.source().calls.iter().all(|call| *call == invocation));
    }

    #[test]
    fn test_failure_aborts_trial() {
        let mut source = ScriptedSource::new(vec![1.0]);
        source.fail_at = Some(2);
        let mut runner = TrialRunner::new(source);
        let err = runner.run(&TrialInvocation::serial("small")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvocationFailed);
        assert_eq!(runner.source().calls.len(), 3);
    }

    #[test]
    fn test_configurable_run_count() {
        let mut runner = TrialRunner::new(ScriptedSource::new(vec![2.0, 4.0])).with_runs(2);
        let (mean, stats) = runner.run_detailed(&TrialInvocation::serial("small")).unwrap();
        assert_eq!(mean, 3.0);
        assert_eq!(stats.samples, 2);
        assert_eq!(stats.min, 2.0);
        assert_eq!(stats.max, 4.0);
    }
}
