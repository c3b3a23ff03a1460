// Trial plan - the ordered sequence of parallel trial invocations
//
// Order is mode outermost, then size, then thread count. The matrix index
// travels with each invocation, so consumers never rely on loop nesting.

use crate::benchmarks::{CellIndex, TrialInvocation};
use crate::config::Configuration;

/// Finite, restartable iterator over every parallel cell of a configuration.
#[derive(Debug, Clone)]
pub struct TrialPlan<'a> {
    config: &'a Configuration,
    next: usize,
}

impl<'a> TrialPlan<'a> {
    pub fn new(config: &'a Configuration) -> Self {
        Self { config, next: 0 }
    }

    /// Serial invocations that establish the baseline, one per size.
    pub fn baseline(config: &Configuration) -> impl Iterator<Item = TrialInvocation> + '_ {
        config.sizes().iter().map(|size| TrialInvocation::serial(size.as_str()))
    }

    fn index_at(&self, flat: usize) -> CellIndex {
        let threads = self.config.threads().len();
        let sizes = self.config.sizes().len();
        CellIndex {
            mode: flat / (threads * sizes),
            size: (flat / threads) % sizes,
            thread: flat % threads,
        }
    }
}

impl Iterator for TrialPlan<'_> {
    type Item = (CellIndex, TrialInvocation);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.config.parallel_cells() {
            return None;
        }
        let index = self.index_at(self.next);
        self.next += 1;

        let invocation = TrialInvocation::parallel(
            self.config.sizes()[index.size].as_str(),
            self.config.modes()[index.mode].as_str(),
            self.config.threads()[index.thread],
        );
        Some((index, invocation))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.config.parallel_cells().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TrialPlan<'_> {}
