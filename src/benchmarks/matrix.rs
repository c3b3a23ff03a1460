// Result containers: the serial baseline and the mode x size x thread matrix

use crate::config::Configuration;
use crate::errors::{BenchError, BenchResult};
use serde::Serialize;

/// Dimensions of a matrix: mode count, size count, thread-count count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    pub modes: usize,
    pub sizes: usize,
    pub threads: usize,
}

impl Shape {
    pub fn of(config: &Configuration) -> Self {
        Self {
            modes: config.modes().len(),
            sizes: config.sizes().len(),
            threads: config.threads().len(),
        }
    }
}

/// Position of one cell, in configuration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellIndex {
    pub mode: usize,
    pub size: usize,
    pub thread: usize,
}

/// Averaged serial timing per workload size, in configuration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Baseline {
    entries: Vec<(String, f64)>,
}

impl Baseline {
    pub fn new(entries: Vec<(String, f64)>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn at(&self, size_index: usize) -> Option<f64> {
        self.entries.get(size_index).map(|(_, t)| *t)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(label, t)| (label.as_str(), *t))
    }
}

/// Three-level matrix indexed by mode, then size, then thread count.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Matrix {
    cells: Vec<Vec<Vec<f64>>>,
}

/// Averaged parallel timings in seconds.
pub type ResultMatrix = Matrix;

/// Baseline / parallel timing ratios.
pub type SpeedupMatrix = Matrix;

impl Matrix {
    pub fn zeros(shape: Shape) -> Self {
        Self { cells: vec![vec![vec![0.0; shape.threads]; shape.sizes]; shape.modes] }
    }

    pub fn from_nested(cells: Vec<Vec<Vec<f64>>>) -> Self {
        Self { cells }
    }

    /// Shape taken from the first row at each level; see `is_rectangular`.
    pub fn shape(&self) -> Shape {
        let sizes = self.cells.first().map_or(0, |m| m.len());
        let threads = self.cells.first().and_then(|m| m.first()).map_or(0, |s| s.len());
        Shape { modes: self.cells.len(), sizes, threads }
    }

    pub fn is_rectangular(&self) -> bool {
        let shape = self.shape();
        self.cells
            .iter()
            .all(|m| m.len() == shape.sizes && m.iter().all(|s| s.len() == shape.threads))
    }

    /// Error unless the matrix is rectangular with exactly the configured dimensions.
    pub fn ensure_shape(&self, config: &Configuration) -> BenchResult<()> {
        let expected = Shape::of(config);
        if self.shape() != expected || !self.is_rectangular() {
            return Err(BenchError::invalid_configuration(format!(
                "Matrix is {:?} but the configuration describes {:?}",
                self.shape(),
                expected
            )));
        }
        Ok(())
    }

    pub fn get(&self, index: CellIndex) -> Option<f64> {
        self.cells.get(index.mode)?.get(index.size)?.get(index.thread).copied()
    }

    /// Panics if the index is out of bounds.
    pub fn set(&mut self, index: CellIndex, value: f64) {
        self.cells[index.mode][index.size][index.thread] = value;
    }

    /// All thread-count values for one (mode, size) pair.
    pub fn row(&self, mode: usize, size: usize) -> &[f64] {
        &self.cells[mode][size]
    }

    pub fn indices(&self) -> impl Iterator<Item = CellIndex> + '_ {
        self.cells.iter().enumerate().flat_map(|(mode, sizes)| {
            sizes.iter().enumerate().flat_map(move |(size, threads)| {
                (0..threads.len()).map(move |thread| CellIndex { mode, size, thread })
            })
        })
    }

    pub fn into_nested(self) -> Vec<Vec<Vec<f64>>> {
        self.cells
    }
}
