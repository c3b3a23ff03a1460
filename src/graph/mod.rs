// Graph rendering: one scatter-plot PNG per concurrency mode
//
// Each mode gets its own figure on a fresh canvas, so series never carry
// over between modes. Artifacts are named after the mode and replace any
// file left by a previous run.

pub mod figure;
pub mod glyphs;
pub mod raster;

pub use figure::{Figure, Series};

use crate::benchmarks::SpeedupMatrix;
use crate::config::Configuration;
use crate::errors::{BenchError, BenchResult};
use std::fs;
use std::path::PathBuf;

pub struct GraphRenderer {
    output_dir: PathBuf,
}

impl GraphRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self { output_dir: output_dir.into() }
    }

    /// `<output_dir>/<mode>.png`
    pub fn artifact_path(&self, mode: &str) -> PathBuf {
        self.output_dir.join(format!("{}.png", mode))
    }

    /// Build the figure for the mode at `mode_index`: one series per size,
    /// in configuration order.
    pub fn figure(
        &self,
        speedups: &SpeedupMatrix,
        config: &Configuration,
        mode_index: usize,
    ) -> BenchResult<Figure> {
        speedups.ensure_shape(config)?;
        let mode = config.modes().get(mode_index).ok_or_else(|| {
            BenchError::invalid_configuration(format!("No mode at index {}", mode_index))
        })?;

        let mut figure = Figure::new(mode.as_str(), config.threads().to_vec());
        for (s, size) in config.sizes().iter().enumerate() {
            figure.scatter(size.as_str(), speedups.row(mode_index, s));
        }
        Ok(figure)
    }

    /// Write one artifact per mode and return the written paths in mode order.
    /// Nothing is written when the matrix does not match the configuration.
    pub fn render(
        &self,
        speedups: &SpeedupMatrix,
        config: &Configuration,
    ) -> BenchResult<Vec<PathBuf>> {
        speedups.ensure_shape(config)?;

        fs::create_dir_all(&self.output_dir).map_err(|e| {
            let context =
                format!("Failed to create output directory '{}'", self.output_dir.display());
            BenchError::io(context, e)
        })?;

        let mut written = Vec::with_capacity(config.modes().len());
        for (m, mode) in config.modes().iter().enumerate() {
            let path = self.artifact_path(mode);
            if path.is_file() {
                fs::remove_file(&path).map_err(|e| {
                    BenchError::io(format!("Failed to remove stale '{}'", path.display()), e)
                })?;
            }

            let image = self.figure(speedups, config, m)?.render();
            image.save(&path).map_err(|e| BenchError::render(&path, e))?;
            written.push(path);
        }

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::benchmarks::Matrix;
    use crate::errors::ErrorKind;

    fn config() -> Configuration {
        Configuration::new(
            vec!["small".into(), "mixture".into(), "big".into()],
            vec!["pipeline".into(), "bsp".into()],
            vec![2, 4],
        )
        .unwrap()
    }

    fn speedups() -> SpeedupMatrix {
        Matrix::from_nested(vec![
            vec![vec![1.5, 2.5], vec![1.7, 2.9], vec![1.9, 3.4]],
            vec![vec![1.2, 2.0], vec![1.4, 2.2], vec![1.8, 3.0]],
        ])
    }

    #[test]
    fn test_artifact_path_is_derived_from_mode() {
        let renderer = GraphRenderer::new("graphs");
        assert_eq!(renderer.artifact_path("bsp"), PathBuf::from("graphs/bsp.png"));
    }

    #[test]
    fn test_figure_series_follow_size_order() {
        let renderer = GraphRenderer::new("graphs");
        let figure = renderer.figure(&speedups(), &config(), 1).unwrap();
        assert_eq!(figure.title, "bsp");
        assert_eq!(figure.legend(), ["small", "mixture", "big"]);
        assert_eq!(figure.x_ticks, vec![2, 4]);
        assert_eq!(figure.series[2].points, vec![(2.0, 1.8), (4.0, 3.0)]);
    }

    #[test]
    fn test_series_order_independent_of_mode_order() {
        let renderer = GraphRenderer::new("graphs");
        let reordered = Configuration::new(
            vec!["small".into(), "mixture".into(), "big".into()],
            vec!["bsp".into(), "pipeline".into()],
            vec![4, 2],
        )
        .unwrap();
        let figure = renderer.figure(&speedups(), &reordered, 0).unwrap();
        assert_eq!(figure.legend(), ["small", "mixture", "big"]);
    }

    #[test]
    fn test_mismatched_matrix_is_rejected_before_writing() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("graphs");
        let renderer = GraphRenderer::new(dir.clone());
        let short = Matrix::from_nested(vec![vec![vec![1.5, 2.5], vec![1.7, 2.9]]]);

        let err = renderer.render(&short, &config()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidConfiguration);
        assert!(!dir.exists());
        assert!(renderer.figure(&short, &config(), 0).is_err());
    }

    #[test]
    fn test_figure_rejects_unknown_mode_index() {
        let renderer = GraphRenderer::new("graphs");
        assert!(renderer.figure(&speedups(), &config(), 2).is_err());
    }
}
