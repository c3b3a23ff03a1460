// Speedup calculation: serial baseline / parallel timing, cell by cell

use crate::benchmarks::{Baseline, Matrix, ResultMatrix, Shape, SpeedupMatrix};
use crate::config::Configuration;
use crate::errors::{BenchError, BenchResult};

/// Build a speedup matrix of the same shape as `results`.
///
/// A zero timing on either side is a measurement defect upstream and is
/// reported instead of producing an infinite or zero speedup.
pub fn compute_speedups(
    results: &ResultMatrix,
    baseline: &Baseline,
    config: &Configuration,
) -> BenchResult<SpeedupMatrix> {
    results.ensure_shape(config)?;
    let expected = Shape::of(config);
    if baseline.len() != expected.sizes {
        return Err(BenchError::invalid_configuration(format!(
            "Baseline has {} entries for {} sizes",
            baseline.len(),
            expected.sizes
        )));
    }

    for (size, serial) in baseline.iter() {
        if serial == 0.0 {
            return Err(BenchError::degenerate_measurement(format!(
                "Serial baseline for size '{}' is zero",
                size
            )));
        }
    }

    let mut speedups = Matrix::zeros(expected);
    for index in results.indices() {
        let serial = baseline.at(index.size).unwrap_or(0.0);
        let parallel = results.get(index).unwrap_or(0.0);
        let ratio = speedup(serial, parallel).ok_or_else(|| {
            BenchError::degenerate_measurement(format!(
                "Timing for mode '{}', size '{}', {} threads is zero",
                config.modes()[index.mode],
                config.sizes()[index.size],
                config.threads()[index.thread]
            ))
        })?;
        speedups.set(index, ratio);
    }

    Ok(speedups)
}

/// Speedup of one parallel timing over a serial one, if defined.
pub fn speedup(serial: f64, parallel: f64) -> Option<f64> {
    if parallel == 0.0 {
        None
    } else {
        Some(serial / parallel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    fn config(sizes: &[&str], modes: &[&str], threads: &[usize]) -> Configuration {
        Configuration::new(
            sizes.iter().map(|s| s.to_string()).collect(),
            modes.iter().map(|s| s.to_string()).collect(),
            threads.to_vec(),
        )
        .unwrap()
    }

    #[test]
    fn test_single_size_scenario() {
        let config = config(&["small"], &["pipeline"], &[2, 4]);
        let results = Matrix::from_nested(vec![vec![vec![1.0, 0.5]]]);
        let baseline = Baseline::new(vec![("small".into(), 2.0)]);

        let speedups = compute_speedups(&results, &baseline, &config).unwrap();
        assert_eq!(speedups.into_nested(), vec![vec![vec![2.0, 4.0]]]);
    }

    #[test]
    fn test_each_cell_uses_its_own_size_baseline() {
        let config = config(&["small", "big"], &["pipeline", "bsp"], &[2, 4, 8]);
        let results = Matrix::from_nested(vec![
            vec![vec![0.7, 0.41, 0.3], vec![3.3, 1.9, 1.1]],
            vec![vec![0.9, 0.6, 0.45], vec![4.1, 2.2, 1.7]],
        ]);
        let baseline = Baseline::new(vec![("small".into(), 1.3), ("big".into(), 6.1)]);

        let speedups = compute_speedups(&results, &baseline, &config).unwrap();
        assert_eq!(speedups.shape(), results.shape());
        for index in results.indices() {
            let expected = baseline.at(index.size).unwrap() / results.get(index).unwrap();
            assert!((speedups.get(index).unwrap() - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_zero_parallel_timing_is_fatal() {
        let config = config(&["small"], &["bsp"], &[2, 4]);
        let results = Matrix::from_nested(vec![vec![vec![1.0, 0.0]]]);
        let baseline = Baseline::new(vec![("small".into(), 2.0)]);

        let err = compute_speedups(&results, &baseline, &config).unwrap_err();
        assert_eq!(err.kind, ErrorKind::DegenerateMeasurement);
        assert!(err.message.contains("4 threads"));
    }

    #[test]
    fn test_zero_baseline_is_fatal() {
        let config = config(&["small"], &["bsp"], &[2]);
        let results = Matrix::from_nested(vec![vec![vec![1.0]]]);
        let baseline = Baseline::new(vec![("small".into(), 0.0)]);

        let err = compute_speedups(&results, &baseline, &config).unwrap_err();
        assert_eq!(err.kind, ErrorKind::DegenerateMeasurement);
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let config = config(&["small"], &["bsp"], &[2, 4]);
        let results = Matrix::from_nested(vec![vec![vec![1.0]]]);
        let baseline = Baseline::new(vec![("small".into(), 2.0)]);
        assert!(compute_speedups(&results, &baseline, &config).is_err());
    }

    #[test]
    fn test_speedup_helper() {
        assert_eq!(speedup(10.0, 2.5), Some(4.0));
        assert_eq!(speedup(1.0, 0.0), None);
    }
}
