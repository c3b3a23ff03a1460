// Statistical analysis for timing samples (seconds as f64)

#[derive(Debug, Clone, PartialEq)]
pub struct Statistics {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub stddev: f64,
    pub samples: usize,
}

impl Statistics {
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let mean = calculate_mean(samples);
        let median = calculate_median(samples);
        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let stddev = calculate_stddev(samples, mean);

        Some(Self {
            mean,
            median,
            min,
            max,
            stddev,
            samples: samples.len(),
        })
    }

    pub fn format_seconds(seconds: f64) -> String {
        if seconds < 1e-3 {
            format!("{:.2} µs", seconds * 1e6)
        } else if seconds < 1.0 {
            format!("{:.2} ms", seconds * 1e3)
        } else {
            format!("{:.3} s", seconds)
        }
    }
}

/// Round to `digits` decimal places on the exact decimal value of `value`,
/// ties to even.
pub fn round_to(value: f64, digits: usize) -> f64 {
    format!("{:.*}", digits, value).parse().unwrap_or(value)
}

fn calculate_mean(samples: &[f64]) -> f64 {
    samples.iter().sum::<f64>() / samples.len() as f64
}

fn calculate_median(samples: &[f64]) -> f64 {
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

fn calculate_stddev(samples: &[f64], mean: f64) -> f64 {
    let variance: f64 = samples
        .iter()
        .map(|s| {
            let diff = s - mean;
            diff * diff
        })
        .sum::<f64>()
        / samples.len() as f64;

    variance.sqrt()
}
