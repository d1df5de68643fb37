use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Scalar summary computed over every valid element of a variable.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Statistic {
    #[default]
    Mean,
    Min,
    Max,
    StdDev,
}

/// Single-pass accumulator (Welford's algorithm for the variance).
pub struct Accumulator {
    n_vals: usize,
    mean: f64,
    diff_2_sum: f64,
}

impl Accumulator {
    pub fn new() -> Self {
        Self {
            n_vals: 0,
            mean: 0.0,
            diff_2_sum: 0.0,
        }
    }

    pub fn add(&mut self, val: f64) {
        self.n_vals += 1;

        let diff_a = val - self.mean;
        self.mean += diff_a / self.n_vals as f64;

        let diff_b = val - self.mean;
        self.diff_2_sum += diff_a * diff_b;
    }

    /// Sample standard deviation, NaN for fewer than two values.
    pub fn std_dev(&self) -> f64 {
        if self.n_vals > 1 {
            (self.diff_2_sum / (self.n_vals as f64 - 1.0)).sqrt()
        } else {
            f64::NAN
        }
    }
}

/// Unrolled block length below which [`pairwise_sum`] stops splitting.
const PAIRWISE_BLOCK: usize = 128;

/// Pairwise summation with eight partial sums per block, the scheme NumPy
/// uses for `sum` and `mean` of floating-point arrays.
pub fn pairwise_sum(vals: &[f64]) -> f64 {
    let n_vals = vals.len();
    if n_vals < 8 {
        vals.iter().fold(0.0, |sum, &val| sum + val)
    } else if n_vals <= PAIRWISE_BLOCK {
        let mut part = [0.0; 8];
        part.copy_from_slice(&vals[..8]);

        let n_whole = n_vals - n_vals % 8;
        for chunk in vals[8..n_whole].chunks_exact(8) {
            for (sum, &val) in part.iter_mut().zip(chunk) {
                *sum += val;
            }
        }

        let mut sum = ((part[0] + part[1]) + (part[2] + part[3]))
            + ((part[4] + part[5]) + (part[6] + part[7]));
        for &val in &vals[n_whole..] {
            sum += val;
        }
        sum
    } else {
        let mut n_half = n_vals / 2;
        n_half -= n_half % 8;
        pairwise_sum(&vals[..n_half]) + pairwise_sum(&vals[n_half..])
    }
}

/// Reduce `vals` to `stat`, or `None` if `vals` is empty.
pub fn summarize(vals: &[f64], stat: Statistic) -> Option<f64> {
    if vals.is_empty() {
        return None;
    }
    let val = match stat {
        Statistic::Mean => pairwise_sum(vals) / vals.len() as f64,
        Statistic::Min => vals.iter().copied().fold(f64::INFINITY, f64::min),
        Statistic::Max => vals.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        Statistic::StdDev => {
            let mut acc = Accumulator::new();
            vals.iter().for_each(|&val| acc.add(val));
            acc.std_dev()
        }
    };
    Some(val)
}
