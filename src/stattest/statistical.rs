//! Statistical helper functions shared by the tests.

use std::cmp::Ordering;

use statrs::function::erf::erfc;
use statrs::function::factorial::binomial;
use statrs::function::gamma::gamma_ur;

/// Probability floor substituted for empty histogram bins.
pub const ZERO_BIN_PROBABILITY: f64 = 0.0001;

/// Smallest spread used to norm the Wasserstein distance.
pub const MIN_NORM: f64 = 0.001;

/// Standard normal CDF
pub fn standard_normal_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / std::f64::consts::SQRT_2)
}

/// Upper tail of the chi-square distribution with `df` degrees of freedom.
pub fn chi_square_p_value(chi_sq: f64, df: usize) -> f64 {
    if df == 0 || chi_sq <= 0.0 {
        return 1.0;
    }
    if chi_sq.is_infinite() {
        return 0.0;
    }
    gamma_ur(df as f64 / 2.0, chi_sq / 2.0).clamp(0.0, 1.0)
}

/// Largest `n1 * n2` for which the K-S p-value is computed exactly.
pub const KS_EXACT_MAX_CELLS: usize = 10_000;

/// Two-sided p-value of the two-sample K-S statistic `d`.
///
/// Exact for `n1 * n2 <= KS_EXACT_MAX_CELLS`, asymptotic with Stephens'
/// correction above that.
pub fn ks_p_value(d: f64, n1: usize, n2: usize) -> f64 {
    if n1 == 0 || n2 == 0 || d <= 0.0 {
        return 1.0;
    }
    if n1.saturating_mul(n2) <= KS_EXACT_MAX_CELLS {
        return ks_exact_p_value(d, n1, n2);
    }
    let en = (n1 as f64 * n2 as f64 / (n1 + n2) as f64).sqrt();
    ks_asymptotic_p_value((en + 0.12 + 0.11 / en) * d)
}

/// Exact two-sided p-value by lattice path counting.
///
/// Under the null every monotone path from `(0, 0)` to `(n1, n2)` is
/// equally likely. The p-value is the share of paths that leave the band
/// `|i/n1 - j/n2| < d`, compared in integer units of `1 / (n1 * n2)`.
pub fn ks_exact_p_value(d: f64, n1: usize, n2: usize) -> f64 {
    if n1 == 0 || n2 == 0 || d <= 0.0 {
        return 1.0;
    }
    let h = (d * n1 as f64 * n2 as f64).round() as i64;
    let inside = |i: usize, j: usize| ((i * n2) as i64 - (j * n1) as i64).abs() < h;

    // paths[j] holds the in-band path count to (i, j) for the current row i
    let mut paths = vec![0.0f64; n2 + 1];
    for i in 0..=n1 {
        for j in 0..=n2 {
            paths[j] = if !inside(i, j) {
                0.0
            } else if i == 0 && j == 0 {
                1.0
            } else {
                let from_left = if j > 0 { paths[j - 1] } else { 0.0 };
                paths[j] + from_left
            };
        }
    }

    let total = binomial((n1 + n2) as u64, n1 as u64);
    (1.0 - paths[n2] / total).clamp(0.0, 1.0)
}

/// Kolmogorov distribution tail `P(K > lambda)`, the large-sample limit of
/// the scaled K-S statistic.
pub fn ks_asymptotic_p_value(lambda: f64) -> f64 {
    if lambda <= 0.0 {
        return 1.0;
    }
    // 2 * sum_{k>=1} (-1)^(k+1) * exp(-2 k^2 lambda^2)
    let mut tail = 0.0;
    for k in 1..=100 {
        let sign = if k % 2 == 1 { 1.0 } else { -1.0 };
        let term = sign * (-2.0 * f64::from(k).powi(2) * lambda.powi(2)).exp();
        tail += term;
        if term.abs() < 1e-10 {
            break;
        }
    }
    (2.0 * tail).clamp(0.0, 1.0)
}

/// Sort a copy of `values` ascending.
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    out
}

/// Two-sample KS statistic: largest gap between the empirical CDFs.
///
/// Both inputs must be sorted ascending.
pub fn ks_statistic(a: &[f64], b: &[f64]) -> f64 {
    let n1 = a.len() as f64;
    let n2 = b.len() as f64;
    let (mut i, mut j) = (0usize, 0usize);
    let mut d_max = 0.0f64;

    while i < a.len() && j < b.len() {
        let x = a[i].min(b[j]);
        // Step past every copy of x on both sides so ties move the CDFs together.
        while i < a.len() && a[i] <= x {
            i += 1;
        }
        while j < b.len() && b[j] <= x {
            j += 1;
        }
        d_max = d_max.max((i as f64 / n1 - j as f64 / n2).abs());
    }
    d_max
}

/// First Wasserstein distance between two samples.
///
/// Integrates the absolute gap between the empirical CDFs. Both inputs
/// must be sorted ascending and non-empty.
pub fn wasserstein_1d(a: &[f64], b: &[f64]) -> f64 {
    let mut all: Vec<f64> = a.iter().chain(b.iter()).copied().collect();
    all.sort_by(|x, y| x.partial_cmp(y).unwrap_or(Ordering::Equal));

    let n1 = a.len() as f64;
    let n2 = b.len() as f64;
    let (mut i, mut j) = (0usize, 0usize);
    let mut area = 0.0;

    for w in all.windows(2) {
        let x = w[0];
        while i < a.len() && a[i] <= x {
            i += 1;
        }
        while j < b.len() && b[j] <= x {
            j += 1;
        }
        area += (i as f64 / n1 - j as f64 / n2).abs() * (w[1] - w[0]);
    }
    area
}

/// Population standard deviation
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    (values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n).sqrt()
}

/// Equal-width bin edges spanning `[min, max]`.
///
/// A degenerate range collapses to a single bin.
pub fn equal_width_edges(min: f64, max: f64, n_bins: usize) -> Vec<f64> {
    if n_bins == 0 || max <= min {
        return vec![min, max];
    }
    let width = (max - min) / n_bins as f64;
    let mut edges: Vec<f64> = (0..n_bins).map(|i| min + width * i as f64).collect();
    edges.push(max);
    edges
}

/// Count samples in bins defined by edges.
///
/// Bins are half-open `[lo, hi)` except the last, which includes its upper
/// edge. Values outside the edges are ignored.
pub fn bin_counts(data: &[f64], edges: &[f64]) -> Vec<usize> {
    let n_bins = edges.len().saturating_sub(1);
    let mut counts = vec![0; n_bins];
    let (Some(&lo), Some(&hi)) = (edges.first(), edges.last()) else {
        return counts;
    };
    if n_bins == 0 {
        return counts;
    }
    for &val in data {
        if val < lo || val > hi {
            continue;
        }
        // partition_point gives the first edge strictly greater than val
        let idx = edges.partition_point(|&e| e <= val).saturating_sub(1);
        counts[idx.min(n_bins - 1)] += 1;
    }
    counts
}

/// Turn counts into probabilities, substituting a floor for empty bins.
pub fn smoothed_probabilities(counts: &[usize]) -> Vec<f64> {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return vec![ZERO_BIN_PROBABILITY; counts.len()];
    }
    counts
        .iter()
        .map(|&c| {
            if c == 0 {
                ZERO_BIN_PROBABILITY
            } else {
                c as f64 / total as f64
            }
        })
        .collect()
}

/// Jensen-Shannon distance in base 2, bounded to `[0, 1]`.
///
/// Both inputs are renormalized to sum to one before comparison.
pub fn jensen_shannon_distance(p: &[f64], q: &[f64]) -> f64 {
    let p_sum: f64 = p.iter().sum();
    let q_sum: f64 = q.iter().sum();
    if p_sum <= 0.0 || q_sum <= 0.0 {
        return 0.0;
    }

    let kl = |x: f64, m: f64| if x > 0.0 { x * (x / m).log2() } else { 0.0 };
    let mut divergence = 0.0;
    for (&pi, &qi) in p.iter().zip(q.iter()) {
        let pi = pi / p_sum;
        let qi = qi / q_sum;
        let mi = (pi + qi) / 2.0;
        divergence += 0.5 * kl(pi, mi) + 0.5 * kl(qi, mi);
    }
    divergence.max(0.0).sqrt().min(1.0)
}
