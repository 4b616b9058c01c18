//! Histogram data behind the per-feature sparklines.
//!
//! Numeric features share bin edges between reference and production so the
//! two sparklines are directly comparable. Categorical features share the
//! category axis. Datetime features are bucketed with the period selector
//! and stitched at the reference/production boundary.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::period::{aggregate, choose_period, BucketedSeries};
use crate::policy::FeatureType;
use crate::series::{Category, FeatureSeries};
use crate::stattest::{bin_counts, equal_width_edges};

/// Bins used for numeric sparklines
pub const SPARKLINE_BINS: usize = 10;

/// Unicode block characters, lowest to highest.
pub const SPARK_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Labelled counts for one side of a feature.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Histogram {
    /// Bin label: lower edge, category or period start
    pub labels: Vec<String>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Render counts as block characters scaled to the largest bin.
    pub fn render(&self) -> String {
        let max = self.counts.iter().copied().max().unwrap_or(0);
        if max == 0 {
            return SPARK_CHARS[0].to_string().repeat(self.counts.len());
        }
        self.counts
            .iter()
            .map(|&c| {
                let idx = (c as f64 / max as f64 * 7.0).round() as usize;
                SPARK_CHARS[idx.min(7)]
            })
            .collect()
    }
}

impl From<&BucketedSeries> for Histogram {
    fn from(series: &BucketedSeries) -> Self {
        Self {
            labels: series.starts().iter().map(ToString::to_string).collect(),
            counts: series.counts(),
        }
    }
}

/// Histogram data for the reference side and, when given, the production side.
pub fn sparkline(
    reference: &FeatureSeries,
    production: Option<&FeatureSeries>,
    feature_type: FeatureType,
) -> Result<(Histogram, Option<Histogram>)> {
    match feature_type {
        FeatureType::Numeric => numeric(reference, production),
        FeatureType::Categorical => Ok(categorical(reference, production)),
        FeatureType::Datetime => {
            let unit = choose_period(reference, production)?;
            let (ref_buckets, prod_buckets) = aggregate(reference, production, unit)?;
            Ok((
                Histogram::from(&ref_buckets),
                prod_buckets.as_ref().map(Histogram::from),
            ))
        }
    }
}

fn numeric(
    reference: &FeatureSeries,
    production: Option<&FeatureSeries>,
) -> Result<(Histogram, Option<Histogram>)> {
    let ref_values = reference.numbers()?;
    let prod_values = production.map(FeatureSeries::numbers).transpose()?;

    let all = ref_values.iter().chain(prod_values.iter().flatten());
    let (min, max) = all.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
        (lo.min(v), hi.max(v))
    });
    if min > max {
        return Ok((
            Histogram::default(),
            prod_values.map(|_| Histogram::default()),
        ));
    }

    let edges = equal_width_edges(min, max, SPARKLINE_BINS);
    let labels: Vec<String> = edges[..edges.len() - 1]
        .iter()
        .map(|e| format!("{e:.4}"))
        .collect();
    let histogram = |values: &[f64]| Histogram {
        labels: labels.clone(),
        counts: bin_counts(values, &edges),
    };
    Ok((
        histogram(&ref_values),
        prod_values.as_deref().map(histogram),
    ))
}

fn categorical(
    reference: &FeatureSeries,
    production: Option<&FeatureSeries>,
) -> (Histogram, Option<Histogram>) {
    let ref_freq = reference.frequencies();
    let prod_freq = production.map(FeatureSeries::frequencies);

    let mut combined: BTreeMap<&Category, usize> = BTreeMap::new();
    for (category, count) in ref_freq.iter().chain(prod_freq.iter().flatten()) {
        *combined.entry(category).or_insert(0) += count;
    }
    let mut axis: Vec<(&Category, usize)> = combined.into_iter().collect();
    // Stable sort keeps category order among equal counts
    axis.sort_by(|a, b| b.1.cmp(&a.1));

    let labels: Vec<String> = axis.iter().map(|(c, _)| c.to_string()).collect();
    let histogram = |freq: &BTreeMap<Category, usize>| Histogram {
        labels: labels.clone(),
        counts: axis
            .iter()
            .map(|(c, _)| freq.get(*c).copied().unwrap_or(0))
            .collect(),
    };
    (histogram(&ref_freq), prod_freq.as_ref().map(histogram))
}

/// Base-10 logarithm of the strictly positive, finite values.
pub fn log10_positive(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .filter(|v| v.is_finite() && **v > 0.0)
        .map(|v| v.log10())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::Value;
    use approx::assert_relative_eq;

    #[test]
    fn test_numeric_shared_edges() {
        let r = FeatureSeries::new("x", (0..10).map(f64::from));
        let p = FeatureSeries::new("x", (10..20).map(f64::from));
        let (rh, ph) = sparkline(&r, Some(&p), FeatureType::Numeric).unwrap();
        let ph = ph.unwrap();

        assert_eq!(rh.len(), SPARKLINE_BINS);
        assert_eq!(rh.labels, ph.labels);
        assert_eq!(rh.total(), 10);
        assert_eq!(ph.total(), 10);
        assert_eq!(rh.counts[5..], [0, 0, 0, 0, 0]);
        assert_eq!(ph.counts[..5], [0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_numeric_constant_collapses_to_one_bin() {
        let r = FeatureSeries::new("x", [3.0, 3.0]);
        let (rh, ph) = sparkline(&r, None, FeatureType::Numeric).unwrap();
        assert_eq!(rh.counts, vec![2]);
        assert!(ph.is_none());
    }

    #[test]
    fn test_numeric_empty() {
        let r = FeatureSeries::new("x", vec![Value::Missing]);
        let p = FeatureSeries::new("x", Vec::<f64>::new());
        let (rh, ph) = sparkline(&r, Some(&p), FeatureType::Numeric).unwrap();
        assert!(rh.is_empty());
        assert!(ph.unwrap().is_empty());
    }

    #[test]
    fn test_numeric_rejects_text() {
        let r = FeatureSeries::new("x", ["a"]);
        assert!(sparkline(&r, None, FeatureType::Numeric).is_err());
    }

    #[test]
    fn test_categorical_axis_order() {
        let r = FeatureSeries::new("c", ["b", "a", "c", "c"]);
        let p = FeatureSeries::new("c", ["a", "c", "d"]);
        let (rh, ph) = sparkline(&r, Some(&p), FeatureType::Categorical).unwrap();
        let ph = ph.unwrap();

        // c=3, a=2, then b and d tie at 1
        assert_eq!(rh.labels, vec!["c", "a", "b", "d"]);
        assert_eq!(rh.counts, vec![2, 1, 1, 0]);
        assert_eq!(ph.counts, vec![1, 1, 0, 1]);
    }

    #[test]
    fn test_datetime_buckets_merge_boundary() {
        let r = FeatureSeries::new("d", ["2024-01-01", "2024-01-02"]);
        let p = FeatureSeries::new("d", ["2024-01-02", "2024-01-03"]);
        let (rh, ph) = sparkline(&r, Some(&p), FeatureType::Datetime).unwrap();
        let ph = ph.unwrap();

        assert_eq!(rh.total() + ph.total(), 4);
        assert_eq!(rh.counts, vec![1, 2]);
        assert_eq!(ph.counts, vec![1]);
    }

    #[test]
    fn test_render() {
        let h = Histogram {
            labels: vec![String::new(); 3],
            counts: vec![0, 7, 14],
        };
        assert_eq!(h.render(), "▁▅█");
        assert_eq!(Histogram::default().render(), "");
    }

    #[test]
    fn test_log10_positive() {
        let logs = log10_positive(&[100.0, 0.0, -5.0, 1.0, f64::NAN]);
        assert_eq!(logs.len(), 2);
        assert_relative_eq!(logs[0], 2.0);
        assert_relative_eq!(logs[1], 0.0);
    }
}
