//! Jensen-Shannon distance between empirical distributions.

use std::collections::BTreeSet;

use super::statistical::{
    bin_counts, equal_width_edges, jensen_shannon_distance, smoothed_probabilities,
};
use super::types::{TestName, TestResult};
use super::StatTest;
use crate::error::Result;
use crate::series::FeatureSeries;

/// Default number of histogram bins for numeric data.
pub const DEFAULT_BINS: usize = 30;

/// How the two samples are turned into distributions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Binning {
    /// Equal-width bins over the combined numeric range
    Numeric { bins: usize },
    /// One outcome per distinct category
    Categorical,
    /// Numeric when both sides hold only numbers, categorical otherwise
    Auto { bins: usize },
}

/// Jensen-Shannon distance test.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JensenShannonTest {
    binning: Binning,
}

impl Default for JensenShannonTest {
    fn default() -> Self {
        Self::new(Binning::Auto { bins: DEFAULT_BINS })
    }
}

impl JensenShannonTest {
    pub fn new(binning: Binning) -> Self {
        Self { binning }
    }

    pub fn numeric(bins: usize) -> Self {
        Self::new(Binning::Numeric { bins })
    }

    pub fn categorical() -> Self {
        Self::new(Binning::Categorical)
    }

    fn numeric_counts(
        reference: &FeatureSeries,
        production: &FeatureSeries,
        bins: usize,
    ) -> Result<(Vec<usize>, Vec<usize>)> {
        let a = reference.numbers()?;
        let b = production.numbers()?;
        let (min, max) = a
            .iter()
            .chain(b.iter())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
                (lo.min(x), hi.max(x))
            });
        let edges = equal_width_edges(min, max, bins.max(1));
        Ok((bin_counts(&a, &edges), bin_counts(&b, &edges)))
    }

    fn categorical_counts(
        reference: &FeatureSeries,
        production: &FeatureSeries,
    ) -> (Vec<usize>, Vec<usize>) {
        let ref_freq = reference.frequencies();
        let prod_freq = production.frequencies();
        let keys: BTreeSet<_> = ref_freq.keys().chain(prod_freq.keys()).collect();
        keys.into_iter()
            .map(|k| {
                (
                    ref_freq.get(k).copied().unwrap_or(0),
                    prod_freq.get(k).copied().unwrap_or(0),
                )
            })
            .unzip()
    }
}

impl StatTest for JensenShannonTest {
    fn name(&self) -> TestName {
        TestName::JensenShannon
    }

    fn run(
        &self,
        reference: &FeatureSeries,
        production: &FeatureSeries,
        threshold: f64,
    ) -> Result<TestResult> {
        if reference.count_present() == 0 || production.count_present() == 0 {
            return Ok(TestResult::no_evidence(TestName::JensenShannon, threshold));
        }

        let (ref_counts, prod_counts) = match self.binning {
            Binning::Numeric { bins } => Self::numeric_counts(reference, production, bins)?,
            Binning::Categorical => Self::categorical_counts(reference, production),
            Binning::Auto { bins } => {
                if reference.numbers().is_ok() && production.numbers().is_ok() {
                    Self::numeric_counts(reference, production, bins)?
                } else {
                    Self::categorical_counts(reference, production)
                }
            }
        };

        let distance = jensen_shannon_distance(
            &smoothed_probabilities(&ref_counts),
            &smoothed_probabilities(&prod_counts),
        );
        Ok(TestResult::new(TestName::JensenShannon, distance, distance, threshold))
    }
}
