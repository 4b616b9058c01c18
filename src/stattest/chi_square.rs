//! Chi-square goodness-of-fit test for multi-category features.

use std::collections::BTreeSet;

use super::statistical::chi_square_p_value;
use super::types::{TestName, TestResult};
use super::StatTest;
use crate::error::Result;
use crate::series::FeatureSeries;

/// Chi-square test of production frequencies against reference frequencies
/// rescaled to the production sample size.
///
/// A category seen only in production has an expected count of zero and
/// drives the statistic to infinity (p-value 0).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChiSquareTest;

impl StatTest for ChiSquareTest {
    fn name(&self) -> TestName {
        TestName::ChiSquare
    }

    fn run(
        &self,
        reference: &FeatureSeries,
        production: &FeatureSeries,
        threshold: f64,
    ) -> Result<TestResult> {
        let ref_freq = reference.frequencies();
        let prod_freq = production.frequencies();
        let total_ref: usize = ref_freq.values().sum();
        let total_prod: usize = prod_freq.values().sum();
        if total_ref == 0 || total_prod == 0 {
            return Ok(TestResult::no_evidence(TestName::ChiSquare, threshold));
        }

        let categories: BTreeSet<_> = ref_freq.keys().chain(prod_freq.keys()).collect();
        let scale = total_prod as f64 / total_ref as f64;

        let mut chi_sq = 0.0;
        for category in &categories {
            let observed = prod_freq.get(*category).copied().unwrap_or(0) as f64;
            let expected = ref_freq.get(*category).copied().unwrap_or(0) as f64 * scale;
            if expected > 0.0 {
                chi_sq += (observed - expected).powi(2) / expected;
            } else if observed > 0.0 {
                chi_sq = f64::INFINITY;
            }
        }

        let df = categories.len().saturating_sub(1);
        let p_value = chi_square_p_value(chi_sq, df);
        Ok(TestResult::new(TestName::ChiSquare, chi_sq, p_value, threshold))
    }
}
