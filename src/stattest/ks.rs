//! Two-sample Kolmogorov-Smirnov test for numeric features.

use super::statistical::{ks_p_value, ks_statistic, sorted};
use super::types::{TestName, TestResult};
use super::StatTest;
use crate::error::Result;
use crate::series::FeatureSeries;

/// Kolmogorov-Smirnov test.
///
/// Small samples get the exact two-sided p-value; large ones the
/// asymptotic Kolmogorov distribution with Stephens' correction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KsTest;

impl StatTest for KsTest {
    fn name(&self) -> TestName {
        TestName::KolmogorovSmirnov
    }

    fn run(
        &self,
        reference: &FeatureSeries,
        production: &FeatureSeries,
        threshold: f64,
    ) -> Result<TestResult> {
        let a = sorted(&reference.numbers()?);
        let b = sorted(&production.numbers()?);
        if a.is_empty() || b.is_empty() {
            return Ok(TestResult::no_evidence(TestName::KolmogorovSmirnov, threshold));
        }

        let d = ks_statistic(&a, &b);
        let p_value = ks_p_value(d, a.len(), b.len());

        Ok(TestResult::new(TestName::KolmogorovSmirnov, d, p_value, threshold))
    }
}
