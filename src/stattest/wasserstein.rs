//! Normed Wasserstein distance for numeric features.

use super::statistical::{sorted, std_dev, wasserstein_1d, MIN_NORM};
use super::types::{TestName, TestResult};
use super::StatTest;
use crate::error::Result;
use crate::series::FeatureSeries;

/// Earth mover's distance divided by the reference standard deviation.
///
/// The norm is floored at [`MIN_NORM`] so constant reference data does
/// not divide by zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WassersteinTest;

impl StatTest for WassersteinTest {
    fn name(&self) -> TestName {
        TestName::Wasserstein
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
            return Ok(TestResult::no_evidence(TestName::Wasserstein, threshold));
        }

        let norm = std_dev(&a).max(MIN_NORM);
        let distance = wasserstein_1d(&a, &b) / norm;
        Ok(TestResult::new(TestName::Wasserstein, distance, distance, threshold))
    }
}
