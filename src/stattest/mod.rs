//! Statistical Test Library
//!
//! Independent two-sample tests that compare a reference series with a
//! production series:
//! - Proportion z-test (binary categorical features)
//! - Chi-square test (multi-category features)
//! - Kolmogorov-Smirnov test (numeric features)
//! - Jensen-Shannon distance (binned numeric or categorical)
//! - Wasserstein distance, normed by the reference spread
//!
//! Every test drops missing cells first and only looks at the multiset of
//! remaining values, so element order never changes a result.

mod chi_square;
mod jensen_shannon;
mod ks;
mod statistical;
mod types;
mod wasserstein;


pub use chi_square::ChiSquareTest;
pub use jensen_shannon::{Binning, JensenShannonTest, DEFAULT_BINS};
pub use ks::KsTest;
pub use types::{
    Alternative, ScoreKind, TestName, TestResult, DISTANCE_THRESHOLD, P_VALUE_THRESHOLD,
};
pub use wasserstein::WassersteinTest;
pub use z_test::{proportions_z_p_value, proportions_z_statistic, ZTest};

// Re-export statistical functions for testing/advanced use
pub use statistical::{
    bin_counts, chi_square_p_value, equal_width_edges, jensen_shannon_distance,
    ks_asymptotic_p_value, ks_exact_p_value, ks_p_value, ks_statistic, standard_normal_cdf,
    wasserstein_1d, KS_EXACT_MAX_CELLS,
};

use crate::error::Result;
use crate::series::FeatureSeries;

/// A two-sample drift test.
pub trait StatTest: Send + Sync {
    /// Which test this is
    fn name(&self) -> TestName;

    /// Compare `production` against `reference` at `threshold`.
    fn run(
        &self,
        reference: &FeatureSeries,
        production: &FeatureSeries,
        threshold: f64,
    ) -> Result<TestResult>;
}

/// Default implementation for each test name.
pub fn stat_test(name: TestName) -> Box<dyn StatTest> {
    match name {
        TestName::ZTest => Box::new(ZTest::default()),
        TestName::ChiSquare => Box::new(ChiSquareTest),
        TestName::KolmogorovSmirnov => Box::new(KsTest),
        TestName::JensenShannon => Box::new(JensenShannonTest::default()),
        TestName::Wasserstein => Box::new(WassersteinTest),
    }
}

/// Run the named test with its default configuration.
pub fn run_test(
    name: TestName,
    reference: &FeatureSeries,
    production: &FeatureSeries,
    threshold: f64,
) -> Result<TestResult> {
    stat_test(name).run(reference, production, threshold)
}
