//! Type definitions for the statistical test library.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DriftError;

/// Default threshold for p-value tests.
pub const P_VALUE_THRESHOLD: f64 = 0.05;

/// Default threshold for distance tests.
pub const DISTANCE_THRESHOLD: f64 = 0.1;

/// Statistical tests available to the drift policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestName {
    /// Two-proportion z-test (binary categorical features)
    ZTest,
    /// Chi-square goodness of fit (multi-category features)
    ChiSquare,
    /// Two-sample Kolmogorov-Smirnov (numeric features)
    KolmogorovSmirnov,
    /// Jensen-Shannon distance
    JensenShannon,
    /// Wasserstein distance normed by the reference spread
    Wasserstein,
}

impl TestName {
    pub const ALL: [TestName; 5] = [
        TestName::ZTest,
        TestName::ChiSquare,
        TestName::KolmogorovSmirnov,
        TestName::JensenShannon,
        TestName::Wasserstein,
    ];

    /// Human-readable label shown next to a verdict
    pub fn label(self) -> &'static str {
        match self {
            TestName::ZTest => "Z-test",
            TestName::ChiSquare => "Chi-Square",
            TestName::KolmogorovSmirnov => "Kolmogorov–Smirnov (K-S)",
            TestName::JensenShannon => "Jensen-Shannon distance",
            TestName::Wasserstein => "Wasserstein distance (normed)",
        }
    }

    /// Whether the score is a p-value or a distance
    pub fn score_kind(self) -> ScoreKind {
        match self {
            TestName::ZTest | TestName::ChiSquare | TestName::KolmogorovSmirnov => {
                ScoreKind::PValue
            }
            TestName::JensenShannon | TestName::Wasserstein => ScoreKind::Distance,
        }
    }

    /// Threshold used when the caller supplies none
    pub fn default_threshold(self) -> f64 {
        match self.score_kind() {
            ScoreKind::PValue => P_VALUE_THRESHOLD,
            ScoreKind::Distance => DISTANCE_THRESHOLD,
        }
    }
}

impl fmt::Display for TestName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TestName {
    type Err = DriftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "z" | "z_test" | "ztest" | "z-test" => Ok(TestName::ZTest),
            "chisquare" | "chi_square" | "chi-square" => Ok(TestName::ChiSquare),
            "ks" | "k-s" | "kolmogorov_smirnov" => Ok(TestName::KolmogorovSmirnov),
            "jensenshannon" | "jensen_shannon" | "js" => Ok(TestName::JensenShannon),
            "wasserstein" | "wasserstein_normed" => Ok(TestName::Wasserstein),
            other => Err(DriftError::invalid_argument(
                format!("unknown statistical test '{other}'"),
                "Use one of: z_test, chi_square, ks, jensen_shannon, wasserstein",
            )),
        }
    }
}

/// Direction in which a score signals drift.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreKind {
    /// Drift when `score <= threshold`
    PValue,
    /// Drift when `score >= threshold`
    Distance,
}

impl ScoreKind {
    /// Apply the threshold in this kind's direction.
    pub fn is_drift(self, score: f64, threshold: f64) -> bool {
        match self {
            ScoreKind::PValue => score <= threshold,
            ScoreKind::Distance => score >= threshold,
        }
    }
}

/// Alternative hypothesis for the proportion z-test.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Alternative {
    #[default]
    TwoSided,
    Less,
    Greater,
}

impl FromStr for Alternative {
    type Err = DriftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "two-sided" => Ok(Alternative::TwoSided),
            "less" => Ok(Alternative::Less),
            "greater" => Ok(Alternative::Greater),
            other => Err(DriftError::invalid_argument(
                format!("alternative '{other}' not recognized"),
                "Should be 'two-sided', 'less' or 'greater'",
            )),
        }
    }
}

/// Outcome of one statistical test.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    /// Test that produced the result
    pub test: TestName,
    /// Raw statistic (z, chi-square, D, or the distance itself)
    pub statistic: f64,
    /// P-value or distance compared against the threshold
    pub score: f64,
    /// Threshold the decision was made with
    pub threshold: f64,
    /// Whether drift was detected
    pub drift: bool,
}

impl TestResult {
    /// Build a result, deciding drift in the direction of the test's score kind.
    pub fn new(test: TestName, statistic: f64, score: f64, threshold: f64) -> Self {
        Self {
            test,
            statistic,
            score,
            threshold,
            drift: test.score_kind().is_drift(score, threshold),
        }
    }

    /// Result for inputs that carry no evidence of drift (empty or constant).
    pub fn no_evidence(test: TestName, threshold: f64) -> Self {
        let score = match test.score_kind() {
            ScoreKind::PValue => 1.0,
            ScoreKind::Distance => 0.0,
        };
        Self {
            test,
            statistic: 0.0,
            score,
            threshold,
            drift: false,
        }
    }

    /// "Detected" / "Not Detected"
    pub fn drift_label(&self) -> &'static str {
        if self.drift {
            "Detected"
        } else {
            "Not Detected"
        }
    }
}
