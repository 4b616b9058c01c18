//! Type definitions for the drift decision policy.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DriftError;
use crate::series::{parse_datetime, FeatureSeries, Value};
use crate::stattest::{TestName, TestResult};

/// Feature kind; each kind is bound to one test-selection rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureType {
    Numeric,
    Categorical,
    Datetime,
}

impl FeatureType {
    /// Guess the type from the cells of both sides.
    ///
    /// Only numbers → numeric; only timestamps (native or parseable text)
    /// → datetime; anything else, including an all-missing column, →
    /// categorical.
    pub fn infer(reference: &FeatureSeries, production: Option<&FeatureSeries>) -> Self {
        let mut cells = reference
            .values()
            .iter()
            .chain(production.map(FeatureSeries::values).unwrap_or_default())
            .filter(|v| !v.is_missing())
            .peekable();
        if cells.peek().is_none() {
            return FeatureType::Categorical;
        }

        let (mut numeric, mut datetime) = (true, true);
        for cell in cells {
            match cell {
                Value::Number(_) => datetime = false,
                Value::DateTime(_) => numeric = false,
                Value::Text(s) => {
                    numeric = false;
                    datetime = datetime && parse_datetime(s).is_some();
                }
                Value::Missing => {}
            }
            if !numeric && !datetime {
                return FeatureType::Categorical;
            }
        }
        if numeric {
            FeatureType::Numeric
        } else {
            FeatureType::Datetime
        }
    }

    /// Upper-case tag shown next to the feature name
    pub fn tag(self) -> &'static str {
        match self {
            FeatureType::Numeric => "NUM",
            FeatureType::Categorical => "CAT",
            FeatureType::Datetime => "DATETIME",
        }
    }
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Which family of tests the policy selects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyMode {
    /// K-S, z-test or chi-square depending on feature type
    #[default]
    PValue,
    /// Wasserstein for numeric and datetime, Jensen-Shannon for categorical
    Distance,
}

/// Drift decision for one feature.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DriftVerdict {
    /// Feature name
    pub feature: String,
    /// Type the test was selected for
    pub feature_type: FeatureType,
    /// Outcome, including the test and threshold used
    pub result: TestResult,
}

impl DriftVerdict {
    pub fn test(&self) -> TestName {
        self.result.test
    }

    pub fn drift(&self) -> bool {
        self.result.drift
    }
}

/// Feature whose verdict is unavailable.
#[derive(Debug)]
pub struct FeatureFailure {
    /// Feature name
    pub feature: String,
    /// Why no verdict could be produced
    pub error: DriftError,
}

/// Verdicts and failures for a snapshot pair, both sorted by feature name.
#[derive(Debug, Default)]
pub struct DriftReport {
    pub verdicts: Vec<DriftVerdict>,
    pub failures: Vec<FeatureFailure>,
}

impl DriftReport {
    /// Verdict for `feature`, if one was produced
    pub fn verdict(&self, feature: &str) -> Option<&DriftVerdict> {
        self.verdicts.iter().find(|v| v.feature == feature)
    }

    /// Failure for `feature`, if its verdict is unavailable
    pub fn failure(&self, feature: &str) -> Option<&FeatureFailure> {
        self.failures.iter().find(|f| f.feature == feature)
    }

    /// Names of drifted features
    pub fn drifted_features(&self) -> Vec<&str> {
        self.verdicts
            .iter()
            .filter(|v| v.drift())
            .map(|v| v.feature.as_str())
            .collect()
    }

    pub fn summary(&self) -> DriftSummary {
        DriftSummary {
            total_features: self.verdicts.len(),
            drifted_features: self.verdicts.iter().filter(|v| v.drift()).count(),
            failed_features: self.failures.len(),
        }
    }
}

/// Summary of drift detection results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriftSummary {
    /// Features with a verdict
    pub total_features: usize,
    /// Features with detected drift
    pub drifted_features: usize,
    /// Features whose verdict is unavailable
    pub failed_features: usize,
}

impl DriftSummary {
    /// Whether any drift was detected
    pub fn has_drift(&self) -> bool {
        self.drifted_features > 0
    }

    /// Fraction of evaluated features that drifted
    pub fn share_drifted(&self) -> f64 {
        if self.total_features == 0 {
            0.0
        } else {
            self.drifted_features as f64 / self.total_features as f64
        }
    }
}
