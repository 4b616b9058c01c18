//! Driftscope: per-feature drift detection between a reference snapshot and a
//! production snapshot of a tabular dataset.
//!
//! ## Architecture
//!
//! - `series`: feature columns and typed views of their cells
//! - `period`: period selection and datetime bucketing with boundary stitching
//! - `stattest`: z-test, chi-square, K-S, Jensen-Shannon and normed Wasserstein
//! - `policy`: test selection per feature type, thresholds and verdicts
//! - `histogram`: sparkline data for numeric, categorical and datetime features
//! - `config`: YAML/JSON configuration
//!
//! ## Example
//!
//! ```
//! use driftscope::{decide_drift, FeatureSeries, FeatureType};
//!
//! let reference = FeatureSeries::new("flag", [0.0, 0.0, 0.0, 1.0, 1.0]);
//! let production = FeatureSeries::new("flag", [0.0, 1.0, 1.0, 1.0, 1.0]);
//!
//! let verdict = decide_drift("flag", FeatureType::Categorical, &reference, &production, None)?;
//! assert_eq!(verdict.result.drift_label(), "Not Detected");
//! # Ok::<(), driftscope::DriftError>(())
//! ```

pub mod config;
pub mod error;
pub mod histogram;
pub mod period;
pub mod policy;
pub mod series;
pub mod stattest;

pub use config::DriftConfig;
pub use error::{DriftError, Result};
pub use histogram::{log10_positive, sparkline, Histogram};
pub use period::{aggregate, choose_period, BucketedSeries, PeriodUnit};
pub use policy::{decide_drift, DriftPolicy, DriftReport, DriftSummary, DriftVerdict, FeatureType};
pub use series::{FeatureSeries, Value};
pub use stattest::{run_test, Alternative, StatTest, TestName, TestResult};
