//! Drift Decision Policy
//!
//! Binds each feature type to a test-selection rule, supplies default
//! thresholds and turns test results into per-feature verdicts:
//! - numeric: Kolmogorov-Smirnov (0.05)
//! - categorical, at most two values: proportion z-test (0.05)
//! - categorical, more values: chi-square (0.05)
//! - distance mode: Wasserstein / Jensen-Shannon (0.1)
//!
//! Features are independent; `DriftPolicy::decide_all` fans them out over
//! rayon and collects failures next to verdicts.

mod detector;
mod types;


pub use detector::{decide_drift, DriftPolicy};
pub use types::{
    DriftReport, DriftSummary, DriftVerdict, FeatureFailure, FeatureType, PolicyMode,
};
