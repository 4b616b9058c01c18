//! Drift comparison configuration.
//!
//! Loaded from YAML or JSON. Every field has a default, so an empty
//! document is a valid configuration:
//!
//! ```yaml
//! mode: p_value
//! alternative: two-sided
//! thresholds:
//!   age: 0.01
//! feature_types:
//!   signup_date: datetime
//! stattest:
//!   income: wasserstein
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DriftError, Result};
use crate::policy::{FeatureType, PolicyMode};
use crate::stattest::{Alternative, TestName, DEFAULT_BINS};

/// Configuration for a drift comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriftConfig {
    /// P-value tests or distance tests
    pub mode: PolicyMode,

    /// Alternative hypothesis for the proportion z-test
    pub alternative: Alternative,

    /// Per-feature threshold overrides
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub thresholds: BTreeMap<String, f64>,

    /// Per-feature type declarations; undeclared features are inferred
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub feature_types: BTreeMap<String, FeatureType>,

    /// Per-feature test overrides
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub stattest: BTreeMap<String, TestName>,

    /// Histogram bins for Jensen-Shannon on numeric features
    pub js_bins: usize,

    /// Evaluate features on the rayon thread pool
    pub parallel: bool,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            mode: PolicyMode::PValue,
            alternative: Alternative::TwoSided,
            thresholds: BTreeMap::new(),
            feature_types: BTreeMap::new(),
            stattest: BTreeMap::new(),
            js_bins: DEFAULT_BINS,
            parallel: true,
        }
    }
}

impl DriftConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml).map_err(|e| DriftError::ConfigParsing {
            path: PathBuf::from("<yaml>"),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| DriftError::ConfigParsing {
            path: PathBuf::from("<json>"),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| DriftError::io(format!("reading {}", path.display()), e))?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let parsed: std::result::Result<Self, String> = if is_json {
            serde_json::from_str(&text).map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str(&text).map_err(|e| e.to_string())
        };

        let config = parsed.map_err(|message| DriftError::ConfigParsing {
            path: path.to_path_buf(),
            message,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| DriftError::InvalidConfig {
            field: "<root>".to_string(),
            message: e.to_string(),
        })
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        for (feature, &threshold) in &self.thresholds {
            if !threshold.is_finite() || threshold < 0.0 {
                return Err(DriftError::InvalidConfig {
                    field: format!("thresholds.{feature}"),
                    message: format!("threshold must be a non-negative number, got {threshold}"),
                });
            }
        }
        if self.js_bins == 0 {
            return Err(DriftError::InvalidConfig {
                field: "js_bins".to_string(),
                message: "at least one bin is required".to_string(),
            });
        }
        Ok(())
    }

    /// Builder-style threshold override
    pub fn with_threshold(mut self, feature: impl Into<String>, threshold: f64) -> Self {
        self.thresholds.insert(feature.into(), threshold);
        self
    }

    /// Builder-style feature type declaration
    pub fn with_feature_type(mut self, feature: impl Into<String>, feature_type: FeatureType) -> Self {
        self.feature_types.insert(feature.into(), feature_type);
        self
    }

    /// Builder-style test override
    pub fn with_stattest(mut self, feature: impl Into<String>, test: TestName) -> Self {
        self.stattest.insert(feature.into(), test);
        self
    }

    pub fn with_mode(mut self, mode: PolicyMode) -> Self {
        self.mode = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_yaml_is_default() {
        let config = DriftConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, DriftConfig::default());
        assert_eq!(config.js_bins, 30);
        assert!(config.parallel);
    }

    #[test]
    fn test_full_yaml() {
        let yaml = r#"
mode: distance
alternative: less
thresholds:
  age: 0.01
feature_types:
  signup_date: datetime
  plan: categorical
stattest:
  income: wasserstein
js_bins: 12
parallel: false
"#;
        let config = DriftConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.mode, PolicyMode::Distance);
        assert_eq!(config.alternative, Alternative::Less);
        assert_eq!(config.thresholds["age"], 0.01);
        assert_eq!(config.feature_types["signup_date"], FeatureType::Datetime);
        assert_eq!(config.feature_types["plan"], FeatureType::Categorical);
        assert_eq!(config.stattest["income"], TestName::Wasserstein);
        assert_eq!(config.js_bins, 12);
        assert!(!config.parallel);
    }

    #[test]
    fn test_json_round_trip_of_builder() {
        let config = DriftConfig::default()
            .with_threshold("x", 0.2)
            .with_stattest("x", TestName::JensenShannon)
            .with_mode(PolicyMode::Distance);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(DriftConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_unknown_alternative_is_parse_error() {
        let err = DriftConfig::from_yaml_str("alternative: bogus").unwrap_err();
        assert!(matches!(err, DriftError::ConfigParsing { .. }));
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let err = DriftConfig::from_yaml_str("thresholds:\n  age: -0.5").unwrap_err();
        assert!(matches!(err, DriftError::InvalidConfig { ref field, .. } if field == "thresholds.age"));
    }

    #[test]
    fn test_zero_bins_rejected() {
        let err = DriftConfig::from_json_str(r#"{"js_bins": 0}"#).unwrap_err();
        assert!(matches!(err, DriftError::InvalidConfig { .. }));
    }

    #[test]
    fn test_from_path_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let yaml_path = dir.path().join("drift.yaml");
        std::fs::File::create(&yaml_path)
            .unwrap()
            .write_all(b"mode: distance\n")
            .unwrap();
        assert_eq!(DriftConfig::from_path(&yaml_path).unwrap().mode, PolicyMode::Distance);

        let json_path = dir.path().join("drift.json");
        std::fs::write(&json_path, r#"{"js_bins": 7}"#).unwrap();
        assert_eq!(DriftConfig::from_path(&json_path).unwrap().js_bins, 7);

        let missing = DriftConfig::from_path(dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(missing, DriftError::Io { .. }));
    }

    #[test]
    fn test_to_yaml_skips_empty_maps() {
        let yaml = DriftConfig::default().to_yaml().unwrap();
        assert!(!yaml.contains("thresholds"));
        assert!(yaml.contains("mode: p_value"));
    }
}
