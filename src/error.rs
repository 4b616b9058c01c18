//! Error types with actionable diagnostics.
//!
//! Every variant names the feature or value at fault and carries a hint
//! line so callers can surface the message as-is.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for driftscope operations.
pub type Result<T> = std::result::Result<T, DriftError>;

/// Errors raised while comparing reference and production data.
///
/// Failures are scoped to a single feature: the batch runner in
/// [`crate::policy`] records them next to the successful verdicts instead
/// of aborting the comparison.
#[derive(Error, Debug)]
pub enum DriftError {
    /// Unrecognized mode or test name.
    #[error("Invalid argument: {message}\n  → {suggestion}")]
    InvalidArgument { message: String, suggestion: String },

    /// Column contents do not match the declared feature type.
    #[error("Type mismatch in feature '{feature}': expected {expected}, found {found}\n  → Fix the feature_types entry or clean the column")]
    TypeMismatch {
        feature: String,
        expected: &'static str,
        found: String,
    },

    /// Text cell could not be parsed as a timestamp.
    #[error("Cannot parse '{value}' as a datetime in feature '{feature}'\n  → Use RFC 3339 or '%Y-%m-%d %H:%M:%S'")]
    DatetimeParse { feature: String, value: String },

    /// Feature exists on one side of the comparison only.
    #[error("Feature '{feature}' is missing from the {side} dataset\n  → Both snapshots must carry the same columns")]
    MissingColumn { feature: String, side: &'static str },

    /// Configuration value is out of range.
    #[error("Invalid configuration value for '{field}': {message}")]
    InvalidConfig { field: String, message: String },

    /// Configuration file has invalid syntax.
    #[error("Invalid configuration syntax in {path}:\n  {message}\n  → Check YAML/JSON syntax at the indicated line")]
    ConfigParsing { path: PathBuf, message: String },

    /// IO error with context.
    #[error("IO error: {context}\n  Cause: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl DriftError {
    /// Create an invalid-argument error with a hint.
    pub fn invalid_argument(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Create an IO error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Whether the error is caused by the caller's input rather than the environment.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, Self::Io { .. })
    }

    /// Stable error code for structured output.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument { .. } => "D001",
            Self::TypeMismatch { .. } => "D010",
            Self::DatetimeParse { .. } => "D011",
            Self::MissingColumn { .. } => "D012",
            Self::InvalidConfig { .. } => "D020",
            Self::ConfigParsing { .. } => "D021",
            Self::Io { .. } => "D050",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_unique() {
        let errors = vec![
            DriftError::invalid_argument("", ""),
            DriftError::TypeMismatch {
                feature: "".into(),
                expected: "number",
                found: "".into(),
            },
            DriftError::DatetimeParse {
                feature: "".into(),
                value: "".into(),
            },
            DriftError::MissingColumn {
                feature: "".into(),
                side: "production",
            },
            DriftError::InvalidConfig {
                field: "".into(),
                message: "".into(),
            },
            DriftError::ConfigParsing {
                path: "".into(),
                message: "".into(),
            },
            DriftError::io("", std::io::Error::other("x")),
        ];

        let mut codes: Vec<_> = errors.iter().map(DriftError::code).collect();
        let total = codes.len();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), total);
    }

    #[test]
    fn test_type_mismatch_message_names_feature() {
        let err = DriftError::TypeMismatch {
            feature: "age".into(),
            expected: "number",
            found: "text 'n/a'".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("age"));
        assert!(msg.contains("n/a"));
        assert!(err.is_user_error());
    }

    #[test]
    fn test_io_is_not_user_error() {
        let err = DriftError::io("reading config", std::io::Error::other("boom"));
        assert!(!err.is_user_error());
        assert!(err.to_string().contains("reading config"));
    }
}
