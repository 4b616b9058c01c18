//! Column model shared by every drift component.
//!
//! A [`FeatureSeries`] is one column of one snapshot (reference or
//! production). It is never mutated after construction; the typed views
//! below always allocate fresh vectors with missing cells dropped.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{DriftError, Result};

/// Accepted text layouts for timestamps, tried in order after RFC 3339.
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// A single cell of a column.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Absent value; excluded by every test
    Missing,
    /// Numeric value (NaN counts as missing)
    Number(f64),
    /// Text, either a category label or an unparsed timestamp
    Text(String),
    /// Parsed timestamp
    DateTime(NaiveDateTime),
}

impl Value {
    /// Whether this cell is excluded from computation.
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Missing => true,
            Value::Number(x) => x.is_nan(),
            _ => false,
        }
    }

    fn describe(&self) -> String {
        match self {
            Value::Missing => "missing".to_string(),
            Value::Number(x) => format!("number {x}"),
            Value::Text(s) => format!("text '{s}'"),
            Value::DateTime(dt) => format!("datetime {dt}"),
        }
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Number(x)
    }
}

impl From<i64> for Value {
    fn from(x: i64) -> Self {
        Value::Number(x as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::DateTime(dt)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Missing, Into::into)
    }
}

/// Parse a timestamp from text.
pub fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Distinct category key with a total order.
///
/// Numbers sort before text, text before datetimes. The smallest key of a
/// binary feature is the z-test "success" category.
#[derive(Clone, Debug)]
pub enum Category {
    Number(f64),
    Text(String),
    DateTime(NaiveDateTime),
}

impl Category {
    fn rank(&self) -> u8 {
        match self {
            Category::Number(_) => 0,
            Category::Text(_) => 1,
            Category::DateTime(_) => 2,
        }
    }
}

impl PartialEq for Category {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Category {}

impl PartialOrd for Category {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Category {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Category::Number(a), Category::Number(b)) => a.total_cmp(b),
            (Category::Text(a), Category::Text(b)) => a.cmp(b),
            (Category::DateTime(a), Category::DateTime(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Number(x) => write!(f, "{x}"),
            Category::Text(s) => f.write_str(s),
            Category::DateTime(dt) => write!(f, "{dt}"),
        }
    }
}

/// One column of one snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureSeries {
    name: String,
    values: Vec<Value>,
}

impl FeatureSeries {
    /// Build a series from any iterator of cells.
    pub fn new<I, V>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Feature (column) name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw cells, missing ones included
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of non-missing cells
    pub fn count_present(&self) -> usize {
        self.values.iter().filter(|v| !v.is_missing()).count()
    }

    /// Non-missing numeric view.
    ///
    /// Any text or datetime cell, or an infinite number, is a
    /// [`DriftError::TypeMismatch`].
    pub fn numbers(&self) -> Result<Vec<f64>> {
        let mut out = Vec::with_capacity(self.values.len());
        for value in &self.values {
            match value {
                Value::Missing => {}
                Value::Number(x) if x.is_nan() => {}
                Value::Number(x) if x.is_infinite() => {
                    return Err(self.mismatch("finite number", value))
                }
                Value::Number(x) => out.push(*x),
                other => return Err(self.mismatch("number", other)),
            }
        }
        Ok(out)
    }

    /// Non-missing timestamp view, parsing text cells.
    pub fn datetimes(&self) -> Result<Vec<NaiveDateTime>> {
        let mut out = Vec::with_capacity(self.values.len());
        for value in &self.values {
            match value {
                Value::Missing => {}
                Value::Number(x) if x.is_nan() => {}
                Value::DateTime(dt) => out.push(*dt),
                Value::Text(s) => match parse_datetime(s) {
                    Some(dt) => out.push(dt),
                    None => {
                        return Err(DriftError::DatetimeParse {
                            feature: self.name.clone(),
                            value: s.clone(),
                        })
                    }
                },
                other => return Err(self.mismatch("datetime", other)),
            }
        }
        Ok(out)
    }

    /// Non-missing category view. Never fails: every cell kind is a valid label.
    pub fn categories(&self) -> Vec<Category> {
        self.values
            .iter()
            .filter_map(|value| match value {
                Value::Missing => None,
                Value::Number(x) if x.is_nan() => None,
                // -0.0 and 0.0 are one category
                Value::Number(x) if *x == 0.0 => Some(Category::Number(0.0)),
                Value::Number(x) => Some(Category::Number(*x)),
                Value::Text(s) => Some(Category::Text(s.clone())),
                Value::DateTime(dt) => Some(Category::DateTime(*dt)),
            })
            .collect()
    }

    /// Category frequency table over non-missing cells.
    pub fn frequencies(&self) -> BTreeMap<Category, usize> {
        let mut table = BTreeMap::new();
        for category in self.categories() {
            *table.entry(category).or_insert(0) += 1;
        }
        table
    }

    fn mismatch(&self, expected: &'static str, found: &Value) -> DriftError {
        DriftError::TypeMismatch {
            feature: self.name.clone(),
            expected,
            found: found.describe(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(s: &str) -> NaiveDateTime {
        parse_datetime(s).unwrap()
    }

    #[test]
    fn test_numbers_skip_missing_and_nan() {
        let s = FeatureSeries::new(
            "x",
            vec![Value::Number(1.0), Value::Missing, Value::Number(f64::NAN), Value::Number(3.0)],
        );
        assert_eq!(s.numbers().unwrap(), vec![1.0, 3.0]);
        assert_eq!(s.count_present(), 2);
        assert_eq!(s.len(), 4);
    }

    #[test]
    fn test_numbers_reject_text() {
        let s = FeatureSeries::new("age", vec![Value::from(1.0), Value::from("n/a")]);
        let err = s.numbers().unwrap_err();
        assert!(matches!(err, DriftError::TypeMismatch { ref feature, .. } if feature == "age"));
    }

    #[test]
    fn test_numbers_reject_infinity() {
        let s = FeatureSeries::new("load", [1.0, 2.0, f64::INFINITY]);
        let err = s.numbers().unwrap_err();
        assert!(matches!(
            err,
            DriftError::TypeMismatch { expected: "finite number", ref found, .. } if found == "number inf"
        ));
        assert!(FeatureSeries::new("load", [f64::NEG_INFINITY]).numbers().is_err());
    }

    #[test]
    fn test_signed_zero_is_one_category() {
        let s = FeatureSeries::new("flag", [0.0, -0.0, 1.0]);
        let freq = s.frequencies();
        assert_eq!(freq.len(), 2);
        assert_eq!(freq[&Category::Number(0.0)], 2);
        assert_eq!(s.categories()[1].to_string(), "0");
    }

    #[test]
    fn test_datetimes_parse_text() {
        let s = FeatureSeries::new(
            "ts",
            vec![Value::from("2020-01-31"), Value::from("2020-02-01 10:30:00"), Value::Missing],
        );
        let parsed = s.datetimes().unwrap();
        assert_eq!(parsed, vec![dt("2020-01-31 00:00:00"), dt("2020-02-01T10:30:00")]);
    }

    #[test]
    fn test_datetimes_rfc3339_normalized_to_utc() {
        let parsed = parse_datetime("2020-01-01T02:00:00+02:00").unwrap();
        assert_eq!(parsed, dt("2020-01-01 00:00:00"));
    }

    #[test]
    fn test_datetimes_parse_failure() {
        let s = FeatureSeries::new("ts", vec!["yesterday"]);
        assert!(matches!(s.datetimes(), Err(DriftError::DatetimeParse { .. })));
    }

    #[test]
    fn test_datetimes_reject_numbers() {
        let s = FeatureSeries::new("ts", vec![1.5]);
        assert!(matches!(s.datetimes(), Err(DriftError::TypeMismatch { .. })));
    }

    #[test]
    fn test_category_order_numbers_before_text() {
        let mut cats = vec![
            Category::Text("b".into()),
            Category::Number(2.0),
            Category::Text("a".into()),
            Category::Number(-1.0),
        ];
        cats.sort();
        assert_eq!(
            cats,
            vec![
                Category::Number(-1.0),
                Category::Number(2.0),
                Category::Text("a".into()),
                Category::Text("b".into()),
            ]
        );
    }

    #[test]
    fn test_frequencies() {
        let s = FeatureSeries::new("c", vec![Some("a"), Some("b"), None, Some("a")]);
        let freq = s.frequencies();
        assert_eq!(freq.len(), 2);
        assert_eq!(freq[&Category::Text("a".into())], 2);
        assert_eq!(freq[&Category::Text("b".into())], 1);
    }
}
