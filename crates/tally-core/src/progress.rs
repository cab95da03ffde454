//! Canonical task progress.
//!
//! Progress is stored as an integer percentage in `0..=100`. Inputs arrive in
//! two scales (percent integers from forms, unit fractions from some clients
//! and older remote snapshots), so every deserialization path goes through
//! [`Progress::normalize`]:
//!
//! - integers are percentages, clamped to `0..=100`
//! - floats in `0.0..=1.0` are fractions, scaled by 100 and rounded
//! - any other float is a percentage, rounded and clamped
//! - numeric strings (optionally suffixed with `%`) follow the same rules

use std::borrow::Cow;
use std::fmt;

use schemars::{JsonSchema, Schema, SchemaGenerator, json_schema};
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "ProgressRepr")]
pub struct Progress(u8);

impl Progress {
    pub const NONE: Self = Self(0);
    pub const COMPLETE: Self = Self(100);

    /// Build from a percentage, clamping into range.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_percent(percent: i64) -> Self {
        Self(percent.clamp(0, 100) as u8)
    }

    /// Build from a unit fraction, clamping into range.
    #[must_use]
    pub fn from_fraction(fraction: f64) -> Self {
        Self::from_float_percent(fraction * 100.0)
    }

    /// Apply the float normalization rule: `0.0..=1.0` is a fraction,
    /// anything else is already a percentage.
    #[must_use]
    pub fn normalize(value: f64) -> Self {
        if (0.0..=1.0).contains(&value) {
            Self::from_fraction(value)
        } else {
            Self::from_float_percent(value)
        }
    }

    /// Parse user input such as `"40"`, `"40%"`, or `"0.4"`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] when the input is not numeric.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim();
        let (digits, explicit_percent) = trimmed
            .strip_suffix('%')
            .map_or((trimmed, false), |rest| (rest.trim_end(), true));

        if let Ok(percent) = digits.parse::<i64>() {
            return Ok(Self::from_percent(percent));
        }
        let value = digits
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| CoreError::Validation(format!("invalid progress '{raw}'")))?;

        Ok(if explicit_percent {
            Self::from_float_percent(value)
        } else {
            Self::normalize(value)
        })
    }

    #[must_use]
    pub const fn percent(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn as_fraction(self) -> f64 {
        f64::from(self.0) / 100.0
    }

    #[must_use]
    pub const fn is_complete(self) -> bool {
        self.0 == 100
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn from_float_percent(percent: f64) -> Self {
        Self(percent.round().clamp(0.0, 100.0) as u8)
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl From<Progress> for u8 {
    fn from(progress: Progress) -> Self {
        progress.0
    }
}

/// Wire shapes accepted for progress.
#[derive(Deserialize)]
#[serde(untagged)]
enum ProgressRepr {
    Int(i64),
    Float(f64),
    Text(String),
}

impl TryFrom<ProgressRepr> for Progress {
    type Error = String;

    fn try_from(repr: ProgressRepr) -> Result<Self, Self::Error> {
        match repr {
            ProgressRepr::Int(percent) => Ok(Self::from_percent(percent)),
            ProgressRepr::Float(value) => Ok(Self::normalize(value)),
            ProgressRepr::Text(raw) => Self::parse(&raw).map_err(|e| e.to_string()),
        }
    }
}

impl JsonSchema for Progress {
    fn schema_name() -> Cow<'static, str> {
        "Progress".into()
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": "integer",
            "minimum": 0,
            "maximum": 100,
            "description": "Completion percentage"
        })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("50", 50)]
    #[case("0.5", 50)]
    #[case("1.0", 100)]
    #[case("1", 1)]
    #[case("150", 100)]
    #[case("-3", 0)]
    #[case("42.6", 43)]
    #[case("\"75\"", 75)]
    #[case("\"0.25\"", 25)]
    #[case("\"30%\"", 30)]
    fn deserializes_both_scales(#[case] raw: &str, #[case] expected: u8) {
        let progress: Progress = serde_json::from_str(raw).unwrap();
        assert_eq!(progress.percent(), expected);
    }

    #[test]
    fn rejects_non_numeric_text() {
        let result = serde_json::from_str::<Progress>("\"lots\"");
        assert!(result.is_err());
    }

    #[test]
    fn serializes_as_integer_percent() {
        let json = serde_json::to_string(&Progress::from_fraction(0.8)).unwrap();
        assert_eq!(json, "80");
    }

    #[test]
    fn explicit_percent_suffix_skips_fraction_rule() {
        assert_eq!(Progress::parse("0.5%").unwrap().percent(), 1);
        assert_eq!(Progress::parse("1%").unwrap().percent(), 1);
    }

    #[test]
    fn fraction_roundtrip() {
        let progress = Progress::from_percent(35);
        assert!((progress.as_fraction() - 0.35).abs() < f64::EPSILON);
        assert!(Progress::COMPLETE.is_complete());
        assert!(!progress.is_complete());
    }
}
