//! Raw measurement values and their coercion to exact decimals.
//!
//! Technologists enter velocities through forms that may hand us JSON numbers,
//! numeric strings, or nothing at all. Every value that takes part in a
//! threshold comparison goes through [`RawValue::to_decimal`], which parses the
//! shortest textual form of the input so no binary-float artifacts reach the
//! classifier.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A value as it arrived from the storage layer or a form submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum RawValue {
    Number(serde_json::Number),
    Text(String),
    Flag(bool),
}

impl RawValue {
    /// Coerce to an exact decimal. Flags, blank text and unparsable text
    /// yield `None`.
    pub fn to_decimal(&self) -> Option<Decimal> {
        match self {
            RawValue::Number(n) => parse_decimal(&n.to_string()),
            RawValue::Text(s) => parse_decimal(s.trim()),
            RawValue::Flag(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// Coerce an optional raw value. Absent stays absent.
pub fn coerce(value: Option<&RawValue>) -> Option<Decimal> {
    value.and_then(RawValue::to_decimal)
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Number(n) => write!(f, "{n}"),
            RawValue::Text(s) => write!(f, "{s:?}"),
            RawValue::Flag(b) => write!(f, "{b}"),
        }
    }
}

impl From<i32> for RawValue {
    fn from(value: i32) -> Self {
        RawValue::Number(value.into())
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Number(value.into())
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value)
            .map(RawValue::Number)
            .unwrap_or_else(|| RawValue::Text(value.to_string()))
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        RawValue::Flag(value)
    }
}

/// Serde adapter for decimals stored as JSON numbers, used by the criteria
/// document. Deserialization accepts numbers or numeric strings and is exact;
/// serialization writes a JSON number.
pub mod exact {
    use rust_decimal::Decimal;
    use serde::de::Error as _;
    use serde::ser::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::RawValue;

    pub fn serialize<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let number: serde_json::Number = value
            .normalize()
            .to_string()
            .parse()
            .map_err(S::Error::custom)?;
        number.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawValue::deserialize(deserializer)?;
        raw.to_decimal()
            .ok_or_else(|| D::Error::custom(format!("expected a decimal number, found {raw}")))
    }
}
