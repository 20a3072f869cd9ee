//! Field module - the fixed schema of recognized record fields

use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

/// Value type of a recognized field
///
/// Decided once per field at the schema level. Equality, ordering and JSON
/// coercion all dispatch on this tag instead of inspecting values at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Free-form label (topic, country, ...)
    Categorical,

    /// Whole number (end_year)
    Integer,

    /// Score, typically in [0, 10]
    Decimal,
}

impl FieldKind {
    /// Whether values of this kind compare numerically
    pub fn is_numeric(&self) -> bool {
        !matches!(self, FieldKind::Categorical)
    }
}

/// A recognized record field
///
/// Variant order is the column order used when a record is serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    /// Year the insight is expected to conclude
    EndYear,
    /// Intensity score
    Intensity,
    /// Sector (Energy, Government, ...)
    Sector,
    /// Topic (oil, gas, ...)
    Topic,
    /// Geographic region
    Region,
    /// Publishing source
    Source,
    /// PESTLE category
    Pestle,
    /// SWOT category
    Swot,
    /// Country
    Country,
    /// City
    City,
    /// Likelihood score
    Likelihood,
    /// Relevance score
    Relevance,
}

impl Field {
    /// Every recognized field, in serialization order
    pub const ALL: [Field; 12] = [
        Field::EndYear,
        Field::Intensity,
        Field::Sector,
        Field::Topic,
        Field::Region,
        Field::Source,
        Field::Pestle,
        Field::Swot,
        Field::Country,
        Field::City,
        Field::Likelihood,
        Field::Relevance,
    ];

    /// Fields accepted as filter constraints, in filter-panel order
    pub const FILTERABLE: [Field; 9] = [
        Field::EndYear,
        Field::Topic,
        Field::Sector,
        Field::Region,
        Field::Pestle,
        Field::Source,
        Field::Swot,
        Field::Country,
        Field::City,
    ];

    /// Get the field name as it appears in the dataset and query strings
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::EndYear => "end_year",
            Field::Intensity => "intensity",
            Field::Sector => "sector",
            Field::Topic => "topic",
            Field::Region => "region",
            Field::Source => "source",
            Field::Pestle => "pestle",
            Field::Swot => "swot",
            Field::Country => "country",
            Field::City => "city",
            Field::Likelihood => "likelihood",
            Field::Relevance => "relevance",
        }
    }

    /// Parse a field from its dataset name
    ///
    /// Names are matched exactly; unknown names yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        Field::ALL.into_iter().find(|field| field.as_str() == s)
    }

    /// Value type of this field
    pub fn kind(&self) -> FieldKind {
        match self {
            Field::EndYear => FieldKind::Integer,
            Field::Intensity | Field::Likelihood | Field::Relevance => FieldKind::Decimal,
            _ => FieldKind::Categorical,
        }
    }

    /// Whether the filter builder accepts constraints on this field
    pub fn is_filterable(&self) -> bool {
        Field::FILTERABLE.contains(self)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Unknown field: {}", s))
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A present (non-empty) field value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Categorical label
    Text(String),
    /// Whole number
    Integer(i64),
    /// Score
    Number(f64),
}

impl FieldValue {
    /// Numeric view of the value, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Text(_) => None,
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Number(n) => Some(*n),
        }
    }

    /// Compare two values of the same field
    ///
    /// Numeric values compare numerically (total order over floats), text
    /// compares by bytes. Mixed pairs fall back to their rendered strings.
    pub fn compare(&self, other: &FieldValue) -> Ordering {
        match (self, other) {
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            (FieldValue::Integer(a), FieldValue::Integer(b)) => a.cmp(b),
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a.total_cmp(&b),
                _ => self.to_string().cmp(&other.to_string()),
            },
        }
    }

    /// Coerce a JSON value according to a field kind
    ///
    /// Returns `None` for anything that counts as absent: `null`, `""`,
    /// and values that cannot represent the kind.
    pub fn from_json(kind: FieldKind, value: &serde_json::Value) -> Option<Self> {
        use serde_json::Value;

        match kind {
            FieldKind::Categorical => match value {
                Value::String(s) if s.is_empty() => None,
                Value::String(s) => Some(FieldValue::Text(s.clone())),
                Value::Number(n) => Some(FieldValue::Text(n.to_string())),
                Value::Bool(b) => Some(FieldValue::Text(b.to_string())),
                _ => None,
            },
            FieldKind::Integer => match value {
                Value::Number(n) => n
                    .as_i64()
                    .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
                    .map(FieldValue::Integer),
                Value::String(s) => s.trim().parse::<i64>().ok().map(FieldValue::Integer),
                _ => None,
            },
            FieldKind::Decimal => match value {
                Value::Number(n) => n.as_f64().map(FieldValue::Number),
                Value::String(s) => s
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(FieldValue::Number),
                _ => None,
            },
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::Number(n) => write!(f, "{}", n),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Text(s) => serializer.serialize_str(s),
            FieldValue::Integer(i) => serializer.serialize_i64(*i),
            // Integral scores go back out as JSON integers, like the dataset has them
            FieldValue::Number(n) if n.fract() == 0.0 && n.abs() < 9.0e15 => {
                serializer.serialize_i64(*n as i64)
            }
            FieldValue::Number(n) => serializer.serialize_f64(*n),
        }
    }
}
