//! Record module - one analytical data entry

use crate::field::{Field, FieldKind, FieldValue};
use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One analytical record
///
/// Every recognized field is optional: missing, `null` and `""` in the
/// source data all load as `None`. Keys outside the recognized schema
/// (title, url, insight, ...) are carried unchanged in `extra` so the record
/// can be served back with all of its original fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    /// Year the insight is expected to conclude
    pub end_year: Option<i64>,

    /// Topic
    pub topic: Option<String>,

    /// Sector
    pub sector: Option<String>,

    /// Region
    pub region: Option<String>,

    /// PESTLE category
    pub pestle: Option<String>,

    /// Publishing source
    pub source: Option<String>,

    /// SWOT category
    pub swot: Option<String>,

    /// Country
    pub country: Option<String>,

    /// City
    pub city: Option<String>,

    /// Intensity score
    pub intensity: Option<f64>,

    /// Likelihood score
    pub likelihood: Option<f64>,

    /// Relevance score
    pub relevance: Option<f64>,

    /// Unrecognized keys, kept verbatim
    pub extra: Map<String, Value>,
}

impl Record {
    /// Build a record from a JSON object
    ///
    /// Recognized keys are coerced by their field kind; a value that cannot
    /// represent its kind is treated as absent rather than rejected.
    pub fn from_json_object(object: Map<String, Value>) -> Self {
        let mut record = Record::default();
        for (key, value) in object {
            match Field::parse(&key) {
                Some(field) => record.set(field, FieldValue::from_json(field.kind(), &value)),
                None => {
                    record.extra.insert(key, value);
                }
            }
        }
        record
    }

    /// Get a field value (`None` when absent)
    pub fn get(&self, field: Field) -> Option<FieldValue> {
        match field.kind() {
            FieldKind::Categorical => self.text(field).map(|s| FieldValue::Text(s.to_string())),
            FieldKind::Integer => self.end_year.map(FieldValue::Integer),
            FieldKind::Decimal => self.number(field).map(FieldValue::Number),
        }
    }

    /// Borrow a categorical field
    ///
    /// Always `None` for numeric fields.
    pub fn text(&self, field: Field) -> Option<&str> {
        let slot = match field {
            Field::Topic => &self.topic,
            Field::Sector => &self.sector,
            Field::Region => &self.region,
            Field::Pestle => &self.pestle,
            Field::Source => &self.source,
            Field::Swot => &self.swot,
            Field::Country => &self.country,
            Field::City => &self.city,
            _ => return None,
        };
        slot.as_deref().filter(|s| !s.is_empty())
    }

    /// Read a numeric field
    ///
    /// Always `None` for categorical fields.
    pub fn number(&self, field: Field) -> Option<f64> {
        match field {
            Field::EndYear => self.end_year.map(|y| y as f64),
            Field::Intensity => self.intensity,
            Field::Likelihood => self.likelihood,
            Field::Relevance => self.relevance,
            _ => None,
        }
    }

    /// Set or clear a field
    ///
    /// A value whose type does not match the field kind clears the field.
    pub fn set(&mut self, field: Field, value: Option<FieldValue>) {
        match field.kind() {
            FieldKind::Categorical => {
                let text = match value {
                    Some(FieldValue::Text(s)) if !s.is_empty() => Some(s),
                    _ => None,
                };
                match field {
                    Field::Topic => self.topic = text,
                    Field::Sector => self.sector = text,
                    Field::Region => self.region = text,
                    Field::Pestle => self.pestle = text,
                    Field::Source => self.source = text,
                    Field::Swot => self.swot = text,
                    Field::Country => self.country = text,
                    Field::City => self.city = text,
                    _ => {}
                }
            }
            FieldKind::Integer => {
                self.end_year = match value {
                    Some(FieldValue::Integer(i)) => Some(i),
                    _ => None,
                };
            }
            FieldKind::Decimal => {
                let number = value.and_then(|v| v.as_f64()).filter(|n| n.is_finite());
                match field {
                    Field::Intensity => self.intensity = number,
                    Field::Likelihood => self.likelihood = number,
                    Field::Relevance => self.relevance = number,
                    _ => {}
                }
            }
        }
    }

    /// Builder-style variant of [`Record::set`]
    pub fn with(mut self, field: Field, value: FieldValue) -> Self {
        self.set(field, Some(value));
        self
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Field::ALL.len() + self.extra.len()))?;
        for field in Field::ALL {
            match self.get(field) {
                Some(value) => map.serialize_entry(field.as_str(), &value)?,
                // Blank cells are empty strings in the source dataset
                None => map.serialize_entry(field.as_str(), "")?,
            }
        }
        for (key, value) in &self.extra {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Object(object) => Ok(Record::from_json_object(object)),
            other => Err(de::Error::custom(format!(
                "expected a record object, found {}",
                json_type_name(&other)
            ))),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
