//! Filter module - equality predicates over records
//!
//! [`FilterSpec::from_params`] is the filter builder: it turns raw query
//! parameters into constraints and never fails. Malformed input degrades to
//! "no constraint" on the offending field.

use crate::field::{Field, FieldKind};
use crate::record::Record;
use std::collections::BTreeMap;

/// A single equality constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// Case-insensitive string equality
    Text {
        /// Value as supplied by the caller
        value: String,
        /// Lower-cased form used for matching
        folded: String,
    },

    /// Integer equality
    Integer(i64),
}

impl Constraint {
    /// Build a case-insensitive text constraint
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        let folded = value.to_lowercase();
        Constraint::Text { value, folded }
    }

    fn matches(&self, record: &Record, field: Field) -> bool {
        match self {
            Constraint::Text { folded, .. } => record
                .text(field)
                .is_some_and(|actual| actual.to_lowercase() == *folded),
            Constraint::Integer(expected) => record.end_year == Some(*expected),
        }
    }
}

/// Field → constraint mapping
///
/// Fields without an entry are unconstrained; an empty spec matches every
/// record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    constraints: BTreeMap<Field, Constraint>,
}

impl FilterSpec {
    /// Create an empty (match-everything) spec
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a spec from raw key/value query parameters
    ///
    /// Only the first occurrence of each key is considered, and unrecognized
    /// keys are ignored so that other parameters can share the query string.
    ///
    /// # Examples
    ///
    /// ```
    /// use vizdash_domain::{Field, FilterSpec};
    ///
    /// let spec = FilterSpec::from_params([
    ///     ("topic", "oil"),
    ///     ("end_year", "not-a-year"),
    ///     ("page", "2"),
    /// ]);
    /// assert_eq!(spec.len(), 1);
    /// assert!(spec.get(Field::EndYear).is_none());
    /// ```
    pub fn from_params<I, K, V>(params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut spec = FilterSpec::new();
        let mut seen: Vec<Field> = Vec::new();

        for (key, value) in params {
            let Some(field) = Field::parse(key.as_ref()) else {
                continue;
            };
            if seen.contains(&field) {
                continue;
            }
            seen.push(field);
            spec.insert(field, value.as_ref());
        }

        spec
    }

    /// Add a constraint from a raw string value
    ///
    /// Returns `false` (leaving the spec untouched) when the field is not
    /// filterable, the value is empty, or an `end_year` value has no leading
    /// integer. Dropping such a constraint is the intended policy: a bad year
    /// widens the result instead of failing the query.
    pub fn insert(&mut self, field: Field, raw: &str) -> bool {
        if !field.is_filterable() || raw.is_empty() {
            return false;
        }

        let constraint = match field.kind() {
            FieldKind::Integer => match parse_leading_int(raw) {
                Some(year) => Constraint::Integer(year),
                None => return false,
            },
            _ => Constraint::text(raw),
        };

        self.constraints.insert(field, constraint);
        true
    }

    /// Builder-style variant of [`FilterSpec::insert`]
    pub fn with(mut self, field: Field, raw: &str) -> Self {
        self.insert(field, raw);
        self
    }

    /// Get the constraint on a field
    pub fn get(&self, field: Field) -> Option<&Constraint> {
        self.constraints.get(&field)
    }

    /// Number of constrained fields
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    /// Whether the spec constrains nothing
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Iterate over constraints in field order
    pub fn iter(&self) -> impl Iterator<Item = (Field, &Constraint)> {
        self.constraints.iter().map(|(field, c)| (*field, c))
    }

    /// Whether a record satisfies every constraint
    pub fn matches(&self, record: &Record) -> bool {
        self.constraints
            .iter()
            .all(|(field, constraint)| constraint.matches(record, *field))
    }

    /// Copy out the matching records, preserving input order
    pub fn apply(&self, records: &[Record]) -> Vec<Record> {
        records
            .iter()
            .filter(|record| self.matches(record))
            .cloned()
            .collect()
    }

    /// Keep only the matching records, preserving input order
    pub fn retain(&self, mut records: Vec<Record>) -> Vec<Record> {
        if !self.is_empty() {
            records.retain(|record| self.matches(record));
        }
        records
    }
}

/// Parse the integer prefix of a string
///
/// Skips leading whitespace, accepts one sign, then reads decimal digits up
/// to the first non-digit: `"2025"` and `" 2025abc"` both give 2025, while
/// `"abc"` and `"-"` give `None`. Values outside `i64` give `None`.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_end = rest
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }

    let magnitude: i64 = rest[..digits_end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
