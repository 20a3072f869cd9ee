//! Aggregation engine - ranked per-group statistics
//!
//! Groups records by a field, reduces each group to one number, ranks the
//! groups and keeps the top N:
//! 1. Drop records whose group field is absent
//! 2. Reduce per group (record count, or mean of a metric)
//! 3. Stable sort by value, descending
//! 4. Truncate to `top_n`

use crate::field::Field;
use crate::record::Record;
use serde::Serialize;
use std::collections::HashMap;

/// Default truncation for bar and ranked-bar charts
pub const BAR_TOP_N: usize = 10;

/// Default truncation for donut/category charts
pub const DONUT_TOP_N: usize = 6;

/// How a group is reduced to a single value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "metric", rename_all = "lowercase")]
pub enum Aggregation {
    /// Number of records in the group
    Count,

    /// Arithmetic mean of a numeric metric over the group's measured records
    Mean(Field),
}

/// One ranked group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedStatistic {
    /// Group label (the group field's value as a string)
    pub key: String,

    /// Count or mean for the group
    pub value: f64,

    /// 0-based position after ranking
    pub rank: usize,
}

/// Metric value usable for averaging
///
/// Absent and non-numeric values are excluded, and so is `0`: a zero score
/// in this dataset means "not measured", not a measured zero.
pub fn measured_value(record: &Record, metric: Field) -> Option<f64> {
    record
        .number(metric)
        .filter(|value| value.is_finite() && *value != 0.0)
}

/// Mean of the measured values of `metric`, `None` when nothing was measured
pub fn measured_mean<'a, I>(records: I, metric: Field) -> Option<f64>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut acc = Accumulator::default();
    for record in records {
        if let Some(value) = measured_value(record, metric) {
            acc.add(value);
        }
    }
    acc.mean()
}

#[derive(Debug, Default, Clone, Copy)]
struct Accumulator {
    sum: f64,
    count: usize,
}

impl Accumulator {
    fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Group, reduce, rank and truncate
///
/// Ties keep the order in which their groups were first seen. Never fails:
/// empty or fully-excluded input yields an empty vector.
///
/// # Examples
///
/// ```
/// use vizdash_domain::{aggregate, Aggregation, Field, FieldValue, Record};
///
/// let records = vec![
///     Record::default()
///         .with(Field::Sector, FieldValue::Text("Energy".into()))
///         .with(Field::Likelihood, FieldValue::Number(4.0)),
///     Record::default()
///         .with(Field::Sector, FieldValue::Text("Energy".into()))
///         .with(Field::Likelihood, FieldValue::Number(8.0)),
/// ];
///
/// let stats = aggregate(&records, Field::Sector, Aggregation::Mean(Field::Likelihood), 10);
/// assert_eq!(stats[0].key, "Energy");
/// assert_eq!(stats[0].value, 6.0);
/// ```
pub fn aggregate(
    records: &[Record],
    group_by: Field,
    aggregation: Aggregation,
    top_n: usize,
) -> Vec<GroupedStatistic> {
    // Groups in first-seen order, with an index for lookups
    let mut groups: Vec<(String, Accumulator)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        let Some(key) = record.get(group_by).map(|value| value.to_string()) else {
            continue;
        };

        let sample = match aggregation {
            Aggregation::Count => 1.0,
            Aggregation::Mean(metric) => match measured_value(record, metric) {
                Some(value) => value,
                None => continue,
            },
        };

        let slot = match index.get(&key) {
            Some(&slot) => slot,
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, Accumulator::default()));
                groups.len() - 1
            }
        };
        groups[slot].1.add(sample);
    }

    let mut ranked: Vec<(String, f64)> = groups
        .into_iter()
        .filter_map(|(key, acc)| {
            let value = match aggregation {
                Aggregation::Count => Some(acc.count as f64),
                Aggregation::Mean(_) => acc.mean(),
            };
            value.map(|value| (key, value))
        })
        .collect();

    // sort_by is stable, so equal values stay in first-seen order
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(top_n);

    ranked
        .into_iter()
        .enumerate()
        .map(|(rank, (key, value))| GroupedStatistic { key, value, rank })
        .collect()
}
