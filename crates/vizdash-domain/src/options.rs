//! Option extraction - the value domain of each filterable field

use crate::field::{Field, FieldValue};
use crate::record::Record;
use std::collections::BTreeMap;

/// Distinct values per field, each list sorted ascending
pub type FieldOptions = BTreeMap<Field, Vec<FieldValue>>;

/// Collect the sorted, deduplicated present values of each field
///
/// Run this over the unfiltered record set so a filter UI always offers the
/// whole domain. Categorical fields sort by bytes ("Oil" before "gas");
/// numeric fields sort numerically, so `end_year` lists 2016 before 2100.
pub fn extract_options(records: &[Record], fields: &[Field]) -> FieldOptions {
    fields
        .iter()
        .map(|&field| (field, distinct_sorted(records, field)))
        .collect()
}

/// Sorted distinct values of a single field
pub fn distinct_sorted(records: &[Record], field: Field) -> Vec<FieldValue> {
    let mut values: Vec<FieldValue> = records.iter().filter_map(|r| r.get(field)).collect();
    values.sort_by(|a, b| a.compare(b));
    values.dedup_by(|a, b| a.compare(b).is_eq());
    values
}
