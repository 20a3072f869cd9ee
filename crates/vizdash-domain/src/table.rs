//! Table engine - stable sorting and pagination of record rows

use crate::field::{Field, FieldKind};
use crate::record::Record;
use serde::Serialize;
use std::cmp::Ordering;

/// Rows per page in the data table
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Natural ascending order
    #[default]
    Asc,
    /// Reverse of ascending
    Desc,
}

impl SortDirection {
    /// Parse a direction (case-insensitive "asc"/"desc")
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }

    /// The other direction
    pub fn flipped(&self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Column and direction to sort by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SortKey {
    /// Column
    pub field: Field,
    /// Direction
    pub direction: SortDirection,
}

impl SortKey {
    /// Ascending sort on a field
    pub fn asc(field: Field) -> Self {
        Self {
            field,
            direction: SortDirection::Asc,
        }
    }

    /// Descending sort on a field
    pub fn desc(field: Field) -> Self {
        Self {
            field,
            direction: SortDirection::Desc,
        }
    }

    /// Compare two records on this key
    ///
    /// Numeric columns compare as numbers and categorical columns as strings.
    /// An absent value counts as the empty string, so it sorts before every
    /// present value when ascending.
    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        let ordering = match self.field.kind() {
            FieldKind::Categorical => {
                let a = a.text(self.field).unwrap_or("");
                let b = b.text(self.field).unwrap_or("");
                a.cmp(b)
            }
            FieldKind::Integer | FieldKind::Decimal => {
                match (a.number(self.field), b.number(self.field)) {
                    (Some(x), Some(y)) => x.total_cmp(&y),
                    (None, Some(_)) => Ordering::Less,
                    (Some(_), None) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                }
            }
        };

        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// One page of table rows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TablePage {
    /// Rows on this page (empty when the page index is out of range)
    pub rows: Vec<Record>,

    /// Requested page index (0-based)
    pub page_index: usize,

    /// Rows per page actually used
    pub page_size: usize,

    /// `ceil(total_records / page_size)`, 0 for an empty table
    pub total_pages: usize,

    /// Row count across all pages
    pub total_records: usize,
}

/// Sort (stably) and slice out one page
///
/// `sort = None` keeps the input order. A `page_size` of 0 is treated as 1.
/// Out-of-range pages come back empty rather than failing.
pub fn sort_and_page(
    records: &[Record],
    sort: Option<SortKey>,
    page_index: usize,
    page_size: usize,
) -> TablePage {
    let page_size = page_size.max(1);
    let total_records = records.len();
    let total_pages = total_records.div_ceil(page_size);

    let mut order: Vec<&Record> = records.iter().collect();
    if let Some(key) = sort {
        order.sort_by(|a, b| key.compare(a, b));
    }

    let rows = match page_index.checked_mul(page_size) {
        Some(start) if start < total_records => order
            .into_iter()
            .skip(start)
            .take(page_size)
            .cloned()
            .collect(),
        _ => Vec::new(),
    };

    TablePage {
        rows,
        page_index,
        page_size,
        total_pages,
        total_records,
    }
}
