//! VizDash Domain Layer
//!
//! The data aggregation and filtering engine behind the dashboard. Everything
//! here is a pure, synchronous transformation over a record slice; the only
//! fallible boundary is the [`traits::RecordStore`] implemented elsewhere.
//!
//! ## Key Concepts
//!
//! - **Record**: one analytical entry with optional, schema-typed fields
//! - **Filter Specification**: field → equality constraint
//! - **Grouped Statistic**: (group label, count or mean, rank)
//! - **Option domain**: the sorted distinct values of a filterable field
//! - **Table page**: a stable-sorted slice of records
//!
//! ## Pipeline
//!
//! ```text
//! store ─► FilterSpec::apply ─┬─► aggregate (one per chart)
//!                             ├─► sort_and_page (table)
//!                             └─► SummaryStats (stat cards)
//! store ─► extract_options  (always over the unfiltered set)
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod aggregate;
pub mod dashboard;
pub mod field;
pub mod filter;
pub mod options;
pub mod record;
pub mod summary;
pub mod table;
pub mod traits;

// Re-exports for convenience
pub use aggregate::{aggregate, Aggregation, GroupedStatistic};
pub use dashboard::{ChartPanel, ChartSpec, DashboardView};
pub use field::{Field, FieldKind, FieldValue};
pub use filter::{Constraint, FilterSpec};
pub use options::{extract_options, FieldOptions};
pub use record::Record;
pub use summary::SummaryStats;
pub use table::{sort_and_page, SortDirection, SortKey, TablePage};
pub use traits::RecordStore;

#[cfg(test)]
mod proptests;
