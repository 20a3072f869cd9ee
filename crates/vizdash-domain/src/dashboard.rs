//! Dashboard composition - every panel computed over one filtered record set

use crate::aggregate::{aggregate, Aggregation, GroupedStatistic, BAR_TOP_N, DONUT_TOP_N};
use crate::field::Field;
use crate::record::Record;
use crate::summary::SummaryStats;
use serde::Serialize;

/// Definition of one chart panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChartSpec {
    /// Stable identifier
    pub id: &'static str,
    /// Display title
    pub title: &'static str,
    /// Grouping field
    pub group_by: Field,
    /// Per-group reduction
    pub aggregation: Aggregation,
    /// Maximum number of groups shown
    pub top_n: usize,
}

/// Bar chart: mean intensity per country
pub const INTENSITY_BY_COUNTRY: ChartSpec = ChartSpec {
    id: "intensity_by_country",
    title: "Intensity by Country",
    group_by: Field::Country,
    aggregation: Aggregation::Mean(Field::Intensity),
    top_n: BAR_TOP_N,
};

/// Ranked bars: mean likelihood per sector
pub const LIKELIHOOD_BY_SECTOR: ChartSpec = ChartSpec {
    id: "likelihood_by_sector",
    title: "Likelihood by Sector",
    group_by: Field::Sector,
    aggregation: Aggregation::Mean(Field::Likelihood),
    top_n: BAR_TOP_N,
};

/// Pseudo-map: record count per region, every region shown
pub const REGION_DISTRIBUTION: ChartSpec = ChartSpec {
    id: "region_distribution",
    title: "Distribution by Region",
    group_by: Field::Region,
    aggregation: Aggregation::Count,
    top_n: usize::MAX,
};

/// Donut: record count per topic
pub const TOPIC_DISTRIBUTION: ChartSpec = ChartSpec {
    id: "topic_distribution",
    title: "Distribution by Topic",
    group_by: Field::Topic,
    aggregation: Aggregation::Count,
    top_n: DONUT_TOP_N,
};

impl ChartSpec {
    /// Aggregate a record set into this chart's panel
    pub fn render(&self, records: &[Record]) -> ChartPanel {
        let stats = aggregate(records, self.group_by, self.aggregation, self.top_n);
        ChartPanel {
            id: self.id,
            title: self.title,
            group_by: self.group_by,
            aggregation: self.aggregation,
            is_empty: stats.is_empty(),
            stats,
        }
    }
}

/// A computed chart
///
/// `is_empty` marks the "no data available" state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPanel {
    /// Identifier of the chart definition
    pub id: &'static str,
    /// Display title
    pub title: &'static str,
    /// Grouping field
    pub group_by: Field,
    /// Per-group reduction
    pub aggregation: Aggregation,
    /// Ranked groups
    pub stats: Vec<GroupedStatistic>,
    /// Whether there is nothing to draw
    pub is_empty: bool,
}

/// Everything the dashboard page shows for one filter state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    /// Stat cards (averages rounded to one decimal)
    pub summary: SummaryStats,
    /// Bar chart
    pub intensity_by_country: ChartPanel,
    /// Ranked bars
    pub likelihood_by_sector: ChartPanel,
    /// Pseudo-map
    pub region_distribution: ChartPanel,
    /// Donut
    pub topic_distribution: ChartPanel,
}

impl DashboardView {
    /// Build every panel from the same (already filtered) records
    pub fn build(records: &[Record]) -> Self {
        Self {
            summary: SummaryStats::compute(records).rounded(),
            intensity_by_country: INTENSITY_BY_COUNTRY.render(records),
            likelihood_by_sector: LIKELIHOOD_BY_SECTOR.render(records),
            region_distribution: REGION_DISTRIBUTION.render(records),
            topic_distribution: TOPIC_DISTRIBUTION.render(records),
        }
    }
}
