//! Summary statistics for the stat cards

use crate::aggregate::measured_mean;
use crate::field::Field;
use crate::record::Record;
use serde::Serialize;

/// Headline numbers over a record set
///
/// Averages follow the same policy as mean aggregation (absent,
/// non-numeric and zero scores are skipped) and read 0.0 when no record
/// carries a measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryStats {
    /// Average intensity
    pub average_intensity: f64,
    /// Average likelihood
    pub average_likelihood: f64,
    /// Average relevance
    pub average_relevance: f64,
    /// Number of records
    pub total_records: usize,
}

impl SummaryStats {
    /// Compute the summary for a record set
    pub fn compute(records: &[Record]) -> Self {
        let average = |metric| measured_mean(records, metric).unwrap_or(0.0);
        Self {
            average_intensity: average(Field::Intensity),
            average_likelihood: average(Field::Likelihood),
            average_relevance: average(Field::Relevance),
            total_records: records.len(),
        }
    }

    /// Averages rounded to one decimal, as shown on the cards
    pub fn rounded(&self) -> Self {
        Self {
            average_intensity: round1(self.average_intensity),
            average_likelihood: round1(self.average_likelihood),
            average_relevance: round1(self.average_relevance),
            total_records: self.total_records,
        }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(intensity: Option<f64>, likelihood: Option<f64>, relevance: Option<f64>) -> Record {
        Record {
            intensity,
            likelihood,
            relevance,
            ..Default::default()
        }
    }

    #[test]
    fn test_summary_skips_zero_and_missing() {
        let records = vec![
            scores(Some(6.0), Some(0.0), None),
            scores(Some(0.0), Some(3.0), Some(1.0)),
            scores(Some(9.0), Some(4.0), Some(2.0)),
        ];
        let summary = SummaryStats::compute(&records);
        assert_eq!(summary.average_intensity, 7.5);
        assert_eq!(summary.average_likelihood, 3.5);
        assert_eq!(summary.average_relevance, 1.5);
        assert_eq!(summary.total_records, 3);
    }

    #[test]
    fn test_empty_summary() {
        let summary = SummaryStats::compute(&[]);
        assert_eq!(summary.average_intensity, 0.0);
        assert_eq!(summary.total_records, 0);
    }

    #[test]
    fn test_rounding() {
        let records = vec![scores(Some(1.0), None, None), scores(Some(2.0), None, None), scores(Some(2.0), None, None)];
        let rounded = SummaryStats::compute(&records).rounded();
        assert_eq!(rounded.average_intensity, 1.7);
    }
}
