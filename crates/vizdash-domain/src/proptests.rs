//! Property tests across the engine

use crate::*;
use proptest::prelude::*;

fn label() -> impl Strategy<Value = Option<String>> {
    prop::option::of(prop::sample::select(vec!["USA", "usa", "UK", "India", "Brazil", ""]))
        .prop_map(|s| s.map(str::to_string))
}

fn record() -> impl Strategy<Value = Record> {
    (
        label(),
        label(),
        prop::option::of(2016i64..2030),
        prop::option::of(0u8..10),
    )
        .prop_map(|(country, topic, end_year, intensity)| {
            let mut record = Record::default();
            record.set(Field::Country, country.map(FieldValue::Text));
            record.set(Field::Topic, topic.map(FieldValue::Text));
            record.end_year = end_year;
            record.intensity = intensity.map(f64::from);
            record
        })
}

fn spec() -> impl Strategy<Value = FilterSpec> {
    (
        prop::option::of(prop::sample::select(vec!["usa", "UK", "india", "nowhere"])),
        prop::option::of(prop::sample::select(vec!["2016", "2020", "20x", "x"])),
    )
        .prop_map(|(country, year)| {
            let mut spec = FilterSpec::new();
            if let Some(country) = country {
                spec.insert(Field::Country, country);
            }
            if let Some(year) = year {
                spec.insert(Field::EndYear, year);
            }
            spec
        })
}

proptest! {
    /// Property: an empty spec returns the input unchanged
    #[test]
    fn test_filter_identity(records in prop::collection::vec(record(), 0..30)) {
        prop_assert_eq!(FilterSpec::new().apply(&records), records);
    }

    /// Property: filtering twice equals filtering once
    #[test]
    fn test_filter_idempotent(records in prop::collection::vec(record(), 0..30), spec in spec()) {
        let once = spec.apply(&records);
        let twice = spec.apply(&once);
        prop_assert_eq!(once, twice);
    }

    /// Property: filtering never reorders surviving records
    #[test]
    fn test_filter_is_subsequence(records in prop::collection::vec(record(), 0..30), spec in spec()) {
        let filtered = spec.apply(&records);
        let mut remaining = records.iter();
        for kept in &filtered {
            prop_assert!(remaining.any(|r| r == kept));
        }
    }

    /// Property: reversing an ascending sort gives the descending sort
    #[test]
    fn test_sort_direction_symmetry(values in prop::collection::hash_set(0u32..10_000, 0..40)) {
        let records: Vec<Record> = values
            .into_iter()
            .map(|v| Record { intensity: Some(f64::from(v) / 10.0), ..Default::default() })
            .collect();
        let len = records.len();

        let mut ascending = sort_and_page(&records, Some(SortKey::asc(Field::Intensity)), 0, len).rows;
        ascending.reverse();
        let descending = sort_and_page(&records, Some(SortKey::desc(Field::Intensity)), 0, len).rows;
        prop_assert_eq!(ascending, descending);
    }

    /// Property: pages partition the input
    #[test]
    fn test_pages_cover_input(records in prop::collection::vec(record(), 0..50), page_size in 1usize..12) {
        let first = sort_and_page(&records, None, 0, page_size);
        let mut collected = Vec::new();
        for page_index in 0..first.total_pages {
            collected.extend(sort_and_page(&records, None, page_index, page_size).rows);
        }
        prop_assert_eq!(collected, records.clone());
        let after_last = sort_and_page(&records, None, first.total_pages, page_size);
        prop_assert!(after_last.rows.is_empty());
    }

    /// Property: aggregation output is ranked, truncated and duplicate-free
    #[test]
    fn test_aggregate_ranked(records in prop::collection::vec(record(), 0..40), top_n in 0usize..8) {
        let stats = aggregate(&records, Field::Country, Aggregation::Count, top_n);
        prop_assert!(stats.len() <= top_n);
        prop_assert!(stats.windows(2).all(|w| w[0].value >= w[1].value));
        for (i, stat) in stats.iter().enumerate() {
            prop_assert_eq!(stat.rank, i);
            prop_assert!(stats[..i].iter().all(|s| s.key != stat.key));
        }
    }

    /// Property: option domains are strictly increasing
    #[test]
    fn test_options_sorted_distinct(records in prop::collection::vec(record(), 0..40)) {
        let options = extract_options(&records, &Field::FILTERABLE);
        for values in options.values() {
            prop_assert!(values.windows(2).all(|w| w[0].compare(&w[1]).is_lt()));
        }
    }
}

#[test]
fn test_end_to_end_scenario() {
    let records: Vec<Record> = serde_json::from_str(
        r#"[
            {"country": "USA", "intensity": 6, "topic": "Energy"},
            {"country": "USA", "intensity": 8, "topic": "Energy"},
            {"country": "UK", "intensity": 2, "topic": "Policy"}
        ]"#,
    )
    .unwrap();

    let spec = FilterSpec::from_params([("topic", "Energy")]);
    let filtered = spec.apply(&records);
    let stats = aggregate(&filtered, Field::Country, Aggregation::Mean(Field::Intensity), 10);

    assert_eq!(
        stats,
        vec![GroupedStatistic {
            key: "USA".to_string(),
            value: 7.0,
            rank: 0,
        }]
    );
}
