//! Country rankings.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use conflict_map_data_models::{
    AggregateRecord, CountryKey, RankMetric, Rankings, RawRow, Scope, non_negative,
};

/// Sums events and deaths per country in a single pass. Rows with an empty
/// key are skipped. The name is the first non-empty one seen, or the key.
fn accumulate<'a>(rows: impl Iterator<Item = &'a RawRow>) -> BTreeMap<CountryKey, AggregateRecord> {
    let mut totals: BTreeMap<CountryKey, AggregateRecord> = BTreeMap::new();

    for row in rows {
        let key = row.key();
        if key.is_empty() {
            continue;
        }

        let entry = totals.entry(key).or_insert_with_key(|key| AggregateRecord {
            key: key.clone(),
            name: String::new(),
            events: 0.0,
            deaths: 0.0,
        });
        entry.events += non_negative(row.events);
        entry.deaths += non_negative(row.deaths);
        if entry.name.is_empty() {
            row.country.trim().clone_into(&mut entry.name);
        }
    }

    for record in totals.values_mut() {
        if record.name.is_empty() {
            record.name = record.key.to_string();
        }
    }

    totals
}

/// Descending by `metric`, ties by ascending key.
fn by_metric_desc(metric: RankMetric) -> impl Fn(&AggregateRecord, &AggregateRecord) -> Ordering {
    move |a, b| {
        metric
            .of(b)
            .total_cmp(&metric.of(a))
            .then_with(|| a.key.cmp(&b.key))
    }
}

fn top_n(records: &[AggregateRecord], metric: RankMetric, n: usize) -> Vec<AggregateRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(by_metric_desc(metric));
    sorted.truncate(n);
    sorted
}

/// Ranks countries by `metric` and by its paired metric.
///
/// With [`Scope::Year`] only rows from `year` count; with [`Scope::Total`]
/// `year` is ignored. Both lists come from the same pass over the rows and
/// hold at most `n` records each.
#[must_use]
pub fn rank_by(rows: &[RawRow], scope: Scope, year: i32, metric: RankMetric, n: usize) -> Rankings {
    let totals = match scope {
        Scope::Total => accumulate(rows.iter()),
        Scope::Year => accumulate(rows.iter().filter(|row| row.year == year)),
    };
    let records: Vec<AggregateRecord> = totals.into_values().collect();

    log::debug!(
        "Ranked {} countries ({scope}, year {year}) by {metric}",
        records.len()
    );

    Rankings {
        metric,
        top: top_n(&records, metric, n),
        paired: top_n(&records, metric.paired(), n),
    }
}

/// Per-country totals over every row, sorted by key.
#[must_use]
pub fn country_totals(rows: &[RawRow]) -> Vec<AggregateRecord> {
    accumulate(rows.iter()).into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(key: &str, year: i32, events: f64, deaths: f64) -> RawRow {
        RawRow {
            country: String::new(),
            country_key: key.to_string(),
            year,
            events,
            deaths,
            ..RawRow::default()
        }
    }

    fn keys(records: &[AggregateRecord]) -> Vec<&str> {
        records.iter().map(|r| r.key.as_str()).collect()
    }

    #[test]
    fn year_scope_top_one() {
        let rows = vec![
            row("USA", 2020, 100.0, 1.0),
            row("GBR", 2020, 50.0, 2.0),
            row("GBR", 2019, 500.0, 0.0),
        ];
        let rankings = rank_by(&rows, Scope::Year, 2020, RankMetric::Events, 1);

        assert_eq!(rankings.top.len(), 1);
        assert_eq!(rankings.top[0].key.as_str(), "USA");
        assert!((rankings.top[0].events - 100.0).abs() < f64::EPSILON);
        assert_eq!(keys(&rankings.paired), vec!["GBR"]);
    }

    #[test]
    fn year_scope_only_includes_countries_with_rows_that_year() {
        let rows = vec![row("USA", 2020, 1.0, 0.0), row("FRA", 2010, 9.0, 9.0)];
        let rankings = rank_by(&rows, Scope::Year, 2020, RankMetric::Deaths, 10);
        assert_eq!(keys(&rankings.top), vec!["USA"]);

        let total: f64 = rankings.top.iter().map(|r| r.events).sum();
        assert!(total <= 1.0);
    }

    #[test]
    fn total_scope_sums_every_year() {
        let rows = vec![
            row("USA", 2001, 5.0, 10.0),
            row("usa", 2002, 7.0, 3.0),
            row("GBR", 2002, 11.0, 1.0),
        ];
        let rankings = rank_by(&rows, Scope::Total, 1999, RankMetric::Events, 10);

        assert_eq!(keys(&rankings.top), vec!["USA", "GBR"]);
        assert!((rankings.top[0].events - 12.0).abs() < f64::EPSILON);
        assert!((rankings.top[0].deaths - 13.0).abs() < f64::EPSILON);
        assert_eq!(keys(rankings.by(RankMetric::Deaths)), vec!["USA", "GBR"]);
    }

    #[test]
    fn ties_break_by_ascending_key() {
        let rows = vec![
            row("ZAF", 2000, 3.0, 0.0),
            row("AGO", 2000, 3.0, 0.0),
            row("MLI", 2000, 3.0, 0.0),
        ];
        let rankings = rank_by(&rows, Scope::Total, 2000, RankMetric::Events, 2);
        assert_eq!(keys(&rankings.top), vec!["AGO", "MLI"]);
    }

    #[test]
    fn bad_numbers_count_as_zero() {
        let rows = vec![
            row("USA", 2000, f64::NAN, -4.0),
            row("USA", 2000, 2.0, f64::INFINITY),
        ];
        let rankings = rank_by(&rows, Scope::Total, 2000, RankMetric::Events, 5);
        assert!((rankings.top[0].events - 2.0).abs() < f64::EPSILON);
        assert!(rankings.top[0].deaths.abs() < f64::EPSILON);
    }

    #[test]
    fn empty_keys_are_excluded() {
        let rows = vec![row("", 2000, 100.0, 100.0), row("  ", 2000, 1.0, 1.0)];
        assert!(rank_by(&rows, Scope::Total, 2000, RankMetric::Events, 5).is_empty());
    }

    #[test]
    fn empty_input_gives_empty_rankings() {
        let rankings = rank_by(&[], Scope::Year, 2020, RankMetric::Deaths, 10);
        assert!(rankings.is_empty());
        assert_eq!(rankings.metric, RankMetric::Deaths);
    }

    #[test]
    fn names_fall_back_to_key() {
        let mut named = row("SYR", 2013, 1.0, 1.0);
        named.country = "Syria".to_string();
        let rows = vec![row("SYR", 2012, 1.0, 1.0), named, row("XKX", 2013, 1.0, 1.0)];

        let totals = country_totals(&rows);
        assert_eq!(totals[0].name, "Syria");
        assert!((totals[0].events - 2.0).abs() < f64::EPSILON);
        assert_eq!(totals[1].name, "XKX");
    }
}
