//! Global per-year totals.

use std::collections::{BTreeMap, BTreeSet};

use conflict_map_data_models::{RawRow, TimelinePoint, finite_or_zero};

/// Sums events and deaths per year across every country.
///
/// One point per distinct year, strictly ascending regardless of row order.
/// Non-finite values count as 0; negative values are summed as given.
#[must_use]
pub fn global_timeline(rows: &[RawRow]) -> Vec<TimelinePoint> {
    let mut by_year: BTreeMap<i32, TimelinePoint> = BTreeMap::new();

    for row in rows {
        let point = by_year.entry(row.year).or_insert(TimelinePoint {
            year: row.year,
            events: 0.0,
            deaths: 0.0,
        });
        point.events += finite_or_zero(row.events);
        point.deaths += finite_or_zero(row.deaths);
    }

    by_year.into_values().collect()
}

/// Distinct years present in `rows`, ascending.
#[must_use]
pub fn distinct_years(rows: &[RawRow]) -> Vec<i32> {
    rows.iter()
        .map(|row| row.year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(key: &str, year: i32, events: f64, deaths: f64) -> RawRow {
        RawRow {
            country_key: key.to_string(),
            year,
            events,
            deaths,
            ..RawRow::default()
        }
    }

    #[test]
    fn sums_one_point_per_year() {
        let rows = vec![row("USA", 2001, 5.0, 10.0), row("USA", 2002, 7.0, 3.0)];
        assert_eq!(
            global_timeline(&rows),
            vec![
                TimelinePoint {
                    year: 2001,
                    events: 5.0,
                    deaths: 10.0
                },
                TimelinePoint {
                    year: 2002,
                    events: 7.0,
                    deaths: 3.0
                },
            ]
        );
    }

    #[test]
    fn strictly_ascending_for_any_order() {
        let rows = vec![
            row("A", 2010, 1.0, 0.0),
            row("B", 2003, 1.0, 0.0),
            row("C", 2010, 2.0, f64::NAN),
            row("D", 2001, 1.0, 0.0),
            row("E", 2003, 4.0, 1.0),
        ];
        let timeline = global_timeline(&rows);

        assert!(timeline.windows(2).all(|w| w[0].year < w[1].year));
        assert_eq!(timeline.len(), 3);
        assert!((timeline[2].events - 3.0).abs() < f64::EPSILON);
        assert!(timeline[2].deaths.abs() < f64::EPSILON);
    }

    #[test]
    fn sums_values_as_given_except_non_finite() {
        let rows = vec![
            row("A", 2005, 5.0, 2.0),
            row("B", 2005, -2.0, f64::INFINITY),
        ];
        let timeline = global_timeline(&rows);

        assert_eq!(timeline.len(), 1);
        assert!((timeline[0].events - 3.0).abs() < f64::EPSILON);
        assert!((timeline[0].deaths - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_input_gives_empty_timeline() {
        assert!(global_timeline(&[]).is_empty());
        assert!(distinct_years(&[]).is_empty());
    }

    #[test]
    fn lists_distinct_years() {
        let rows = vec![row("A", 2004, 0.0, 0.0), row("B", 2002, 0.0, 0.0), row("C", 2004, 0.0, 0.0)];
        assert_eq!(distinct_years(&rows), vec![2002, 2004]);
    }
}
