//! Per-country type-of-violence composition over time.

use std::collections::BTreeMap;

use conflict_map_data_models::{CountryKey, RawRow, ShareRecord, YearRange, finite_or_zero};

/// How far a year's share total may drift from 1 before it is logged.
const SHARE_SUM_TOLERANCE: f64 = 0.01;

/// Pivots share rows for one country into one record per year.
///
/// Only rows with a valid category (1-3) and a year in
/// `[year_min, year_max]` count; the bounds may be given in either order.
/// Every year with at least one such row appears, with absent categories
/// left at 0. When a (year, category) pair repeats, the last row wins.
/// Shares are clamped to `[0, 1]` but never renormalized.
#[must_use]
pub fn country_type_series(
    rows: &[RawRow],
    key: &CountryKey,
    year_min: i32,
    year_max: i32,
) -> Vec<ShareRecord> {
    if key.is_empty() {
        return Vec::new();
    }

    let range = YearRange::new(year_min, year_max);
    let mut by_year: BTreeMap<i32, ShareRecord> = BTreeMap::new();

    for row in rows {
        if !range.contains(row.year) || row.key() != *key {
            continue;
        }
        let Some(category) = row.category() else {
            continue;
        };

        by_year
            .entry(row.year)
            .or_insert_with(|| ShareRecord::zero(row.year))
            .set(category, finite_or_zero(row.share).clamp(0.0, 1.0));
    }

    for record in by_year.values() {
        let total = record.total();
        if (total - 1.0).abs() > SHARE_SUM_TOLERANCE {
            log::debug!("{key} {}: shares sum to {total:.3}", record.year);
        }
    }

    by_year.into_values().collect()
}
