//! Per-year value maps.

use std::collections::{BTreeMap, HashMap};

use conflict_map_data_models::{CountryKey, Metric, RawRow};

use crate::ColorScale;

/// Row positions grouped by year, built once per snapshot so that a year
/// change only visits that year's rows.
#[derive(Debug, Clone, Default)]
pub struct YearPartition {
    by_year: BTreeMap<i32, Vec<usize>>,
}

impl YearPartition {
    /// Partitions `rows` by year.
    #[must_use]
    pub fn build(rows: &[RawRow]) -> Self {
        let mut by_year: BTreeMap<i32, Vec<usize>> = BTreeMap::new();
        for (i, row) in rows.iter().enumerate() {
            by_year.entry(row.year).or_default().push(i);
        }
        Self { by_year }
    }

    /// Positions of the rows for `year`, empty if there are none.
    #[must_use]
    pub fn indices(&self, year: i32) -> &[usize] {
        self.by_year.get(&year).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Years that have rows, ascending.
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.by_year.keys().copied()
    }
}

/// Country key → clamped metric value for one (year, metric).
///
/// Lookups never miss: an absent key reads as 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueMap {
    values: HashMap<CountryKey, f64>,
}

impl ValueMap {
    /// The value for `key`, 0 when absent.
    #[must_use]
    pub fn get(&self, key: &str) -> f64 {
        self.values.get(key).copied().unwrap_or(0.0)
    }

    /// Whether `key` has an explicit value.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Number of keys with an explicit value.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no key has an explicit value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over the explicit values in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&CountryKey, f64)> {
        self.values.iter().map(|(key, value)| (key, *value))
    }
}

impl FromIterator<(CountryKey, f64)> for ValueMap {
    fn from_iter<I: IntoIterator<Item = (CountryKey, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Builds the value map for (`year`, `metric`).
///
/// Only the rows `partition` lists for `year` are visited. Values are
/// clamped to the scale's domain; rows with an empty key are skipped, and
/// if a key repeats within the year the last row wins.
#[must_use]
pub fn value_map(
    partition: &YearPartition,
    rows: &[RawRow],
    year: i32,
    metric: Metric,
    scale: &ColorScale,
) -> ValueMap {
    let values: ValueMap = partition
        .indices(year)
        .iter()
        .filter_map(|&i| rows.get(i))
        .map(|row| (row.key(), scale.clamp(metric.value(row))))
        .filter(|(key, _)| !key.is_empty())
        .collect();

    log::trace!("{year}/{metric}: {} country values", values.len());
    values
}
