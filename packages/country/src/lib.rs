#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Country lookup tables.
//!
//! [`CountryIndex`] is built once from the summary rows and answers
//! key → name and name → key questions. The [`feature`] module does the
//! same job for map features, whose country codes hide under one of
//! several property names depending on where the polygons came from.

pub mod feature;

use std::collections::BTreeMap;

use conflict_map_data_models::{CountryKey, RawRow};
use serde::{Deserialize, Serialize};

pub use feature::{FeatureLookup, attach_keys, feature_key, feature_name};

/// What the index knows about one country.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryEntry {
    /// Display name, empty if no row carried one.
    pub name: String,
    /// The code as first written in the source, trimmed but not uppercased.
    pub display_code: String,
}

/// One entry of the country selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryOption {
    /// Country key.
    pub key: CountryKey,
    /// Label (the display name, or the key when the name is unknown).
    pub name: String,
}

/// Key → country lookups built from summary rows.
#[derive(Debug, Clone, Default)]
pub struct CountryIndex {
    entries: BTreeMap<CountryKey, CountryEntry>,
    by_name: BTreeMap<String, CountryKey>,
}

impl CountryIndex {
    /// Builds the index. Rows with an empty key are skipped. The first
    /// non-empty name seen for a key wins, and so does the first key seen
    /// for a name.
    #[must_use]
    pub fn build(rows: &[RawRow]) -> Self {
        let mut entries: BTreeMap<CountryKey, CountryEntry> = BTreeMap::new();
        let mut by_name = BTreeMap::new();

        for row in rows {
            let key = row.key();
            if key.is_empty() {
                continue;
            }

            let name = row.country.trim();
            let entry = entries.entry(key.clone()).or_insert_with(|| CountryEntry {
                name: String::new(),
                display_code: row.country_key.trim().to_owned(),
            });
            if entry.name.is_empty() && !name.is_empty() {
                name.clone_into(&mut entry.name);
            }

            if !name.is_empty() {
                by_name.entry(name.to_owned()).or_insert(key);
            }
        }

        log::debug!("Indexed {} countries", entries.len());

        Self { entries, by_name }
    }

    /// Looks up a country.
    #[must_use]
    pub fn get(&self, key: &CountryKey) -> Option<&CountryEntry> {
        self.entries.get(key)
    }

    /// Display name for `key`, if the index has a non-empty one.
    #[must_use]
    pub fn name_for(&self, key: &CountryKey) -> Option<&str> {
        self.get(key)
            .map(|entry| entry.name.as_str())
            .filter(|name| !name.is_empty())
    }

    /// Reverse lookup by display name (exact match after trimming).
    #[must_use]
    pub fn key_for_name(&self, name: &str) -> Option<&CountryKey> {
        self.by_name.get(name.trim())
    }

    /// Returns copies of `rows` with empty country keys filled in by name.
    ///
    /// Rows whose name is unknown keep their empty key.
    #[must_use]
    pub fn backfill_keys(&self, rows: &[RawRow]) -> Vec<RawRow> {
        let mut filled = 0_usize;
        let out = rows
            .iter()
            .map(|row| {
                let mut row = row.clone();
                if row.key().is_empty()
                    && let Some(key) = self.key_for_name(&row.country)
                {
                    row.country_key = key.as_str().to_owned();
                    filled += 1;
                }
                row
            })
            .collect();

        log::debug!("Backfilled {filled} of {} row keys by name", rows.len());
        out
    }

    /// Selector entries sorted by label, then key.
    #[must_use]
    pub fn options(&self) -> Vec<CountryOption> {
        let mut options: Vec<CountryOption> = self
            .entries
            .iter()
            .map(|(key, entry)| CountryOption {
                key: key.clone(),
                name: if entry.name.is_empty() {
                    key.to_string()
                } else {
                    entry.name.clone()
                },
            })
            .collect();
        options.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.key.cmp(&b.key)));
        options
    }

    /// Iterates over every indexed key in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &CountryKey> {
        self.entries.keys()
    }

    /// Number of indexed countries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
