#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dataset definition types and the loaded session snapshot.
//!
//! A [`DatasetDefinition`] says where a dataset lives and how its columns
//! map onto [`RawRow`] fields. Column names differ between exports of the
//! same data, so every field is a list of candidate header names tried in
//! order. A [`Snapshot`] is what one session load produces: each dataset
//! paired with whether it actually loaded.

use conflict_map_data_models::RawRow;
use geojson::FeatureCollection;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Errors produced while reading dataset definitions.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// The TOML definition was malformed.
    #[error("Invalid dataset definition: {0}")]
    Toml(#[from] toml::de::Error),
}

/// What a dataset contains, and therefore which view consumes it.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DatasetKind {
    /// Country-year summary rows (events, deaths, fatality rate).
    Summary,
    /// Country-year-type share rows.
    TypeShare,
    /// Region-year-type event counts.
    Flow,
    /// Country polygons.
    Countries,
}

/// A dataset the loader knows how to fetch, deserialized from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetDefinition {
    /// Unique identifier (e.g. `"country_year_summary"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Content kind.
    pub kind: DatasetKind,
    /// Location handed to the raw source (relative path or URL).
    pub location: String,
    /// Column name mapping. Unused for geometry datasets.
    #[serde(default)]
    pub fields: FieldMapping,
}

impl DatasetDefinition {
    /// Parses a definition from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Toml`] if the TOML is malformed or missing
    /// required fields.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, DatasetError> {
        Ok(toml::de::from_str(toml_str)?)
    }

    /// Whether this dataset is tabular.
    #[must_use]
    pub const fn is_tabular(&self) -> bool {
        !matches!(self.kind, DatasetKind::Countries)
    }
}

/// Candidate header names for each [`RawRow`] field, tried in order (first
/// non-empty cell wins).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMapping {
    /// Country code columns.
    pub country_key: Vec<String>,
    /// Country display name columns.
    pub country: Vec<String>,
    /// Year columns. Rows without a parsable year are dropped.
    pub year: Vec<String>,
    /// Event count columns.
    pub events: Vec<String>,
    /// Death count columns.
    pub deaths: Vec<String>,
    /// Fatality rate columns.
    pub fatality_rate: Vec<String>,
    /// Share columns.
    pub share: Vec<String>,
    /// Type-of-violence columns.
    pub violence_type: Vec<String>,
    /// Region columns.
    pub region: Vec<String>,
}

/// Whether a dataset made it into the snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoadStatus {
    /// Not requested (yet).
    #[default]
    Pending,
    /// Fetched and parsed.
    Loaded,
    /// Fetch or parse failed; the data is empty.
    Failed {
        /// Why the load failed.
        reason: String,
    },
}

/// A dataset's data together with its load status.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset<T> {
    /// Load status.
    pub status: LoadStatus,
    /// The data, empty unless `status` is [`LoadStatus::Loaded`].
    pub data: T,
}

impl<T> Dataset<T> {
    /// A successfully loaded dataset.
    pub const fn loaded(data: T) -> Self {
        Self {
            status: LoadStatus::Loaded,
            data,
        }
    }

    /// A failed dataset carrying the given (empty) placeholder data.
    pub fn failed_with(reason: impl Into<String>, data: T) -> Self {
        Self {
            status: LoadStatus::Failed {
                reason: reason.into(),
            },
            data,
        }
    }

    /// Whether the data loaded.
    pub const fn is_loaded(&self) -> bool {
        matches!(self.status, LoadStatus::Loaded)
    }
}

impl<T: Default> Dataset<T> {
    /// A failed dataset with empty data.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::failed_with(reason, T::default())
    }
}

/// Returns an empty feature collection.
#[must_use]
pub const fn empty_collection() -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: Vec::new(),
        foreign_members: None,
    }
}

/// Everything one session load produced.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Country-year summaries (map values, rankings, timeline).
    pub summary: Dataset<Vec<RawRow>>,
    /// Country-year-type shares (composition series).
    pub shares: Dataset<Vec<RawRow>>,
    /// Region-year-type counts (flow graph).
    pub flows: Dataset<Vec<RawRow>>,
    /// Country polygons.
    pub countries: Dataset<FeatureCollection>,
}

impl Snapshot {
    /// A snapshot in which nothing has loaded yet.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            summary: Dataset::default(),
            shares: Dataset::default(),
            flows: Dataset::default(),
            countries: Dataset {
                status: LoadStatus::Pending,
                data: empty_collection(),
            },
        }
    }

    /// Whether the map has both of its inputs.
    #[must_use]
    pub const fn map_ready(&self) -> bool {
        self.summary.is_loaded() && self.countries.is_loaded()
    }

    /// Statuses of every dataset, for diagnostics.
    #[must_use]
    pub fn statuses(&self) -> [(DatasetKind, &LoadStatus); 4] {
        [
            (DatasetKind::Summary, &self.summary.status),
            (DatasetKind::TypeShare, &self.shares.status),
            (DatasetKind::Flow, &self.flows.status),
            (DatasetKind::Countries, &self.countries.status),
        ]
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_definition_with_partial_fields() {
        let def = DatasetDefinition::from_toml_str(
            r#"
            id = "flows"
            name = "Flows"
            kind = "flow"
            location = "data/sankey_summary.csv"

            [fields]
            year = ["year"]
            region = ["region"]
            "#,
        )
        .unwrap();
        assert_eq!(def.kind, DatasetKind::Flow);
        assert_eq!(def.fields.region, vec!["region".to_string()]);
        assert!(def.fields.share.is_empty());
        assert!(def.is_tabular());
    }

    #[test]
    fn geometry_definition_needs_no_fields() {
        let def = DatasetDefinition::from_toml_str(
            r#"
            id = "countries"
            name = "Countries"
            kind = "countries"
            location = "data/countries.geojson"
            "#,
        )
        .unwrap();
        assert!(!def.is_tabular());
        assert_eq!(def.fields, FieldMapping::default());
    }

    #[test]
    fn rejects_unknown_kind() {
        let result = DatasetDefinition::from_toml_str(
            r#"
            id = "x"
            name = "X"
            kind = "rivers"
            location = "x.csv"
            "#,
        );
        assert!(matches!(result, Err(DatasetError::Toml(_))));
    }

    #[test]
    fn failed_dataset_is_empty() {
        let dataset: Dataset<Vec<RawRow>> = Dataset::failed("timeout");
        assert!(!dataset.is_loaded());
        assert!(dataset.data.is_empty());
        assert_eq!(
            dataset.status,
            LoadStatus::Failed {
                reason: "timeout".to_string()
            }
        );
    }

    #[test]
    fn empty_snapshot_is_not_map_ready() {
        let snapshot = Snapshot::empty();
        assert!(!snapshot.map_ready());
        assert!(
            snapshot
                .statuses()
                .iter()
                .all(|(_, status)| **status == LoadStatus::Pending)
        );
    }
}
