//! Dataset registry. Loads dataset definitions from embedded TOML configs.
//!
//! Each `.toml` file in `packages/source/datasets/` is baked into the binary
//! at compile time via [`include_str!`]. Pointing the loader at a different
//! export only needs a TOML edit.

use conflict_map_source_models::{DatasetDefinition, DatasetKind};

/// TOML configs embedded at compile time.
const DATASET_TOMLS: &[(&str, &str)] = &[
    (
        "country_year_summary",
        include_str!("../datasets/country_year_summary.toml"),
    ),
    (
        "country_year_type_share",
        include_str!("../datasets/country_year_type_share.toml"),
    ),
    ("sankey_summary", include_str!("../datasets/sankey_summary.toml")),
    ("countries", include_str!("../datasets/countries.toml")),
];

/// Total number of configured datasets (used in tests).
#[cfg(test)]
const EXPECTED_DATASET_COUNT: usize = 4;

/// Returns all configured dataset definitions, parsed from embedded TOML.
///
/// # Panics
///
/// Panics if any TOML config is malformed (this is a compile-time guarantee
/// since the configs are embedded).
#[must_use]
pub fn all_datasets() -> Vec<DatasetDefinition> {
    DATASET_TOMLS
        .iter()
        .map(|(name, toml)| {
            DatasetDefinition::from_toml_str(toml)
                .unwrap_or_else(|e| panic!("Failed to parse {name}.toml: {e}"))
        })
        .collect()
}

/// Returns the embedded definition for `kind`.
#[must_use]
pub fn dataset(kind: DatasetKind) -> Option<DatasetDefinition> {
    all_datasets().into_iter().find(|d| d.kind == kind)
}
