#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Choropleth painting.
//!
//! The map shows one value per country for the selected (year, metric).
//! Two kinds of repaint exist: a year change only pushes new values, a
//! metric change pushes new values *and* swaps the color scale. The scale
//! depends on the metric alone.
//!
//! The renderer's feature objects are never touched from here directly.
//! [`ChoroplethSync`] builds an immutable [`ValueMap`] and hands it to a
//! [`MapAdapter`], which performs the copy-in.

pub mod layer;
pub mod registry;
pub mod scale;
pub mod sync;
pub mod values;

use conflict_map_data_models::Metric;

pub use layer::{FeatureLayer, HoverInfo};
pub use registry::{ScaleSet, all_scales};
pub use scale::{ColorScale, LegendStop};
pub use sync::{ChoroplethSync, MapAdapter, Repaint};
pub use values::{ValueMap, YearPartition, value_map};

/// Errors produced while loading a color scale.
#[derive(Debug, thiserror::Error)]
pub enum ScaleError {
    /// The TOML definition was malformed.
    #[error("Invalid color scale: {0}")]
    Toml(#[from] toml::de::Error),

    /// The scale has no stops.
    #[error("Color scale for {metric} has no stops")]
    Empty {
        /// Metric the scale belongs to.
        metric: Metric,
    },

    /// Thresholds are not strictly ascending, or one is not finite.
    #[error("Color scale for {metric} has unordered thresholds")]
    Unordered {
        /// Metric the scale belongs to.
        metric: Metric,
    },

    /// A stop color is not a `#RRGGBB` hex string.
    #[error("Color scale for {metric} has invalid color {color:?}")]
    Color {
        /// Metric the scale belongs to.
        metric: Metric,
        /// The offending color string.
        color: String,
    },

    /// A scale set is missing the scale for a metric.
    #[error("No color scale configured for {metric}")]
    Missing {
        /// The metric without a scale.
        metric: Metric,
    },
}
