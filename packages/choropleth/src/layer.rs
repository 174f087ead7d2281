//! In-memory feature layer.
//!
//! [`FeatureLayer`] is a [`MapAdapter`] that owns the keyed feature
//! collection and the active fill expression. A renderer binding takes the
//! collection and expression from here after each repaint.

use conflict_map_country::{FeatureLookup, feature_name};
use conflict_map_data_models::{CountryKey, KEY_PROPERTY, Metric};
use geojson::{Feature, FeatureCollection};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::scale::VALUE_PROPERTY;
use crate::{ColorScale, LegendStop, MapAdapter, ValueMap};

/// Tooltip contents for a hovered country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoverInfo {
    /// Country key.
    pub key: CountryKey,
    /// Feature display name.
    pub name: String,
    /// Painted value.
    pub value: f64,
    /// `value` formatted for the active metric.
    pub formatted: String,
}

/// Features with attached keys and values, plus the active color scale.
#[derive(Debug, Clone)]
pub struct FeatureLayer {
    collection: FeatureCollection,
    lookup: FeatureLookup,
    metric: Metric,
    expression: Value,
    legend: Vec<LegendStop>,
}

impl Default for FeatureLayer {
    fn default() -> Self {
        Self {
            collection: FeatureCollection {
                bbox: None,
                features: Vec::new(),
                foreign_members: None,
            },
            lookup: FeatureLookup::default(),
            metric: Metric::default(),
            expression: Value::Null,
            legend: Vec::new(),
        }
    }
}

fn stored_key(feature: &Feature) -> &str {
    feature
        .property(KEY_PROPERTY)
        .and_then(Value::as_str)
        .unwrap_or_default()
}

fn stored_value(feature: &Feature) -> f64 {
    feature
        .property(VALUE_PROPERTY)
        .and_then(Value::as_f64)
        .unwrap_or(0.0)
}

impl FeatureLayer {
    /// Creates an empty layer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The features as they should be rendered.
    #[must_use]
    pub const fn collection(&self) -> &FeatureCollection {
        &self.collection
    }

    /// The active fill-color expression (`null` before the first scale).
    #[must_use]
    pub const fn expression(&self) -> &Value {
        &self.expression
    }

    /// The active legend.
    #[must_use]
    pub fn legend(&self) -> &[LegendStop] {
        &self.legend
    }

    /// The painted value of the feature for `key`, if the layer has one.
    #[must_use]
    pub fn value_of(&self, key: &CountryKey) -> Option<f64> {
        self.lookup
            .feature(&self.collection, key)
            .map(stored_value)
    }

    /// Tooltip contents for `key`.
    #[must_use]
    pub fn hover_info(&self, key: &CountryKey) -> Option<HoverInfo> {
        let feature = self.lookup.feature(&self.collection, key)?;
        let value = stored_value(feature);
        Some(HoverInfo {
            key: key.clone(),
            name: feature_name(feature).to_owned(),
            value,
            formatted: self.metric.format_value(value),
        })
    }
}

impl MapAdapter for FeatureLayer {
    fn set_features(&mut self, features: FeatureCollection) {
        self.lookup = FeatureLookup::build(&features);
        self.collection = features;
    }

    fn apply_values(&mut self, values: &ValueMap) {
        for feature in &mut self.collection.features {
            let value = values.get(stored_key(feature));
            feature.set_property(VALUE_PROPERTY, value);
        }
    }

    fn set_color_scale(&mut self, scale: &ColorScale) {
        self.metric = scale.metric;
        self.expression = scale.expression();
        self.legend = scale.legend().to_vec();
    }
}
