//! Country keys and names on map features.

use std::collections::HashMap;

pub use conflict_map_data_models::KEY_PROPERTY;

use conflict_map_data_models::CountryKey;
use geojson::{Feature, FeatureCollection};

/// Property names that may hold a country code, in fallback order.
pub const KEY_PROPERTIES: &[&str] = &[
    KEY_PROPERTY,
    "iso3",
    "ISO3166_1_Alpha_3",
    "ISO3166-1-Alpha-3",
    "ISO3166.1.Alpha.3",
    "ISO_A3",
    "ADM0_A3",
];

/// Property names that may hold a display name, in fallback order.
pub const NAME_PROPERTIES: &[&str] = &["name", "ADMIN", "NAME_EN", "NAME", "admin"];

/// Name used when a feature carries none of [`NAME_PROPERTIES`].
pub const UNKNOWN_NAME: &str = "Unknown";

fn first_string<'a>(feature: &'a Feature, names: &[&str]) -> Option<&'a str> {
    names
        .iter()
        .filter_map(|name| feature.property(name)?.as_str())
        .map(str::trim)
        .find(|value| !value.is_empty())
}

/// The normalized country key of a feature, or the empty key when no
/// recognized property holds a non-empty string.
#[must_use]
pub fn feature_key(feature: &Feature) -> CountryKey {
    first_string(feature, KEY_PROPERTIES).map_or_else(CountryKey::empty, CountryKey::new)
}

/// The display name of a feature, [`UNKNOWN_NAME`] if it has none.
#[must_use]
pub fn feature_name(feature: &Feature) -> &str {
    first_string(feature, NAME_PROPERTIES).unwrap_or(UNKNOWN_NAME)
}

/// Returns a copy of `collection` in which every feature carries its
/// normalized key under [`KEY_PROPERTY`]. Features without a recognized
/// code get the empty key and still render.
#[must_use]
pub fn attach_keys(collection: &FeatureCollection) -> FeatureCollection {
    let mut keyed = collection.clone();
    let mut unresolved = 0_usize;

    for feature in &mut keyed.features {
        let key = feature_key(feature);
        if key.is_empty() {
            unresolved += 1;
        }
        feature.set_property(KEY_PROPERTY, key.as_str());
    }

    if unresolved > 0 {
        log::debug!(
            "{unresolved} of {} features have no recognized country code",
            keyed.features.len()
        );
    }

    keyed
}

/// Country key → feature position in a collection.
#[derive(Debug, Clone, Default)]
pub struct FeatureLookup {
    positions: HashMap<CountryKey, usize>,
}

impl FeatureLookup {
    /// Indexes `collection`. The first feature per key wins; features with
    /// the empty key are left out.
    #[must_use]
    pub fn build(collection: &FeatureCollection) -> Self {
        let mut positions = HashMap::with_capacity(collection.features.len());
        for (i, feature) in collection.features.iter().enumerate() {
            let key = feature_key(feature);
            if !key.is_empty() {
                positions.entry(key).or_insert(i);
            }
        }
        Self { positions }
    }

    /// Position of the feature for `key`.
    #[must_use]
    pub fn position(&self, key: &CountryKey) -> Option<usize> {
        self.positions.get(key).copied()
    }

    /// The feature for `key` within the collection this lookup was built
    /// from.
    #[must_use]
    pub fn feature<'a>(
        &self,
        collection: &'a FeatureCollection,
        key: &CountryKey,
    ) -> Option<&'a Feature> {
        collection.features.get(self.position(key)?)
    }

    /// Number of indexed keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether no feature had a key.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use geojson::JsonObject;
    use serde_json::json;

    use super::*;

    fn feature(properties: serde_json::Value) -> Feature {
        let properties: JsonObject = serde_json::from_value(properties).unwrap();
        Feature {
            properties: Some(properties),
            ..Feature::default()
        }
    }

    fn collection(features: Vec<Feature>) -> FeatureCollection {
        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }

    #[test]
    fn key_follows_fallback_order() {
        assert_eq!(feature_key(&feature(json!({"iso3": "usa"}))).as_str(), "USA");
        assert_eq!(
            feature_key(&feature(json!({"ISO3166-1-Alpha-3": " fra "}))).as_str(),
            "FRA"
        );
        assert_eq!(
            feature_key(&feature(json!({"iso3": "", "ISO3166_1_Alpha_3": "DEU"}))).as_str(),
            "DEU"
        );
        assert_eq!(
            feature_key(&feature(json!({"ISO_A3": "NOR", "iso3": "SWE"}))).as_str(),
            "SWE"
        );
    }

    #[test]
    fn key_defaults_to_empty() {
        assert!(feature_key(&feature(json!({"iso3": 840}))).is_empty());
        assert!(feature_key(&Feature::default()).is_empty());
    }

    #[test]
    fn name_follows_fallback_order() {
        assert_eq!(feature_name(&feature(json!({"ADMIN": "France"}))), "France");
        assert_eq!(
            feature_name(&feature(json!({"NAME": "Chad", "name": "Tchad"}))),
            "Tchad"
        );
        assert_eq!(feature_name(&feature(json!({}))), UNKNOWN_NAME);
    }

    #[test]
    fn attach_keys_leaves_input_untouched() {
        let original = collection(vec![
            feature(json!({"iso3": "gbr"})),
            feature(json!({"name": "Disputed"})),
        ]);

        let keyed = attach_keys(&original);

        assert_eq!(keyed.features[0].property(KEY_PROPERTY), Some(&json!("GBR")));
        assert_eq!(keyed.features[1].property(KEY_PROPERTY), Some(&json!("")));
        assert_eq!(original.features[0].property(KEY_PROPERTY), None);
    }

    #[test]
    fn attach_keys_is_idempotent() {
        let once = attach_keys(&collection(vec![feature(json!({"ISO_A3": " ken"}))]));
        let twice = attach_keys(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn lookup_keeps_first_feature_per_key() {
        let features = collection(vec![
            feature(json!({"iso3": "IND", "name": "India"})),
            feature(json!({"name": "No code"})),
            feature(json!({"iso3": "ind", "name": "Duplicate"})),
        ]);
        let lookup = FeatureLookup::build(&features);

        assert_eq!(lookup.len(), 1);
        assert_eq!(lookup.position(&CountryKey::new("IND")), Some(0));
        let found = lookup.feature(&features, &CountryKey::new("IND")).unwrap();
        assert_eq!(feature_name(found), "India");
        assert_eq!(lookup.position(&CountryKey::empty()), None);
    }
}
