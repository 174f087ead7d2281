//! `GeoJSON` parsing for the country polygon dataset.

use geojson::{FeatureCollection, GeoJson};

use crate::SourceError;

/// Parses a `GeoJSON` document into a feature collection.
///
/// A lone `Feature` is accepted and wrapped in a one-element collection.
///
/// # Errors
///
/// Returns [`SourceError::GeoJson`] if the text is not valid `GeoJSON` or
/// is a bare geometry.
pub fn parse_features(text: &str) -> Result<FeatureCollection, SourceError> {
    let geojson: GeoJson = text.parse()?;

    let collection = match geojson {
        GeoJson::Feature(feature) => FeatureCollection {
            bbox: None,
            features: vec![feature],
            foreign_members: None,
        },
        other => FeatureCollection::try_from(other)?,
    };

    log::debug!("Parsed {} features", collection.features.len());
    Ok(collection)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_feature_collection() {
        let text = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {"iso3": "usa"}, "geometry": null},
                {"type": "Feature", "properties": {"ISO_A3": "GBR"}, "geometry": null}
            ]
        }"#;
        let collection = parse_features(text).unwrap();
        assert_eq!(collection.features.len(), 2);
        assert_eq!(
            collection.features[0].property("iso3"),
            Some(&geojson::JsonValue::from("usa"))
        );
    }

    #[test]
    fn wraps_single_feature() {
        let text = r#"{"type": "Feature", "properties": {"name": "X"}, "geometry": null}"#;
        assert_eq!(parse_features(text).unwrap().features.len(), 1);
    }

    #[test]
    fn rejects_bare_geometry() {
        let text = r#"{"type": "Point", "coordinates": [0.0, 0.0]}"#;
        assert!(matches!(parse_features(text), Err(SourceError::GeoJson(_))));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_features("not json").is_err());
    }
}
