//! The map repaint state machine.

use std::sync::Arc;

use conflict_map_country::attach_keys;
use conflict_map_data_models::{Metric, RawRow, YearRange};
use geojson::FeatureCollection;

use crate::{ColorScale, ScaleSet, ValueMap, YearPartition, value_map};

/// The map renderer's side of the boundary. Implementations own the
/// mutable feature objects; the core only hands them immutable inputs.
pub trait MapAdapter {
    /// Replaces the rendered features. Every feature carries its
    /// normalized key under `iso3_std`.
    fn set_features(&mut self, features: FeatureCollection);

    /// Copies values onto the features, 0 for features without one.
    fn apply_values(&mut self, values: &ValueMap);

    /// Swaps the color scale.
    fn set_color_scale(&mut self, scale: &ColorScale);
}

/// What a parameter change pushed to the adapter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Repaint {
    /// Nothing: not ready yet, or the parameters did not change.
    #[default]
    Skipped,
    /// New values only (year change).
    Values,
    /// New values and a new color scale (metric change).
    ValuesAndScale,
}

#[derive(Debug)]
struct Ready {
    rows: Arc<[RawRow]>,
    partition: YearPartition,
    painted_year: i32,
    painted_metric: Metric,
}

/// Keeps the map in step with the selected year and metric.
///
/// Starts uninitialized: parameter changes are recorded but nothing is
/// painted until [`load`](Self::load) delivers rows and features.
#[derive(Debug)]
pub struct ChoroplethSync {
    scales: ScaleSet,
    year: i32,
    metric: Metric,
    ready: Option<Ready>,
}

impl ChoroplethSync {
    /// Creates an uninitialized sync. The year is clamped to the dataset
    /// range.
    #[must_use]
    pub fn new(scales: ScaleSet, year: i32, metric: Metric) -> Self {
        Self {
            scales,
            year: YearRange::default().clamp(year),
            metric,
            ready: None,
        }
    }

    /// Whether rows and features have been delivered.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.ready.is_some()
    }

    /// The selected year.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// The selected metric.
    #[must_use]
    pub const fn metric(&self) -> Metric {
        self.metric
    }

    /// The scale for the selected metric.
    #[must_use]
    pub const fn scale(&self) -> &ColorScale {
        self.scales.for_metric(self.metric)
    }

    /// Delivers the session's summary rows and country features and paints
    /// the map for the current parameters.
    ///
    /// Calling it again (a new session) starts over with the new inputs.
    pub fn load<A: MapAdapter + ?Sized>(
        &mut self,
        rows: Arc<[RawRow]>,
        features: &FeatureCollection,
        adapter: &mut A,
    ) -> Repaint {
        adapter.set_features(attach_keys(features));

        let partition = YearPartition::build(&rows);
        let scale = self.scales.for_metric(self.metric);
        adapter.set_color_scale(scale);
        adapter.apply_values(&value_map(&partition, &rows, self.year, self.metric, scale));

        log::debug!(
            "Choropleth ready: {} rows over {} years, {} features",
            rows.len(),
            partition.years().count(),
            features.features.len()
        );

        self.ready = Some(Ready {
            rows,
            partition,
            painted_year: self.year,
            painted_metric: self.metric,
        });

        Repaint::ValuesAndScale
    }

    /// Selects a year.
    pub fn set_year<A: MapAdapter + ?Sized>(&mut self, year: i32, adapter: &mut A) -> Repaint {
        self.update(year, self.metric, adapter)
    }

    /// Selects a metric.
    pub fn set_metric<A: MapAdapter + ?Sized>(&mut self, metric: Metric, adapter: &mut A) -> Repaint {
        self.update(self.year, metric, adapter)
    }

    /// Selects both at once, painting at most once.
    ///
    /// The scale is swapped only when the metric changed. Values are
    /// recomputed from the selected year's rows alone.
    pub fn update<A: MapAdapter + ?Sized>(
        &mut self,
        year: i32,
        metric: Metric,
        adapter: &mut A,
    ) -> Repaint {
        self.year = YearRange::default().clamp(year);
        self.metric = metric;

        let Some(ready) = self.ready.as_mut() else {
            return Repaint::Skipped;
        };
        if ready.painted_year == self.year && ready.painted_metric == self.metric {
            return Repaint::Skipped;
        }

        let scale = self.scales.for_metric(self.metric);
        let repaint = if ready.painted_metric == self.metric {
            Repaint::Values
        } else {
            adapter.set_color_scale(scale);
            Repaint::ValuesAndScale
        };

        adapter.apply_values(&value_map(
            &ready.partition,
            &ready.rows,
            self.year,
            self.metric,
            scale,
        ));
        ready.painted_year = self.year;
        ready.painted_metric = self.metric;

        log::trace!("Choropleth {repaint:?} for {}/{}", self.year, self.metric);
        repaint
    }
}

#[cfg(test)]
mod tests {
    use conflict_map_data_models::{MAX_YEAR, MIN_YEAR};
    use geojson::{Feature, JsonObject};
    use serde_json::json;

    use super::*;

    #[derive(Default)]
    struct Recorder {
        features: usize,
        values: Vec<ValueMap>,
        scales: Vec<Metric>,
    }

    impl MapAdapter for Recorder {
        fn set_features(&mut self, features: FeatureCollection) {
            self.features = features.features.len();
        }

        fn apply_values(&mut self, values: &ValueMap) {
            self.values.push(values.clone());
        }

        fn set_color_scale(&mut self, scale: &ColorScale) {
            self.scales.push(scale.metric);
        }
    }

    fn row(key: &str, year: i32, events: f64) -> RawRow {
        RawRow {
            country_key: key.to_string(),
            year,
            events,
            fatality_rate: events / 10.0,
            ..RawRow::default()
        }
    }

    fn rows() -> Arc<[RawRow]> {
        vec![row("USA", 2001, 5.0), row("USA", 2002, 7.0), row("GBR", 2002, 50_000.0)].into()
    }

    fn features() -> FeatureCollection {
        let properties: JsonObject = serde_json::from_value(json!({"iso3": "usa"})).unwrap();
        FeatureCollection {
            bbox: None,
            features: vec![Feature {
                properties: Some(properties),
                ..Feature::default()
            }],
            foreign_members: None,
        }
    }

    #[test]
    fn records_parameters_until_loaded() {
        let mut sync = ChoroplethSync::new(ScaleSet::embedded(), 2001, Metric::EventsCount);
        let mut recorder = Recorder::default();

        assert_eq!(sync.set_year(2002, &mut recorder), Repaint::Skipped);
        assert_eq!(sync.set_metric(Metric::FatalityRate, &mut recorder), Repaint::Skipped);
        assert!(recorder.values.is_empty());
        assert!(!sync.is_ready());

        assert_eq!(sync.load(rows(), &features(), &mut recorder), Repaint::ValuesAndScale);
        assert_eq!(recorder.features, 1);
        assert_eq!(recorder.scales, vec![Metric::FatalityRate]);
        assert!((recorder.values[0].get("USA") - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn year_change_repaints_values_only() {
        let mut sync = ChoroplethSync::new(ScaleSet::embedded(), 2001, Metric::EventsCount);
        let mut recorder = Recorder::default();
        sync.load(rows(), &features(), &mut recorder);

        assert_eq!(sync.set_year(2002, &mut recorder), Repaint::Values);
        assert_eq!(recorder.scales.len(), 1);
        assert_eq!(recorder.values.len(), 2);
        assert!((recorder.values[1].get("USA") - 7.0).abs() < f64::EPSILON);
        assert!((recorder.values[1].get("GBR") - 20_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn metric_change_swaps_scale() {
        let mut sync = ChoroplethSync::new(ScaleSet::embedded(), 2002, Metric::EventsCount);
        let mut recorder = Recorder::default();
        sync.load(rows(), &features(), &mut recorder);

        assert_eq!(
            sync.set_metric(Metric::FatalityRate, &mut recorder),
            Repaint::ValuesAndScale
        );
        assert_eq!(recorder.scales, vec![Metric::EventsCount, Metric::FatalityRate]);
        assert!((recorder.values[1].get("GBR") - 30.0).abs() < f64::EPSILON);
        assert_eq!(sync.scale().metric, Metric::FatalityRate);
    }

    #[test]
    fn unchanged_parameters_skip() {
        let mut sync = ChoroplethSync::new(ScaleSet::embedded(), 2001, Metric::EventsCount);
        let mut recorder = Recorder::default();
        sync.load(rows(), &features(), &mut recorder);

        assert_eq!(sync.set_year(2001, &mut recorder), Repaint::Skipped);
        assert_eq!(
            sync.update(2001, Metric::EventsCount, &mut recorder),
            Repaint::Skipped
        );
        assert_eq!(recorder.values.len(), 1);
    }

    #[test]
    fn combined_update_paints_once() {
        let mut sync = ChoroplethSync::new(ScaleSet::embedded(), 2001, Metric::EventsCount);
        let mut recorder = Recorder::default();
        sync.load(rows(), &features(), &mut recorder);

        assert_eq!(
            sync.update(2002, Metric::FatalityRate, &mut recorder),
            Repaint::ValuesAndScale
        );
        assert_eq!(recorder.values.len(), 2);
        assert_eq!(recorder.scales.len(), 2);
    }

    #[test]
    fn year_is_clamped_to_dataset_range() {
        let mut sync = ChoroplethSync::new(ScaleSet::embedded(), 1990, Metric::EventsCount);
        assert_eq!(sync.year(), MIN_YEAR);
        let mut recorder = Recorder::default();
        sync.set_year(2100, &mut recorder);
        assert_eq!(sync.year(), MAX_YEAR);
    }
}
