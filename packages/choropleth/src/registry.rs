//! Color scale registry, loaded from embedded TOML configs.
//!
//! Each `.toml` file in `packages/choropleth/scales/` is baked into the
//! binary at compile time via [`include_str!`].

use conflict_map_data_models::Metric;

use crate::{ColorScale, ScaleError};

/// TOML configs embedded at compile time.
const SCALE_TOMLS: &[(&str, &str)] = &[
    ("events_count", include_str!("../scales/events_count.toml")),
    ("fatality_rate", include_str!("../scales/fatality_rate.toml")),
];

/// Returns every embedded scale.
///
/// # Panics
///
/// Panics if an embedded config is malformed or fails validation.
#[must_use]
pub fn all_scales() -> Vec<ColorScale> {
    SCALE_TOMLS
        .iter()
        .map(|(name, toml)| {
            ColorScale::from_toml_str(toml)
                .unwrap_or_else(|e| panic!("Failed to parse {name}.toml: {e}"))
        })
        .collect()
}

/// One scale per metric.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleSet {
    events_count: ColorScale,
    fatality_rate: ColorScale,
}

impl ScaleSet {
    /// Picks one scale per metric out of `scales`. When a metric appears
    /// more than once the last scale wins, so user overrides can be
    /// appended to [`all_scales`].
    ///
    /// # Errors
    ///
    /// Returns [`ScaleError::Missing`] if a metric has no scale.
    pub fn from_scales(scales: Vec<ColorScale>) -> Result<Self, ScaleError> {
        let mut events_count = None;
        let mut fatality_rate = None;
        for scale in scales {
            match scale.metric {
                Metric::EventsCount => events_count = Some(scale),
                Metric::FatalityRate => fatality_rate = Some(scale),
            }
        }

        Ok(Self {
            events_count: events_count.ok_or(ScaleError::Missing {
                metric: Metric::EventsCount,
            })?,
            fatality_rate: fatality_rate.ok_or(ScaleError::Missing {
                metric: Metric::FatalityRate,
            })?,
        })
    }

    /// The embedded scales.
    ///
    /// # Panics
    ///
    /// Panics if the embedded configs are malformed or incomplete.
    #[must_use]
    pub fn embedded() -> Self {
        Self::from_scales(all_scales())
            .unwrap_or_else(|e| panic!("Embedded color scales are incomplete: {e}"))
    }

    /// The scale for `metric`.
    #[must_use]
    pub const fn for_metric(&self, metric: Metric) -> &ColorScale {
        match metric {
            Metric::EventsCount => &self.events_count,
            Metric::FatalityRate => &self.fatality_rate,
        }
    }
}

impl Default for ScaleSet {
    fn default() -> Self {
        Self::embedded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_every_metric() {
        let scales = all_scales();
        assert_eq!(scales.len(), Metric::ALL.len());
        for metric in Metric::ALL {
            assert_eq!(
                scales.iter().filter(|s| s.metric == metric).count(),
                1,
                "expected exactly one {metric} scale"
            );
        }
    }

    #[test]
    fn embedded_domains() {
        let set = ScaleSet::embedded();
        assert!((set.for_metric(Metric::EventsCount).max_stop() - 20_000.0).abs() < f64::EPSILON);
        assert!((set.for_metric(Metric::FatalityRate).max_stop() - 30.0).abs() < f64::EPSILON);
        assert_eq!(set.for_metric(Metric::EventsCount).legend()[0].color, "#FBF7ED");
        assert_eq!(set.for_metric(Metric::FatalityRate).legend().len(), 7);
    }

    #[test]
    fn clamps_large_event_counts() {
        let set = ScaleSet::embedded();
        assert!((set.for_metric(Metric::EventsCount).clamp(999_999.0) - 20_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn later_scales_override_earlier() {
        let mut scales = all_scales();
        let mut custom = scales[0].clone();
        custom.stops.truncate(2);
        scales.push(custom.clone());

        let set = ScaleSet::from_scales(scales).unwrap();
        assert_eq!(set.for_metric(custom.metric), &custom);
    }

    #[test]
    fn missing_metric_is_an_error() {
        let scales: Vec<ColorScale> = all_scales()
            .into_iter()
            .filter(|s| s.metric == Metric::EventsCount)
            .collect();
        assert!(matches!(
            ScaleSet::from_scales(scales),
            Err(ScaleError::Missing {
                metric: Metric::FatalityRate
            })
        ));
    }
}
