//! Legend stops and the color expression built from them.

use conflict_map_data_models::{Metric, finite_or_zero};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::ScaleError;

/// Feature property the expression reads values from.
pub const VALUE_PROPERTY: &str = "metric_value";

/// One (threshold, color) pair of a legend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendStop {
    /// Value at which `color` applies exactly.
    pub threshold: f64,
    /// `#RRGGBB` color.
    pub color: String,
}

/// An ordered threshold/color ramp for one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorScale {
    /// Metric this scale colors.
    pub metric: Metric,
    /// Stops with strictly ascending thresholds.
    pub stops: Vec<LegendStop>,
}

impl ColorScale {
    /// Parses and validates a scale from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ScaleError`] if the TOML is malformed, the scale has no
    /// stops, the thresholds are not strictly ascending, or a color is not
    /// `#RRGGBB`.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ScaleError> {
        let scale: Self = toml::de::from_str(toml_str)?;
        scale.validate()?;
        Ok(scale)
    }

    /// Checks the invariants the other methods rely on.
    ///
    /// # Errors
    ///
    /// See [`ColorScale::from_toml_str`].
    pub fn validate(&self) -> Result<(), ScaleError> {
        let metric = self.metric;
        if self.stops.is_empty() {
            return Err(ScaleError::Empty { metric });
        }
        if self.stops.iter().any(|s| !s.threshold.is_finite())
            || self
                .stops
                .windows(2)
                .any(|w| w[0].threshold >= w[1].threshold)
        {
            return Err(ScaleError::Unordered { metric });
        }
        if let Some(stop) = self.stops.iter().find(|s| parse_hex(&s.color).is_none()) {
            return Err(ScaleError::Color {
                metric,
                color: stop.color.clone(),
            });
        }
        Ok(())
    }

    /// The last threshold; values are clamped to `[0, max_stop]`.
    #[must_use]
    pub fn max_stop(&self) -> f64 {
        self.stops.last().map_or(0.0, |s| s.threshold)
    }

    /// Clamps a raw value into the scale's domain. Non-finite values
    /// become 0.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        finite_or_zero(value).clamp(0.0, self.max_stop().max(0.0))
    }

    /// The legend, lowest stop first.
    #[must_use]
    pub fn legend(&self) -> &[LegendStop] {
        &self.stops
    }

    /// The renderer's fill-color expression: linear interpolation of the
    /// feature's `metric_value` (missing or non-numeric read as 0) across
    /// the stops.
    #[must_use]
    pub fn expression(&self) -> Value {
        let mut expression = vec![
            json!("interpolate"),
            json!(["linear"]),
            json!(["coalesce", ["to-number", ["get", VALUE_PROPERTY]], 0]),
        ];
        for stop in &self.stops {
            expression.push(json!(stop.threshold));
            expression.push(json!(stop.color));
        }
        Value::Array(expression)
    }

    /// Color for `value` by linear RGB interpolation between stops, for
    /// renderers that cannot evaluate [`expression`](Self::expression).
    #[must_use]
    pub fn color_at(&self, value: f64) -> String {
        let value = self.clamp(value);

        let Some(upper) = self.stops.iter().position(|s| s.threshold >= value) else {
            return self.stops.last().map(|s| s.color.clone()).unwrap_or_default();
        };
        if upper == 0 {
            return self.stops[0].color.clone();
        }

        let (lo, hi) = (&self.stops[upper - 1], &self.stops[upper]);
        let (Some(from), Some(to)) = (parse_hex(&lo.color), parse_hex(&hi.color)) else {
            return hi.color.clone();
        };
        let t = (value - lo.threshold) / (hi.threshold - lo.threshold);

        let mix = |a: u8, b: u8| -> u8 {
            let mixed = (f64::from(b) - f64::from(a)).mul_add(t, f64::from(a));
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            {
                mixed.round().clamp(0.0, 255.0) as u8
            }
        };

        format!(
            "#{:02X}{:02X}{:02X}",
            mix(from[0], to[0]),
            mix(from[1], to[1]),
            mix(from[2], to[2])
        )
    }
}

/// Parses `#RRGGBB`.
fn parse_hex(color: &str) -> Option<[u8; 3]> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}
