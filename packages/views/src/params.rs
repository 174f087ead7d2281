//! Interactive parameters.

use conflict_map_data_models::{CountryKey, MIN_YEAR, Metric, Scope, YearRange};

/// Number of countries in each ranking list.
pub const DEFAULT_RANKING_SIZE: usize = 10;

/// Everything the user can change that some view depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewParams {
    /// Selected year (map values, year-scope rankings, flow graph).
    pub year: i32,
    /// Metric painted on the map.
    pub metric: Metric,
    /// Whether rankings cover all years or only `year`.
    pub scope: Scope,
    /// Country whose composition series is shown.
    pub selected_country: Option<CountryKey>,
    /// Length of each ranking list.
    pub ranking_size: usize,
    /// Years covered by the composition series.
    pub year_range: YearRange,
}

impl Default for ViewParams {
    fn default() -> Self {
        Self {
            year: MIN_YEAR,
            metric: Metric::default(),
            scope: Scope::default(),
            selected_country: None,
            ranking_size: DEFAULT_RANKING_SIZE,
            year_range: YearRange::default(),
        }
    }
}
