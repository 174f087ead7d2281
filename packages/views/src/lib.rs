#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! View synchronization.
//!
//! Each chart is a pure function of a small, declared input tuple, cached
//! in a [`Memo`]. [`Dashboard::sync`] recomputes and pushes only the views
//! whose own inputs changed, so moving the year slider never recomputes
//! the timeline or a total-scope ranking.

pub mod dashboard;
pub mod memo;
pub mod params;

use conflict_map_data_models::{CountryKey, FlowGraph, Rankings, ShareRecord, TimelinePoint};

pub use dashboard::{Dashboard, RecomputeCounts, SyncReport};
pub use memo::Memo;
pub use params::{DEFAULT_RANKING_SIZE, ViewParams};

/// The chart renderer's side of the boundary.
///
/// Empty slices and empty graphs mean "no data" and should render an empty
/// state.
pub trait ChartAdapter {
    /// Top countries by events and by deaths.
    fn render_rankings(&mut self, rankings: &Rankings);

    /// Global events and deaths per year.
    fn render_timeline(&mut self, points: &[TimelinePoint]);

    /// Type composition over time for the selected country (`None` when no
    /// country is selected).
    fn render_country_series(&mut self, key: Option<&CountryKey>, series: &[ShareRecord]);

    /// Region → category flow graph.
    fn render_flow(&mut self, year: Option<i32>, graph: &FlowGraph);
}
