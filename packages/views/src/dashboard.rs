//! The session's view graph.
//!
//! Declared inputs per view:
//!
//! | View            | Inputs                                         |
//! |-----------------|------------------------------------------------|
//! | map values      | year, metric                                   |
//! | map scale       | metric                                         |
//! | timeline        | none (once per snapshot)                       |
//! | rankings        | scope, year when scope is `year`, list length  |
//! | country series  | selected country, year range                   |
//! | flow graph      | year, snapped to a year the flow data has      |

use std::sync::Arc;

use conflict_map_aggregate::{
    country_type_series, distinct_years, flow_graph, global_timeline, rank_by,
};
use conflict_map_choropleth::{ChoroplethSync, MapAdapter, Repaint, ScaleSet};
use conflict_map_country::{CountryIndex, CountryOption};
use conflict_map_data_models::{
    CountryKey, FlowGraph, Metric, RankMetric, Rankings, RawRow, Scope,
    ShareRecord, TimelinePoint, YearRange,
};
use conflict_map_interaction::{HighlightFilters, InteractionState};
use conflict_map_source::RawSource;
use conflict_map_source::loader::{CancellationFlag, Loader};
use conflict_map_source_models::{DatasetKind, LoadStatus, Snapshot};
use geojson::FeatureCollection;

use crate::{ChartAdapter, Memo, ViewParams};

/// What one [`Dashboard::sync`] pushed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Map repaint.
    pub map: Repaint,
    /// Rankings were recomputed and pushed.
    pub rankings: bool,
    /// Timeline was computed and pushed.
    pub timeline: bool,
    /// Country series was recomputed and pushed.
    pub series: bool,
    /// Flow graph was recomputed and pushed.
    pub flow: bool,
}

impl SyncReport {
    /// Whether nothing was pushed.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.map == Repaint::Skipped && !self.rankings && !self.timeline && !self.series && !self.flow
    }
}

/// How often each chart view has been computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecomputeCounts {
    /// Timeline computations.
    pub timeline: usize,
    /// Ranking computations.
    pub rankings: usize,
    /// Country series computations.
    pub series: usize,
    /// Flow graph computations.
    pub flow: usize,
}

type RankingInput = (Scope, Option<i32>, usize);
type SeriesInput = (Option<CountryKey>, i32, i32);

/// One loaded session: the snapshot, the lookups built from it, the
/// current parameters, and a memo per chart.
pub struct Dashboard {
    summary: Arc<[RawRow]>,
    shares: Vec<RawRow>,
    flows: Vec<RawRow>,
    countries: FeatureCollection,
    statuses: Vec<(DatasetKind, LoadStatus)>,
    map_ready: bool,
    index: CountryIndex,
    flow_years: Vec<i32>,
    params: ViewParams,
    interaction: InteractionState,
    choropleth: ChoroplethSync,
    timeline: Memo<(), Vec<TimelinePoint>>,
    rankings: Memo<RankingInput, Rankings>,
    series: Memo<SeriesInput, Vec<ShareRecord>>,
    flow: Memo<Option<i32>, FlowGraph>,
}

impl Dashboard {
    /// Builds the view graph for a loaded snapshot. Nothing is computed
    /// until the first [`sync`](Self::sync).
    ///
    /// Share rows that carry a country name but no code get their key
    /// from the summary rows.
    #[must_use]
    pub fn new(snapshot: Snapshot, scales: ScaleSet, params: ViewParams) -> Self {
        let statuses = snapshot
            .statuses()
            .into_iter()
            .map(|(kind, status)| (kind, status.clone()))
            .collect();
        let map_ready = snapshot.map_ready();

        let index = CountryIndex::build(&snapshot.summary.data);
        let shares = index.backfill_keys(&snapshot.shares.data);
        let flow_years = distinct_years(&snapshot.flows.data);

        log::info!(
            "Dashboard: {} countries, {} summary rows, {} share rows, flow years {:?}",
            index.len(),
            snapshot.summary.data.len(),
            shares.len(),
            flow_years.first().zip(flow_years.last())
        );

        let params = ViewParams {
            year: YearRange::default().clamp(params.year),
            ..params
        };

        Self {
            summary: snapshot.summary.data.into(),
            shares,
            flows: snapshot.flows.data,
            countries: snapshot.countries.data,
            statuses,
            map_ready,
            index,
            flow_years,
            choropleth: ChoroplethSync::new(scales, params.year, params.metric),
            params,
            interaction: InteractionState::new(),
            timeline: Memo::new(),
            rankings: Memo::new(),
            series: Memo::new(),
            flow: Memo::new(),
        }
    }

    /// Loads a session through `loader` and builds its view graph.
    ///
    /// Returns `None` if `cancel` was set while the datasets were in
    /// flight.
    pub async fn load<S: RawSource>(
        loader: &Loader<S>,
        cancel: &CancellationFlag,
        scales: ScaleSet,
        params: ViewParams,
    ) -> Option<Self> {
        let snapshot = loader.load(cancel).await.into_snapshot()?;
        Some(Self::new(snapshot, scales, params))
    }

    /// Current parameters.
    #[must_use]
    pub const fn params(&self) -> &ViewParams {
        &self.params
    }

    /// Country lookups built from the summary rows.
    #[must_use]
    pub const fn index(&self) -> &CountryIndex {
        &self.index
    }

    /// Entries for the country selector.
    #[must_use]
    pub fn country_options(&self) -> Vec<CountryOption> {
        self.index.options()
    }

    /// Load status of a dataset.
    #[must_use]
    pub fn status(&self, kind: DatasetKind) -> Option<&LoadStatus> {
        self.statuses
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, status)| status)
    }

    /// Years the flow dataset covers, ascending.
    #[must_use]
    pub fn flow_years(&self) -> &[i32] {
        &self.flow_years
    }

    /// The year the flow graph shows: the selected year if the flow data
    /// has it, otherwise the first year it has.
    #[must_use]
    pub fn flow_year(&self) -> Option<i32> {
        if self.flow_years.contains(&self.params.year) {
            Some(self.params.year)
        } else {
            self.flow_years.first().copied()
        }
    }

    /// Selects a year, clamped to the dataset range.
    pub fn set_year(&mut self, year: i32) {
        self.params.year = YearRange::default().clamp(year);
    }

    /// Selects the map metric.
    pub fn set_metric(&mut self, metric: Metric) {
        self.params.metric = metric;
    }

    /// Selects the ranking scope.
    pub fn set_scope(&mut self, scope: Scope) {
        self.params.scope = scope;
    }

    /// Sets the ranking list length.
    pub fn set_ranking_size(&mut self, n: usize) {
        self.params.ranking_size = n;
    }

    /// Sets the composition series range; bounds may come in either order.
    pub fn set_year_range(&mut self, a: i32, b: i32) {
        self.params.year_range = YearRange::new(a, b);
    }

    /// Chooses the country for the composition series without touching
    /// the map selection.
    pub fn select_country(&mut self, key: Option<CountryKey>) {
        self.params.selected_country = key.filter(|k| !k.is_empty());
    }

    /// Hover and selection state.
    #[must_use]
    pub const fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    /// Pointer entered a map feature. Returns whether the hover changed.
    pub fn pointer_enter(&mut self, key: &CountryKey) -> bool {
        self.interaction.pointer_enter(key)
    }

    /// Pointer left the map features. Returns whether a hover was cleared.
    pub fn pointer_leave(&mut self) -> bool {
        self.interaction.pointer_leave()
    }

    /// A map feature was clicked: selects it on the map and for the
    /// composition series. Returns the key for the detail view.
    pub fn click(&mut self, key: &CountryKey) -> Option<CountryKey> {
        let selected = self.interaction.click(key)?;
        self.params.selected_country = Some(selected.clone());
        Some(selected)
    }

    /// Clears the map selection and the series country.
    pub fn clear_selection(&mut self) {
        self.interaction.clear_selection();
        self.params.selected_country = None;
    }

    /// Highlight filters for the map.
    #[must_use]
    pub fn highlight_filters(&self) -> HighlightFilters {
        self.interaction.highlight_filters()
    }

    /// Computation counts per chart view.
    #[must_use]
    pub const fn recomputes(&self) -> RecomputeCounts {
        RecomputeCounts {
            timeline: self.timeline.recomputes(),
            rankings: self.rankings.recomputes(),
            series: self.series.recomputes(),
            flow: self.flow.recomputes(),
        }
    }

    /// Brings the map and charts up to date with the current parameters,
    /// pushing only what changed since the previous sync.
    pub fn sync<M, C>(&mut self, map: &mut M, charts: &mut C) -> SyncReport
    where
        M: MapAdapter + ?Sized,
        C: ChartAdapter + ?Sized,
    {
        let mut report = SyncReport {
            map: self
                .choropleth
                .update(self.params.year, self.params.metric, map),
            ..SyncReport::default()
        };
        if self.map_ready && !self.choropleth.is_ready() {
            report.map = self
                .choropleth
                .load(Arc::clone(&self.summary), &self.countries, map);
        }

        report.timeline = self.timeline.refresh((), |()| global_timeline(&self.summary));
        if report.timeline
            && let Some(points) = self.timeline.value()
        {
            charts.render_timeline(points);
        }

        let ranking_input = (
            self.params.scope,
            (self.params.scope == Scope::Year).then_some(self.params.year),
            self.params.ranking_size,
        );
        report.rankings = self.rankings.refresh(ranking_input, |&(scope, year, n)| {
            rank_by(
                &self.summary,
                scope,
                year.unwrap_or_default(),
                RankMetric::Events,
                n,
            )
        });
        if report.rankings
            && let Some(rankings) = self.rankings.value()
        {
            charts.render_rankings(rankings);
        }

        let series_input = (
            self.params.selected_country.clone(),
            self.params.year_range.min,
            self.params.year_range.max,
        );
        report.series = self.series.refresh(series_input, |(key, min, max)| {
            key.as_ref().map_or_else(Vec::new, |key| {
                country_type_series(&self.shares, key, *min, *max)
            })
        });
        if report.series
            && let Some(series) = self.series.value()
        {
            charts.render_country_series(self.params.selected_country.as_ref(), series);
        }

        let flow_year = self.flow_year();
        report.flow = self.flow.refresh(flow_year, |year| {
            year.map_or_else(FlowGraph::default, |year| flow_graph(&self.flows, year))
        });
        if report.flow
            && let Some(graph) = self.flow.value()
        {
            charts.render_flow(flow_year, graph);
        }

        log::debug!("Sync: {report:?}");
        report
    }
}
