#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Row, country key, and derived view record types.
//!
//! [`RawRow`] is the single shape every tabular dataset is loaded into
//! (country-year summaries, country-year-type shares, region-year-type
//! flows). The derived record types ([`AggregateRecord`],
//! [`TimelinePoint`], [`ShareRecord`], [`FlowGraph`]) are what the chart
//! renderers consume. They are recomputed wholesale, never patched.

pub mod key;

pub use key::{CountryKey, KEY_PROPERTY};

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// First year covered by the datasets.
pub const MIN_YEAR: i32 = 2000;

/// Last year covered by the datasets.
pub const MAX_YEAR: i32 = 2024;

/// One observation from a tabular dataset.
///
/// Which fields are meaningful depends on the dataset: summaries fill the
/// country and the event/death/fatality columns, shares fill
/// `violence_type` + `share`, flows fill `region` + `violence_type` +
/// `events`. Numeric fields that failed to parse are `0.0`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRow {
    /// Country display name, possibly empty.
    pub country: String,
    /// Country code exactly as it appeared in the source (unnormalized).
    pub country_key: String,
    /// Observation year.
    pub year: i32,
    /// Number of recorded events.
    pub events: f64,
    /// Best estimate of deaths.
    pub deaths: f64,
    /// Deaths per event.
    pub fatality_rate: f64,
    /// Fraction (0-1) of the country-year's events in `violence_type`.
    pub share: f64,
    /// Raw type-of-violence id (1-3 when valid).
    pub violence_type: Option<u8>,
    /// Region name for flow rows.
    pub region: Option<String>,
}

impl RawRow {
    /// The normalized country key of this row.
    #[must_use]
    pub fn key(&self) -> CountryKey {
        CountryKey::new(&self.country_key)
    }

    /// The row's violence category, if it carries a valid one.
    #[must_use]
    pub fn category(&self) -> Option<ViolenceType> {
        self.violence_type.and_then(ViolenceType::from_id)
    }
}

/// Coerces NaN and infinities to `0.0`.
#[must_use]
pub const fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Coerces non-finite and negative values to `0.0`.
#[must_use]
pub const fn non_negative(value: f64) -> f64 {
    let value = finite_or_zero(value);
    if value > 0.0 { value } else { 0.0 }
}

/// UCDP type-of-violence categories.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ViolenceType {
    /// Conflict where at least one party is a government.
    StateBased = 1,
    /// Conflict between organized non-government groups.
    NonState = 2,
    /// Violence by an organized group against civilians.
    OneSided = 3,
}

impl ViolenceType {
    /// All categories in ascending id order.
    pub const ALL: [Self; 3] = [Self::StateBased, Self::NonState, Self::OneSided];

    /// Returns the numeric category id.
    #[must_use]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Maps a numeric id to its category.
    #[must_use]
    pub const fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Self::StateBased),
            2 => Some(Self::NonState),
            3 => Some(Self::OneSided),
            _ => None,
        }
    }

    /// Human-readable label used for flow-graph nodes and legends.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::StateBased => "State-based",
            Self::NonState => "Non-state",
            Self::OneSided => "One-sided",
        }
    }
}

/// The metric painted on the choropleth.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Metric {
    /// Number of events.
    #[default]
    EventsCount,
    /// Deaths per event.
    FatalityRate,
}

impl Metric {
    /// Both metrics.
    pub const ALL: [Self; 2] = [Self::EventsCount, Self::FatalityRate];

    /// Reads this metric's raw value from a row.
    #[must_use]
    pub const fn value(self, row: &RawRow) -> f64 {
        match self {
            Self::EventsCount => row.events,
            Self::FatalityRate => row.fatality_rate,
        }
    }

    /// Label shown in legends and tooltips.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::EventsCount => "Events",
            Self::FatalityRate => "Fatality rate",
        }
    }

    /// Formats a value for display: events as a rounded integer with
    /// thousands separators, fatality rates with two decimals.
    #[must_use]
    pub fn format_value(self, value: f64) -> String {
        let value = finite_or_zero(value);
        match self {
            Self::EventsCount => group_thousands(value.round()),
            Self::FatalityRate => format!("{value:.2}"),
        }
    }
}

fn group_thousands(value: f64) -> String {
    let digits = format!("{:.0}", value.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0.0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Which rows a ranking is computed over.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Scope {
    /// Every year in the dataset.
    #[default]
    Total,
    /// Only the selected year.
    Year,
}

/// The metric pair rankings are computed over.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RankMetric {
    /// Summed event counts.
    #[default]
    Events,
    /// Summed deaths.
    Deaths,
}

impl RankMetric {
    /// The other metric of the pair.
    #[must_use]
    pub const fn paired(self) -> Self {
        match self {
            Self::Events => Self::Deaths,
            Self::Deaths => Self::Events,
        }
    }

    /// Reads this metric from an aggregate.
    #[must_use]
    pub const fn of(self, record: &AggregateRecord) -> f64 {
        match self {
            Self::Events => record.events,
            Self::Deaths => record.deaths,
        }
    }
}

/// Inclusive range of years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YearRange {
    /// First year, inclusive.
    pub min: i32,
    /// Last year, inclusive.
    pub max: i32,
}

impl YearRange {
    /// Creates a range, swapping the bounds if given in reverse.
    #[must_use]
    pub const fn new(a: i32, b: i32) -> Self {
        if a <= b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    /// Whether `year` falls inside the range.
    #[must_use]
    pub const fn contains(self, year: i32) -> bool {
        year >= self.min && year <= self.max
    }

    /// Clamps a year into the range.
    #[must_use]
    pub const fn clamp(self, year: i32) -> i32 {
        if year < self.min {
            self.min
        } else if year > self.max {
            self.max
        } else {
            year
        }
    }
}

impl Default for YearRange {
    fn default() -> Self {
        Self::new(MIN_YEAR, MAX_YEAR)
    }
}

/// Per-country totals used by the rankings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateRecord {
    /// Country key.
    pub key: CountryKey,
    /// Country display name.
    pub name: String,
    /// Summed events (never negative).
    pub events: f64,
    /// Summed deaths (never negative).
    pub deaths: f64,
}

/// Top-N lists for a ranking request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rankings {
    /// Metric `top` is sorted by.
    pub metric: RankMetric,
    /// Top records by `metric`.
    pub top: Vec<AggregateRecord>,
    /// Top records by the paired metric.
    pub paired: Vec<AggregateRecord>,
}

impl Rankings {
    /// Returns the list sorted by `metric`.
    #[must_use]
    pub fn by(&self, metric: RankMetric) -> &[AggregateRecord] {
        if metric == self.metric {
            &self.top
        } else {
            &self.paired
        }
    }

    /// Whether both lists are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.top.is_empty() && self.paired.is_empty()
    }
}

/// Global events and deaths for one year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoint {
    /// Year.
    pub year: i32,
    /// Summed events.
    pub events: f64,
    /// Summed deaths.
    pub deaths: f64,
}

/// One country-year of the type-composition series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShareRecord {
    /// Year.
    pub year: i32,
    /// State-based share.
    pub t1: f64,
    /// Non-state share.
    pub t2: f64,
    /// One-sided share.
    pub t3: f64,
}

impl ShareRecord {
    /// An all-zero record for `year`.
    #[must_use]
    pub const fn zero(year: i32) -> Self {
        Self {
            year,
            t1: 0.0,
            t2: 0.0,
            t3: 0.0,
        }
    }

    /// Sets the share for one category.
    pub fn set(&mut self, category: ViolenceType, share: f64) {
        match category {
            ViolenceType::StateBased => self.t1 = share,
            ViolenceType::NonState => self.t2 = share,
            ViolenceType::OneSided => self.t3 = share,
        }
    }

    /// Sum of the three shares. Expected to be close to 1 for years with
    /// data, but not guaranteed by the source.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.t1 + self.t2 + self.t3
    }
}

/// Which side of the flow graph a node sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "typeId", rename_all = "snake_case")]
pub enum FlowNodeKind {
    /// Left column: a world region.
    Region,
    /// Right column: a violence category.
    Category(ViolenceType),
}

/// A node of the region → category flow graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowNode {
    /// Display name.
    pub name: String,
    /// Node side.
    #[serde(flatten)]
    pub kind: FlowNodeKind,
}

/// A weighted edge from a region node to a category node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowEdge {
    /// Index of the region node.
    pub source: usize,
    /// Index of the category node.
    pub target: usize,
    /// Event count carried by the edge (finite, `>= 0`).
    pub value: f64,
    /// Category of the target node, for edge coloring.
    pub category: ViolenceType,
}

/// Region → category flow graph for one year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowGraph {
    /// Region nodes followed by category nodes.
    pub nodes: Vec<FlowNode>,
    /// Edges between them.
    pub edges: Vec<FlowEdge>,
}

impl FlowGraph {
    /// Whether there is anything to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Sum of all edge values.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.edges.iter().map(|e| e.value).sum()
    }
}
