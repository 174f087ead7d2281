#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregations over loaded rows.
//!
//! Every function here is pure: it reads a row slice plus scalar
//! parameters and returns a freshly built result. None of them fail on
//! bad data. Rows missing what a computation needs are left out of that
//! computation, non-finite and negative numbers count as zero, and empty
//! input gives empty output.

pub mod composition;
pub mod flow;
pub mod ranking;
pub mod timeline;

pub use composition::country_type_series;
pub use flow::flow_graph;
pub use ranking::{country_totals, rank_by};
pub use timeline::{distinct_years, global_timeline};
