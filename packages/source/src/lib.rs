#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Raw dataset sources and the session loader.
//!
//! A [`RawSource`] turns a dataset location into text. Everything past
//! that point (CSV parsing through the dataset's field mapping, `GeoJSON`
//! parsing, assembling a [`Snapshot`](conflict_map_source_models::Snapshot))
//! happens here, once per session, in [`loader::Loader`].

pub mod file;
pub mod geometry;
pub mod http;
pub mod loader;
pub mod memory;
pub mod registry;
pub mod tabular;

use async_trait::async_trait;

/// Errors that can occur while fetching or parsing a dataset.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error (file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV header could not be read.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The geometry file is not a valid `GeoJSON` feature collection.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// Nothing exists at the requested location.
    #[error("Dataset not found: {location}")]
    NotFound {
        /// The location that was requested.
        location: String,
    },
}

/// Fetches the raw text of a dataset.
///
/// Implementations only move bytes; they know nothing about dataset
/// formats.
#[async_trait]
pub trait RawSource: Send + Sync {
    /// Returns a short identifier for log messages (e.g. `"file"`).
    fn id(&self) -> &str;

    /// Fetches the full text stored at `location`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the fetch fails.
    async fn fetch_text(&self, location: &str) -> Result<String, SourceError>;
}
