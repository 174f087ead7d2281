//! Session loader.
//!
//! Fetches every dataset once, concurrently, and assembles a [`Snapshot`].
//! A failed dataset becomes an empty [`Dataset`] with a `Failed` status
//! instead of an error, so views can show a "no data" state. The
//! [`CancellationFlag`] is checked as soon as the fetches resume; when the
//! consuming view has been torn down in the meantime the results are
//! discarded.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use conflict_map_data_models::RawRow;
use conflict_map_source_models::{
    Dataset, DatasetDefinition, DatasetKind, Snapshot, empty_collection,
};
use geojson::FeatureCollection;

use crate::geometry::parse_features;
use crate::registry::all_datasets;
use crate::tabular::parse_rows;
use crate::{RawSource, SourceError};

/// Shared flag set when the consumer of a load goes away.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    /// Creates an unset flag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks every clone of this flag as cancelled.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether [`cancel`](Self::cancel) has been called on any clone.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Returns a guard that cancels the flag when dropped. Hold it for as
    /// long as the view that started the load is alive.
    #[must_use]
    pub fn guard(&self) -> CancelOnDrop {
        CancelOnDrop(self.clone())
    }
}

/// Cancels its flag on drop.
#[derive(Debug)]
pub struct CancelOnDrop(CancellationFlag);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.cancel();
    }
}

/// Result of a session load.
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    /// The snapshot, possibly with some datasets marked failed.
    Loaded(Snapshot),
    /// The consumer went away while the fetches were in flight.
    Cancelled,
}

impl LoadOutcome {
    /// Returns the snapshot unless the load was cancelled.
    #[must_use]
    pub fn into_snapshot(self) -> Option<Snapshot> {
        match self {
            Self::Loaded(snapshot) => Some(snapshot),
            Self::Cancelled => None,
        }
    }
}

/// Loads every configured dataset from a [`RawSource`].
pub struct Loader<S> {
    source: S,
    datasets: Vec<DatasetDefinition>,
}

impl<S: RawSource> Loader<S> {
    /// Creates a loader for the embedded dataset registry.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self::with_datasets(source, all_datasets())
    }

    /// Creates a loader for an explicit set of dataset definitions.
    #[must_use]
    pub const fn with_datasets(source: S, datasets: Vec<DatasetDefinition>) -> Self {
        Self { source, datasets }
    }

    fn definition(&self, kind: DatasetKind) -> Option<&DatasetDefinition> {
        self.datasets.iter().find(|d| d.kind == kind)
    }

    async fn fetch(&self, kind: DatasetKind) -> Option<Result<String, SourceError>> {
        let def = self.definition(kind)?;
        log::debug!(
            "[{}] Fetching {} from {}",
            self.source.id(),
            def.id,
            def.location
        );
        Some(self.source.fetch_text(&def.location).await)
    }

    /// Fetches and parses every dataset.
    ///
    /// Never fails: datasets that could not be fetched or parsed come back
    /// empty with a `Failed` status.
    pub async fn load(&self, cancel: &CancellationFlag) -> LoadOutcome {
        let (summary, shares, flows, countries) = tokio::join!(
            self.fetch(DatasetKind::Summary),
            self.fetch(DatasetKind::TypeShare),
            self.fetch(DatasetKind::Flow),
            self.fetch(DatasetKind::Countries),
        );

        if cancel.is_cancelled() {
            log::debug!("Load cancelled; discarding fetched datasets");
            return LoadOutcome::Cancelled;
        }

        let snapshot = Snapshot {
            summary: self.rows(DatasetKind::Summary, summary),
            shares: self.rows(DatasetKind::TypeShare, shares),
            flows: self.rows(DatasetKind::Flow, flows),
            countries: Self::features(countries),
        };

        for (kind, status) in snapshot.statuses() {
            log::info!("{kind}: {status:?}");
        }

        LoadOutcome::Loaded(snapshot)
    }

    fn rows(
        &self,
        kind: DatasetKind,
        fetched: Option<Result<String, SourceError>>,
    ) -> Dataset<Vec<RawRow>> {
        let (Some(fetched), Some(def)) = (fetched, self.definition(kind)) else {
            return Dataset::failed(format!("no {kind} dataset configured"));
        };

        match fetched.and_then(|text| parse_rows(&text, &def.fields)) {
            Ok(rows) => {
                log::info!("Loaded {} rows from {}", rows.len(), def.id);
                Dataset::loaded(rows)
            }
            Err(e) => {
                log::warn!("Failed to load {}: {e}", def.id);
                Dataset::failed(e.to_string())
            }
        }
    }

    fn features(
        fetched: Option<Result<String, SourceError>>,
    ) -> Dataset<FeatureCollection> {
        let Some(fetched) = fetched else {
            return Dataset::failed_with("no countries dataset configured", empty_collection());
        };

        match fetched.and_then(|text| parse_features(&text)) {
            Ok(collection) => {
                log::info!("Loaded {} country features", collection.features.len());
                Dataset::loaded(collection)
            }
            Err(e) => {
                log::warn!("Failed to load country features: {e}");
                Dataset::failed_with(e.to_string(), empty_collection())
            }
        }
    }
}
