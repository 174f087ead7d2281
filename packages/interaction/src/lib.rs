#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Hover and selection state.
//!
//! Two independent slots, each holding at most one country. Hovering never
//! touches the selection and vice versa; the renderer styles the two
//! highlights separately.

use conflict_map_data_models::{CountryKey, KEY_PROPERTY};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Builds `["==", ["get", "iso3_std"], key]`. With no key the filter
/// compares against `""`, which no keyed feature matches.
fn key_filter(key: Option<&CountryKey>) -> Value {
    json!(["==", ["get", KEY_PROPERTY], key.map_or("", CountryKey::as_str)])
}

/// Filter expressions for the hover and selection highlight layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightFilters {
    /// Filter for the hover outline.
    pub hover: Value,
    /// Filter for the selection outline.
    pub selected: Value,
}

/// Hovered and selected countries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionState {
    hovered: Option<CountryKey>,
    selected: Option<CountryKey>,
}

impl InteractionState {
    /// Creates a state with nothing hovered or selected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The hovered country.
    #[must_use]
    pub const fn hovered(&self) -> Option<&CountryKey> {
        self.hovered.as_ref()
    }

    /// The selected country.
    #[must_use]
    pub const fn selected(&self) -> Option<&CountryKey> {
        self.selected.as_ref()
    }

    /// The pointer entered the feature for `key`.
    ///
    /// Returns whether the hover changed, i.e. whether the hover filter
    /// needs updating. Unresolved (empty) keys and the already-hovered key
    /// are ignored.
    pub fn pointer_enter(&mut self, key: &CountryKey) -> bool {
        if key.is_empty() || self.hovered.as_ref() == Some(key) {
            return false;
        }
        log::trace!("Hover {key}");
        self.hovered = Some(key.clone());
        true
    }

    /// The pointer left the features. Clears the hover only.
    ///
    /// Returns whether anything was hovered.
    pub fn pointer_leave(&mut self) -> bool {
        self.hovered.take().is_some()
    }

    /// A feature was clicked. Selects `key` and returns it for the detail
    /// view, or returns `None` (leaving the selection alone) for an
    /// unresolved key.
    pub fn click(&mut self, key: &CountryKey) -> Option<CountryKey> {
        if key.is_empty() {
            return None;
        }
        log::debug!("Selected {key}");
        self.selected = Some(key.clone());
        self.selected.clone()
    }

    /// Clears the selection (e.g. when the detail view closes).
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Filter expressions for both highlight layers.
    #[must_use]
    pub fn highlight_filters(&self) -> HighlightFilters {
        HighlightFilters {
            hover: key_filter(self.hovered.as_ref()),
            selected: key_filter(self.selected.as_ref()),
        }
    }
}
