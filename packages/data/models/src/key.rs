//! Canonical country key.
//!
//! Every dataset spells its country codes a little differently (stray
//! whitespace, lowercase codes from hand-edited CSVs). [`CountryKey`] is the
//! one representation used for every join.

use std::borrow::Borrow;

use serde::{Deserialize, Serialize};

/// Feature property that carries the normalized key on the map.
pub const KEY_PROPERTY: &str = "iso3_std";

/// A trimmed, ASCII-uppercase country code (normally ISO 3166-1 alpha-3).
///
/// The empty key is a legal value and means "unresolved": features without
/// any recognized code property carry it, and it never matches a row.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountryKey(String);

impl CountryKey {
    /// Normalizes a raw code into its canonical form.
    ///
    /// Normalization is idempotent: `CountryKey::new(k.as_str()) == k`.
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_ascii_uppercase())
    }

    /// The unresolved key.
    #[must_use]
    pub const fn empty() -> Self {
        Self(String::new())
    }

    /// Returns the canonical string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this key is unresolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for CountryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CountryKey {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for CountryKey {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

impl Borrow<str> for CountryKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CountryKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_uppercases() {
        assert_eq!(CountryKey::new("  usa ").as_str(), "USA");
        assert_eq!(CountryKey::new("gBr").as_str(), "GBR");
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in ["usa", " SYR", "cod ", "", "  ", "Xk1"] {
            let once = CountryKey::new(raw);
            let twice = CountryKey::new(once.as_str());
            assert_eq!(once, twice, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn whitespace_only_is_empty() {
        assert!(CountryKey::new("   ").is_empty());
        assert_eq!(CountryKey::new(" "), CountryKey::empty());
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&CountryKey::new("irq")).unwrap();
        assert_eq!(json, "\"IRQ\"");
    }

    #[test]
    fn looks_up_by_str_in_maps() {
        let mut map = std::collections::BTreeMap::new();
        map.insert(CountryKey::new("usa"), 1);
        assert_eq!(map.get("USA"), Some(&1));
    }
}
