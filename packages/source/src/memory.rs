//! In-memory source, used for tests and pre-bundled data.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::{RawSource, SourceError};

/// Serves dataset text from a map of location → contents.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: BTreeMap<String, String>,
}

impl MemorySource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the contents served for `location`.
    #[must_use]
    pub fn with_file(mut self, location: &str, contents: &str) -> Self {
        self.files.insert(location.to_owned(), contents.to_owned());
        self
    }
}

#[async_trait]
impl RawSource for MemorySource {
    fn id(&self) -> &'static str {
        "memory"
    }

    async fn fetch_text(&self, location: &str) -> Result<String, SourceError> {
        self.files
            .get(location)
            .cloned()
            .ok_or_else(|| SourceError::NotFound {
                location: location.to_owned(),
            })
    }
}
