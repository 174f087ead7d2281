//! Local filesystem source.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::{RawSource, SourceError};

/// Reads dataset locations as paths relative to a root directory.
#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    /// Creates a source rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl RawSource for FileSource {
    fn id(&self) -> &'static str {
        "file"
    }

    async fn fetch_text(&self, location: &str) -> Result<String, SourceError> {
        let path = self.root.join(location);
        log::debug!("Reading {}", path.display());

        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(SourceError::NotFound {
                location: path.display().to_string(),
            }),
            Err(e) => Err(SourceError::Io(e)),
        }
    }
}
