//! Text documents as seen by the editor.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{Error, Result};

/// A document open in the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextDocument {
    /// Document URI
    pub uri: Url,
    /// Language identifier (e.g. "python")
    pub language_id: String,
    /// Editor version counter
    pub version: i32,
}

impl TextDocument {
    /// Create a document at version 0.
    pub fn new(uri: Url, language_id: impl Into<String>) -> Self {
        Self {
            uri,
            language_id: language_id.into(),
            version: 0,
        }
    }

    /// Create a document from a filesystem path.
    pub fn from_path(path: impl Into<PathBuf>, language_id: impl Into<String>) -> Result<Self> {
        let path = path.into();
        let uri = Url::from_file_path(&path)
            .map_err(|()| Error::InvalidInput(format!("not an absolute path: {}", path.display())))?;
        Ok(Self::new(uri, language_id))
    }

    /// Filesystem path of the document, if it has one.
    ///
    /// `file:` URIs go through the platform path conversion; other schemes
    /// (e.g. `untitled:`) use the raw URI path. An empty path yields `None`.
    pub fn fs_path(&self) -> Option<PathBuf> {
        if self.uri.scheme() == "file" {
            return self.uri.to_file_path().ok();
        }
        let path = self.uri.path();
        if path.is_empty() {
            None
        } else {
            Some(PathBuf::from(path))
        }
    }

    /// Final path component of the document, if any.
    pub fn basename(&self) -> Option<String> {
        self.fs_path()?
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
    }
}
