//! Document retrieval.

use crate::error::Error;
use futures::FutureExt;
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::path::PathBuf;

/// Asynchronous fetch of a documentation source file.
///
/// `file` is relative to the documentation root, as produced by
/// [`Router::file_for`](crate::router::Router::file_for).
pub trait DocumentSource {
    fn fetch<'a>(&'a self, file: &'a str) -> BoxFuture<'a, Result<String, Error>>;
}

/// Reads documents from a directory on disk.
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl DocumentSource for FsSource {
    fn fetch<'a>(&'a self, file: &'a str) -> BoxFuture<'a, Result<String, Error>> {
        async move {
            let path = self.root.join(file);
            tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| Error::Fetch {
                    file: file.to_string(),
                    reason: e.to_string(),
                })
        }
        .boxed()
    }
}

/// Serves documents from memory, keyed by file name.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: HashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file.
    pub fn with(mut self, file: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.insert(file.into(), content.into());
        self
    }
}

impl DocumentSource for MemorySource {
    fn fetch<'a>(&'a self, file: &'a str) -> BoxFuture<'a, Result<String, Error>> {
        let result = self.files.get(file).cloned().ok_or_else(|| Error::Fetch {
            file: file.to_string(),
            reason: "not found".to_string(),
        });
        futures::future::ready(result).boxed()
    }
}
