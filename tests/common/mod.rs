//! Shared test fixtures and utilities for integration tests.
//!
//! # Test Isolation Strategy
//!
//! Every test gets its own documentation root and its own storage file inside
//! a fresh temporary directory, so tests can run in parallel and always start
//! from a cold (missing) index.
//!
//! # Available Fixtures
//!
//! - `docs_site`: a small English site with a sidebar (recommended)
//! - `localized_site`: the same site plus a French subtree under `/fr/`

use docsify_search::builder::FsSource;
use docsify_search::config::SearchConfig;
use docsify_search::session::SearchSession;
use docsify_search::store::{Clock, FileStore, Millis};
use rstest::fixture;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const DAY: Millis = 86_400_000;

/// A clock stuck at a given instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Millis);

impl Clock for FixedClock {
    fn now_millis(&self) -> Millis {
        self.0
    }
}

/// A temporary documentation site with a storage file next to it.
///
/// The directory is removed when dropped.
#[allow(dead_code)] // Methods used across different integration test crates
pub struct TempDocs {
    _temp: TempDir,
    root: PathBuf,
    store: PathBuf,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl TempDocs {
    /// Creates an empty documentation root.
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().join("docs");
        let store = temp.path().join("cache").join("storage.json");
        std::fs::create_dir_all(&root).expect("Failed to create docs root");
        Self {
            _temp: temp,
            root,
            store,
        }
    }

    /// Root of the documentation tree.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the JSON storage file (created on first commit).
    pub fn store_path(&self) -> &Path {
        &self.store
    }

    /// Creates a document relative to the root.
    ///
    /// # Panics
    /// Panics if the file cannot be written.
    pub fn write(&self, path: &str, content: &str) -> &Self {
        let full_path = self.root.join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap_or_else(|e| {
                panic!("Failed to create parent directory for '{}': {}", path, e)
            });
        }
        std::fs::write(&full_path, content)
            .unwrap_or_else(|e| panic!("Failed to write file '{}': {}", path, e));
        self
    }

    /// Removes a document, e.g. to make its next fetch fail.
    pub fn remove(&self, path: &str) {
        std::fs::remove_file(self.root.join(path))
            .unwrap_or_else(|e| panic!("Failed to remove '{}': {}", path, e));
    }

    /// Link targets of `_sidebar.md`.
    pub fn sidebar_hrefs(&self) -> Vec<String> {
        let markdown = std::fs::read_to_string(self.root.join("_sidebar.md")).unwrap_or_default();
        docsify_search::builder::sidebar_links(&markdown)
    }

    /// A session over this site, backed by its storage file, at time `now`.
    pub fn session(&self, config: SearchConfig, now: Millis) -> SearchSession<FileStore, FsSource> {
        SearchSession::new(config, FileStore::open(&self.store), FsSource::new(&self.root))
            .with_clock(FixedClock(now))
    }
}

impl Default for TempDocs {
    fn default() -> Self {
        Self::new()
    }
}

/// A small English documentation site with a sidebar.
#[fixture]
pub fn docs_site() -> TempDocs {
    let docs = TempDocs::new();
    docs.write(
        "README.md",
        "# Welcome\n\nThis site documents the example tool.\n\n## Features\n\nFast config loading.",
    )
    .write(
        "guide.md",
        "# Install Guide\n\nRun the setup script.\n\n## Configuration\n\nEdit the config file, then restart.",
    )
    .write(
        "api.md",
        "# API\n\nThe `load` function reads a config object.\n\n### Errors\n\nFailures are logged.",
    )
    .write(
        "_sidebar.md",
        "- [Home](/)\n- [Guide](guide.md)\n- [API](api.md)\n- [GitHub](https://github.com/example/tool)\n",
    );
    docs
}

/// [`docs_site`] plus a French translation under `/fr/`.
#[allow(dead_code)] // Used in index_test.rs
#[fixture]
pub fn localized_site(docs_site: TempDocs) -> TempDocs {
    let docs = docs_site;
    docs.write("fr/README.md", "# Bienvenue\n\nDocumentation de l'outil.")
        .write("fr/guide.md", "# Guide d'installation\n\nLancez le script.")
        .write(
            "fr/_sidebar.md",
            "- [Accueil](/fr/)\n- [Guide](/fr/guide.md)\n",
        );
    docs
}
