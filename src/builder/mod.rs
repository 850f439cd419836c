//! Index construction: fetch every document of a pass, segment it and merge
//! it into the store, then persist the index once the pass is complete.

// Module declarations
pub(crate) mod nav;
pub(crate) mod source;

// Public re-exports (used via lib.rs)
pub use nav::{ResolvedPaths, discover_paths, resolve_paths, sidebar_links};
pub use source::{DocumentSource, FsSource, MemorySource};

use crate::config::SearchConfig;
use crate::error::Error;
use crate::index::Segmenter;
use crate::router::{Router, RouterMode};
use crate::store::{BlobStore, IndexStore, Millis, StorageKeys};
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use std::time::Duration;

/// Outcome of one rebuild pass.
#[derive(Debug, Default)]
pub struct PassReport {
    /// Paths fetched and merged during this pass
    pub fetched: Vec<String>,
    /// Paths already present in the store, left untouched
    pub reused: usize,
    /// Paths whose fetch failed or timed out
    pub failed: Vec<(String, Error)>,
    /// Whether the index was persisted at the end of the pass
    pub committed: bool,
}

impl PassReport {
    /// Whether every path of the pass resolved.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Drives rebuild passes over a [`DocumentSource`].
#[derive(Debug, Clone)]
pub struct IndexBuilder<R, Src> {
    router: R,
    source: Src,
    depth: u8,
    max_age: Millis,
    timeout: Option<Duration>,
}

impl<Src: DocumentSource> IndexBuilder<RouterMode, Src> {
    /// Builder using the router, depth, expiry and timeout of `config`.
    pub fn from_config(config: &SearchConfig, source: Src) -> Self {
        Self::new(config.router, source, config.depth, config.max_age)
            .with_timeout(config.fetch_timeout())
    }
}

impl<R: Router, Src: DocumentSource> IndexBuilder<R, Src> {
    pub fn new(router: R, source: Src, depth: u8, max_age: Millis) -> Self {
        Self {
            router,
            source,
            depth,
            max_age,
            timeout: None,
        }
    }

    /// Fail any single fetch that takes longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn router(&self) -> &R {
        &self.router
    }

    pub fn source(&self) -> &Src {
        &self.source
    }

    /// Run one pass over `paths`.
    ///
    /// Paths already in the store are kept; all others are fetched
    /// concurrently and merged as each fetch resolves, so queries between
    /// passes see every document merged so far. The index is committed under
    /// `keys` only when no fetch failed and at least one document was fetched.
    ///
    /// Fetch failures are reported, not returned; the only error is a failed
    /// commit.
    pub async fn run_pass<S: BlobStore>(
        &self,
        store: &mut IndexStore<S>,
        paths: &[String],
        keys: &StorageKeys,
        now: Millis,
    ) -> Result<PassReport, Error> {
        let mut report = PassReport::default();
        let mut pending = FuturesUnordered::new();

        for path in paths {
            if store.contains(path) {
                report.reused += 1;
            } else {
                pending.push(self.fetch(path));
            }
        }

        let segmenter = Segmenter::new(&self.router, self.depth);
        while let Some((path, result)) = pending.next().await {
            match result {
                Ok(source) => {
                    store.merge_document(path, segmenter.segment(path, &source));
                    report.fetched.push(path.to_string());
                }
                Err(e) => {
                    tracing::warn!("Skipping '{}' in this pass: {}", path, e);
                    report.failed.push((path.to_string(), e));
                }
            }
        }

        if report.is_complete() && !report.fetched.is_empty() {
            store.commit(keys, self.max_age, now)?;
            report.committed = true;
        }

        tracing::info!(
            "Index pass over {} paths: {} fetched, {} reused, {} failed, committed: {}",
            paths.len(),
            report.fetched.len(),
            report.reused,
            report.failed.len(),
            report.committed
        );
        Ok(report)
    }

    async fn fetch<'a>(&'a self, path: &'a str) -> (&'a str, Result<String, Error>) {
        let file = self.router.file_for(path);
        let result = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.source.fetch(&file))
                .await
                .unwrap_or_else(|_| {
                    Err(Error::Timeout {
                        file: file.clone(),
                        elapsed: limit,
                    })
                }),
            None => self.source.fetch(&file).await,
        };
        (path, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::{AnchorRouter, HashRouter};
    use crate::store::MemoryStore;
    use assert2::{check, let_assert};
    use futures::FutureExt;
    use futures::future::BoxFuture;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const DAY: Millis = 86_400_000;

    fn paths(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    fn site() -> MemorySource {
        MemorySource::new()
            .with("README.md", "# Home\n\nWelcome to the site.")
            .with("guide.md", "# Install Guide\n\nRun the setup script.")
            .with("api.md", "# API\n\nThe config object.")
    }

    /// Counts fetches and never answers for `hang.md`.
    #[derive(Default)]
    struct Probe {
        inner: MemorySource,
        calls: AtomicUsize,
    }

    impl DocumentSource for Probe {
        fn fetch<'a>(&'a self, file: &'a str) -> BoxFuture<'a, Result<String, Error>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if file == "hang.md" {
                futures::future::pending().boxed()
            } else {
                self.inner.fetch(file)
            }
        }
    }

    #[tokio::test]
    async fn test_full_pass_commits_once() {
        let builder = IndexBuilder::new(AnchorRouter, site(), 2, DAY);
        let mut store = IndexStore::new(MemoryStore::new());
        let keys = StorageKeys::default();

        let report = builder
            .run_pass(&mut store, &paths(&["/", "/guide", "/api"]), &keys, 0)
            .await
            .unwrap();

        check!(report.committed);
        check!(report.fetched.len() == 3);
        check!(report.failed.is_empty());
        check!(store.contains("/guide"));

        let mut reloaded = IndexStore::new(store.into_blobs());
        check!(!reloaded.load(&keys, 1));
        check!(reloaded.documents().len() == 3);
    }

    #[tokio::test]
    async fn test_single_failure_prevents_commit() {
        let builder = IndexBuilder::new(HashRouter, site(), 2, DAY);
        let mut store = IndexStore::new(MemoryStore::new());
        let keys = StorageKeys::default();

        let report = builder
            .run_pass(&mut store, &paths(&["/", "/guide", "/missing"]), &keys, 0)
            .await
            .unwrap();

        check!(!report.committed);
        check!(report.fetched.len() == 2);
        let_assert!([(path, Error::Fetch { file, .. })] = report.failed.as_slice());
        check!(path == "/missing");
        check!(file == "missing.md");

        // Successful documents are still queryable in memory.
        check!(store.contains("/guide"));
        check!(store.blobs().get(&keys.index).is_none());
    }

    #[tokio::test]
    async fn test_present_paths_are_reused() {
        let probe = Probe {
            inner: site(),
            ..Probe::default()
        };
        let builder = IndexBuilder::new(HashRouter, probe, 2, DAY);
        let mut store = IndexStore::new(MemoryStore::new());
        let keys = StorageKeys::default();

        builder
            .run_pass(&mut store, &paths(&["/", "/guide"]), &keys, 0)
            .await
            .unwrap();
        let report = builder
            .run_pass(&mut store, &paths(&["/", "/guide", "/api"]), &keys, 0)
            .await
            .unwrap();

        check!(report.reused == 2);
        check!(report.fetched == ["/api"]);
        check!(report.committed);
        check!(builder.source().calls.load(Ordering::SeqCst) == 3);
    }

    #[tokio::test]
    async fn test_nothing_fetched_does_not_commit() {
        let builder = IndexBuilder::new(HashRouter, site(), 2, DAY);
        let mut store = IndexStore::new(MemoryStore::new());
        store.merge_document("/", Default::default());
        let keys = StorageKeys::default();

        let report = builder
            .run_pass(&mut store, &paths(&["/"]), &keys, 0)
            .await
            .unwrap();

        check!(report.reused == 1);
        check!(!report.committed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_turns_hang_into_failure() {
        let probe = Probe {
            inner: site(),
            ..Probe::default()
        };
        let builder = IndexBuilder::new(HashRouter, probe, 2, DAY)
            .with_timeout(Some(Duration::from_millis(500)));
        let mut store = IndexStore::new(MemoryStore::new());

        let report = builder
            .run_pass(
                &mut store,
                &paths(&["/", "/hang"]),
                &StorageKeys::default(),
                0,
            )
            .await
            .unwrap();

        check!(!report.committed);
        let_assert!([(path, Error::Timeout { elapsed, .. })] = report.failed.as_slice());
        check!(path == "/hang");
        check!(*elapsed == Duration::from_millis(500));
    }

    #[test]
    fn test_from_config() {
        let config = SearchConfig {
            router: RouterMode::Anchor,
            fetch_timeout: Some(250),
            ..SearchConfig::default()
        };
        let builder = IndexBuilder::from_config(&config, MemorySource::new());
        check!(*builder.router() == RouterMode::Anchor);
        check!(builder.timeout == Some(Duration::from_millis(250)));
    }
}
