//! Search lifecycle of a documentation site.
//!
//! A [`SearchSession`] ties configuration, document source and index store
//! together: it (re)builds the index when the site is mounted or the reader
//! navigates, answers queries from whatever has been merged so far, and
//! resolves the per-route texts of the search panel.

use crate::builder::{
    DocumentSource, IndexBuilder, PassReport, ResolvedPaths, discover_paths, resolve_paths,
};
use crate::config::{DEFAULT_NO_DATA, DEFAULT_PLACEHOLDER, SearchConfig};
use crate::error::Error;
use crate::render::Panel;
use crate::router::{RouterMode, query_param};
use crate::search::{SearchOutcome, search};
use crate::store::{BlobStore, Clock, IndexStore, StorageKeys, SystemClock};

/// Query parameter carrying a search to run on page load.
pub const QUERY_PARAM: &str = "s";

pub struct SearchSession<S, Src> {
    config: SearchConfig,
    builder: IndexBuilder<RouterMode, Src>,
    store: IndexStore<S>,
    clock: Box<dyn Clock + Send + Sync>,
    route: String,
    keys: StorageKeys,
}

impl<S, Src> std::fmt::Debug for SearchSession<S, Src> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchSession")
            .field("route", &self.route)
            .field("keys", &self.keys)
            .field("auto", &self.config.is_auto())
            .finish_non_exhaustive()
    }
}

impl<S: BlobStore, Src: DocumentSource> SearchSession<S, Src> {
    pub fn new(config: SearchConfig, blobs: S, source: Src) -> Self {
        let builder = IndexBuilder::from_config(&config, source);
        let keys = StorageKeys::new(config.namespace.as_deref(), "");
        Self {
            config,
            builder,
            store: IndexStore::new(blobs),
            clock: Box::new(SystemClock),
            route: "/".to_string(),
            keys,
        }
    }

    /// Replace the wall clock, e.g. with a fixed time in tests.
    pub fn with_clock(mut self, clock: impl Clock + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Initial load. With a fixed path list, the persisted index is reused
    /// while valid and rebuilt once expired. In automatic mode indexing waits
    /// for the first [`navigate`](Self::navigate).
    pub async fn mount(&mut self) -> Result<Option<PassReport>, Error> {
        if self.config.is_auto() {
            return Ok(None);
        }
        let resolved = resolve_paths(&self.config, Vec::new());
        self.rebuild(resolved, false).await
    }

    /// The reader moved to `route`, whose navigation links are
    /// `sidebar_hrefs`. In automatic mode this runs a pass over the
    /// discovered paths, fetching only documents missing from a valid index.
    pub async fn navigate<I>(
        &mut self,
        route: &str,
        sidebar_hrefs: I,
    ) -> Result<Option<PassReport>, Error>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.route = route.to_string();
        if !self.config.is_auto() {
            return Ok(None);
        }
        let discovered = discover_paths(sidebar_hrefs, self.builder.router());
        let resolved = resolve_paths(&self.config, discovered);
        self.rebuild(resolved, true).await
    }

    async fn rebuild(
        &mut self,
        resolved: ResolvedPaths,
        always: bool,
    ) -> Result<Option<PassReport>, Error> {
        self.keys = resolved.keys(self.config.namespace.as_deref());
        let now = self.clock.now_millis();
        let expired = self.store.load(&self.keys, now);
        if !expired && !always {
            tracing::debug!("Reusing search index '{}'", self.keys.index);
            return Ok(None);
        }

        let report = self
            .builder
            .run_pass(&mut self.store, &resolved.paths, &self.keys, now)
            .await?;
        Ok(Some(report))
    }

    pub fn query(&self, text: &str) -> SearchOutcome {
        search(text, self.store.sections())
    }

    /// Result panel for `text` on the current route.
    pub fn panel(&self, text: &str) -> Panel {
        Panel::from_outcome(
            &self.query(text),
            self.no_data(),
            self.config.hide_other_sidebar_content,
        )
    }

    /// Search input placeholder for the current route.
    pub fn placeholder(&self) -> &str {
        self.config
            .placeholder
            .resolve(&self.route)
            .unwrap_or(DEFAULT_PLACEHOLDER)
    }

    /// Empty-result message for the current route.
    pub fn no_data(&self) -> &str {
        self.config
            .no_data
            .resolve(&self.route)
            .unwrap_or(DEFAULT_NO_DATA)
    }

    pub fn route(&self) -> &str {
        &self.route
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn store(&self) -> &IndexStore<S> {
        &self.store
    }

    pub fn into_store(self) -> IndexStore<S> {
        self.store
    }
}

/// Search requested through the page URL (`#/?s=install`), if any.
pub fn initial_query(url: &str) -> Option<String> {
    query_param(url, QUERY_PARAM)
        .map(|query| query.trim().to_string())
        .filter(|query| !query.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::MemorySource;
    use crate::config::{Localized, Paths};
    use crate::store::{MemoryStore, Millis};
    use assert2::{check, let_assert};
    use rstest::rstest;
    use std::collections::BTreeMap;

    const DAY: Millis = 86_400_000;

    struct FixedClock(Millis);

    impl Clock for FixedClock {
        fn now_millis(&self) -> Millis {
            self.0
        }
    }

    fn site() -> MemorySource {
        MemorySource::new()
            .with("README.md", "# Welcome\n\nIntroduction to the site.")
            .with("guide.md", "# Install Guide\n\nRun the setup script.")
            .with("fr/README.md", "# Bienvenue\n\nIntroduction en français.")
            .with("fr/guide.md", "# Guide\n\nLancez le script.")
    }

    fn explicit(paths: &[&str]) -> SearchConfig {
        SearchConfig {
            paths: Paths::List(paths.iter().map(ToString::to_string).collect()),
            ..SearchConfig::default()
        }
    }

    #[tokio::test]
    async fn test_mount_builds_then_reuses() {
        let mut session = SearchSession::new(explicit(&["/guide"]), MemoryStore::new(), site())
            .with_clock(FixedClock(0));
        let_assert!(Ok(Some(report)) = session.mount().await);
        check!(report.committed);
        check!(report.fetched.len() == 2);

        let blobs = session.into_store().into_blobs();
        let mut session = SearchSession::new(explicit(&["/guide"]), blobs, site())
            .with_clock(FixedClock(DAY - 1));
        let_assert!(Ok(None) = session.mount().await);
        check!(session.query("install").results().len() == 1);
    }

    #[tokio::test]
    async fn test_mount_rebuilds_when_expired() {
        let mut session = SearchSession::new(explicit(&[]), MemoryStore::new(), site())
            .with_clock(FixedClock(0));
        session.mount().await.unwrap();

        let blobs = session.into_store().into_blobs();
        let mut session =
            SearchSession::new(explicit(&[]), blobs, site()).with_clock(FixedClock(DAY));
        let_assert!(Ok(Some(report)) = session.mount().await);
        check!(report.fetched == ["/"]);
    }

    #[tokio::test]
    async fn test_auto_mode_indexes_on_navigation() {
        let mut session = SearchSession::new(SearchConfig::default(), MemoryStore::new(), site())
            .with_clock(FixedClock(0));
        let_assert!(Ok(None) = session.mount().await);
        check!(session.query("script").results().is_empty());

        let_assert!(
            Ok(Some(report)) = session
                .navigate("/guide", ["#/guide", "https://github.com/x/y"])
                .await
        );
        check!(report.fetched.len() == 2);
        check!(session.route() == "/guide");

        let outcome = session.query("script");
        let_assert!([result] = outcome.results());
        check!(result.url == "#/guide?id=install-guide");
        check!(result.score == 2);

        let_assert!(Ok(Some(report)) = session.navigate("/", ["#/guide"]).await);
        check!(report.reused == 2);
        check!(report.fetched.is_empty());
    }

    #[tokio::test]
    async fn test_path_namespaces_scope_keys() {
        let config = SearchConfig {
            namespace: Some("site".to_string()),
            path_namespaces: Some(crate::config::PathNamespaces::Prefixes(vec![
                "/fr".to_string(),
            ])),
            ..SearchConfig::default()
        };
        let mut session = SearchSession::new(config, MemoryStore::new(), site())
            .with_clock(FixedClock(0));
        session.navigate("/fr/guide", ["#/fr/guide"]).await.unwrap();

        check!(session.keys().index == "docsify.search.index/site/fr");
        check!(session.store().contains("/fr/"));
        check!(session.query("script").results().len() == 1);
    }

    #[tokio::test]
    async fn test_panel_uses_route_texts() {
        let config = SearchConfig {
            no_data: Localized::ByPath(BTreeMap::from([
                ("/fr/".to_string(), "Aucun résultat".to_string()),
                ("/".to_string(), "No Results!".to_string()),
            ])),
            placeholder: Localized::ByPath(BTreeMap::from([(
                "/fr/".to_string(),
                "Rechercher".to_string(),
            )])),
            hide_other_sidebar_content: true,
            ..explicit(&[])
        };
        let mut session =
            SearchSession::new(config, MemoryStore::new(), site()).with_clock(FixedClock(0));
        session.mount().await.unwrap();
        session.navigate("/fr/guide", Vec::<String>::new()).await.unwrap();

        check!(session.placeholder() == "Rechercher");
        check!(session.panel("   ") == Panel::Hidden);
        let_assert!(Panel::Shown { html, hide_sidebar } = session.panel("zzz"));
        check!(html == "<p class=\"empty\">Aucun résultat</p>");
        check!(hide_sidebar);

        session.navigate("/guide", Vec::<String>::new()).await.unwrap();
        check!(session.placeholder() == "Type to search");
        check!(session.no_data() == "No Results!");
    }

    #[rstest]
    #[case("#/?s=install", Some("install"))]
    #[case("#/guide?s=setup+script", Some("setup script"))]
    #[case("#/?s=", None)]
    #[case("#/guide", None)]
    fn test_initial_query(#[case] url: &str, #[case] expected: Option<&str>) {
        check!(initial_query(url).as_deref() == expected);
    }
}
