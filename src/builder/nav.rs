//! Path discovery from the site navigation.

use crate::config::{Paths, SearchConfig};
use crate::router::{Router, is_absolute};
use crate::store::StorageKeys;
use ahash::AHashSet;
use pulldown_cmark::{Event, Parser, Tag};

/// Link targets of a navigation document (such as `_sidebar.md`), in order.
pub fn sidebar_links(markdown: &str) -> Vec<String> {
    Parser::new(markdown)
        .filter_map(|event| match event {
            Event::Start(Tag::Link { dest_url, .. }) => Some(dest_url.into_string()),
            _ => None,
        })
        .collect()
}

/// Route paths of the given navigation hrefs.
///
/// External links, anchor-only links and repeats are dropped; the remaining
/// paths keep their first-seen order.
pub fn discover_paths<I, R>(hrefs: I, router: &R) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
    R: Router + ?Sized,
{
    let mut seen = AHashSet::new();
    hrefs
        .into_iter()
        .filter_map(|href| {
            let href = href.as_ref();
            if is_absolute(href) {
                None
            } else {
                router.route_path(href)
            }
        })
        .filter(|path| seen.insert(path.clone()))
        .collect()
}

/// Paths to index in one pass, and the storage scope they belong to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub paths: Vec<String>,
    /// Path prefix of the active namespace, empty for the whole site
    pub scope: String,
}

impl ResolvedPaths {
    /// Storage keys of this scope under `namespace`.
    pub fn keys(&self, namespace: Option<&str>) -> StorageKeys {
        StorageKeys::new(namespace, &self.scope)
    }
}

/// Final path list for a pass.
///
/// In automatic mode `discovered` is used; the configured list otherwise. The
/// home document of the active scope is always included.
pub fn resolve_paths(config: &SearchConfig, discovered: Vec<String>) -> ResolvedPaths {
    let mut paths = match &config.paths {
        Paths::Auto => discovered,
        Paths::List(list) => list.clone(),
    };

    let scope = match (&config.paths, &config.path_namespaces, paths.first()) {
        (Paths::Auto, Some(namespaces), Some(first)) => Some(namespaces.scope_for(first)),
        _ => None,
    };

    let home = format!("{}/", scope.as_deref().unwrap_or_default());
    let readme = format!("{}/README", scope.as_deref().unwrap_or_default());
    if !paths.iter().any(|p| *p == home || *p == readme) {
        paths.insert(0, home);
    }

    ResolvedPaths {
        paths,
        scope: scope.unwrap_or_default(),
    }
}
