//! Typed search configuration with documented defaults.
//!
//! Loaded from TOML (keys in camelCase, mirroring the site configuration)
//! and validated once before use:
//!
//! ```toml
//! paths = ["/", "/guide", "/api"]   # or "auto"
//! depth = 3
//! maxAge = 3600000
//! namespace = "my-site"
//! pathNamespaces = ["/en", "/fr"]   # or { pattern = "^/v\\d+" }
//!
//! [placeholder]
//! "/fr/" = "Rechercher"
//! "/" = "Type to search"
//! ```

use crate::error::Error;
use crate::router::RouterMode;
use crate::store::Millis;
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

/// One day, in milliseconds.
pub const DEFAULT_MAX_AGE: Millis = 86_400_000;

pub const DEFAULT_DEPTH: u8 = 2;

pub const DEFAULT_PLACEHOLDER: &str = "Type to search";

pub const DEFAULT_NO_DATA: &str = "No Results!";

/// Search configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Documents to index: discovered from the navigation, or a fixed list
    pub paths: Paths,
    /// Deepest heading level that starts a new section
    pub depth: u8,
    /// Index validity in milliseconds
    pub max_age: Millis,
    /// Search input placeholder
    pub placeholder: Localized,
    /// Message shown when a query has no matches
    pub no_data: Localized,
    /// Hide the navigation and site name while results are shown
    pub hide_other_sidebar_content: bool,
    /// Storage key scope
    pub namespace: Option<String>,
    /// Path prefixes giving documentation subtrees their own index
    pub path_namespaces: Option<PathNamespaces>,
    /// Per-document fetch timeout in milliseconds; unbounded when absent
    pub fetch_timeout: Option<Millis>,
    /// URL style of section links
    pub router: RouterMode,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            paths: Paths::Auto,
            depth: DEFAULT_DEPTH,
            max_age: DEFAULT_MAX_AGE,
            placeholder: Localized::Text(DEFAULT_PLACEHOLDER.to_string()),
            no_data: Localized::Text(DEFAULT_NO_DATA.to_string()),
            hide_other_sidebar_content: false,
            namespace: None,
            path_namespaces: None,
            fetch_timeout: None,
            router: RouterMode::default(),
        }
    }
}

impl SearchConfig {
    /// Parse and validate a TOML configuration.
    pub fn from_toml(source: &str) -> Result<Self, Error> {
        let config: Self = toml::from_str(source).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()
    }

    /// Read, parse and validate a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let source = std::fs::read_to_string(path).map_err(|source| Error::Storage {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&source)
    }

    /// Check value ranges, returning the configuration unchanged when valid.
    pub fn validate(self) -> Result<Self, Error> {
        if !(1..=6).contains(&self.depth) {
            return Err(Error::Config(format!(
                "depth must be between 1 and 6, got {}",
                self.depth
            )));
        }
        if self.max_age == 0 {
            return Err(Error::Config("maxAge must be positive".to_string()));
        }
        if self.fetch_timeout == Some(0) {
            return Err(Error::Config("fetchTimeout must be positive".to_string()));
        }
        if self.namespace.as_deref().is_some_and(str::is_empty) {
            return Err(Error::Config("namespace must not be empty".to_string()));
        }
        if let Paths::List(paths) = &self.paths
            && let Some(bad) = paths.iter().find(|p| !p.starts_with('/'))
        {
            return Err(Error::Config(format!(
                "paths must start with '/', got '{}'",
                bad
            )));
        }
        Ok(self)
    }

    pub const fn is_auto(&self) -> bool {
        matches!(self.paths, Paths::Auto)
    }

    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout.map(Duration::from_millis)
    }
}

/// Which documents are indexed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "PathsRepr")]
pub enum Paths {
    /// Discover paths from the rendered navigation links
    Auto,
    /// A fixed, ordered list of route paths
    List(Vec<String>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PathsRepr {
    Keyword(String),
    List(Vec<String>),
}

impl TryFrom<PathsRepr> for Paths {
    type Error = String;

    fn try_from(repr: PathsRepr) -> Result<Self, Self::Error> {
        match repr {
            PathsRepr::Keyword(keyword) if keyword == "auto" => Ok(Self::Auto),
            PathsRepr::Keyword(other) => Err(format!(
                "expected \"auto\" or a list of paths, got \"{}\"",
                other
            )),
            PathsRepr::List(paths) => Ok(Self::List(paths)),
        }
    }
}

/// Text that is either fixed or chosen by route path.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Localized {
    Text(String),
    /// Keyed by a path fragment contained in the current route
    ByPath(BTreeMap<String, String>),
}

impl Localized {
    /// Text for `route`. With per-path text, the longest key contained in the
    /// route wins; `None` when no key matches.
    pub fn resolve(&self, route: &str) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::ByPath(map) => map
                .iter()
                .filter(|(key, _)| route.contains(key.as_str()))
                .max_by_key(|(key, _)| key.len())
                .map(|(_, text)| text.as_str()),
        }
    }
}

/// Rule deriving a storage scope from the first discovered path.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "NamespacesRepr")]
pub enum PathNamespaces {
    /// The first prefix the path starts with
    Prefixes(Vec<String>),
    /// The first match of the pattern within the path
    Pattern(Regex),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NamespacesRepr {
    Prefixes(Vec<String>),
    Pattern { pattern: String },
}

impl TryFrom<NamespacesRepr> for PathNamespaces {
    type Error = String;

    fn try_from(repr: NamespacesRepr) -> Result<Self, Self::Error> {
        match repr {
            NamespacesRepr::Prefixes(prefixes) => Ok(Self::Prefixes(prefixes)),
            NamespacesRepr::Pattern { pattern } => Regex::new(&pattern)
                .map(Self::Pattern)
                .map_err(|e| format!("invalid pathNamespaces pattern: {}", e)),
        }
    }
}

impl PathNamespaces {
    /// Scope of `path`, or an empty string when no namespace applies.
    pub fn scope_for(&self, path: &str) -> String {
        match self {
            Self::Prefixes(prefixes) => prefixes
                .iter()
                .find(|prefix| path.starts_with(prefix.as_str()))
                .cloned()
                .unwrap_or_default(),
            Self::Pattern(pattern) => pattern
                .find(path)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
        }
    }
}
