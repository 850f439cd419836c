//! Route path ↔ URL ↔ source file mapping.
//!
//! Two URL styles are supported: hash routing (`#/guide?id=install`), the
//! default for single-page documentation sites, and plain anchors
//! (`/guide#install`) for statically rendered pages.

use serde::Deserialize;
use url::form_urlencoded;

/// URL-resolution capability used by the segmenter and the builder.
pub trait Router {
    /// URL of a document, or of the anchor `id` within it.
    fn to_url(&self, path: &str, id: Option<&str>) -> String;

    /// Route path of a navigation href. `None` for anchor-only or empty hrefs.
    fn route_path(&self, href: &str) -> Option<String>;

    /// Source file of a route path, relative to the documentation root.
    ///
    /// - `/` → `README.md`
    /// - `/zh-cn/` → `zh-cn/README.md`
    /// - `/guide` → `guide.md`
    fn file_for(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        if path.is_empty() || path.ends_with('/') {
            format!("{}README.md", path)
        } else if path.ends_with(".md") {
            path.to_string()
        } else {
            format!("{}.md", path)
        }
    }
}

/// Hash-based routes: `#/guide` and `#/guide?id=anchor`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashRouter;

impl Router for HashRouter {
    fn to_url(&self, path: &str, id: Option<&str>) -> String {
        let path = strip_extension(path);
        match id {
            Some(id) => format!("#{}?id={}", path, id),
            None => format!("#{}", path),
        }
    }

    fn route_path(&self, href: &str) -> Option<String> {
        let path = match href.split_once('#') {
            Some((_, fragment)) if fragment.starts_with('/') => fragment,
            Some(_) => return None,
            None => href,
        };
        clean_route(path)
    }
}

/// Anchor-based routes: `/guide` and `/guide#anchor`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnchorRouter;

impl Router for AnchorRouter {
    fn to_url(&self, path: &str, id: Option<&str>) -> String {
        let path = strip_extension(path);
        match id {
            Some(id) => format!("{}#{}", path, id),
            None => path.to_string(),
        }
    }

    fn route_path(&self, href: &str) -> Option<String> {
        let path = href.split('#').next().unwrap_or_default();
        clean_route(path)
    }
}

/// Routing style selected in configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouterMode {
    #[default]
    Hash,
    Anchor,
}

impl Router for RouterMode {
    fn to_url(&self, path: &str, id: Option<&str>) -> String {
        match self {
            Self::Hash => HashRouter.to_url(path, id),
            Self::Anchor => AnchorRouter.to_url(path, id),
        }
    }

    fn route_path(&self, href: &str) -> Option<String> {
        match self {
            Self::Hash => HashRouter.route_path(href),
            Self::Anchor => AnchorRouter.route_path(href),
        }
    }
}

/// Whether an href points outside the site (`https://…`, `//cdn…`, `mailto:`).
pub fn is_absolute(href: &str) -> bool {
    href.contains(':') || href.contains("//")
}

/// Value of query parameter `name` in an href, decoded as form data (`+` is a
/// space).
///
/// Used to restore a search from a shared link such as `#/?s=install`. The
/// query may sit inside the hash, so it is located by the first `?`.
pub fn query_param(href: &str, name: &str) -> Option<String> {
    let (_, query) = href.split_once('?')?;
    let query = query.split('#').next().unwrap_or_default();
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

fn strip_extension(path: &str) -> &str {
    path.strip_suffix(".md").unwrap_or(path)
}

/// Drop query string and `.md` extension, and root the path at `/`.
fn clean_route(path: &str) -> Option<String> {
    let path = path.split('?').next().unwrap_or_default().trim();
    if path.is_empty() {
        return None;
    }
    let path = strip_extension(path);
    let path = path.strip_prefix("./").unwrap_or(path);
    if path.starts_with('/') {
        Some(path.to_string())
    } else {
        Some(format!("/{}", path))
    }
}
