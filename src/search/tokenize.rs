//! Query tokenization.

use regex::Regex;
use std::sync::LazyLock;

/// Separators between query tokens: whitespace, hyphens, fullwidth commas
/// and slashes.
static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s\-，\\/]+").expect("separator pattern is valid"));

/// Candidate tokens of a query.
///
/// A single-token query is its own only candidate. A multi-token query yields
/// the whole trimmed query first, then each token, so an exact phrase match
/// scores on top of the individual words.
///
/// - `"install"` → `["install"]`
/// - `"install guide"` → `["install guide", "install", "guide"]`
/// - `"   "` → `[]`
pub fn candidates(query: &str) -> Vec<String> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }

    let tokens: Vec<&str> = SEPARATORS
        .split(query)
        .filter(|token| !token.is_empty())
        .collect();

    if tokens.len() > 1 {
        std::iter::once(query)
            .chain(tokens)
            .map(str::to_string)
            .collect()
    } else {
        vec![query.to_string()]
    }
}
