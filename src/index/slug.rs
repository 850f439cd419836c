//! Heading text → anchor id.

use ahash::AHashMap;
use regex::Regex;
use std::sync::LazyLock;

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag pattern is valid"));

static DASH_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-+").expect("dash pattern is valid"));

/// Characters dropped from anchor ids: general punctuation, supplemental
/// punctuation and ASCII punctuation other than `-` and `_`.
fn is_stripped(c: char) -> bool {
    matches!(c, '\u{2000}'..='\u{206F}' | '\u{2E00}'..='\u{2E7F}')
        || "\\'!\"#$%&()*+,./:;<=>?@[]^`{|}~".contains(c)
}

/// Convert heading text into an anchor id.
///
/// - "Install Guide" → "install-guide"
/// - "What's <em>new</em>?" → "whats-new"
/// - "2.0 Release" → "_20-release"
pub fn slugify(text: &str) -> String {
    let lowered = text.trim().to_ascii_lowercase();
    let untagged = HTML_TAG.replace_all(&lowered, "");
    let dashed: String = untagged
        .chars()
        .filter(|c| !is_stripped(*c))
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .collect();
    let collapsed = DASH_RUN.replace_all(&dashed, "-");

    match collapsed.chars().next() {
        Some(first) if first.is_ascii_digit() => format!("_{}", collapsed),
        _ => collapsed.into_owned(),
    }
}

/// Slug generator that keeps ids unique within one document.
///
/// The first occurrence of an id is returned as-is; repeats get `-1`, `-2`, …
#[derive(Debug, Default)]
pub struct Slugger {
    seen: AHashMap<String, usize>,
}

impl Slugger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slugify `text` and de-duplicate against previously issued ids.
    pub fn slug(&mut self, text: &str) -> String {
        let slug = slugify(text);
        let count = self
            .seen
            .entry(slug.clone())
            .and_modify(|count| *count += 1)
            .or_insert(0);
        if *count == 0 {
            slug
        } else {
            format!("{}-{}", slug, count)
        }
    }

    /// Forget every issued id.
    pub fn clear(&mut self) {
        self.seen.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    #[rstest]
    #[case("Install Guide", "install-guide")]
    #[case("  Trimmed  ", "trimmed")]
    #[case("What's <em>new</em>?", "whats-new")]
    #[case("2.0 Release", "_20-release")]
    #[case("a  -  b", "a-b")]
    #[case("snake_case", "snake_case")]
    #[case("A &amp; B", "a-amp-b")]
    #[case("Café Menu", "café-menu")]
    #[case("“Quoted”", "quoted")]
    #[case("", "")]
    fn test_slugify(#[case] input: &str, #[case] expected: &str) {
        check!(slugify(input) == expected);
    }

    #[test]
    fn test_slugger_deduplicates() {
        let mut slugger = Slugger::new();
        check!(slugger.slug("Usage") == "usage");
        check!(slugger.slug("Usage") == "usage-1");
        check!(slugger.slug("usage") == "usage-2");
        check!(slugger.slug("Other") == "other");
    }

    #[test]
    fn test_slugger_clear() {
        let mut slugger = Slugger::new();
        slugger.slug("Usage");
        slugger.clear();
        check!(slugger.slug("Usage") == "usage");
    }
}
