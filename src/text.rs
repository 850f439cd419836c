//! Markup escaping and accent folding.

use unicode_normalization::UnicodeNormalization;

/// Escape the five markup-significant characters.
///
/// Not idempotent: escaping twice double-escapes, so each render path must
/// escape exactly once.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Strip diacritics for comparison: NFD decomposition, then drop the
/// Combining Diacritical Marks block (U+0300..=U+036F).
///
/// - "café" → "cafe"
/// - "naïve" → "naive"
///
/// Case is preserved; matching is made case-insensitive by the caller.
pub fn normalize(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

const fn is_combining_mark(c: char) -> bool {
    matches!(c, '\u{0300}'..='\u{036F}')
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    #[rstest]
    #[case("a & b", "a &amp; b")]
    #[case("<em>", "&lt;em&gt;")]
    #[case(r#"say "hi""#, "say &quot;hi&quot;")]
    #[case("it's", "it&#39;s")]
    #[case("plain", "plain")]
    fn test_escape(#[case] input: &str, #[case] expected: &str) {
        check!(escape(input) == expected);
    }

    #[test]
    fn test_escape_is_not_idempotent() {
        check!(escape(&escape("&")) == "&amp;amp;");
    }

    #[rstest]
    #[case("café", "cafe")]
    #[case("naïve", "naive")]
    #[case("Ångström", "Angstrom")]
    #[case("Crème Brûlée", "Creme Brulee")]
    #[case("日本語", "日本語")]
    #[case("", "")]
    fn test_normalize(#[case] input: &str, #[case] expected: &str) {
        check!(normalize(input) == expected);
    }

    #[test]
    fn test_normalize_keeps_case() {
        check!(normalize("ÉCOLE") == "ECOLE");
    }
}
