//! Section scoring and excerpt highlighting.

use super::MatchResult;
use crate::index::Section;
use crate::text::{escape, normalize};
use regex::{Captures, Regex, RegexBuilder};

/// Points for a candidate found in the section title.
pub const TITLE_SCORE: u32 = 3;

/// Points for a candidate found only in the section body.
pub const BODY_SCORE: u32 = 2;

/// Characters kept before a match in an excerpt.
const LEAD: usize = 10;

/// Excerpt length when the window starts at the beginning of the body.
const HEAD_WINDOW: usize = 70;

/// Characters kept after a match in an excerpt.
const TAIL: usize = 60;

/// One compiled query candidate.
#[derive(Debug, Clone)]
pub(crate) struct Pattern {
    regex: Regex,
    len: usize,
}

impl Pattern {
    /// Case-insensitive literal pattern of `token`, compared in escaped and
    /// normalized form. `None` only when the pattern exceeds regex size limits.
    pub(crate) fn new(token: &str) -> Option<Self> {
        let literal = regex::escape(&escape(&normalize(token)));
        let regex = RegexBuilder::new(&literal)
            .case_insensitive(true)
            .build()
            .inspect_err(|e| tracing::warn!("Skipping query token '{}': {}", token, e))
            .ok()?;
        Some(Self {
            regex,
            len: token.chars().count(),
        })
    }
}

/// Score `section` against every pattern, building a highlighted excerpt for
/// each body match. `None` when nothing matched.
pub(crate) fn score_section(section: &Section, patterns: &[Pattern]) -> Option<MatchResult> {
    let title = escape(&normalize(section.title.trim()));
    let body = escape(&normalize(section.body.trim()));

    let mut score = 0;
    let mut content = String::new();
    for pattern in patterns {
        let in_title = pattern.regex.is_match(&title);
        let body_match = pattern.regex.find(&body);

        if in_title {
            score += TITLE_SCORE;
        } else if body_match.is_some() {
            score += BODY_SCORE;
        }

        if let Some(found) = body_match {
            let at = body[..found.start()].chars().count();
            content.push_str(&excerpt(&body, at, pattern));
        }
    }

    (score > 0).then(|| MatchResult {
        title,
        content,
        url: section.slug.clone(),
        score,
    })
}

/// Window of `body` around the match at char offset `at`, with every match
/// inside the window highlighted.
fn excerpt(body: &str, at: usize, pattern: &Pattern) -> String {
    let total = body.chars().count();
    let start = if at > LEAD { at - LEAD } else { 0 };
    let end = if start == 0 {
        HEAD_WINDOW
    } else {
        at + pattern.len + TAIL
    }
    .min(total);

    let window = char_slice(body, start, end);
    let highlighted = pattern.regex.replace_all(window, |caps: &Captures<'_>| {
        format!("<em class=\"search-keyword\">{}</em>", &caps[0])
    });
    format!("...{}...", highlighted)
}

/// Substring of `text` between two char offsets.
fn char_slice(text: &str, start: usize, end: usize) -> &str {
    let byte_at = |n: usize| {
        text.char_indices()
            .nth(n)
            .map_or(text.len(), |(offset, _)| offset)
    };
    let (start, end) = (byte_at(start), byte_at(end));
    if start < end { &text[start..end] } else { "" }
}
