//! Keyword search over indexed sections.
//!
//! Queries are split into candidate tokens; every section is scanned for each
//! candidate (title matches weigh more than body matches), body matches get a
//! highlighted excerpt, and matching sections are ranked by total score.

// Module declarations
pub(crate) mod scoring;
pub(crate) mod tokenize;

// Public re-exports (used via lib.rs)
pub use scoring::{BODY_SCORE, TITLE_SCORE};
pub use tokenize::candidates;

use crate::index::Section;
use scoring::{Pattern, score_section};
use serde::Serialize;

/// A section matching a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    /// Section title, HTML-escaped
    pub title: String,
    /// Highlighted excerpts, HTML-escaped apart from the highlight markup
    pub content: String,
    /// Section URL
    pub url: String,
    pub score: u32,
}

/// Result of running a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The query was empty; any shown results should be cleared
    Cleared,
    /// Matches in descending score order, possibly none
    Results(Vec<MatchResult>),
}

impl SearchOutcome {
    pub const fn is_cleared(&self) -> bool {
        matches!(self, Self::Cleared)
    }

    /// Matches of the query; empty when cleared.
    pub fn results(&self) -> &[MatchResult] {
        match self {
            Self::Cleared => &[],
            Self::Results(results) => results,
        }
    }

    pub fn into_results(self) -> Vec<MatchResult> {
        match self {
            Self::Cleared => Vec::new(),
            Self::Results(results) => results,
        }
    }
}

/// Run `query` against `sections`.
///
/// Sections with equal scores keep their iteration order.
pub fn search<'a, I>(query: &str, sections: I) -> SearchOutcome
where
    I: IntoIterator<Item = &'a Section>,
{
    let tokens = candidates(query);
    if tokens.is_empty() {
        return SearchOutcome::Cleared;
    }

    let patterns: Vec<Pattern> = tokens.iter().filter_map(|t| Pattern::new(t)).collect();
    let mut results: Vec<MatchResult> = sections
        .into_iter()
        .filter_map(|section| score_section(section, &patterns))
        .collect();
    results.sort_by(|a, b| b.score.cmp(&a.score));

    tracing::debug!(
        "Query '{}' ({} candidates): {} matches",
        query.trim(),
        tokens.len(),
        results.len()
    );
    SearchOutcome::Results(results)
}
