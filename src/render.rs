//! HTML rendering of search results.

use crate::search::{MatchResult, SearchOutcome};
use crate::text::escape;
use std::fmt::Write;

/// Result list markup: one `matching-post` block per result, or the
/// `no_data` message when there are none.
pub fn results_html(results: &[MatchResult], no_data: &str) -> String {
    if results.is_empty() {
        return format!("<p class=\"empty\">{}</p>", no_data);
    }

    let mut html = String::new();
    for result in results {
        let _ = write!(
            html,
            "<div class=\"matching-post\"><a href=\"{}\"><h2>{}</h2><p>{}</p></a></div>",
            escape(&result.url),
            result.title,
            result.content
        );
    }
    html
}

/// State of the result panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Panel {
    /// No query; the panel and its clear button are hidden
    Hidden,
    Shown {
        html: String,
        /// Hide the navigation and site name while the panel is shown
        hide_sidebar: bool,
    },
}

impl Panel {
    pub fn from_outcome(outcome: &SearchOutcome, no_data: &str, hide_sidebar: bool) -> Self {
        match outcome {
            SearchOutcome::Cleared => Self::Hidden,
            SearchOutcome::Results(results) => Self::Shown {
                html: results_html(results, no_data),
                hide_sidebar,
            },
        }
    }

    pub const fn is_shown(&self) -> bool {
        matches!(self, Self::Shown { .. })
    }
}
