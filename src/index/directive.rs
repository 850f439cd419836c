//! Heading directive tokenizer.
//!
//! Headings may carry inline directives such as `## Setup :id=setup-guide` or
//! `# Changelog :ignore`. [`parse`] splits the heading into its visible title
//! and the directive attributes.

use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// `:name=value` or `:name` at the start of the text or after whitespace.
static DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s):([\w-]+:?)=?([\w%-]+)?").expect("directive pattern is valid")
});

/// Markers that hide a heading from the generated sidebar; never part of a title.
const IGNORE_MARKERS: &[&str] = &[
    "<!-- {docsify-ignore} -->",
    "{docsify-ignore}",
    "<!-- {docsify-ignore-all} -->",
    "{docsify-ignore-all}",
];

/// Value of a heading attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attribute {
    /// `:name` without a value
    Flag,
    /// `:name=value`
    Value(String),
}

/// A heading split into its title and directive attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadingDirective {
    pub title: String,
    pub attributes: BTreeMap<String, Attribute>,
}

impl HeadingDirective {
    /// Explicit anchor id from `:id=value`. A bare `:id` flag is ignored.
    pub fn id(&self) -> Option<&str> {
        match self.attributes.get("id") {
            Some(Attribute::Value(id)) if !id.is_empty() => Some(id),
            _ => None,
        }
    }

    /// Title with the sidebar ignore markers removed.
    pub fn display_title(&self) -> String {
        let mut title = self.title.clone();
        for marker in IGNORE_MARKERS {
            title = title.replacen(marker, "", 1);
        }
        title.trim().to_string()
    }
}

/// Tokenize a raw heading text.
///
/// One leading and one trailing quote are stripped first. Directive tokens
/// whose name itself contains a `:` are left in the title.
pub fn parse(text: &str) -> HeadingDirective {
    let text = text.strip_prefix(['\'', '"']).unwrap_or(text);
    let text = text.strip_suffix(['\'', '"']).unwrap_or(text);

    let mut attributes = BTreeMap::new();
    let title = DIRECTIVE.replace_all(text, |caps: &Captures<'_>| {
        let name = &caps[1];
        if name.contains(':') {
            return caps[0].to_string();
        }
        let value = caps
            .get(2)
            .map(|m| m.as_str().replace("&quot;", ""))
            .filter(|v| !v.is_empty())
            .map_or(Attribute::Flag, Attribute::Value);
        attributes.insert(name.to_string(), value);
        String::new()
    });

    HeadingDirective {
        title: title.trim().to_string(),
        attributes,
    }
}
