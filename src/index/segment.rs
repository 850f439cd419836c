//! Document → sections.

use super::directive;
use super::markdown::{Block, lex};
use super::slug::Slugger;
use super::{DocumentSections, Section};
use crate::router::Router;
use crate::text::escape;

/// Title of the leading section of the site root.
const HOME_TITLE: &str = "Home Page";

/// Splits documents into sections at headings of depth `<= depth`.
#[derive(Debug, Clone, Copy)]
pub struct Segmenter<'a, R: ?Sized> {
    router: &'a R,
    depth: u8,
}

impl<'a, R: Router + ?Sized> Segmenter<'a, R> {
    pub const fn new(router: &'a R, depth: u8) -> Self {
        Self { router, depth }
    }

    /// Parse and segment one markdown document.
    pub fn segment(&self, path: &str, source: &str) -> DocumentSections {
        let blocks = lex(source);
        let sections = self.segment_blocks(path, &blocks);
        tracing::debug!(
            "Segmented '{}': {} blocks into {} sections",
            path,
            blocks.len(),
            sections.len()
        );
        sections
    }

    /// Segment already-parsed blocks.
    ///
    /// Content before the first heading is attributed to a leading section
    /// at the document URL, which only exists when the very first block is
    /// not a section heading.
    pub fn segment_blocks(&self, path: &str, blocks: &[Block]) -> DocumentSections {
        let mut slugger = Slugger::new();
        let mut sections = DocumentSections::new();
        let mut current: Option<String> = None;

        for (n, block) in blocks.iter().enumerate() {
            if let Block::Heading { depth, text } = block
                && *depth <= self.depth
            {
                let heading = directive::parse(text);
                let id = match heading.id() {
                    Some(id) => slugger.slug(id),
                    None => slugger.slug(&escape(text)),
                };
                let slug = self.router.to_url(path, Some(&id));
                sections.insert(Section::new(slug.clone(), heading.display_title()));
                current = Some(slug);
                continue;
            }

            if n == 0 {
                let slug = self.router.to_url(path, None);
                sections.insert(Section::new(slug.clone(), display_name(path)));
                current = Some(slug);
            }

            let Some(slug) = current.as_deref() else {
                continue;
            };
            if let Some(section) = sections.get_mut(slug) {
                section.push_block(&block.text());
            }
        }

        sections
    }
}

/// Segment `source` with a one-off [`Segmenter`].
pub fn segment<R: Router + ?Sized>(
    path: &str,
    source: &str,
    router: &R,
    depth: u8,
) -> DocumentSections {
    Segmenter::new(router, depth).segment(path, source)
}

/// Display name of a document: its path without the leading slash.
fn display_name(path: &str) -> String {
    if path == "/" {
        HOME_TITLE.to_string()
    } else {
        path.strip_prefix('/').unwrap_or(path).to_string()
    }
}
