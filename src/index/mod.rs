//! Document index model and construction.
//!
//! A document is split into [`Section`]s, one per heading at or above the
//! configured depth, keyed by the section's slug URL. The [`DocumentIndex`]
//! maps every indexed document path to its sections.

// Module declarations
pub(crate) mod directive;
pub(crate) mod markdown;
pub(crate) mod segment;
pub(crate) mod slug;

// Public re-exports (used via lib.rs)
pub use directive::{Attribute, HeadingDirective, parse as parse_heading};
pub use markdown::{Block, lex};
pub use segment::{Segmenter, segment};
pub use slug::{Slugger, slugify};

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// The smallest indexed unit of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// URL of the section: document URL plus optional heading anchor
    pub slug: String,
    /// Heading text, or the document display name for the leading section
    pub title: String,
    /// Newline-joined block text belonging to this section
    pub body: String,
}

impl Section {
    pub fn new(slug: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
            body: String::new(),
        }
    }

    /// Append one block's text, newline-separated from what came before.
    pub(crate) fn push_block(&mut self, text: &str) {
        if self.body.is_empty() {
            self.body.push_str(text);
        } else {
            self.body.push('\n');
            self.body.push_str(text);
        }
    }
}

/// Sections of a single document, keyed by slug, in document order.
///
/// Serialized as a JSON object `slug -> Section` whose key order is the
/// document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentSections {
    sections: Vec<Section>,
}

impl DocumentSections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a section. A section with the same slug is replaced in place,
    /// keeping its original position.
    pub fn insert(&mut self, section: Section) {
        match self.sections.iter_mut().find(|s| s.slug == section.slug) {
            Some(existing) => *existing = section,
            None => self.sections.push(section),
        }
    }

    pub fn get(&self, slug: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.slug == slug)
    }

    pub(crate) fn get_mut(&mut self, slug: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.slug == slug)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Section> {
        self.sections.iter()
    }

    pub fn slugs(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.slug.as_str())
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl<'a> IntoIterator for &'a DocumentSections {
    type Item = &'a Section;
    type IntoIter = std::slice::Iter<'a, Section>;

    fn into_iter(self) -> Self::IntoIter {
        self.sections.iter()
    }
}

impl FromIterator<Section> for DocumentSections {
    fn from_iter<I: IntoIterator<Item = Section>>(iter: I) -> Self {
        let mut sections = Self::new();
        for section in iter {
            sections.insert(section);
        }
        sections
    }
}

impl Serialize for DocumentSections {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.sections.len()))?;
        for section in &self.sections {
            map.serialize_entry(&section.slug, section)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for DocumentSections {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SectionsVisitor;

        impl<'de> Visitor<'de> for SectionsVisitor {
            type Value = DocumentSections;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of slug to section")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut sections = DocumentSections::new();
                while let Some((slug, mut section)) = access.next_entry::<String, Section>()? {
                    // The key is authoritative when it disagrees with the stored slug
                    section.slug = slug;
                    sections.insert(section);
                }
                Ok(sections)
            }
        }

        deserializer.deserialize_map(SectionsVisitor)
    }
}

/// Mapping from document path to that document's sections.
pub type DocumentIndex = BTreeMap<String, DocumentSections>;
