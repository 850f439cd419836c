//! Markdown → ordered content blocks.
//!
//! Thin adapter over `pulldown-cmark`: only top-level blocks are produced, and
//! each carries the text the segmenter indexes for it. Headings and paragraphs
//! keep their raw inline source so heading directives and inline markup are
//! visible to later stages.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use std::borrow::Cow;
use std::ops::Range;

/// A top-level content block of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { depth: u8, text: String },
    Paragraph { text: String },
    Code { text: String },
    Quote { text: String },
    Html { text: String },
    List { raw: String },
    Table { header: Vec<String>, rows: Vec<Vec<String>> },
}

impl Block {
    /// Textual representation used as section body content.
    ///
    /// Tables are linearized with the header as the first row, cells joined
    /// by `" | "` and rows by `" |\n "`. Lists use their raw source.
    pub fn text(&self) -> Cow<'_, str> {
        match self {
            Self::Heading { text, .. }
            | Self::Paragraph { text }
            | Self::Code { text }
            | Self::Quote { text }
            | Self::Html { text } => Cow::Borrowed(text),
            Self::List { raw } => Cow::Borrowed(raw),
            Self::Table { header, rows } => Cow::Owned(
                std::iter::once(header)
                    .chain(rows)
                    .map(|row| row.join(" | "))
                    .collect::<Vec<_>>()
                    .join(" |\n "),
            ),
        }
    }
}

/// Parse markdown into its top-level blocks, in document order.
pub fn lex(source: &str) -> Vec<Block> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut lexer = Lexer::new(source);
    for (event, range) in Parser::new_ext(source, options).into_offset_iter() {
        lexer.feed(event, range);
    }
    lexer.blocks
}

/// Kind of the top-level block currently being read.
#[derive(Debug)]
enum Open {
    Heading(u8),
    Paragraph,
    Code,
    Quote,
    Html,
    List,
    Table,
    Skipped,
}

/// Accumulates events of one top-level block at a time.
struct Lexer<'a> {
    source: &'a str,
    blocks: Vec<Block>,
    open: Option<(Open, Range<usize>)>,
    nesting: usize,
    /// Inline text of the current code block or table cell
    buffer: String,
    row: Vec<String>,
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl<'a> Lexer<'a> {
    const fn new(source: &'a str) -> Self {
        Self {
            source,
            blocks: Vec::new(),
            open: None,
            nesting: 0,
            buffer: String::new(),
            row: Vec::new(),
            header: Vec::new(),
            rows: Vec::new(),
        }
    }

    fn feed(&mut self, event: Event<'_>, range: Range<usize>) {
        match event {
            Event::Start(tag) => {
                if self.nesting == 0 {
                    self.open = Some((Self::classify(&tag), range));
                } else {
                    self.start_inner(&tag);
                }
                self.nesting += 1;
            }
            Event::End(tag) => {
                self.nesting = self.nesting.saturating_sub(1);
                if self.nesting == 0 {
                    self.finish();
                } else {
                    self.end_inner(tag);
                }
            }
            Event::Text(text) => self.buffer.push_str(&text),
            Event::Code(code) => {
                self.buffer.push('`');
                self.buffer.push_str(&code);
                self.buffer.push('`');
            }
            Event::SoftBreak | Event::HardBreak => self.buffer.push(' '),
            _ => {}
        }
    }

    fn classify(tag: &Tag<'_>) -> Open {
        match tag {
            Tag::Heading { level, .. } => Open::Heading(*level as u8),
            Tag::Paragraph => Open::Paragraph,
            Tag::CodeBlock(_) => Open::Code,
            Tag::BlockQuote(_) => Open::Quote,
            Tag::HtmlBlock => Open::Html,
            Tag::List(_) => Open::List,
            Tag::Table(_) => Open::Table,
            _ => Open::Skipped,
        }
    }

    fn start_inner(&mut self, tag: &Tag<'_>) {
        match tag {
            Tag::TableHead | Tag::TableRow => self.row.clear(),
            Tag::TableCell => self.buffer.clear(),
            _ => {}
        }
    }

    fn end_inner(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::TableCell => {
                let cell = std::mem::take(&mut self.buffer);
                self.row.push(cell.trim().to_string());
            }
            TagEnd::TableHead => self.header = std::mem::take(&mut self.row),
            TagEnd::TableRow => self.rows.push(std::mem::take(&mut self.row)),
            _ => {}
        }
    }

    fn finish(&mut self) {
        let Some((open, range)) = self.open.take() else {
            return;
        };
        let raw = &self.source[range];
        let block = match open {
            Open::Heading(depth) => Some(Block::Heading {
                depth,
                text: heading_source(raw),
            }),
            Open::Paragraph => Some(Block::Paragraph {
                text: raw.trim().to_string(),
            }),
            Open::Code => Some(Block::Code {
                text: self.buffer.trim_end_matches('\n').to_string(),
            }),
            Open::Quote => Some(Block::Quote {
                text: quote_source(raw),
            }),
            Open::Html => Some(Block::Html {
                text: raw.trim().to_string(),
            }),
            Open::List => Some(Block::List {
                raw: raw.trim_end().to_string(),
            }),
            Open::Table => Some(Block::Table {
                header: std::mem::take(&mut self.header),
                rows: std::mem::take(&mut self.rows),
            }),
            Open::Skipped => None,
        };
        self.buffer.clear();
        self.row.clear();
        if let Some(block) = block {
            self.blocks.push(block);
        }
    }
}

/// Raw inline text of a heading: ATX markers and closing sequence removed,
/// or the setext underline dropped.
fn heading_source(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Some(rest) = trimmed.strip_prefix('#') {
        let rest = rest.trim_start_matches('#').trim();
        let without_closing = rest.trim_end_matches('#');
        // A closing sequence only counts when separated by whitespace
        if without_closing.is_empty() || without_closing.ends_with([' ', '\t']) {
            without_closing.trim().to_string()
        } else {
            rest.to_string()
        }
    } else {
        let mut lines: Vec<&str> = trimmed.lines().collect();
        lines.pop();
        lines
            .iter()
            .map(|line| line.trim())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Block quote source with the `>` markers removed.
fn quote_source(raw: &str) -> String {
    raw.trim()
        .lines()
        .map(|line| {
            let line = line.trim_start();
            let line = line.strip_prefix('>').unwrap_or(line);
            line.strip_prefix(' ').unwrap_or(line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
