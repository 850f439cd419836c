//! Full-text search for markdown documentation sites.
//!
//! Documents are split into heading-delimited sections, persisted with an
//! expiry in a key-value store, and queried by keyword with highlighted
//! excerpts.

pub mod builder;
pub mod cli;
pub mod config;
pub mod debounce;
pub mod error;
pub mod index;
pub mod render;
pub mod router;
pub mod search;
pub mod session;
pub mod store;
pub mod text;
pub mod tracing;

pub use builder::{
    DocumentSource, FsSource, IndexBuilder, MemorySource, PassReport, ResolvedPaths,
    discover_paths, resolve_paths, sidebar_links,
};
pub use config::{Localized, PathNamespaces, Paths, SearchConfig};
pub use error::{Error, Result};
pub use index::{DocumentIndex, DocumentSections, Section, Segmenter, segment};
pub use render::{Panel, results_html};
pub use router::{AnchorRouter, HashRouter, Router, RouterMode};
pub use search::{MatchResult, SearchOutcome, search};
pub use session::{SearchSession, initial_query};
pub use store::{
    BlobStore, Clock, FileStore, IndexStore, MemoryStore, Millis, StorageKeys, SystemClock,
};
