//! Persisted search index with time-based expiry.
//!
//! The index lives in a string key-value [`BlobStore`] under two keys: the
//! expiry timestamp and the JSON-encoded [`DocumentIndex`]. Keys can be
//! scoped by a namespace and a path prefix so independent documentation
//! subtrees keep independent index lifetimes.

use crate::error::Error;
use crate::index::{DocumentIndex, DocumentSections, Section};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// Base key of the expiry timestamp.
pub const EXPIRE_KEY: &str = "docsify.search.expires";

/// Base key of the serialized index.
pub const INDEX_KEY: &str = "docsify.search.index";

/// Milliseconds since the Unix epoch.
pub type Millis = u64;

/// Source of the current time.
pub trait Clock {
    fn now_millis(&self) -> Millis;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> Millis {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as Millis)
            .unwrap_or_default()
    }
}

/// Persistent string key-value storage.
pub trait BlobStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<(), Error>;
}

/// Volatile in-memory blob store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), Error> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Blob store backed by a single JSON object file.
///
/// The file is read once on open and rewritten on every `set`.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`. A missing or unreadable file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable store at {}: {}", path.display(), e);
                HashMap::new()
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                tracing::warn!("Failed to read store at {}: {}", path.display(), e);
                HashMap::new()
            }
        };
        Self { path, values }
    }

    /// Default location: `<cache dir>/docsify-search/storage.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::cache_dir().map(|dir| dir.join("docsify-search").join("storage.json"))
    }

    fn flush(&self) -> Result<(), Error> {
        let storage_error = |source| Error::Storage {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(storage_error)?;
        }
        let content = serde_json::to_string(&self.values)?;
        std::fs::write(&self.path, content).map_err(storage_error)
    }
}

impl BlobStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), Error> {
        self.values.insert(key.to_string(), value);
        self.flush()
    }
}

/// The pair of blob keys one index lifetime is stored under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub expires: String,
    pub index: String,
}

impl StorageKeys {
    /// Keys `<base>[/namespace]<scope>`, where `scope` is a path prefix such as
    /// `/en` (or empty).
    pub fn new(namespace: Option<&str>, scope: &str) -> Self {
        let qualify = |base: &str| match namespace {
            Some(ns) => format!("{}/{}{}", base, ns, scope),
            None => format!("{}{}", base, scope),
        };
        Self {
            expires: qualify(EXPIRE_KEY),
            index: qualify(INDEX_KEY),
        }
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::new(None, "")
    }
}

/// In-memory document index plus its persistence.
#[derive(Debug)]
pub struct IndexStore<S> {
    blobs: S,
    documents: DocumentIndex,
}

impl<S: BlobStore> IndexStore<S> {
    /// Create an empty store over `blobs`. Call [`load`](Self::load) to read
    /// a persisted index.
    pub fn new(blobs: S) -> Self {
        Self {
            blobs,
            documents: DocumentIndex::new(),
        }
    }

    /// Replace the in-memory index with the one persisted under `keys`.
    ///
    /// Returns whether the persisted index is expired: its expiry is missing,
    /// unparseable, or not after `now`. An expired or undecodable index
    /// leaves the in-memory index empty.
    pub fn load(&mut self, keys: &StorageKeys, now: Millis) -> bool {
        let expires_at = self
            .blobs
            .get(&keys.expires)
            .and_then(|value| value.trim().parse::<Millis>().ok());
        let expired = expires_at.is_none_or(|at| at <= now);

        self.documents = if expired {
            DocumentIndex::new()
        } else {
            self.decode(&keys.index)
        };

        tracing::debug!(
            "Loaded search index '{}': {} documents, expired: {}",
            keys.index,
            self.documents.len(),
            expired
        );
        expired
    }

    fn decode(&self, key: &str) -> DocumentIndex {
        let Some(blob) = self.blobs.get(key) else {
            return DocumentIndex::new();
        };
        serde_json::from_str(&blob).unwrap_or_else(|e| {
            tracing::warn!("Discarding undecodable search index '{}': {}", key, e);
            DocumentIndex::new()
        })
    }

    /// Replace the sections of `path` wholesale.
    pub fn merge_document(&mut self, path: impl Into<String>, sections: DocumentSections) {
        self.documents.insert(path.into(), sections);
    }

    /// Persist the in-memory index under `keys`, valid until `now + max_age`.
    pub fn commit(&mut self, keys: &StorageKeys, max_age: Millis, now: Millis) -> Result<(), Error> {
        let blob = serde_json::to_string(&self.documents)?;
        let expires_at = now.saturating_add(max_age);
        // Expiry last: a failed index write leaves the stored index expired.
        self.blobs.set(&keys.index, blob)?;
        self.blobs.set(&keys.expires, expires_at.to_string())?;
        tracing::info!(
            "Committed search index '{}': {} documents, expires at {}",
            keys.index,
            self.documents.len(),
            expires_at
        );
        Ok(())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.documents.contains_key(path)
    }

    pub fn documents(&self) -> &DocumentIndex {
        &self.documents
    }

    /// Every section of every document.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.documents.values().flat_map(DocumentSections::iter)
    }

    pub fn blobs(&self) -> &S {
        &self.blobs
    }

    /// Tear down the store, returning the underlying blob store.
    pub fn into_blobs(self) -> S {
        self.blobs
    }
}
