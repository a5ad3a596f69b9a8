//! Named-object persistence used to memoize parsed ground truth.
//!
//! Blobs are keyed by a short name (`gt`, `order`, ...). A missing blob is
//! reported as `Ok(None)` so callers can recompute; unreadable or corrupt
//! blobs are errors and are never silently replaced.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Cache key for raw dense label sequences.
pub const GT_KEY: &str = "gt";
/// Cache key for raw segment lists.
pub const ORDER_KEY: &str = "order";
/// Cache key for videos left out of `gt`/`order` because of unknown labels.
pub const SKIPPED_KEY: &str = "skipped";
/// Cache key for boundary-smoothed dense label sequences.
pub const GT_WO_ZEROS_KEY: &str = "gt_wo_zeros";
/// Cache key for boundary-smoothed segment lists.
pub const ORDER_WO_ZEROS_KEY: &str = "order_wo_zeros";

const BLOB_EXTENSION: &str = "json";

/// Errors raised by [`ObjectCache`] implementations.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Failed to create the cache directory.
    #[error("Failed to create cache directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to read an existing blob.
    #[error("Failed to read cache blob {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to write a blob.
    #[error("Failed to write cache blob {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A stored blob did not deserialize into the requested type.
    #[error("Corrupt cache blob {name:?}: {source}")]
    Decode {
        name: String,
        source: serde_json::Error,
    },
    /// A value could not be serialized.
    #[error("Failed to encode cache blob {name:?}: {source}")]
    Encode {
        name: String,
        source: serde_json::Error,
    },
}

/// Key-value persistence for serializable objects.
pub trait ObjectCache {
    /// Load the object stored under `name`, or `None` if nothing is stored.
    fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, CacheError>;

    /// Store `value` under `name`, replacing any previous blob.
    fn save<T: Serialize>(&self, value: &T, name: &str) -> Result<(), CacheError>;
}

/// Cache storing each object as `<dir>/<name>.json`.
#[derive(Debug, Clone)]
pub struct DirCache {
    dir: PathBuf,
}

impl DirCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File path that backs `name`.
    pub fn blob_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.{BLOB_EXTENSION}"))
    }
}

impl ObjectCache for DirCache {
    fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, CacheError> {
        let path = self.blob_path(name);
        if !path.is_file() {
            tracing::debug!("Cache miss for {name:?} at {}", path.display());
            return Ok(None);
        }
        let bytes = std::fs::read(&path).map_err(|source| CacheError::Read {
            path: path.clone(),
            source,
        })?;
        let value = serde_json::from_slice(&bytes).map_err(|source| CacheError::Decode {
            name: name.to_string(),
            source,
        })?;
        tracing::debug!("Cache hit for {name:?} at {}", path.display());
        Ok(Some(value))
    }

    fn save<T: Serialize>(&self, value: &T, name: &str) -> Result<(), CacheError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| CacheError::CreateDir {
            path: self.dir.clone(),
            source,
        })?;
        let bytes = serde_json::to_vec(value).map_err(|source| CacheError::Encode {
            name: name.to_string(),
            source,
        })?;
        let path = self.blob_path(name);
        std::fs::write(&path, bytes).map_err(|source| CacheError::Write { path, source })
    }
}

/// In-process cache with the same semantics as [`DirCache`].
#[derive(Debug, Default)]
pub struct MemoryCache {
    blobs: RefCell<BTreeMap<String, String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a blob is stored under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.blobs.borrow().contains_key(name)
    }

    /// Store raw text under `name`, bypassing serialization.
    pub fn insert_raw(&self, name: &str, text: impl Into<String>) {
        self.blobs.borrow_mut().insert(name.to_string(), text.into());
    }
}

impl ObjectCache for MemoryCache {
    fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, CacheError> {
        let blobs = self.blobs.borrow();
        let Some(text) = blobs.get(name) else {
            return Ok(None);
        };
        serde_json::from_str(text)
            .map(Some)
            .map_err(|source| CacheError::Decode {
                name: name.to_string(),
                source,
            })
    }

    fn save<T: Serialize>(&self, value: &T, name: &str) -> Result<(), CacheError> {
        let text = serde_json::to_string(value).map_err(|source| CacheError::Encode {
            name: name.to_string(),
            source,
        })?;
        self.blobs.borrow_mut().insert(name.to_string(), text);
        Ok(())
    }
}
