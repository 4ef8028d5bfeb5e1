use chrono::{DateTime, Utc};
use contracts::dashboards::d500_sales_dashboard::dto::DatasetInfo;
use contracts::domain::order_record::OrderRecord;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::loader::{self, LoadOptions, ParseError};

/// Identity of a loaded dataset: where it came from and what it contained
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatasetKey {
    pub path: PathBuf,
    /// SHA-256 of the raw file, lowercase hex
    pub content_hash: String,
}

/// Read-only handle to a fully parsed order file.
///
/// Cloning the records is never needed: filter engines borrow them through
/// the shared `Arc`.
#[derive(Debug)]
pub struct Dataset {
    key: DatasetKey,
    records: Arc<[OrderRecord]>,
    loaded_at: DateTime<Utc>,
}

impl Dataset {
    /// Read, hash and parse the file at `path`
    pub fn load(path: &Path, options: &LoadOptions) -> Result<Self, ParseError> {
        let bytes = loader::read_file(path)?;
        let records = loader::parse_bytes(&bytes, options)?;

        Ok(Self {
            key: DatasetKey {
                path: path.to_path_buf(),
                content_hash: content_hash(&bytes),
            },
            records: records.into(),
            loaded_at: Utc::now(),
        })
    }

    /// Dataset built from records already in memory
    pub fn from_records(name: &str, records: Vec<OrderRecord>) -> Self {
        Self {
            key: DatasetKey {
                path: PathBuf::from(name),
                content_hash: String::new(),
            },
            records: records.into(),
            loaded_at: Utc::now(),
        }
    }

    pub fn key(&self) -> &DatasetKey {
        &self.key
    }

    pub fn records(&self) -> &[OrderRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn info(&self) -> DatasetInfo {
        DatasetInfo {
            path: self.key.path.display().to_string(),
            content_hash: self.key.content_hash.clone(),
            rows: self.len(),
            loaded_at: self.loaded_at,
        }
    }
}

pub fn content_hash(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Parsed datasets keyed by (canonical) path.
///
/// Entries live until the owner calls [`DatasetCache::invalidate`] or
/// [`DatasetCache::clear`]; the cache never re-reads a file on its own.
#[derive(Debug)]
pub struct DatasetCache {
    options: LoadOptions,
    entries: HashMap<PathBuf, Arc<Dataset>>,
}

impl DatasetCache {
    pub fn new(options: LoadOptions) -> Self {
        Self {
            options,
            entries: HashMap::new(),
        }
    }

    /// Cached handle for `path`, loading the file on a miss
    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<Dataset>, ParseError> {
        let key = normalize(path);
        if let Some(dataset) = self.entries.get(&key) {
            tracing::debug!("Dataset: cache hit for {}", key.display());
            return Ok(Arc::clone(dataset));
        }

        let started = std::time::Instant::now();
        let dataset = Arc::new(Dataset::load(&key, &self.options)?);
        tracing::info!(
            "Dataset: loaded {} rows from {} in {}ms",
            dataset.len(),
            key.display(),
            started.elapsed().as_millis()
        );
        self.entries.insert(key, Arc::clone(&dataset));
        Ok(dataset)
    }

    pub fn get(&self, path: &Path) -> Option<Arc<Dataset>> {
        self.entries.get(&normalize(path)).cloned()
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// Store an already loaded dataset, replacing any entry for the same path
    pub fn insert(&mut self, dataset: Dataset) -> Arc<Dataset> {
        let dataset = Arc::new(dataset);
        self.entries
            .insert(normalize(&dataset.key().path), Arc::clone(&dataset));
        dataset
    }

    /// Drop the entry for `path`; returns whether one existed
    pub fn invalidate(&mut self, path: &Path) -> bool {
        self.entries.remove(&normalize(path)).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the file changed since it was cached. Uncached paths are stale.
    pub fn is_stale(&self, path: &Path) -> Result<bool, ParseError> {
        let key = normalize(path);
        let Some(dataset) = self.entries.get(&key) else {
            return Ok(true);
        };
        let bytes = loader::read_file(&key)?;
        Ok(content_hash(&bytes) != dataset.key().content_hash)
    }
}

fn normalize(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
