//! Content-addressed result cache
//!
//! One pretty-printed JSON file per entry at
//! `<root>/<task>/<sha256("{task}:{mode}:{text}")>.json`, holding a single
//! `{ text: output }` pair. Caching is best-effort: every failure is logged
//! and reported as a miss, never as an error.

use crate::{ExecutionMode, Task};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Cache-layer failures, only ever logged
#[derive(Error, Debug)]
enum CacheError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed entry: {0}")]
    Json(#[from] serde_json::Error),

    #[error("entry does not hold exactly one string value")]
    Shape,

    #[error("entry belongs to a different text")]
    KeyMismatch,
}

/// Entry count and size of one task partition
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of entry files
    pub entries: usize,
    /// Total size of entry files in bytes
    pub bytes: u64,
}

/// Fingerprint-keyed store of worker outputs
#[derive(Debug, Clone)]
pub struct CacheStore {
    root: PathBuf,
}

impl CacheStore {
    /// Store rooted at `root`. Nothing is created until `prepare` or `store`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Cache root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Hex SHA-256 of `"{task}:{mode}:{text}"`
    pub fn fingerprint(task: Task, mode: ExecutionMode, text: &str) -> String {
        let digest = Sha256::digest(format!("{task}:{mode}:{text}").as_bytes());
        format!("{digest:x}")
    }

    /// Directory holding one task's entries
    pub fn partition(&self, task: Task) -> PathBuf {
        self.root.join(task.as_str())
    }

    /// File an entry lives in
    pub fn entry_path(&self, task: Task, mode: ExecutionMode, text: &str) -> PathBuf {
        self.partition(task)
            .join(format!("{}.json", Self::fingerprint(task, mode, text)))
    }

    /// Create the task partition
    pub fn prepare(&self, task: Task) -> std::io::Result<()> {
        fs::create_dir_all(self.partition(task))?;
        tracing::debug!(%task, root = %self.root.display(), "cache directory ready");
        Ok(())
    }

    /// Cached output for `(task, mode, text)`, if any
    pub fn lookup(&self, task: Task, mode: ExecutionMode, text: &str) -> Option<String> {
        let path = self.entry_path(task, mode, text);
        if !path.is_file() {
            return None;
        }
        match read_entry(&path, text) {
            Ok(output) => {
                tracing::debug!(%task, %mode, key = short_key(&path), "cache hit");
                Some(output)
            }
            Err(e) => {
                tracing::warn!(%task, path = %path.display(), "failed to load from cache: {e}");
                None
            }
        }
    }

    /// Record `output` for `(task, mode, text)`
    pub fn store(&self, task: Task, mode: ExecutionMode, text: &str, output: &str) {
        let path = self.entry_path(task, mode, text);
        match write_entry(&path, text, output) {
            Ok(()) => tracing::debug!(%task, %mode, key = short_key(&path), "cached result"),
            Err(e) => {
                tracing::warn!(%task, path = %path.display(), "failed to save to cache: {e}")
            }
        }
    }

    /// Remove and recreate the task partition
    pub fn clear(&self, task: Task) {
        let partition = self.partition(task);
        let result = match fs::remove_dir_all(&partition) {
            Ok(()) => fs::create_dir_all(&partition),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => fs::create_dir_all(&partition),
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => tracing::info!(%task, "cache cleared"),
            Err(e) => tracing::warn!(%task, "failed to clear cache: {e}"),
        }
    }

    /// Entry count and size for a task partition
    pub fn stats(&self, task: Task) -> CacheStats {
        let Ok(entries) = fs::read_dir(self.partition(task)) else {
            return CacheStats::default();
        };
        entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "json"))
            .filter_map(|entry| entry.metadata().ok())
            .fold(CacheStats::default(), |acc, meta| CacheStats {
                entries: acc.entries + 1,
                bytes: acc.bytes + meta.len(),
            })
    }
}

fn read_entry(path: &Path, text: &str) -> Result<String, CacheError> {
    let contents = fs::read_to_string(path)?;
    let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&contents)?;
    if map.len() != 1 {
        return Err(CacheError::Shape);
    }
    let (key, value) = map.into_iter().next().ok_or(CacheError::Shape)?;
    if key != text {
        return Err(CacheError::KeyMismatch);
    }
    match value {
        serde_json::Value::String(output) => Ok(output),
        _ => Err(CacheError::Shape),
    }
}

fn write_entry(path: &Path, text: &str, output: &str) -> Result<(), CacheError> {
    let dir = path.parent().ok_or(CacheError::Shape)?;
    fs::create_dir_all(dir)?;

    let mut entry = serde_json::Map::new();
    entry.insert(text.to_string(), serde_json::Value::String(output.to_string()));
    let json = serde_json::to_string_pretty(&entry)?;

    // Readers never see a half-written entry
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(json.as_bytes())?;
    tmp.persist(path).map_err(|e| CacheError::Io(e.error))?;
    Ok(())
}

fn short_key(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().chars().take(8).collect())
        .unwrap_or_default()
}
