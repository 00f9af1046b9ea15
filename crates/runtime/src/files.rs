//! File access used by the session.
//!
//! The session never touches `std::fs` directly so it can be driven entirely
//! in memory by tests.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, anyhow};

pub trait FileSystem {
    fn read(&self, path: &Path) -> Result<String>;

    /// Reads `path`, first writing `default` to it (parents included) when
    /// it does not exist.  Returns the content and whether it was created.
    fn read_or_create(&self, path: &Path, default: &str) -> Result<(String, bool)> {
        if self.exists(path) {
            return Ok((self.read(path)?, false));
        }
        if let Some(parent) = path.parent() {
            self.create_dir_all(parent)?;
        }
        self.write(path, default)?;
        Ok((default.to_string(), true))
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()>;

    fn append(&self, path: &Path, contents: &str) -> Result<()>;

    fn exists(&self, path: &Path) -> bool;

    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Keeps a copy of `path` next to it.  No-op by default.
    fn backup(&self, _path: &Path) -> Result<()> {
        Ok(())
    }
}

// ── Disk ──────────────────────────────────────────────────────────────────────

/// The real filesystem.  Writes are atomic.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFiles;

impl FileSystem for LocalFiles {
    fn read(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        notekeeper_store::atomic_write(path, contents)
    }

    fn append(&self, path: &Path, contents: &str) -> Result<()> {
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        file.write_all(contents.as_bytes())
            .with_context(|| format!("failed to append to {}", path.display()))?;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).with_context(|| format!("failed to create {}", path.display()))
    }

    fn backup(&self, path: &Path) -> Result<()> {
        if let Some(bak) = notekeeper_store::backup(path)? {
            tracing::debug!(backup = %bak.display(), "base backed up");
        }
        Ok(())
    }
}

// ── Memory ────────────────────────────────────────────────────────────────────

/// Shared in-memory file tree.  Clones see the same files, so a test can
/// keep a handle while the session owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryFiles {
    files: Arc<Mutex<BTreeMap<PathBuf, String>>>,
}

impl MemoryFiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        if let Ok(mut files) = self.files.lock() {
            files.insert(path.into(), contents.into());
        }
        self
    }

    /// Current content of `path`, if any.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.lock().ok()?.get(path.as_ref()).cloned()
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.files
            .lock()
            .map(|files| files.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn with_files<T>(&self, op: impl FnOnce(&mut BTreeMap<PathBuf, String>) -> T) -> Result<T> {
        let mut files = self
            .files
            .lock()
            .map_err(|_| anyhow!("in-memory file table poisoned"))?;
        Ok(op(&mut files))
    }
}

impl FileSystem for MemoryFiles {
    fn read(&self, path: &Path) -> Result<String> {
        self.with_files(|files| files.get(path).cloned())?
            .ok_or_else(|| anyhow!("no such file: {}", path.display()))
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        self.with_files(|files| {
            files.insert(path.to_path_buf(), contents.to_string());
        })
    }

    fn append(&self, path: &Path, contents: &str) -> Result<()> {
        self.with_files(|files| {
            files
                .entry(path.to_path_buf())
                .or_default()
                .push_str(contents);
        })
    }

    fn exists(&self, path: &Path) -> bool {
        self.with_files(|files| files.contains_key(path))
            .unwrap_or(false)
    }

    fn create_dir_all(&self, _path: &Path) -> Result<()> {
        Ok(())
    }
}
