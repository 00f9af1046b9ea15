use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// The base file on disk.
#[derive(Debug, Clone)]
pub struct BaseFile {
    path: PathBuf,
}

impl BaseFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the file, creating it empty (parents included) when missing.
    pub fn read_or_create(&self) -> Result<String> {
        if !self.path.exists() {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            fs::write(&self.path, "")
                .with_context(|| format!("failed to create {}", self.path.display()))?;
            tracing::info!(path = %self.path.display(), "created empty base file");
            return Ok(String::new());
        }
        fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))
    }

    pub fn overwrite(&self, contents: &str) -> Result<()> {
        atomic_write(&self.path, contents)
    }

    pub fn backup(&self) -> Result<Option<PathBuf>> {
        backup(&self.path)
    }
}

/// Replaces `path` with `contents` without ever leaving a half-written file.
///
/// The text goes to a `.tmp` sibling first, is synced, then renamed over the
/// target.  The temporary file is removed on any error.
pub fn atomic_write(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let tmp_path = sibling(path, "tmp");
    if let Err(err) = write_synced(&tmp_path, contents) {
        let _ = fs::remove_file(&tmp_path);
        return Err(err).with_context(|| format!("failed to write {}", tmp_path.display()));
    }

    if let Err(err) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(err).with_context(|| format!("failed to replace {}", path.display()));
    }
    Ok(())
}

fn write_synced(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()
}

/// Copies `path` to a `.bak` sibling.  No-op when the file does not exist.
pub fn backup(path: &Path) -> Result<Option<PathBuf>> {
    if !path.exists() {
        return Ok(None);
    }
    let bak_path = sibling(path, "bak");
    fs::copy(path, &bak_path)
        .with_context(|| format!("failed to back up {}", path.display()))?;
    Ok(Some(bak_path))
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "base.txt".to_string());
    path.with_file_name(format!("{filename}.{suffix}"))
}
