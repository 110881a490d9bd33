use crate::document::Document;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Load the full UTF-8 text of `path`.
pub fn load(path: &Path) -> Result<Document, StorageError> {
    let text = fs::read_to_string(path).map_err(|source| StorageError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "loaded document");
    Ok(Document::from(text))
}

/// Overwrite `path` with the Document.
///
/// The target must already exist; a missing file is a write error rather
/// than a fresh file.
pub fn store(path: &Path, document: &Document) -> Result<(), StorageError> {
    let write_err = |source| StorageError::Write {
        path: path.to_path_buf(),
        source,
    };

    fs::metadata(path).map_err(write_err)?;
    atomic_write(path, document.as_str().as_bytes()).map_err(write_err)?;

    // Bump mtime so dev-server watchers rebuild
    filetime::set_file_mtime(path, filetime::FileTime::now()).map_err(write_err)?;

    tracing::debug!(path = %path.display(), bytes = document.len(), "stored document");
    Ok(())
}

/// Atomic file write: tempfile + fsync + rename.
fn atomic_write(path: &Path, content: &[u8]) -> std::io::Result<()> {
    // Same directory keeps the rename on one filesystem
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;

    // Keep the original file's permissions on the replacement
    if let Ok(metadata) = fs::metadata(path) {
        temp.as_file().set_permissions(metadata.permissions())?;
    }

    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
