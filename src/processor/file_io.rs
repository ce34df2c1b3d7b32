//! # File I/O Module
//!
//! Reading and writing of the files being rewritten. Every handle is scoped to
//! a single call: files are opened, fully consumed or fully written, and
//! closed before the next file is touched.

use std::fs;
use std::io::Write as _;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tempfile::NamedTempFile;
use tracing::trace;

/// How rewritten content reaches the disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
  /// Write a temporary file next to the target and rename it into place.
  #[default]
  Atomic,
  /// Truncate and overwrite the target directly.
  InPlace,
}

/// File I/O operations for the processor.
pub struct FileIO;

impl FileIO {
  /// Reads the complete file as UTF-8 text.
  ///
  /// # Errors
  ///
  /// Fails if the file cannot be opened or read, or is not valid UTF-8.
  pub fn read_full_content(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))
  }

  /// Writes `content` to `path` using the requested mode.
  ///
  /// # Errors
  ///
  /// A read-only file is refused in both modes, even though a rename would
  /// only need write access to the directory.
  pub fn write_file(path: &Path, content: &str, mode: WriteMode) -> Result<()> {
    Self::ensure_writable(path)?;
    match mode {
      WriteMode::Atomic => Self::write_atomic(path, content),
      WriteMode::InPlace => Self::write_in_place(path, content),
    }
  }

  fn ensure_writable(path: &Path) -> Result<()> {
    let metadata = fs::metadata(path).with_context(|| format!("Failed to stat file: {}", path.display()))?;
    if metadata.permissions().readonly() {
      bail!("Permission denied: {} is read-only", path.display());
    }
    Ok(())
  }

  /// Overwrites the file directly. A crash mid-write can leave it truncated.
  pub fn write_in_place(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).with_context(|| format!("Failed to write file: {}", path.display()))
  }

  /// Replaces the file through a temporary sibling and a rename.
  ///
  /// The temporary file lives in the same directory so the rename stays on one
  /// filesystem. Permissions of the existing file are carried over. If any
  /// step fails the original file is left untouched and the temporary file is
  /// removed.
  pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let parent = match path.parent() {
      Some(parent) if !parent.as_os_str().is_empty() => parent,
      _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(parent)
      .with_context(|| format!("Failed to create temporary file in {}", parent.display()))?;
    trace!("Writing {} via {}", path.display(), temp.path().display());

    temp
      .write_all(content.as_bytes())
      .with_context(|| format!("Failed to write temporary file for {}", path.display()))?;

    if let Ok(metadata) = fs::metadata(path) {
      fs::set_permissions(temp.path(), metadata.permissions())
        .with_context(|| format!("Failed to copy permissions of {}", path.display()))?;
    }

    temp
      .as_file()
      .sync_all()
      .with_context(|| format!("Failed to sync temporary file for {}", path.display()))?;

    temp
      .persist(path)
      .map_err(|e| e.error)
      .with_context(|| format!("Failed to replace file: {}", path.display()))?;

    Ok(())
  }
}
