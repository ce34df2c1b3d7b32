//! # File Collector Module
//!
//! Recursive enumeration of the files under the root directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{debug, trace};
use walkdir::WalkDir;

/// An entry produced by the directory walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkEntry {
  /// A regular file to consider for rewriting
  File(PathBuf),
  /// A symbolic link; the walk never descends through it
  Symlink(PathBuf),
}

impl WalkEntry {
  pub fn path(&self) -> &Path {
    match self {
      Self::File(path) | Self::Symlink(path) => path,
    }
  }
}

/// Walks a directory tree in a stable order.
pub struct FileCollector {
  root: PathBuf,
}

impl FileCollector {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  /// Collects every file and symlink under the root.
  ///
  /// Entries are sorted by file name within each directory. Paths are the root
  /// joined with the relative path, so a relative root yields relative paths.
  ///
  /// # Errors
  ///
  /// Fails on the first directory that cannot be read, or if the root is
  /// missing or not a directory.
  pub fn collect(&self) -> Result<Vec<WalkEntry>> {
    let metadata = std::fs::metadata(&self.root)
      .with_context(|| format!("Failed to read directory: {}", self.root.display()))?;
    if !metadata.is_dir() {
      bail!("Not a directory: {}", self.root.display());
    }

    debug!("Scanning directory: {}", self.root.display());
    let start_time = std::time::Instant::now();

    let mut entries = Vec::new();
    for entry in WalkDir::new(&self.root).follow_links(false).sort_by_file_name() {
      let entry = entry.with_context(|| format!("Failed to walk directory: {}", self.root.display()))?;
      let file_type = entry.file_type();

      if file_type.is_symlink() {
        trace!("Found symlink: {}", entry.path().display());
        entries.push(WalkEntry::Symlink(entry.into_path()));
      } else if file_type.is_file() {
        entries.push(WalkEntry::File(entry.into_path()));
      }
    }

    debug!(
      "Found {} entries in {}ms",
      entries.len(),
      start_time.elapsed().as_millis()
    );

    Ok(entries)
  }
}

#[cfg(test)]
mod tests {
  use std::fs;

  use tempfile::TempDir;

  use super::*;

  #[test]
  fn test_collect_is_recursive_and_sorted() {
    let dir = TempDir::new().expect("create temp dir");
    fs::create_dir_all(dir.path().join("b/nested")).expect("mkdir");
    fs::write(dir.path().join("c.txt"), "c").expect("write");
    fs::write(dir.path().join("a.txt"), "a").expect("write");
    fs::write(dir.path().join("b/nested/d.go"), "d").expect("write");

    let entries = FileCollector::new(dir.path()).collect().expect("collect");
    let relative: Vec<_> = entries
      .iter()
      .map(|e| e.path().strip_prefix(dir.path()).expect("under root").to_path_buf())
      .collect();

    assert_eq!(
      relative,
      vec![
        PathBuf::from("a.txt"),
        PathBuf::from("b/nested/d.go"),
        PathBuf::from("c.txt"),
      ]
    );
  }

  #[test]
  fn test_collect_empty_directory() {
    let dir = TempDir::new().expect("create temp dir");
    assert!(FileCollector::new(dir.path()).collect().expect("collect").is_empty());
  }

  #[test]
  fn test_collect_missing_root_fails() {
    let dir = TempDir::new().expect("create temp dir");
    let err = FileCollector::new(dir.path().join("nope")).collect().expect_err("should fail");
    assert!(err.to_string().contains("Failed to read directory"));
  }

  #[test]
  fn test_collect_file_root_fails() {
    let dir = TempDir::new().expect("create temp dir");
    let file = dir.path().join("a.txt");
    fs::write(&file, "a").expect("write");

    let err = FileCollector::new(&file).collect().expect_err("should fail");
    assert!(err.to_string().contains("Not a directory"));
  }

  #[cfg(unix)]
  #[test]
  fn test_collect_reports_symlinks_without_following() {
    let dir = TempDir::new().expect("create temp dir");
    fs::create_dir_all(dir.path().join("real")).expect("mkdir");
    fs::write(dir.path().join("real/a.txt"), "a").expect("write");
    std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("link")).expect("symlink");

    let entries = FileCollector::new(dir.path()).collect().expect("collect");

    assert_eq!(
      entries,
      vec![
        WalkEntry::Symlink(dir.path().join("link")),
        WalkEntry::File(dir.path().join("real/a.txt")),
      ]
    );
  }
}
