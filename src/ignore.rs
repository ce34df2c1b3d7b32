//! # Ignore Module
//!
//! Decides which files are left untouched. A file is ignored when its full
//! path ends with any configured suffix. Matching is a plain string suffix
//! comparison: there is no globbing and no directory-level exclusion, so
//! `".json"` ignores `src/data.json` and `"vendor/lib.go"` ignores exactly
//! paths ending that way.

use std::path::Path;

use tracing::trace;

/// Suffix-based ignore list.
///
/// # Examples
///
/// ```rust
/// use std::path::Path;
///
/// use reheader::ignore::SuffixIgnore;
///
/// let ignore = SuffixIgnore::new(vec![".pb.go".to_string(), "LICENSE".to_string()]);
/// assert!(ignore.is_ignored(Path::new("src/api.pb.go")));
/// assert!(ignore.is_ignored(Path::new("LICENSE")));
/// assert!(!ignore.is_ignored(Path::new("src/keys.go")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SuffixIgnore {
  suffixes: Vec<String>,
}

impl SuffixIgnore {
  pub const fn new(suffixes: Vec<String>) -> Self {
    Self { suffixes }
  }

  /// Adds more suffixes, skipping ones already present.
  pub fn extend<I>(&mut self, suffixes: I)
  where
    I: IntoIterator<Item = String>,
  {
    for suffix in suffixes {
      if !self.suffixes.contains(&suffix) {
        self.suffixes.push(suffix);
      }
    }
  }

  pub fn suffixes(&self) -> &[String] {
    &self.suffixes
  }

  pub fn is_empty(&self) -> bool {
    self.suffixes.is_empty()
  }

  /// Returns the first suffix that `path` ends with, if any.
  ///
  /// Non-UTF-8 path components are compared through their lossy rendering.
  pub fn matching_suffix(&self, path: &Path) -> Option<&str> {
    if self.suffixes.is_empty() {
      return None;
    }

    let path_str = path.to_string_lossy();
    let matched = self
      .suffixes
      .iter()
      .find(|suffix| path_str.ends_with(suffix.as_str()))
      .map(String::as_str);

    if let Some(suffix) = matched {
      trace!("{} matches ignored suffix {:?}", path.display(), suffix);
    }
    matched
  }

  pub fn is_ignored(&self, path: &Path) -> bool {
    self.matching_suffix(path).is_some()
  }
}
