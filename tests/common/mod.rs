#![allow(dead_code)]

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Nine-line block header in the `/*`, ` *`, ` *` shape the rewriter detects.
pub const NINE_LINE_HEADER: &str = concat!(
  "/*\n",
  " * This file is part of OpenMonero's Go library monero.go\n",
  " *\n",
  " * Copyright (c) 2023 OpenMonero\n",
  " * All Rights Reserved.\n",
  " * The code is distributed under MIT license, see LICENSE file for details.\n",
  " * Generated by OpenMonero on 03-07-2023.\n",
  " *\n",
  " */\n",
);

/// Line-comment header the rewriter does not recognize as a header block.
pub const LINE_COMMENT_HEADER: &str = "// Copyright (c) 2023 OpenMonero\n// All Rights Reserved.\n";

/// Writes `content` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, content: &str) -> Result<()> {
  let path = root.join(relative);
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
  }
  fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))
}

/// Reads `root/relative` as UTF-8.
pub fn read_file(root: &Path, relative: &str) -> Result<String> {
  let path = root.join(relative);
  fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Twelve-line Go file whose first nine lines form an old header.
pub fn go_file_with_old_header() -> String {
  concat!(
    "/*\n",
    " * x\n",
    " * y\n",
    " * Copyright (c) 2021 Someone Else\n",
    " *\n",
    " *\n",
    " *\n",
    " *\n",
    " */\n",
    "package monero\n",
    "\n",
    "func Keys() {}\n",
  )
  .to_string()
}
