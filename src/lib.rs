//! # reheader
//!
//! Walks a directory tree and rewrites a copyright/license header onto every
//! file it finds.
//!
//! For each file that is not ignored, reheader reads the content and either
//! replaces an existing `/* ... */` header block or prepends the header
//! followed by a blank line. Detection is deliberately simple: a file of at
//! least four lines whose first three lines start with `/*`, ` *` and ` *` is
//! treated as already carrying a header.
//!
//! ## Usage as a Library
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use reheader::header::{HeaderText, HeaderWindow};
//! use reheader::ignore::SuffixIgnore;
//! use reheader::processor::{Processor, RewriteOptions};
//!
//! fn main() -> anyhow::Result<()> {
//!     let header = HeaderText::from_file(Path::new("HEADER.txt"))?.render("2023");
//!
//!     let processor = Processor::new(
//!         header,
//!         RewriteOptions {
//!             ignore: SuffixIgnore::new(vec![".json".to_string()]),
//!             window: HeaderWindow::Fixed(9),
//!             ..RewriteOptions::default()
//!         },
//!     );
//!
//!     for report in processor.process(Path::new("src"))? {
//!         println!("{}: {:?}", report.path.display(), report.action);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! * [`processor`] - The header rewriter and [`apply_header`]
//! * [`header`] - Header text and the header window policy
//! * [`ignore`] - Suffix-based ignore list
//! * [`config`] - `.reheader.toml` loading
//! * [`logging`] - Output modes and tracing setup
//!
//! [`apply_header`]: crate::processor::apply_header

pub mod cli;
pub mod config;
pub mod diff;
pub mod header;
pub mod ignore;
pub mod logging;
pub mod output;
pub mod processor;
pub mod report;

pub use processor::apply_header;
