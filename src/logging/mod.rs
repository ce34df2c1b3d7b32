//! # Logging Module
//!
//! Logging utilities for reheader:
//! - A global output mode (normal, quiet, verbose)
//! - Color handling through owo-colors
//! - The `tracing` subscriber used for diagnostics
//!
//! Verbose logs go to stderr and info logs go to stdout so that the path
//! listings printed by the tool stay pipeable.
//!
//! ## Example
//!
//! ```rust
//! use reheader::logging::{ColorMode, set_verbose};
//! use reheader::{info_log, verbose_log};
//!
//! set_verbose();
//! ColorMode::Never.apply();
//!
//! verbose_log!("Visiting: {}", "src/keys.go");
//! info_log!("Rewrote header in: {}", "src/keys.go");
//! ```

mod modes;

pub use modes::{ColorMode, init_tracing, is_quiet, is_verbose, set_quiet, set_verbose};
use owo_colors::{OwoColorize, Stream};

/// Logs a message to stderr if verbose mode is enabled.
///
/// Uses the same format string syntax as [`eprintln!`].
#[macro_export]
macro_rules! verbose_log {
    ($($arg:tt)*) => {
        if $crate::logging::is_verbose() {
            eprintln!($($arg)*);
        }
    };
}

/// Logs a message to stdout unless quiet mode is enabled.
///
/// Uses the same format string syntax as [`println!`].
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        if !$crate::logging::is_quiet() {
            $crate::logging::print_info_log(&format!($($arg)*));
        }
    };
}

/// Prints an info message in yellow when stdout supports colors.
///
/// Used by [`info_log!`]; call the macro instead.
pub fn print_info_log(message: &str) {
  println!("{}", message.if_supports_color(Stream::Stdout, |m| m.yellow()));
}
