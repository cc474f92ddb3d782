//! ui
//!
//! Console output and logging.
//!
//! # Modules
//!
//! - [`output`] - Reply printing, timestamped log lines, verbosity
//!
//! # Design
//!
//! All console output goes through this module so the quiet and debug
//! flags behave the same in every command.

pub mod output;
