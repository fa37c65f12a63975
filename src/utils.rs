//! Miscellaneous utilities for fbrowse.
//!
//! - [cli]: command line parsing, help texts and config initialization.
//! - [helpers]: format string substitution and path display helpers.

pub mod cli;
pub mod helpers;

pub use helpers::{apply_format, get_home, join_path_components};
