//! Error taxonomy of the fbrowse core.
//!
//! None of these ever reach the end user. Each one has a local degradation:
//! - [Error::NotFound] leaves the session unchanged,
//! - [Error::Unreadable] yields an empty listing,
//! - [Error::DecodeFailure] moves on to the next icon candidate,
//! - [Error::ThemeDetectionFailure] falls back to the fixed fallback themes.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Neither the path as given nor the path joined onto the current directory exists.
    #[error("path not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The directory exists but could not be enumerated.
    #[error("cannot read directory {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An icon file was found but is corrupt or in an unsupported format.
    #[error("cannot decode icon {}: {reason}", path.display())]
    DecodeFailure { path: PathBuf, reason: String },

    #[error("could not determine an icon theme; set one with --theme or [display] themes")]
    ThemeDetectionFailure,
}
