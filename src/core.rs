//! Core logic of fbrowse, independent of any UI.
//!
//! - [fm]: entries and the directory enumeration collaborator ([DirEnumerator], [LocalFs]).
//! - [listing]: hidden-file filtering, classification and ordering of a directory's children.
//! - [paths]: resolving typed or configured paths to existing, canonical ones.
//! - [content]: content-type detection and the icon names derived from it.
//! - [theme]: icon theme detection and the freedesktop icon lookup.
//! - [icons]: the caching icon resolver.
//! - [proc]: opening files through the shell, or printing their path.
//! - [error]: the error type shared by the modules above.

pub mod content;
pub mod error;
pub mod fm;
pub mod icons;
pub mod listing;
pub mod paths;
pub mod proc;
pub mod theme;

pub use content::{ContentTypes, MimeIcons};
pub use error::Error;
pub use fm::{DirEnumerator, Entry, EntryKind, EntryTag, LocalFs, RawEntry};
pub use icons::{Icon, IconResolver};
pub use listing::{ExcludePatterns, KindFilter, Listing};
pub use paths::{canonicalize, expand_home_path, resolve_absolute};
pub use proc::{Launcher, Opener, PrintQueue, ShellLauncher};
pub use theme::{IconLookup, XdgIconLookup, detect_icon_theme};
