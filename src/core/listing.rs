//! Filtering, classification and sorting of directory listings.
//!
//! [Listing] turns the raw children reported by a [DirEnumerator] into the
//! ordered [Entry] sequence shown to the user. Listings are always flat: only
//! direct children of the directory are considered.

use crate::core::error::Error;
use crate::core::fm::{DirEnumerator, Entry, EntryKind, EntryTag, PARENT_NAME, RawEntry, SELF_NAME};

use ignore::gitignore::{Gitignore, GitignoreBuilder};

use std::cmp::Ordering;
use std::path::Path;

/// Which kinds of children a listing keeps. The `Up` entry is never filtered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KindFilter {
    #[default]
    All,
    DirsOnly,
    FilesOnly,
}

impl KindFilter {
    #[inline]
    fn keeps(self, kind: EntryKind) -> bool {
        match (self, kind) {
            (_, EntryKind::Up) => true,
            (KindFilter::All, _) => true,
            (KindFilter::DirsOnly, k) => k == EntryKind::Directory,
            (KindFilter::FilesOnly, k) => k == EntryKind::File,
        }
    }
}

/// Glob patterns, in gitignore syntax, whose matches are left out of listings.
///
/// Patterns are rooted at `/`: a pattern without a slash matches a child's name
/// in any directory, one with a slash matches its absolute path.
#[derive(Debug, Clone)]
pub struct ExcludePatterns {
    matcher: Gitignore,
}

impl Default for ExcludePatterns {
    fn default() -> Self {
        Self {
            matcher: Gitignore::empty(),
        }
    }
}

impl ExcludePatterns {
    /// Invalid patterns are logged and skipped.
    pub fn new(patterns: &[String]) -> Self {
        let mut builder = GitignoreBuilder::new("/");
        for pattern in patterns.iter().filter(|p| !p.trim().is_empty()) {
            if let Err(e) = builder.add_line(None, pattern) {
                tracing::warn!("ignoring exclude pattern '{pattern}': {e}");
            }
        }
        match builder.build() {
            Ok(matcher) => Self { matcher },
            Err(e) => {
                tracing::warn!("exclude patterns disabled: {e}");
                Self::default()
            }
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.matcher.is_empty()
    }

    fn excludes(&self, path: &Path, is_dir: bool) -> bool {
        self.matcher.matched(path, is_dir).is_ignore()
    }
}

/// Scans a directory and produces sorted entries.
pub struct Listing {
    fs: Box<dyn DirEnumerator>,
    filter: KindFilter,
    exclude: ExcludePatterns,
}

impl Listing {
    pub fn new(fs: Box<dyn DirEnumerator>, filter: KindFilter) -> Self {
        Self {
            fs,
            filter,
            exclude: ExcludePatterns::default(),
        }
    }

    /// Leave children matching `exclude` out of every listing. `..` is never excluded.
    pub fn with_exclude(mut self, exclude: ExcludePatterns) -> Self {
        self.exclude = exclude;
        self
    }

    /// Lists the direct children of `dir`.
    ///
    /// An unreadable directory yields an empty listing.
    pub fn reload(&self, dir: &Path, show_hidden: bool) -> Vec<Entry> {
        match self.scan(dir, show_hidden) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!("{e}");
                Vec::new()
            }
        }
    }

    /// Like [Listing::reload] but reports why a directory could not be read.
    pub fn scan(&self, dir: &Path, show_hidden: bool) -> Result<Vec<Entry>, Error> {
        let raw = self.fs.read_children(dir).map_err(|source| Error::Unreadable {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut entries: Vec<Entry> = raw
            .iter()
            .filter(|r| is_shown(r, show_hidden))
            .filter(|r| !self.is_excluded(dir, r))
            .filter_map(|r| self.classify(dir, r))
            .filter(|e| self.filter.keeps(e.kind()))
            .collect();

        sort_entries(&mut entries);
        Ok(entries)
    }

    fn is_excluded(&self, dir: &Path, raw: &RawEntry) -> bool {
        if self.exclude.is_empty() || raw.name() == PARENT_NAME {
            return false;
        }
        self.exclude
            .excludes(&dir.join(raw.name()), raw.tag() == EntryTag::Directory)
    }

    fn classify(&self, dir: &Path, raw: &RawEntry) -> Option<Entry> {
        if raw.name() == PARENT_NAME {
            return Some(Entry::Up);
        }

        let kind = match raw.tag() {
            EntryTag::Regular => EntryKind::File,
            EntryTag::Directory => EntryKind::Directory,
            EntryTag::Symlink => match self.fs.stat(&dir.join(raw.name())) {
                Some(EntryTag::Directory) => EntryKind::Directory,
                // broken links and links to anything else open as files
                _ => EntryKind::File,
            },
            EntryTag::Unknown => match self.fs.stat(&dir.join(raw.name())) {
                Some(EntryTag::Directory) => EntryKind::Directory,
                Some(EntryTag::Regular) => EntryKind::File,
                _ => return None,
            },
            EntryTag::Unsupported => return None,
        };
        Some(Entry::child(kind, dir, raw.name()))
    }
}

fn is_shown(raw: &RawEntry, show_hidden: bool) -> bool {
    let name = raw.name();
    if name == SELF_NAME {
        return false;
    }
    if name == PARENT_NAME {
        return true;
    }
    show_hidden || !name.as_encoded_bytes().starts_with(b".")
}

/// Listing order: kind first (`Up`, directories, files), then name by codepoint.
#[inline]
pub fn compare_entries(a: &Entry, b: &Entry) -> Ordering {
    a.kind().cmp(&b.kind()).then_with(|| a.name().cmp(b.name()))
}

/// Sorts entries in place. The sort is stable.
pub fn sort_entries(entries: &mut [Entry]) {
    entries.sort_by(compare_entries);
}
