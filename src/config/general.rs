//! The general configuration settings for fbrowse.
//!
//! [General] is deserialized from the `[general]` table of fbrowse.toml and
//! processed into [InternalGeneral], which resolves the start directory and
//! folds the `only_dirs`/`only_files` switches into a single [KindFilter].
//! `exclude` holds gitignore-style glob patterns for entries left out of listings.

use crate::core::listing::KindFilter;
use crate::core::paths::expand_home_path;

use serde::Deserialize;

use std::path::PathBuf;

/// Listings are flat; any other depth is accepted and ignored.
pub const DEFAULT_DEPTH: u32 = 1;

#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct General {
    dir: Option<String>,
    show_hidden: bool,
    depth: u32,
    only_dirs: bool,
    only_files: bool,
    exclude: Vec<String>,
    mode_keys: bool,
}

impl Default for General {
    fn default() -> Self {
        General {
            dir: None,
            show_hidden: false,
            depth: DEFAULT_DEPTH,
            only_dirs: false,
            only_files: false,
            exclude: Vec::new(),
            mode_keys: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct InternalGeneral {
    dir: Option<PathBuf>,
    show_hidden: bool,
    depth: u32,
    filter: KindFilter,
    exclude: Vec<String>,
    mode_keys: bool,
}

impl From<General> for InternalGeneral {
    fn from(g: General) -> Self {
        Self {
            dir: g.dir.as_deref().map(expand_home_path),
            show_hidden: g.show_hidden,
            depth: g.depth,
            filter: kind_filter(g.only_dirs, g.only_files),
            exclude: g.exclude,
            mode_keys: g.mode_keys,
        }
    }
}

impl InternalGeneral {
    #[inline]
    pub fn dir(&self) -> Option<&PathBuf> {
        self.dir.as_ref()
    }

    #[inline]
    pub fn show_hidden(&self) -> bool {
        self.show_hidden
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[inline]
    pub fn filter(&self) -> KindFilter {
        self.filter
    }

    #[inline]
    pub fn exclude(&self) -> &[String] {
        &self.exclude
    }

    #[inline]
    pub fn mode_keys(&self) -> bool {
        self.mode_keys
    }

    // Setters used by command line overrides

    pub(crate) fn set_dir(&mut self, dir: PathBuf) {
        self.dir = Some(dir);
    }

    pub(crate) fn set_show_hidden(&mut self, show: bool) {
        self.show_hidden = show;
    }

    pub(crate) fn set_depth(&mut self, depth: u32) {
        self.depth = depth;
    }

    pub(crate) fn set_filter(&mut self, filter: KindFilter) {
        self.filter = filter;
    }

    pub(crate) fn add_exclude(&mut self, patterns: impl IntoIterator<Item = String>) {
        self.exclude.extend(patterns);
    }

    pub(crate) fn set_mode_keys(&mut self, enabled: bool) {
        self.mode_keys = enabled;
    }
}

/// Combine the two kind switches. Setting both is contradictory and keeps everything.
pub fn kind_filter(only_dirs: bool, only_files: bool) -> KindFilter {
    match (only_dirs, only_files) {
        (true, false) => KindFilter::DirsOnly,
        (false, true) => KindFilter::FilesOnly,
        (true, true) => {
            tracing::warn!("only_dirs and only_files are both set; showing all entries");
            KindFilter::All
        }
        (false, false) => KindFilter::All,
    }
}
