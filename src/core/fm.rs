//! Directory entries and filesystem enumeration for fbrowse.
//!
//! Provides the [Entry] enum which is used throughout fbrowse, the raw
//! [RawEntry]/[EntryTag] pair produced by enumeration, and the [DirEnumerator]
//! collaborator with its local implementation [LocalFs].

use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[cfg(test)]
use mockall::automock;

/// Name used by the filesystem for the parent directory.
pub const PARENT_NAME: &str = "..";
/// Name used by the filesystem for the directory itself.
pub const SELF_NAME: &str = ".";

/// Classification of a listed entry, without its payload.
///
/// The declaration order is the listing order: `Up` first, then directories, then files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntryKind {
    Up,
    Directory,
    File,
}

/// A single classified child of the current directory.
///
/// `Up` carries nothing: its path is always `<current dir>/..`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Up,
    Directory { name: String, path: PathBuf },
    File { name: String, path: PathBuf },
}

impl Entry {
    /// Builds a directory or file entry from the OS name of a child of `dir`.
    pub fn child(kind: EntryKind, dir: &Path, name: &OsStr) -> Self {
        let path = dir.join(name);
        let name = name.to_string_lossy().into_owned();
        match kind {
            EntryKind::Up => Entry::Up,
            EntryKind::Directory => Entry::Directory { name, path },
            EntryKind::File => Entry::File { name, path },
        }
    }

    // Accessors

    #[inline]
    pub fn kind(&self) -> EntryKind {
        match self {
            Entry::Up => EntryKind::Up,
            Entry::Directory { .. } => EntryKind::Directory,
            Entry::File { .. } => EntryKind::File,
        }
    }

    /// The name used for sorting and matching. `Up` is always `..`.
    #[inline]
    pub fn name(&self) -> &str {
        match self {
            Entry::Up => PARENT_NAME,
            Entry::Directory { name, .. } | Entry::File { name, .. } => name,
        }
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        matches!(self, Entry::Up | Entry::Directory { .. })
    }

    /// Absolute path of the entry given the directory it was listed from.
    pub fn path_in(&self, dir: &Path) -> PathBuf {
        match self {
            Entry::Up => dir.join(PARENT_NAME),
            Entry::Directory { path, .. } | Entry::File { path, .. } => path.clone(),
        }
    }
}

/// Type tag reported by directory enumeration, before classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryTag {
    Regular,
    Directory,
    Symlink,
    /// The OS did not report a type. Classification has to stat the path.
    Unknown,
    /// Sockets, fifos, devices.
    Unsupported,
}

/// One child as reported by enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    name: OsString,
    tag: EntryTag,
}

impl RawEntry {
    pub fn new(name: impl Into<OsString>, tag: EntryTag) -> Self {
        RawEntry {
            name: name.into(),
            tag,
        }
    }

    #[inline]
    pub fn name(&self) -> &OsStr {
        &self.name
    }

    #[inline]
    pub fn tag(&self) -> EntryTag {
        self.tag
    }
}

/// Filesystem enumeration used by the listing.
#[cfg_attr(test, automock)]
pub trait DirEnumerator {
    /// Direct children of `dir`, in whatever order the OS returns them.
    fn read_children(&self, dir: &Path) -> io::Result<Vec<RawEntry>>;

    /// Type of `path` after following symlinks, or `None` if it does not exist.
    fn stat(&self, path: &Path) -> Option<EntryTag>;
}

/// [DirEnumerator] backed by `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFs;

impl DirEnumerator for LocalFs {
    fn read_children(&self, dir: &Path) -> io::Result<Vec<RawEntry>> {
        browse_dir(dir)
    }

    fn stat(&self, path: &Path) -> Option<EntryTag> {
        let md = fs::metadata(path).ok()?;
        Some(tag_of(&md.file_type()))
    }
}

fn tag_of(ft: &fs::FileType) -> EntryTag {
    if ft.is_symlink() {
        EntryTag::Symlink
    } else if ft.is_dir() {
        EntryTag::Directory
    } else if ft.is_file() {
        EntryTag::Regular
    } else {
        EntryTag::Unsupported
    }
}

/// Reads the contents of the provided directory.
///
/// `std::fs::read_dir` never yields `.` or `..`, so the parent entry is
/// synthesized first. Children whose type cannot be read are tagged
/// [EntryTag::Unknown] rather than dropped.
pub fn browse_dir(path: &Path) -> io::Result<Vec<RawEntry>> {
    let mut entries = Vec::with_capacity(64);
    let read = fs::read_dir(path)?;
    entries.push(RawEntry::new(PARENT_NAME, EntryTag::Directory));

    for entry in read {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue,
        };
        let tag = match entry.file_type() {
            Ok(ft) => tag_of(&ft),
            Err(_) => EntryTag::Unknown,
        };
        entries.push(RawEntry::new(entry.file_name(), tag));
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    #[test]
    fn entry_kind_order() {
        assert!(EntryKind::Up < EntryKind::Directory);
        assert!(EntryKind::Directory < EntryKind::File);
    }

    #[test]
    fn up_entry_path_is_derived() {
        let dir = Path::new("/srv/data");
        assert_eq!(Entry::Up.path_in(dir), PathBuf::from("/srv/data/.."));
        assert_eq!(Entry::Up.name(), "..");
        assert!(Entry::Up.is_dir());
    }

    #[test]
    fn child_entry_keeps_os_path() {
        let dir = Path::new("/tmp");
        let e = Entry::child(EntryKind::File, dir, OsStr::new("notes.txt"));
        assert_eq!(e.kind(), EntryKind::File);
        assert_eq!(e.name(), "notes.txt");
        assert_eq!(e.path_in(Path::new("/elsewhere")), PathBuf::from("/tmp/notes.txt"));
    }

    #[test]
    fn browse_dir_tags_children() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = TempDir::new()?;
        File::create(tmp.path().join("a.txt"))?;
        fs::create_dir(tmp.path().join("sub"))?;

        let entries = browse_dir(tmp.path())?;
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0], RawEntry::new("..", EntryTag::Directory));
        assert!(entries.contains(&RawEntry::new("a.txt", EntryTag::Regular)));
        assert!(entries.contains(&RawEntry::new("sub", EntryTag::Directory)));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn browse_dir_reports_symlinks() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = TempDir::new()?;
        fs::create_dir(tmp.path().join("real"))?;
        std::os::unix::fs::symlink(tmp.path().join("real"), tmp.path().join("link"))?;

        let entries = browse_dir(tmp.path())?;
        assert!(entries.contains(&RawEntry::new("link", EntryTag::Symlink)));
        assert_eq!(LocalFs.stat(&tmp.path().join("link")), Some(EntryTag::Directory));
        Ok(())
    }

    #[test]
    fn browse_nonexistent() {
        let result = browse_dir(Path::new("/path/does/not/exist"));
        assert!(result.is_err());
        assert_eq!(LocalFs.stat(Path::new("/path/does/not/exist")), None);
    }
}
