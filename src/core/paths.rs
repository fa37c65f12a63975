//! Path resolution for fbrowse.
//!
//! [resolve_absolute] decides which of two candidate paths a typed input
//! refers to, [canonicalize] produces the canonical form used as the current
//! directory, and [expand_home_path] applies `~` expansion to typed input.

use crate::core::error::Error;

use std::env;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Returns `input` unchanged if it exists as given, otherwise `current_dir.join(input)`
/// if that exists.
///
/// "As given" means relative to the process working directory for relative paths.
/// No canonicalization is performed.
pub fn resolve_absolute(input: &Path, current_dir: &Path) -> Result<PathBuf, Error> {
    if input.exists() {
        return Ok(input.to_path_buf());
    }

    let joined = current_dir.join(input);
    if joined.exists() {
        Ok(joined)
    } else {
        Err(Error::NotFound(input.to_path_buf()))
    }
}

/// Canonical absolute form of an existing path.
///
/// Symlinks and `.`/`..` are resolved by the OS. Should that fail (the path
/// vanished in between), a lexical normalization is returned instead.
pub fn canonicalize(path: &Path) -> PathBuf {
    match fs::canonicalize(path) {
        Ok(p) => p,
        Err(e) => {
            tracing::debug!("canonicalize {} failed: {e}", path.display());
            normalize_lexically(path)
        }
    }
}

/// Makes `path` absolute against the process working directory and folds `.`/`..`
/// without touching the filesystem.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };

    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // popping past the root is a no-op, like the kernel does
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Expands a leading `~` to the home directory.
///
/// `~user` forms are left as they are.
pub fn expand_home_path(input: &str) -> PathBuf {
    let rest = match input.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with(std::path::MAIN_SEPARATOR) => rest,
        _ => return PathBuf::from(input),
    };

    match dirs::home_dir() {
        Some(home) => {
            let rest = rest.trim_start_matches(std::path::MAIN_SEPARATOR);
            if rest.is_empty() { home } else { home.join(rest) }
        }
        None => PathBuf::from(input),
    }
}
