//! Content-type detection and themed icon names.
//!
//! The [ContentTypes] collaborator maps a path to the icon names a desktop
//! would use for it, most specific first. [MimeIcons] is the local
//! implementation: a static extension table gives the MIME type (with byte
//! sniffing for files the table does not know), and icon
//! names follow the freedesktop naming convention (`text/x-rust` becomes
//! `text-x-rust`, with `text-x-generic` as the generic fallback).

use std::fs;
use std::io;
use std::path::Path;

use phf::phf_map;

#[cfg(test)]
use mockall::automock;

/// Icon names for a directory.
const DIRECTORY_ICONS: &[&str] = &["inode-directory", "folder"];

const MIME_EXECUTABLE: &str = "application/x-executable";
const MIME_ZEROSIZE: &str = "application/x-zerosize";
const MIME_UNKNOWN: &str = "application/octet-stream";

/// File extension to MIME type mapping.
/// Lookup is done on the lowercased extension.
static EXT_MIME_MAP: phf::Map<&'static str, &'static str> = phf_map! {
    "rs" => "text/x-rust",
    "py" => "text/x-python",
    "js" => "application/javascript",
    "ts" => "text/x-typescript",
    "md" => "text/markdown",
    "html" => "text/html",
    "htm" => "text/html",
    "css" => "text/css",
    "json" => "application/json",
    "xml" => "application/xml",
    "sh" => "application/x-shellscript",
    "bash" => "application/x-shellscript",
    "go" => "text/x-go",
    "java" => "text/x-java",
    "c" => "text/x-csrc",
    "h" => "text/x-chdr",
    "cpp" => "text/x-c++src",
    "hpp" => "text/x-c++hdr",
    "php" => "application/x-php",
    "rb" => "application/x-ruby",
    "lua" => "text/x-lua",
    "sql" => "application/sql",
    "txt" => "text/plain",
    "log" => "text/x-log",
    "csv" => "text/csv",
    "ini" => "text/plain",
    "cfg" => "text/plain",
    "toml" => "application/toml",
    "yml" => "application/x-yaml",
    "yaml" => "application/x-yaml",
    "patch" => "text/x-patch",
    "diff" => "text/x-patch",
    "png" => "image/png",
    "jpg" => "image/jpeg",
    "jpeg" => "image/jpeg",
    "gif" => "image/gif",
    "webp" => "image/webp",
    "bmp" => "image/bmp",
    "svg" => "image/svg+xml",
    "ico" => "image/vnd.microsoft.icon",
    "psd" => "image/vnd.adobe.photoshop",
    "mp3" => "audio/mpeg",
    "ogg" => "audio/x-vorbis+ogg",
    "flac" => "audio/flac",
    "wav" => "audio/x-wav",
    "mp4" => "video/mp4",
    "mkv" => "video/x-matroska",
    "webm" => "video/webm",
    "avi" => "video/x-msvideo",
    "pdf" => "application/pdf",
    "doc" => "application/msword",
    "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "xls" => "application/vnd.ms-excel",
    "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "ppt" => "application/vnd.ms-powerpoint",
    "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    "odt" => "application/vnd.oasis.opendocument.text",
    "ods" => "application/vnd.oasis.opendocument.spreadsheet",
    "zip" => "application/zip",
    "tar" => "application/x-tar",
    "gz" => "application/gzip",
    "xz" => "application/x-xz",
    "zst" => "application/zstd",
    "7z" => "application/x-7z-compressed",
    "deb" => "application/vnd.debian.binary-package",
    "rpm" => "application/x-rpm",
    "iso" => "application/x-cd-image",
    "appimage" => "application/x-iso9660-appimage",
    "desktop" => "application/x-desktop",
    "ttf" => "font/ttf",
    "otf" => "font/otf",
};

/// Generic icons that do not follow the `<media>-x-generic` pattern.
static GENERIC_ICON_MAP: phf::Map<&'static str, &'static str> = phf_map! {
    "application/x-shellscript" => "text-x-script",
    "application/x-executable" => "application-x-executable",
    "application/x-php" => "text-x-script",
    "application/x-ruby" => "text-x-script",
    "application/javascript" => "text-x-script",
    "application/json" => "text-x-generic",
    "application/xml" => "text-x-generic",
    "application/toml" => "text-x-generic",
    "application/x-yaml" => "text-x-generic",
    "application/sql" => "text-x-generic",
    "application/pdf" => "x-office-document",
    "application/msword" => "x-office-document",
    "application/vnd.oasis.opendocument.text" => "x-office-document",
    "application/vnd.ms-excel" => "x-office-spreadsheet",
    "application/vnd.oasis.opendocument.spreadsheet" => "x-office-spreadsheet",
    "application/vnd.ms-powerpoint" => "x-office-presentation",
    "application/zip" => "package-x-generic",
    "application/x-tar" => "package-x-generic",
    "application/gzip" => "package-x-generic",
    "application/x-xz" => "package-x-generic",
    "application/zstd" => "package-x-generic",
    "application/x-7z-compressed" => "package-x-generic",
    "application/vnd.debian.binary-package" => "package-x-generic",
    "application/x-rpm" => "package-x-generic",
    "font/ttf" => "font-x-generic",
    "font/otf" => "font-x-generic",
};

/// Content-type queries used by the icon resolver.
#[cfg_attr(test, automock)]
pub trait ContentTypes {
    /// Themed icon names for the file at `path`, most specific first.
    fn icon_names(&self, path: &Path) -> io::Result<Vec<String>>;
}

/// [ContentTypes] from file metadata and the static extension table.
#[derive(Debug, Default, Clone, Copy)]
pub struct MimeIcons;

impl ContentTypes for MimeIcons {
    fn icon_names(&self, path: &Path) -> io::Result<Vec<String>> {
        let md = fs::metadata(path)?;
        if md.is_dir() {
            return Ok(DIRECTORY_ICONS.iter().map(|s| s.to_string()).collect());
        }

        let mime = mime_for(path, &md);
        Ok(icon_names_for_mime(mime))
    }
}

/// Best-effort MIME type of a non-directory path.
///
/// The extension table wins; otherwise the leading bytes are sniffed.
pub fn mime_for(path: &Path, md: &fs::Metadata) -> &'static str {
    let by_ext = path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(|ext| EXT_MIME_MAP.get(ext.to_ascii_lowercase().as_str()).copied());
    if let Some(mime) = by_ext {
        return mime;
    }

    if md.is_file()
        && md.len() > 0
        && let Ok(Some(kind)) = infer::get_from_path(path)
    {
        return kind.mime_type();
    }

    if is_executable(md) {
        MIME_EXECUTABLE
    } else if md.len() == 0 {
        MIME_ZEROSIZE
    } else {
        MIME_UNKNOWN
    }
}

/// `type/sub-type` becomes `["type-sub-type", <generic icon>]`.
pub fn icon_names_for_mime(mime: &str) -> Vec<String> {
    let specific = mime.replace('/', "-");
    let generic = match GENERIC_ICON_MAP.get(mime) {
        Some(icon) => icon.to_string(),
        None => {
            let media = mime.split('/').next().unwrap_or("application");
            format!("{media}-x-generic")
        }
    };

    if generic == specific {
        vec![specific]
    } else {
        vec![specific, generic]
    }
}

#[cfg(unix)]
fn is_executable(md: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    md.is_file() && md.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_md: &fs::Metadata) -> bool {
    false
}
