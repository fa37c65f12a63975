//! Small string and path helpers shared by the session and the terminal host.

use std::path::{Path, PathBuf};

/// Placeholder used by all display format strings.
pub const FORMAT_PLACEHOLDER: &str = "%s";

/// The user's home directory, if it can be determined.
pub fn get_home() -> Option<PathBuf> {
    dirs::home_dir()
}

/// Substitute `value` for every `%s` in `template`.
pub fn apply_format(template: &str, value: &str) -> String {
    template.replace(FORMAT_PLACEHOLDER, value)
}

/// Render an absolute path as its components joined by `sep`.
///
/// `/home/user/docs` with `" / "` becomes ` / home / user / docs`: the path
/// is split on `/` and the (empty) leading component is kept.
pub fn join_path_components(path: &Path, sep: &str) -> String {
    path.to_string_lossy()
        .split('/')
        .collect::<Vec<_>>()
        .join(sep)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_replaces_every_placeholder() {
        assert_eq!(apply_format("<b>%s</b>", "src"), "<b>src</b>");
        assert_eq!(apply_format("%s/%s", "a"), "a/a");
        assert_eq!(apply_format("static", "a"), "static");
    }

    #[test]
    fn path_components_keep_leading_separator() {
        assert_eq!(join_path_components(Path::new("/home/u"), " / "), " / home / u");
        assert_eq!(join_path_components(Path::new("/"), " / "), " / ");
        assert_eq!(join_path_components(Path::new("/a/b"), "|"), "|a|b");
    }
}
