//! Icon theme lookup and detection.
//!
//! [IconLookup] is the collaborator that turns an icon name into a file on
//! disk. [XdgIconLookup] implements the freedesktop icon theme lookup over the
//! usual base directories, and [detect_icon_theme] reads the GTK settings to
//! find the user's theme when none is configured.

use crate::core::error::Error;

use std::cell::RefCell;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

#[cfg(test)]
use mockall::automock;

/// Themes always appended after the primary themes.
pub const FALLBACK_ICON_THEMES: [&str; 2] = ["Adwaita", "gnome"];
/// Every freedesktop lookup ends in this theme.
const DEFAULT_THEME: &str = "hicolor";
/// Extensions the icon decoder understands, in preference order.
const ICON_EXTENSIONS: [&str; 2] = ["png", "svg"];
/// Settings files checked by [detect_icon_theme], relative to the config dir.
const GTK_SETTINGS: [&str; 2] = ["gtk-3.0/settings.ini", "gtk-4.0/settings.ini"];
const GTK_THEME_KEY: &str = "gtk-icon-theme-name";

/// Icon file lookup used by the icon resolver.
#[cfg_attr(test, automock)]
pub trait IconLookup {
    /// Path of the best icon file for `name` in `themes` (in order) at `size` and `scale`.
    fn lookup(&self, themes: &[String], name: &str, size: u32, scale: u32) -> Option<PathBuf>;
}

/// Builds the active theme list: primary themes followed by the fallbacks.
pub fn active_themes(primary: &[String]) -> Vec<String> {
    let mut themes: Vec<String> = primary.iter().filter(|t| !t.is_empty()).cloned().collect();
    for fallback in FALLBACK_ICON_THEMES {
        if !themes.iter().any(|t| t == fallback) {
            themes.push(fallback.to_string());
        }
    }
    themes
}

/// Reads the user's GTK icon theme name.
pub fn detect_icon_theme() -> Result<String, Error> {
    let config_dir = dirs::config_dir().ok_or(Error::ThemeDetectionFailure)?;
    detect_icon_theme_in(&config_dir)
}

/// [detect_icon_theme] against an explicit config directory.
pub fn detect_icon_theme_in(config_dir: &Path) -> Result<String, Error> {
    GTK_SETTINGS
        .iter()
        .filter_map(|rel| fs::read_to_string(config_dir.join(rel)).ok())
        .find_map(|content| {
            parse_ini(&content)
                .into_iter()
                .filter(|(section, _, _)| section == "Settings")
                .find(|(_, key, _)| key == GTK_THEME_KEY)
                .map(|(_, _, value)| value.trim_matches('"').to_string())
                .filter(|value| !value.is_empty())
        })
        .ok_or(Error::ThemeDetectionFailure)
}

/// How a theme directory matches requested sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DirType {
    Fixed,
    Scalable,
    Threshold,
}

/// One `[subdir]` section of an `index.theme`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ThemeDir {
    path: String,
    size: u32,
    scale: u32,
    kind: DirType,
    min_size: u32,
    max_size: u32,
    threshold: u32,
}

impl ThemeDir {
    fn matches(&self, size: u32, scale: u32) -> bool {
        if self.scale != scale {
            return false;
        }
        match self.kind {
            DirType::Fixed => self.size == size,
            DirType::Scalable => (self.min_size..=self.max_size).contains(&size),
            DirType::Threshold => {
                self.size.saturating_sub(self.threshold) <= size
                    && size <= self.size.saturating_add(self.threshold)
            }
        }
    }

    fn distance(&self, size: u32, scale: u32) -> u32 {
        let wanted = size.saturating_mul(scale);
        let (low, high) = match self.kind {
            DirType::Fixed => (self.size, self.size),
            DirType::Scalable => (self.min_size, self.max_size),
            DirType::Threshold => (
                self.size.saturating_sub(self.threshold),
                self.size.saturating_add(self.threshold),
            ),
        };
        let (low, high) = (low.saturating_mul(self.scale), high.saturating_mul(self.scale));
        if wanted < low {
            low - wanted
        } else if wanted > high {
            wanted - high
        } else {
            0
        }
    }
}

/// Parsed `index.theme`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct ThemeIndex {
    dirs: Vec<ThemeDir>,
    inherits: Vec<String>,
}

impl ThemeIndex {
    fn parse(content: &str) -> Self {
        let entries = parse_ini(content);
        let value = |section: &str, key: &str| {
            entries
                .iter()
                .find(|(s, k, _)| s == section && k == key)
                .map(|(_, _, v)| v.as_str())
        };
        let list = |v: Option<&str>| -> Vec<String> {
            v.map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
        };

        let mut names = list(value("Icon Theme", "Directories"));
        names.extend(list(value("Icon Theme", "ScaledDirectories")));
        let inherits = list(value("Icon Theme", "Inherits"));

        let number = |section: &str, key: &str| value(section, key).and_then(|v| v.parse::<u32>().ok());

        let dirs = names
            .into_iter()
            .filter_map(|name| {
                let size = number(name.as_str(), "Size")?;
                let kind = match value(name.as_str(), "Type") {
                    Some("Fixed") => DirType::Fixed,
                    Some("Scalable") => DirType::Scalable,
                    _ => DirType::Threshold,
                };
                Some(ThemeDir {
                    scale: number(name.as_str(), "Scale").unwrap_or(1),
                    min_size: number(name.as_str(), "MinSize").unwrap_or(size),
                    max_size: number(name.as_str(), "MaxSize").unwrap_or(size),
                    threshold: number(name.as_str(), "Threshold").unwrap_or(2),
                    size,
                    kind,
                    path: name,
                })
            })
            .collect();

        ThemeIndex { dirs, inherits }
    }
}

/// Freedesktop icon theme lookup.
pub struct XdgIconLookup {
    base_dirs: Vec<PathBuf>,
    pixmap_dirs: Vec<PathBuf>,
    indexes: RefCell<HashMap<String, Option<ThemeIndex>>>,
}

impl Default for XdgIconLookup {
    fn default() -> Self {
        Self::new()
    }
}

impl XdgIconLookup {
    /// Lookup over `~/.icons`, `$XDG_DATA_HOME/icons` and `$XDG_DATA_DIRS/*/icons`.
    pub fn new() -> Self {
        let mut base_dirs = Vec::new();
        if let Some(home) = dirs::home_dir() {
            base_dirs.push(home.join(".icons"));
        }
        if let Some(data) = dirs::data_dir() {
            base_dirs.push(data.join("icons"));
        }
        let data_dirs = env::var("XDG_DATA_DIRS")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "/usr/local/share:/usr/share".to_string());
        base_dirs.extend(
            env::split_paths(&data_dirs)
                .filter(|p| !p.as_os_str().is_empty())
                .map(|p| p.join("icons")),
        );

        Self::with_dirs(base_dirs, vec![PathBuf::from("/usr/share/pixmaps")])
    }

    /// Lookup over explicit base directories, used by tests and embedders.
    pub fn with_dirs(base_dirs: Vec<PathBuf>, pixmap_dirs: Vec<PathBuf>) -> Self {
        Self {
            base_dirs,
            pixmap_dirs,
            indexes: RefCell::new(HashMap::new()),
        }
    }

    fn index(&self, theme: &str) -> Option<ThemeIndex> {
        if let Some(cached) = self.indexes.borrow().get(theme) {
            return cached.clone();
        }

        let index = self
            .base_dirs
            .iter()
            .find_map(|base| fs::read_to_string(base.join(theme).join("index.theme")).ok())
            .map(|content| ThemeIndex::parse(&content));

        self.indexes
            .borrow_mut()
            .insert(theme.to_string(), index.clone());
        index
    }

    /// Themes in search order: each theme followed by what it inherits, `hicolor` last.
    fn theme_chain(&self, themes: &[String]) -> Vec<String> {
        let mut chain: Vec<String> = Vec::new();
        let mut pending: Vec<String> = themes.iter().rev().cloned().collect();

        while let Some(theme) = pending.pop() {
            if chain.contains(&theme) || theme == DEFAULT_THEME {
                continue;
            }
            if let Some(index) = self.index(&theme) {
                pending.extend(index.inherits.iter().rev().cloned());
            }
            chain.push(theme);
        }
        chain.push(DEFAULT_THEME.to_string());
        chain
    }

    fn find_file(&self, theme: &str, dir: &str, name: &str) -> Option<PathBuf> {
        self.base_dirs.iter().find_map(|base| {
            ICON_EXTENSIONS.iter().find_map(|ext| {
                let candidate = base.join(theme).join(dir).join(format!("{name}.{ext}"));
                candidate.is_file().then_some(candidate)
            })
        })
    }

    fn lookup_in_theme(&self, theme: &str, name: &str, size: u32, scale: u32) -> Option<PathBuf> {
        let index = self.index(theme)?;

        if let Some(found) = index
            .dirs
            .iter()
            .filter(|d| d.matches(size, scale))
            .find_map(|d| self.find_file(theme, &d.path, name))
        {
            return Some(found);
        }

        let mut best: Option<(u32, PathBuf)> = None;
        for dir in &index.dirs {
            let distance = dir.distance(size, scale);
            if best.as_ref().is_some_and(|(d, _)| *d <= distance) {
                continue;
            }
            if let Some(path) = self.find_file(theme, &dir.path, name) {
                best = Some((distance, path));
            }
        }
        best.map(|(_, path)| path)
    }

    fn lookup_unthemed(&self, name: &str) -> Option<PathBuf> {
        self.pixmap_dirs.iter().find_map(|dir| {
            ICON_EXTENSIONS.iter().find_map(|ext| {
                let candidate = dir.join(format!("{name}.{ext}"));
                candidate.is_file().then_some(candidate)
            })
        })
    }
}

impl IconLookup for XdgIconLookup {
    fn lookup(&self, themes: &[String], name: &str, size: u32, scale: u32) -> Option<PathBuf> {
        self.theme_chain(themes)
            .iter()
            .find_map(|theme| self.lookup_in_theme(theme, name, size, scale))
            .or_else(|| self.lookup_unthemed(name))
    }
}

/// Minimal INI reader: `(section, key, value)` triples, comments and blank lines skipped.
fn parse_ini(content: &str) -> Vec<(String, String, String)> {
    let mut out = Vec::new();
    let mut section = String::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            section = name.trim().to_string();
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            out.push((section.clone(), key.trim().to_string(), value.trim().to_string()));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const INDEX: &str = r#"
[Icon Theme]
Name=Test
Inherits=Parent
Directories=16x16/mimetypes,48x48/mimetypes,scalable/mimetypes

[16x16/mimetypes]
Size=16
Type=Fixed

[48x48/mimetypes]
Size=48
Type=Fixed

[scalable/mimetypes]
Size=64
MinSize=8
MaxSize=512
Type=Scalable
"#;

    fn touch(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, b"")?;
        Ok(())
    }

    #[test]
    fn parses_index_theme() {
        let index = ThemeIndex::parse(INDEX);
        assert_eq!(index.inherits, ["Parent"]);
        assert_eq!(index.dirs.len(), 3);
        assert_eq!(index.dirs[0].kind, DirType::Fixed);
        assert_eq!(index.dirs[2].kind, DirType::Scalable);
        assert_eq!(index.dirs[2].max_size, 512);
        assert!(index.dirs[2].matches(100, 1));
        assert!(!index.dirs[0].matches(24, 1));
    }

    #[test]
    fn active_theme_list_appends_fallbacks_once() {
        assert_eq!(active_themes(&[]), ["Adwaita", "gnome"]);
        assert_eq!(
            active_themes(&["Papirus".to_string(), "gnome".to_string()]),
            ["Papirus", "gnome", "Adwaita"]
        );
    }

    #[test]
    fn exact_size_wins_over_closest() -> Result<(), Box<dyn std::error::Error>> {
        let base = tempdir()?;
        let theme = base.path().join("Test");
        fs::create_dir_all(&theme)?;
        fs::write(theme.join("index.theme"), INDEX)?;
        touch(&theme.join("16x16/mimetypes/text-plain.png"))?;
        touch(&theme.join("48x48/mimetypes/text-plain.png"))?;

        let lookup = XdgIconLookup::with_dirs(vec![base.path().to_path_buf()], vec![]);
        let themes = vec!["Test".to_string()];

        assert_eq!(
            lookup.lookup(&themes, "text-plain", 48, 1),
            Some(theme.join("48x48/mimetypes/text-plain.png"))
        );
        // 20 is closest to the 16px directory
        assert_eq!(
            lookup.lookup(&themes, "text-plain", 20, 1),
            Some(theme.join("16x16/mimetypes/text-plain.png"))
        );
        assert_eq!(lookup.lookup(&themes, "missing-icon", 48, 1), None);
        Ok(())
    }

    #[test]
    fn oversized_theme_dirs_do_not_overflow() -> Result<(), Box<dyn std::error::Error>> {
        let base = tempdir()?;
        let theme = base.path().join("T");
        fs::create_dir_all(&theme)?;
        fs::write(
            theme.join("index.theme"),
            "[Icon Theme]\nDirectories=big,huge\n\
             [big]\nSize=4294967295\nType=Threshold\n\
             [huge]\nSize=4294967295\nScale=4294967295\nType=Fixed\n",
        )?;
        touch(&theme.join("big/x.png"))?;

        let lookup = XdgIconLookup::with_dirs(vec![base.path().to_path_buf()], vec![]);
        let themes = vec!["T".to_string()];

        assert_eq!(lookup.lookup(&themes, "x", 24, 1), Some(theme.join("big/x.png")));
        assert_eq!(lookup.lookup(&themes, "x", u32::MAX, u32::MAX), Some(theme.join("big/x.png")));
        assert_eq!(lookup.lookup(&themes, "missing", 24, 1), None);
        Ok(())
    }

    #[test]
    fn inherited_and_hicolor_themes_are_searched() -> Result<(), Box<dyn std::error::Error>> {
        let base = tempdir()?;
        fs::create_dir_all(base.path().join("Test"))?;
        fs::write(base.path().join("Test/index.theme"), INDEX)?;
        fs::create_dir_all(base.path().join("Parent"))?;
        fs::write(
            base.path().join("Parent/index.theme"),
            "[Icon Theme]\nDirectories=apps\n[apps]\nSize=32\n",
        )?;
        fs::create_dir_all(base.path().join("hicolor"))?;
        fs::write(
            base.path().join("hicolor/index.theme"),
            "[Icon Theme]\nDirectories=scalable/apps\n[scalable/apps]\nSize=48\nType=Scalable\nMinSize=1\nMaxSize=256\n",
        )?;
        touch(&base.path().join("Parent/apps/go-up.svg"))?;
        touch(&base.path().join("hicolor/scalable/apps/only-in-hicolor.svg"))?;

        let lookup = XdgIconLookup::with_dirs(vec![base.path().to_path_buf()], vec![]);
        let themes = vec!["Test".to_string()];

        assert_eq!(
            lookup.lookup(&themes, "go-up", 32, 1),
            Some(base.path().join("Parent/apps/go-up.svg"))
        );
        assert_eq!(
            lookup.lookup(&themes, "only-in-hicolor", 32, 1),
            Some(base.path().join("hicolor/scalable/apps/only-in-hicolor.svg"))
        );
        Ok(())
    }

    #[test]
    fn unthemed_pixmaps_are_last_resort() -> Result<(), Box<dyn std::error::Error>> {
        let base = tempdir()?;
        let pixmaps = tempdir()?;
        touch(&pixmaps.path().join("legacy.png"))?;

        let lookup = XdgIconLookup::with_dirs(
            vec![base.path().to_path_buf()],
            vec![pixmaps.path().to_path_buf()],
        );
        assert_eq!(
            lookup.lookup(&[], "legacy", 24, 1),
            Some(pixmaps.path().join("legacy.png"))
        );
        Ok(())
    }

    #[test]
    fn detects_gtk_theme() -> Result<(), Box<dyn std::error::Error>> {
        let config = tempdir()?;
        assert!(matches!(
            detect_icon_theme_in(config.path()),
            Err(Error::ThemeDetectionFailure)
        ));

        fs::create_dir_all(config.path().join("gtk-4.0"))?;
        fs::write(
            config.path().join("gtk-4.0/settings.ini"),
            "[Settings]\ngtk-theme-name=Adwaita-dark\ngtk-icon-theme-name = Papirus-Dark\n",
        )?;
        assert_eq!(detect_icon_theme_in(config.path())?, "Papirus-Dark");
        Ok(())
    }
}
