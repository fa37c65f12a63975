//! Display configuration options for fbrowse
//!
//! This module defines the `[display]` table of fbrowse.toml: icon settings,
//! the status line and the format strings used to render entries.

use serde::Deserialize;

pub const DEFAULT_ICON_SIZE: u32 = 24;
pub const DEFAULT_UP_LABEL: &str = "..";
pub const DEFAULT_ENTRY_FORMAT: &str = "%s";
pub const DEFAULT_HIDDEN_SYMBOL: &str = "[+]";
pub const DEFAULT_NO_HIDDEN_SYMBOL: &str = "[-]";
pub const DEFAULT_PATH_SEP: &str = " / ";
pub const DEFAULT_OPEN_CUSTOM_MESSAGE: &str =
    "Enter command to open '%s' with, or cancel to go back.";

/// Display configuration options
///
/// Every option has a default, so a partial `[display]` table is enough.
/// Format strings use `%s` as the placeholder for the entry name.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Display {
    icons: bool,
    status: bool,
    icon_size: u32,
    themes: Vec<String>,
    up_label: String,
    file_format: String,
    directory_format: String,
    hidden_symbol: String,
    no_hidden_symbol: String,
    path_sep: String,
    open_custom_message: String,
    matching: MatchMethod,
}

/// How the input line is matched against entry names.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MatchMethod {
    /// Case-insensitive substring.
    #[default]
    Normal,
    /// Skim-style fuzzy matching.
    Fuzzy,
}

impl Display {
    #[inline]
    pub fn icons(&self) -> bool {
        self.icons
    }

    #[inline]
    pub fn status(&self) -> bool {
        self.status
    }

    #[inline]
    pub fn icon_size(&self) -> u32 {
        self.icon_size
    }

    /// Explicitly configured icon themes. Empty means detect from the desktop settings.
    #[inline]
    pub fn themes(&self) -> &[String] {
        &self.themes
    }

    #[inline]
    pub fn up_label(&self) -> &str {
        &self.up_label
    }

    #[inline]
    pub fn file_format(&self) -> &str {
        &self.file_format
    }

    #[inline]
    pub fn directory_format(&self) -> &str {
        &self.directory_format
    }

    #[inline]
    pub fn hidden_symbol(&self) -> &str {
        &self.hidden_symbol
    }

    #[inline]
    pub fn no_hidden_symbol(&self) -> &str {
        &self.no_hidden_symbol
    }

    #[inline]
    pub fn path_sep(&self) -> &str {
        &self.path_sep
    }

    #[inline]
    pub fn open_custom_message(&self) -> &str {
        &self.open_custom_message
    }

    #[inline]
    pub fn matching(&self) -> MatchMethod {
        self.matching
    }

    pub(crate) fn set_icons(&mut self, enabled: bool) {
        self.icons = enabled;
    }

    pub(crate) fn set_status(&mut self, enabled: bool) {
        self.status = enabled;
    }

    pub(crate) fn set_themes(&mut self, themes: Vec<String>) {
        self.themes = themes;
    }

    pub(crate) fn set_hidden_symbol(&mut self, symbol: String) {
        self.hidden_symbol = symbol;
    }

    pub(crate) fn set_no_hidden_symbol(&mut self, symbol: String) {
        self.no_hidden_symbol = symbol;
    }

    pub(crate) fn set_path_sep(&mut self, sep: String) {
        self.path_sep = sep;
    }
}

impl Default for Display {
    fn default() -> Self {
        Display {
            icons: true,
            status: true,
            icon_size: DEFAULT_ICON_SIZE,
            themes: Vec::new(),
            up_label: DEFAULT_UP_LABEL.to_string(),
            file_format: DEFAULT_ENTRY_FORMAT.to_string(),
            directory_format: DEFAULT_ENTRY_FORMAT.to_string(),
            hidden_symbol: DEFAULT_HIDDEN_SYMBOL.to_string(),
            no_hidden_symbol: DEFAULT_NO_HIDDEN_SYMBOL.to_string(),
            path_sep: DEFAULT_PATH_SEP.to_string(),
            open_custom_message: DEFAULT_OPEN_CUSTOM_MESSAGE.to_string(),
            matching: MatchMethod::Normal,
        }
    }
}
