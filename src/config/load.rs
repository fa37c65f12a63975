//! The main config loading module for fbrowse.
//!
//! Handles loading and deserializing settings from `fbrowse.toml`.
//!
//! Provides the main [Config] struct, the internal [RawConfig] used for parsing,
//! and [Overrides], the command line values layered on top of the file.
//!
//! Also writes a default config file on `--init` / `--init-full`.

use crate::config::{Display, General, InternalGeneral, Keys, Open};
use crate::core::listing::KindFilter;
use crate::utils::get_home;

use serde::Deserialize;
use std::{fs, io, path::Path, path::PathBuf};

/// Raw configuration as read from the toml file.
/// It is converted into the main [Config] struct right after parsing.
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub(crate) struct RawConfig {
    general: General,
    display: Display,
    open: Open,
    keys: Keys,
}

/// Main configuration struct for fbrowse.
/// This is the fully resolved configuration a session is started with.
#[derive(Debug, Clone)]
pub struct Config {
    general: InternalGeneral,
    display: Display,
    open: Open,
    keys: Keys,
}

impl From<RawConfig> for Config {
    fn from(raw: RawConfig) -> Self {
        Self {
            general: InternalGeneral::from(raw.general),
            display: raw.display,
            open: raw.open,
            keys: raw.keys,
        }
    }
}

/// Command line values that take precedence over the config file.
/// `None` and `false` leave the file value untouched.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub dir: Option<PathBuf>,
    pub show_hidden: bool,
    pub disable_icons: bool,
    pub print_path: bool,
    pub disable_mode_keys: bool,
    pub disable_status: bool,
    pub cmd: Option<String>,
    pub hidden_symbol: Option<String>,
    pub no_hidden_symbol: Option<String>,
    pub path_sep: Option<String>,
    pub themes: Vec<String>,
    pub depth: Option<u32>,
    pub filter: Option<KindFilter>,
    /// Added to the configured exclude patterns.
    pub exclude: Vec<String>,
}

impl Config {
    /// Load configuration from the default path.
    /// If the file does not exist or fails to parse, returns the default configuration.
    pub fn load() -> Self {
        let path = Self::default_path();

        if !path.exists() {
            eprintln!(
                "No fbrowse.toml config file found. Using internal defaults. (Tip: run 'fbrowse --init' to generate a config file.)"
            );
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Read and parse the config file at `path`.
    pub fn load_from(path: &Path) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Parse a config from toml text.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<RawConfig>(content).map(Config::from)
    }

    /// Apply command line overrides on top of the loaded values.
    pub fn apply(&mut self, o: Overrides) {
        if let Some(dir) = o.dir {
            self.general.set_dir(dir);
        }
        if o.show_hidden {
            self.general.set_show_hidden(true);
        }
        if o.disable_mode_keys {
            self.general.set_mode_keys(false);
        }
        if let Some(depth) = o.depth {
            self.general.set_depth(depth);
        }
        if let Some(filter) = o.filter {
            self.general.set_filter(filter);
        }
        self.general.add_exclude(o.exclude);

        if o.disable_icons {
            self.display.set_icons(false);
        }
        if o.disable_status {
            self.display.set_status(false);
        }
        if !o.themes.is_empty() {
            self.display.set_themes(o.themes);
        }
        if let Some(symbol) = o.hidden_symbol {
            self.display.set_hidden_symbol(symbol);
        }
        if let Some(symbol) = o.no_hidden_symbol {
            self.display.set_no_hidden_symbol(symbol);
        }
        if let Some(sep) = o.path_sep {
            self.display.set_path_sep(sep);
        }

        if let Some(cmd) = o.cmd {
            self.open.set_cmd(cmd);
        }
        if o.print_path {
            self.open.set_print_path(true);
        }
    }

    // Getters

    #[inline]
    pub fn general(&self) -> &InternalGeneral {
        &self.general
    }

    #[inline]
    pub fn display(&self) -> &Display {
        &self.display
    }

    #[inline]
    pub fn open(&self) -> &Open {
        &self.open
    }

    #[inline]
    pub fn keys(&self) -> &Keys {
        &self.keys
    }

    /// Determine the default configuration file path.
    /// Checks the FBROWSE_CONFIG environment variable first,
    /// then XDG_CONFIG_HOME,
    /// then defaults to ~/.config/fbrowse/fbrowse.toml.
    pub fn default_path() -> PathBuf {
        if let Ok(path) = std::env::var("FBROWSE_CONFIG") {
            return PathBuf::from(path);
        }

        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg_config).join("fbrowse/fbrowse.toml");
        }

        if let Some(home) = get_home() {
            return home.join(".config/fbrowse/fbrowse.toml");
        }
        PathBuf::from("fbrowse.toml")
    }

    /// Generate a default configuration file at the specified path.
    /// If the file already exists, returns an error.
    pub fn generate_default(path: &Path, minimal: bool) -> io::Result<()> {
        if path.exists() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("Config file already exists at {}", path.display()),
            ));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let full_toml = r##"# fbrowse.toml - default configuration for fbrowse

# Commented values are the internal defaults.
# Run 'fbrowse --config-help' for a description of every option.

[general]
# dir = "~"                 # start directory, defaults to the current directory
show_hidden = false
# depth = 1                 # accepted for compatibility, listings are always flat
# only_dirs = false
# only_files = false
# exclude = []              # gitignore-style globs, e.g. ["*.o", "target/"]
# mode_keys = true          # next/previous toggle hidden files

[display]
icons = true
# status = true
# icon_size = 24
# themes = []               # empty: use the GTK icon theme, then Adwaita and gnome
# up_label = ".."
# file_format = "%s"
# directory_format = "%s"
# hidden_symbol = "[+]"
# no_hidden_symbol = "[-]"
# path_sep = " / "
# open_custom_message = "Enter command to open '%s' with, or cancel to go back."
# matching = "normal"       # "normal" or "fuzzy"

[open]
cmd = "xdg-open '%s'"
# print_path = false        # print the chosen path instead of opening it

# [keys]
# select = ["Enter"]
# custom_command = ["Alt+Enter", "Ctrl+o"]
# custom_input = ["Ctrl+Enter", "Ctrl+t"]
# next = ["Shift+Right"]
# previous = ["Shift+Left"]
# cancel = ["Esc", "Ctrl+c"]
# up = ["Up", "Ctrl+k"]
# down = ["Down", "Ctrl+j"]
"##;

        let minimal_toml = r##"# fbrowse.toml - minimal configuration
# Only a few basic options. The rest uses internal defaults.
# For all options, run fbrowse --config-help.

[general]
show_hidden = false

[display]
icons = true

[open]
cmd = "xdg-open '%s'"
"##;

        let content = if minimal { minimal_toml } else { full_toml };

        fs::write(path, content)?;
        println!(
            "{} Default config generated at {}",
            if minimal { "Minimal" } else { "Full" },
            path.display()
        );
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        RawConfig::default().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchMethod;
    use tempfile::tempdir;

    #[test]
    fn partial_tables_keep_defaults() -> Result<(), Box<dyn std::error::Error>> {
        let config = Config::from_toml(
            r#"
            [display]
            up_label = "Up"
            matching = "fuzzy"

            [open]
            print_path = true
            "#,
        )?;

        assert_eq!(config.display().up_label(), "Up");
        assert_eq!(config.display().matching(), MatchMethod::Fuzzy);
        assert_eq!(config.display().path_sep(), " / ");
        assert!(config.display().icons());
        assert!(config.open().print_path());
        assert_eq!(config.open().cmd(), "xdg-open '%s'");
        assert!(config.general().mode_keys());
        assert_eq!(config.keys().select(), ["Enter"]);
        Ok(())
    }

    #[test]
    fn kind_switches_fold_into_filter() -> Result<(), Box<dyn std::error::Error>> {
        let dirs = Config::from_toml("[general]\nonly_dirs = true")?;
        assert_eq!(dirs.general().filter(), KindFilter::DirsOnly);

        let both = Config::from_toml("[general]\nonly_dirs = true\nonly_files = true")?;
        assert_eq!(both.general().filter(), KindFilter::All);
        Ok(())
    }

    #[test]
    fn unknown_matching_is_rejected() {
        assert!(Config::from_toml("[display]\nmatching = \"regex\"").is_err());
    }

    #[test]
    fn overrides_win_over_file_values() -> Result<(), Box<dyn std::error::Error>> {
        let mut config = Config::from_toml(
            r#"
            [general]
            exclude = ["*.o"]
            [display]
            themes = ["Papirus"]
            hidden_symbol = "H"
            [open]
            cmd = "less"
            "#,
        )?;
        assert_eq!(config.general().exclude(), ["*.o"]);
        config.apply(Overrides {
            dir: Some(PathBuf::from("/srv")),
            show_hidden: true,
            disable_icons: true,
            cmd: Some("mpv".into()),
            themes: vec!["breeze".into(), "Papirus".into()],
            filter: Some(KindFilter::FilesOnly),
            exclude: vec!["target/".into()],
            ..Overrides::default()
        });

        assert_eq!(config.general().dir(), Some(&PathBuf::from("/srv")));
        assert!(config.general().show_hidden());
        assert!(!config.display().icons());
        assert_eq!(config.display().themes(), ["breeze", "Papirus"]);
        assert_eq!(config.display().hidden_symbol(), "H");
        assert_eq!(config.open().cmd(), "mpv");
        assert_eq!(config.general().filter(), KindFilter::FilesOnly);
        assert_eq!(config.general().exclude(), ["*.o", "target/"]);
        Ok(())
    }

    #[test]
    fn generated_templates_parse() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        for (name, minimal) in [("full.toml", false), ("minimal.toml", true)] {
            let path = dir.path().join("nested").join(name);
            Config::generate_default(&path, minimal)?;
            let config = Config::load_from(&path)?;
            assert_eq!(config.open().cmd(), "xdg-open '%s'");
        }
        Ok(())
    }

    #[test]
    fn generate_refuses_to_overwrite() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("fbrowse.toml");
        fs::write(&path, "# mine")?;

        let err = Config::generate_default(&path, true).err().ok_or("expected an error")?;
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(fs::read_to_string(&path)?, "# mine");
        Ok(())
    }
}
