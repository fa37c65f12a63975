//! Command-line argument parsing and help for fbrowse.
//!
//! Flags mirror the config file options and override them. The maintenance
//! flags (`--init`, `--init-full`, `--config-help`, `--keybinds`) do their work
//! and exit without starting the browser.
//!
//! When invoked with no args (fbrowse), the browser starts in the configured or
//! current directory.

use crate::config::{Config, Overrides};
use crate::config::general::kind_filter;
use crate::core::paths::expand_home_path;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "fbrowse",
    version,
    about = "A keyboard driven file browser for launching files"
)]
pub struct Args {
    /// Directory to open (defaults to the configured or current directory)
    pub path: Option<String>,

    /// Show hidden files
    #[arg(long)]
    pub show_hidden: bool,

    /// Do not resolve or show icons
    #[arg(long)]
    pub disable_icons: bool,

    /// Print the chosen path to stdout instead of opening it
    #[arg(long, visible_alias = "dmenu")]
    pub print_path: bool,

    /// Do not toggle hidden files with the next/previous keys
    #[arg(long)]
    pub disable_mode_keys: bool,

    /// Hide the status message with the current directory
    #[arg(long)]
    pub disable_status: bool,

    /// Open command; every %s is replaced by the file path, quoted to match its surroundings
    #[arg(long, value_name = "TEMPLATE")]
    pub cmd: Option<String>,

    /// Status prefix while hidden files are shown
    #[arg(long, value_name = "SYMBOL")]
    pub hidden_symbol: Option<String>,

    /// Status prefix while hidden files are not shown
    #[arg(long, value_name = "SYMBOL")]
    pub no_hidden_symbol: Option<String>,

    /// Separator between path components in the status message
    #[arg(long, value_name = "SEP")]
    pub path_sep: Option<String>,

    /// Icon theme to search first; repeat for more themes
    #[arg(long = "theme", value_name = "NAME")]
    pub themes: Vec<String>,

    /// Accepted for compatibility; listings are always one level deep
    #[arg(long)]
    pub depth: Option<u32>,

    /// Only list directories
    #[arg(long, conflicts_with = "only_files")]
    pub only_dirs: bool,

    /// Only list files
    #[arg(long)]
    pub only_files: bool,

    /// Leave entries matching a gitignore-style glob out of listings; repeatable
    #[arg(long, value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Generate a minimal default configuration
    #[arg(long, group = "maintenance")]
    pub init: bool,

    /// Generate the full configuration with all options
    #[arg(long, group = "maintenance")]
    pub init_full: bool,

    /// Display all the configuration options
    #[arg(long, group = "maintenance")]
    pub config_help: bool,

    /// Display all the default keybinds
    #[arg(long, alias = "keybind", group = "maintenance")]
    pub keybinds: bool,
}

pub enum CliAction {
    Run(Overrides),
    Exit,
}

impl Args {
    /// The config overrides requested on the command line.
    pub fn overrides(&self) -> Overrides {
        let filter = (self.only_dirs || self.only_files)
            .then(|| kind_filter(self.only_dirs, self.only_files));
        Overrides {
            dir: self.path.as_deref().map(expand_home_path),
            show_hidden: self.show_hidden,
            disable_icons: self.disable_icons,
            print_path: self.print_path,
            disable_mode_keys: self.disable_mode_keys,
            disable_status: self.disable_status,
            cmd: self.cmd.clone(),
            hidden_symbol: self.hidden_symbol.clone(),
            no_hidden_symbol: self.no_hidden_symbol.clone(),
            path_sep: self.path_sep.clone(),
            themes: self.themes.clone(),
            depth: self.depth,
            filter,
            exclude: self.exclude.clone(),
        }
    }
}

/// Parse the process arguments and run any maintenance action.
pub fn handle_args() -> CliAction {
    handle(Args::parse())
}

pub fn handle(args: Args) -> CliAction {
    let config_path = Config::default_path();

    if args.config_help {
        print_config_help();
        return CliAction::Exit;
    }
    if args.keybinds {
        print_keybinds();
        return CliAction::Exit;
    }
    if args.init || args.init_full {
        if let Err(e) = Config::generate_default(&config_path, args.init) {
            eprintln!("Error: {}", e);
        }
        return CliAction::Exit;
    }

    CliAction::Run(args.overrides())
}

const KEYBINDS_TEXT: &str = r##"
=========================
 Key Bindings
=========================
[keys]
  select                    ["Enter"]                 Open the file or enter the directory
  custom_command            ["Alt+Enter", "Ctrl+o"]   Open the selected file with a typed command
  custom_input              ["Ctrl+Enter", "Ctrl+t"]  Use the input line as a path (empty: toggle hidden)
  next                      ["Shift+Right"]           Show hidden files
  previous                  ["Shift+Left"]            Hide hidden files
  cancel                    ["Esc", "Ctrl+c"]         Leave the command prompt, or quit
  up                        ["Up", "Ctrl+k"]
  down                      ["Down", "Ctrl+j"]

  Typing edits the input line, which filters the listing.
  Enter with no matching entry uses the input line as a path.

  Syntax Reference:
    Modifiers: <c-x> (Ctrl), <m-x>/<a-x> (Alt/Meta), <s-x> (Shift)
    Standard:  ctrl+x, alt+x, shift+x, meta+x
    Special:   " ", "space", "back", "enter", "esc", "tab"

  Note:
    - Shorthand (c-, m-, s-) only works inside brackets <>.
"##;

fn print_keybinds() {
    println!("{}", KEYBINDS_TEXT);
}

fn print_config_help() {
    let help_text = r##"
fbrowse - Full Configuration Guide (fbrowse.toml)

=========================
 General Settings
=========================
[general]
  dir                        Start directory, "~" is expanded [default: current directory]
  show_hidden                Show hidden files (dotfiles) at startup
  depth                      Accepted for compatibility, listings are always flat
  only_dirs                  List directories only
  only_files                 List files only
  exclude                    Gitignore-style globs left out of listings [default: []]
  mode_keys                  Next/previous keys show/hide hidden files [default: true]

=========================
 Display Settings
=========================
[display]
  icons                      Resolve and show file icons [default: true]
  status                     Show "[-] / path / to / dir" as the message [default: true]
  icon_size                  Requested icon size in pixels [default: 24]
  themes                     Icon themes searched first, e.g. ["Papirus"]
                             (empty: the GTK icon theme; Adwaita and gnome are always appended)
  up_label                   Label of the parent directory entry [default: ".."]
  file_format                Format of file names, %s is the name
  directory_format           Format of directory names, %s is the name
  hidden_symbol              Status prefix while hidden files are shown [default: "[+]"]
  no_hidden_symbol           Status prefix while hidden files are not shown [default: "[-]"]
  path_sep                   Separator between path components [default: " / "]
  open_custom_message        Message while asking for a command, %s is the file name
  matching                   "normal" (case-insensitive substring) or "fuzzy"

=========================
 Opening Files
=========================
[open]
  cmd                        Open command, every %s is replaced by the quoted path
                             [default: "xdg-open '%s'"]
  print_path                 Print the chosen path instead of opening it

=========================
 Environment
=========================
  FBROWSE_CONFIG             Override the default config path
  FBROWSE_LOG                Write logs to this file
  FBROWSE_LOG_LEVEL          Log filter, e.g. "debug" [default: info]
"##;

    println!("{}{}", help_text, KEYBINDS_TEXT);
}
