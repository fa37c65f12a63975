//! The browsing session.
//!
//! A [Session] owns everything a running browser needs: the [DirectoryState],
//! the [InteractionState], the listing and icon machinery and the opener.
//! Hosts drive it with [Session::handle_event] and render it with the query
//! methods. All work happens synchronously inside those calls.

use crate::app::state::{DirectoryState, Directive, Event, InteractionState};
use crate::config::{Config, Display, MatchMethod};
use crate::core::content::{ContentTypes, MimeIcons};
use crate::core::fm::{DirEnumerator, Entry, LocalFs};
use crate::core::icons::{Icon, IconResolver};
use crate::core::listing::{ExcludePatterns, Listing};
use crate::core::paths::{canonicalize, expand_home_path, resolve_absolute};
use crate::core::proc::{Launcher, Opener, ShellLauncher};
use crate::core::theme::{IconLookup, XdgIconLookup, detect_icon_theme};
use crate::config::general::DEFAULT_DEPTH;
use crate::utils::{apply_format, join_path_components};

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use std::io;
use std::path::{Path, PathBuf};

/// The collaborators a session talks to.
pub struct Collaborators {
    pub fs: Box<dyn DirEnumerator>,
    pub content: Box<dyn ContentTypes>,
    pub lookup: Box<dyn IconLookup>,
    pub launcher: Box<dyn Launcher>,
}

impl Collaborators {
    /// The local filesystem, MIME table, freedesktop icon themes and `sh`.
    pub fn local() -> Self {
        Self {
            fs: Box::new(LocalFs),
            content: Box::new(MimeIcons),
            lookup: Box::new(XdgIconLookup::new()),
            launcher: Box::new(ShellLauncher),
        }
    }
}

pub struct Session {
    dir: DirectoryState,
    state: InteractionState,
    listing: Listing,
    icons: Option<IconResolver>,
    opener: Opener,
    display: Display,
    mode_keys: bool,
    matcher: SkimMatcherV2,
}

impl Session {
    /// Start a session with the local collaborators.
    pub fn init(config: &Config) -> io::Result<Self> {
        Self::with_collaborators(config, Collaborators::local())
    }

    /// Start a session in the configured directory, or the process working directory.
    ///
    /// Fails if the start directory does not exist or is not a directory.
    pub fn with_collaborators(config: &Config, parts: Collaborators) -> io::Result<Self> {
        let cwd = std::env::current_dir()?;
        let start = match config.general().dir() {
            Some(dir) => resolve_absolute(dir, &cwd)
                .map_err(|e| io::Error::new(io::ErrorKind::NotFound, e))?,
            None => cwd,
        };
        let start = canonicalize(&start);
        if !start.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} is not a directory", start.display()),
            ));
        }

        if config.general().depth() != DEFAULT_DEPTH {
            tracing::debug!(
                "depth {} requested; listings are always one level deep",
                config.general().depth()
            );
        }

        let display = config.display().clone();
        let icons = display.icons().then(|| {
            let themes = if display.themes().is_empty() {
                match detect_icon_theme() {
                    Ok(theme) => vec![theme],
                    Err(e) => {
                        tracing::warn!("{e}");
                        Vec::new()
                    }
                }
            } else {
                display.themes().to_vec()
            };
            IconResolver::new(&themes, parts.content, parts.lookup)
        });

        let mut session = Self {
            dir: DirectoryState::new(start, config.general().show_hidden()),
            state: InteractionState::Idle,
            listing: Listing::new(parts.fs, config.general().filter())
                .with_exclude(ExcludePatterns::new(config.general().exclude())),
            icons,
            opener: Opener::new(config.open().cmd(), config.open().print_path(), parts.launcher),
            display,
            mode_keys: config.general().mode_keys(),
            matcher: SkimMatcherV2::default(),
        };
        session.reload();
        tracing::info!("browsing {}", session.dir.current_path().display());
        Ok(session)
    }

    /// Apply one host event and tell the host what to do next.
    pub fn handle_event(&mut self, event: Event) -> Directive {
        match self.state {
            InteractionState::Idle => self.handle_idle(event),
            InteractionState::AwaitingCustomCommand(target) => self.handle_awaiting(target, event),
        }
    }

    fn handle_idle(&mut self, event: Event) -> Directive {
        match event {
            Event::Select(i) => match self.dir.entries().get(i) {
                Some(entry) if entry.is_dir() => {
                    let target = entry.path_in(self.dir.current_path());
                    self.change_dir(&target);
                    Directive::Reset
                }
                Some(entry) => {
                    let target = entry.path_in(self.dir.current_path());
                    self.opener.open(self.dir.current_path(), &target);
                    Directive::Exit
                }
                None => Directive::Reload,
            },
            Event::ShiftSelect(i) => {
                if i < self.dir.entries().len() {
                    self.state = InteractionState::AwaitingCustomCommand(i);
                    Directive::Reset
                } else {
                    Directive::Reload
                }
            }
            Event::CustomInput(text) | Event::Confirm(text) => self.handle_input(&text),
            Event::Next => {
                if self.mode_keys && !self.dir.show_hidden() {
                    self.set_hidden(true);
                    Directive::Reload
                } else {
                    Directive::Next
                }
            }
            Event::Previous => {
                if self.mode_keys && self.dir.show_hidden() {
                    self.set_hidden(false);
                    Directive::Reload
                } else {
                    Directive::Previous
                }
            }
            Event::Cancel => Directive::Exit,
        }
    }

    fn handle_awaiting(&mut self, target: usize, event: Event) -> Directive {
        match event {
            Event::Confirm(text) | Event::CustomInput(text) => {
                let Some(entry) = self.dir.entries().get(target) else {
                    self.state = InteractionState::Idle;
                    return Directive::Reload;
                };
                let path = entry.path_in(self.dir.current_path());
                if !text.is_empty() {
                    self.opener.set_template(text);
                }
                self.opener.open(self.dir.current_path(), &path);
                Directive::Exit
            }
            Event::Cancel => {
                self.state = InteractionState::Idle;
                Directive::Reset
            }
            _ => Directive::Reload,
        }
    }

    /// A typed path: empty toggles hidden files, a directory is entered, a file opened.
    fn handle_input(&mut self, text: &str) -> Directive {
        if text.is_empty() {
            let show = !self.dir.show_hidden();
            self.set_hidden(show);
            return Directive::Reload;
        }

        let expanded = expand_home_path(text);
        let path = match resolve_absolute(&expanded, self.dir.current_path()) {
            Ok(path) => path,
            Err(e) => {
                tracing::debug!("{e}");
                return Directive::Reload;
            }
        };

        if path.is_dir() {
            self.change_dir(&path);
            Directive::Reset
        } else if path.is_file() {
            self.opener.open(self.dir.current_path(), &path);
            Directive::Exit
        } else {
            Directive::Reload
        }
    }

    fn change_dir(&mut self, path: &Path) {
        let target = canonicalize(path);
        tracing::debug!("entering {}", target.display());
        self.dir.set_current_path(target);
        self.reload();
    }

    fn set_hidden(&mut self, show: bool) {
        self.dir.set_show_hidden(show);
        self.reload();
    }

    fn reload(&mut self) {
        let entries = self
            .listing
            .reload(self.dir.current_path(), self.dir.show_hidden());
        self.dir.set_entries(entries);
    }

    /// The entry index a row refers to. While awaiting a command there is a
    /// single row, which stands for the target entry.
    fn row(&self, i: usize) -> usize {
        match self.state {
            InteractionState::AwaitingCustomCommand(target) => target,
            InteractionState::Idle => i,
        }
    }

    // Queries

    /// Number of rows to show.
    pub fn num_entries(&self) -> usize {
        match self.state {
            InteractionState::AwaitingCustomCommand(_) => 1,
            InteractionState::Idle => self.dir.entries().len(),
        }
    }

    /// Text of row `i`.
    pub fn display_value(&self, i: usize) -> Option<String> {
        let entry = self.dir.entries().get(self.row(i))?;
        Some(match entry {
            Entry::Up => self.display.up_label().to_string(),
            Entry::Directory { name, .. } => apply_format(self.display.directory_format(), name),
            Entry::File { name, .. } => apply_format(self.display.file_format(), name),
        })
    }

    /// Icon of row `i`, at roughly `size` pixels.
    pub fn icon(&mut self, i: usize, size: u32) -> Option<Icon> {
        let index = self.row(i);
        let icons = self.icons.as_mut()?;
        let entry = self.dir.entries().get(index)?;
        icons.get_icon(entry, self.dir.current_path(), size)
    }

    /// The message line: the command prompt, or the hidden-files status and current path.
    pub fn message(&self) -> Option<String> {
        if let InteractionState::AwaitingCustomCommand(target) = self.state {
            let name = self.dir.entries().get(target).map_or("", Entry::name);
            return Some(apply_format(self.display.open_custom_message(), name));
        }
        if !self.display.status() {
            return None;
        }
        let symbol = if self.dir.show_hidden() {
            self.display.hidden_symbol()
        } else {
            self.display.no_hidden_symbol()
        };
        let path = join_path_components(self.dir.current_path(), self.display.path_sep());
        Some(format!("{symbol}{path}"))
    }

    /// Whether row `i` passes the filter `query`.
    ///
    /// Every whitespace separated token must match the entry name.
    pub fn matches(&self, i: usize, query: &str) -> bool {
        if let InteractionState::AwaitingCustomCommand(_) = self.state {
            return true;
        }
        let Some(entry) = self.dir.entries().get(i) else {
            return false;
        };
        let name = entry.name();
        match self.display.matching() {
            MatchMethod::Normal => {
                let name = name.to_lowercase();
                query
                    .split_whitespace()
                    .all(|token| name.contains(&token.to_lowercase()))
            }
            MatchMethod::Fuzzy => query
                .split_whitespace()
                .all(|token| self.matcher.fuzzy_match(name, token).is_some()),
        }
    }

    // Accessors

    #[inline]
    pub fn state(&self) -> InteractionState {
        self.state
    }

    #[inline]
    pub fn current_path(&self) -> &Path {
        self.dir.current_path()
    }

    #[inline]
    pub fn entries(&self) -> &[Entry] {
        self.dir.entries()
    }

    #[inline]
    pub fn show_hidden(&self) -> bool {
        self.dir.show_hidden()
    }

    #[inline]
    pub fn open_template(&self) -> &str {
        self.opener.template()
    }

    /// Path of the entry on row `i`.
    pub fn entry_path(&self, i: usize) -> Option<PathBuf> {
        let entry = self.dir.entries().get(self.row(i))?;
        Some(entry.path_in(self.dir.current_path()))
    }
}
