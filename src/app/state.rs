//! Events, directives and the state owned by a [Session](crate::app::Session).
//!
//! The host translates its own input into an [Event], hands it to the session,
//! and reacts to the returned [Directive].

use crate::core::fm::Entry;

use std::path::{Path, PathBuf};

/// Input delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Activate the row at this index.
    Select(usize),
    /// Ask for a custom command to open the row at this index with.
    ShiftSelect(usize),
    /// The typed input line, submitted as a path (or empty to toggle hidden files).
    CustomInput(String),
    /// The typed input line, submitted as an answer.
    Confirm(String),
    Next,
    Previous,
    Cancel,
}

/// What the host should do after an event was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// The listing changed: clear the input and the selection.
    Reset,
    /// Redraw, keeping the input.
    Reload,
    /// Switch to the next mode of a multi-mode host.
    Next,
    /// Switch to the previous mode of a multi-mode host.
    Previous,
    /// Close.
    Exit,
}

/// Whether the session is browsing or asking for an open command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    /// Waiting for the command to open the entry at this index with.
    AwaitingCustomCommand(usize),
}

/// The directory being browsed and its current listing.
#[derive(Debug)]
pub struct DirectoryState {
    current_path: PathBuf,
    entries: Vec<Entry>,
    show_hidden: bool,
}

impl DirectoryState {
    pub(crate) fn new(current_path: PathBuf, show_hidden: bool) -> Self {
        Self {
            current_path,
            entries: Vec::new(),
            show_hidden,
        }
    }

    // Accessors

    #[inline]
    pub fn current_path(&self) -> &Path {
        &self.current_path
    }

    #[inline]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    #[inline]
    pub fn show_hidden(&self) -> bool {
        self.show_hidden
    }

    pub(crate) fn set_current_path(&mut self, path: PathBuf) {
        self.current_path = path;
    }

    pub(crate) fn set_entries(&mut self, entries: Vec<Entry>) {
        self.entries = entries;
    }

    pub(crate) fn set_show_hidden(&mut self, show: bool) {
        self.show_hidden = show;
    }
}
