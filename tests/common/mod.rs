//! Shared fixtures for the fbrowse integration tests.

#![allow(dead_code)]

use fbrowse::app::{Collaborators, Session};
use fbrowse::config::Config;
use fbrowse::core::{Launcher, LocalFs, MimeIcons, XdgIconLookup};

use std::cell::RefCell;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Launcher that records what it was asked to do instead of doing it.
#[derive(Default, Clone)]
pub struct Recorder {
    pub spawned: Rc<RefCell<Vec<(PathBuf, String)>>>,
    pub printed: Rc<RefCell<Vec<PathBuf>>>,
}

impl Launcher for Recorder {
    fn spawn(&self, cwd: &Path, cmdline: &str) -> io::Result<()> {
        self.spawned
            .borrow_mut()
            .push((cwd.to_path_buf(), cmdline.to_string()));
        Ok(())
    }

    fn print_path(&self, path: &Path) -> io::Result<()> {
        self.printed.borrow_mut().push(path.to_path_buf());
        Ok(())
    }
}

/// Config text starting in `dir`, with extra lines for `[general]`, `[display]` and `[open]`.
pub fn config(dir: &Path, general: &str, display: &str, open: &str) -> Result<Config, Box<dyn std::error::Error>> {
    let text = format!(
        "[general]\ndir = {:?}\n{general}\n[display]\n{display}\n[open]\n{open}\n",
        dir.display().to_string()
    );
    Ok(Config::from_toml(&text)?)
}

/// A session over the real filesystem with icons looked up only under `icon_dirs`.
pub fn session(
    config: &Config,
    icon_dirs: Vec<PathBuf>,
    recorder: &Recorder,
) -> Result<Session, Box<dyn std::error::Error>> {
    Ok(Session::with_collaborators(
        config,
        Collaborators {
            fs: Box::new(LocalFs),
            content: Box::new(MimeIcons),
            lookup: Box::new(XdgIconLookup::with_dirs(icon_dirs, Vec::new())),
            launcher: Box::new(recorder.clone()),
        },
    )?)
}

pub fn names(session: &Session) -> Vec<String> {
    session.entries().iter().map(|e| e.name().to_string()).collect()
}
