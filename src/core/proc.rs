//! Opening files.
//!
//! [Opener] turns a chosen file into either a printed path (print-path mode) or
//! a shell command line built from the open template, which is handed to the
//! [Launcher] collaborator. [ShellLauncher] runs it through `sh -c`,
//! detached from the terminal, without waiting for it. [PrintQueue] holds
//! printed paths back until the terminal host has restored the screen.

use std::cell::RefCell;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::rc::Rc;

#[cfg(test)]
use mockall::automock;

/// Default open template.
pub const DEFAULT_OPEN_TEMPLATE: &str = "xdg-open '%s'";
/// Placeholder replaced by the file path in an open template.
pub const PATH_PLACEHOLDER: &str = "%s";

/// Runs open commands and prints chosen paths.
#[cfg_attr(test, automock)]
pub trait Launcher {
    /// Start `cmdline` through the shell in `cwd`. Does not wait for it to finish.
    fn spawn(&self, cwd: &Path, cmdline: &str) -> io::Result<()>;
    /// Write `path` followed by a newline to standard output.
    fn print_path(&self, path: &Path) -> io::Result<()>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ShellLauncher;

impl Launcher for ShellLauncher {
    fn spawn(&self, cwd: &Path, cmdline: &str) -> io::Result<()> {
        Command::new("sh")
            .arg("-c")
            .arg(cmdline)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|_child| ())
    }

    fn print_path(&self, path: &Path) -> io::Result<()> {
        write_path(&mut io::stdout().lock(), path)
    }
}

fn write_path(out: &mut impl Write, path: &Path) -> io::Result<()> {
    out.write_all(path.as_os_str().as_encoded_bytes())?;
    out.write_all(b"\n")?;
    out.flush()
}

/// A [ShellLauncher] whose printed paths are queued instead of written.
///
/// Clones share the queue. The host keeps one clone and calls
/// [PrintQueue::flush] once the alternate screen is gone, so a path chosen in
/// print-path mode lands on the real stdout even when stdout is the terminal.
#[derive(Debug, Default, Clone)]
pub struct PrintQueue {
    paths: Rc<RefCell<Vec<PathBuf>>>,
}

impl PrintQueue {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn pending(&self) -> usize {
        self.paths.borrow().len()
    }

    /// Write every queued path, one per line, and empty the queue.
    pub fn flush(&self, out: &mut impl Write) -> io::Result<()> {
        for path in self.paths.borrow_mut().drain(..) {
            write_path(out, &path)?;
        }
        Ok(())
    }
}

impl Launcher for PrintQueue {
    fn spawn(&self, cwd: &Path, cmdline: &str) -> io::Result<()> {
        ShellLauncher.spawn(cwd, cmdline)
    }

    fn print_path(&self, path: &Path) -> io::Result<()> {
        self.paths.borrow_mut().push(path.to_path_buf());
        Ok(())
    }
}

/// Opens files with the configured template or prints their path.
pub struct Opener {
    template: String,
    print_path: bool,
    launcher: Box<dyn Launcher>,
}

impl Opener {
    pub fn new(template: impl Into<String>, print_path: bool, launcher: Box<dyn Launcher>) -> Self {
        Self {
            template: template.into(),
            print_path,
            launcher,
        }
    }

    // Accessors

    #[inline]
    pub fn template(&self) -> &str {
        &self.template
    }

    #[inline]
    pub fn print_path(&self) -> bool {
        self.print_path
    }

    /// Replace the open template for the rest of the session.
    pub fn set_template(&mut self, template: impl Into<String>) {
        self.template = template.into();
    }

    /// Open `path`, running the command in `cwd`.
    ///
    /// Failures are logged and otherwise ignored: the caller has already decided
    /// to close, and nothing useful can be shown to the user at that point.
    pub fn open(&self, cwd: &Path, path: &Path) {
        if self.print_path {
            if let Err(e) = self.launcher.print_path(path) {
                tracing::warn!("cannot print {}: {e}", path.display());
            }
            return;
        }

        let cmdline = command_line(&self.template, path);
        if let Some(program) = program_name(&self.template)
            && which::which(program).is_err()
        {
            tracing::warn!("open command '{program}' was not found in PATH");
        }

        tracing::info!("opening {} with: {cmdline}", path.display());
        if let Err(e) = self.launcher.spawn(cwd, &cmdline) {
            tracing::warn!("failed to run '{cmdline}': {e}");
        }
    }
}

/// Shell quoting in effect at some point of a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quoting {
    Bare,
    Single,
    Double,
}

/// Build the shell command line that opens `path` with `template`.
///
/// Every `%s` in the template is replaced by the path, escaped for the quoting
/// around that placeholder. Inside `'...'` a quote becomes `'\''`. Inside
/// `"..."` backslash, double quote, dollar and backtick get a backslash. A bare
/// `%s` gets the whole path in single quotes, as does the path appended to a
/// template without `%s`.
pub fn command_line(template: &str, path: &Path) -> String {
    let raw = path.to_string_lossy();
    if !template.contains(PATH_PLACEHOLDER) {
        return format!("{template} {}", single_quoted(&raw));
    }

    let mut out = String::with_capacity(template.len() + raw.len());
    let mut quoting = Quoting::Bare;
    let mut rest = template;
    while let Some(pos) = rest.find(PATH_PLACEHOLDER) {
        let before = &rest[..pos];
        quoting = scan_quoting(quoting, before);
        out.push_str(before);
        match quoting {
            Quoting::Bare => out.push_str(&single_quoted(&raw)),
            Quoting::Single => out.push_str(&raw.replace('\'', r"'\''")),
            Quoting::Double => out.extend(raw.chars().flat_map(|c| {
                let escape = matches!(c, '\\' | '"' | '$' | '`').then_some('\\');
                escape.into_iter().chain([c])
            })),
        }
        rest = &rest[pos + PATH_PLACEHOLDER.len()..];
    }
    out.push_str(rest);
    out
}

fn single_quoted(raw: &str) -> String {
    format!("'{}'", raw.replace('\'', r"'\''"))
}

/// Quoting in effect after `text`, starting from `quoting`.
fn scan_quoting(mut quoting: Quoting, text: &str) -> Quoting {
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        quoting = match (quoting, c) {
            (Quoting::Bare, '\'') => Quoting::Single,
            (Quoting::Bare, '"') => Quoting::Double,
            (Quoting::Single, '\'') | (Quoting::Double, '"') => Quoting::Bare,
            (Quoting::Bare | Quoting::Double, '\\') => {
                chars.next();
                quoting
            }
            (q, _) => q,
        };
    }
    quoting
}

/// First word of a template, if it names a program rather than a shell construct.
fn program_name(template: &str) -> Option<&str> {
    let first = template.split_whitespace().next()?;
    let plain = first
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '/' | '+'));
    (plain && !first.contains(PATH_PLACEHOLDER)).then_some(first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};
    use tempfile::tempdir;

    macro_rules! skip_if_no_sh {
        () => {
            if which::which("sh").is_err() {
                return Ok(());
            }
        };
    }

    #[test]
    fn placeholder_is_replaced_everywhere() {
        let line = command_line("cp '%s' '%s.bak'", Path::new("/tmp/a b"));
        assert_eq!(line, "cp '/tmp/a b' '/tmp/a b.bak'");
    }

    #[test]
    fn template_without_placeholder_gets_quoted_path() {
        assert_eq!(command_line("mpv", Path::new("/m/x.mkv")), "mpv '/m/x.mkv'");
    }

    #[test]
    fn single_quotes_in_path_are_escaped() {
        let line = command_line("xdg-open", Path::new("/d/it's.txt"));
        assert_eq!(line, r"xdg-open '/d/it'\''s.txt'");
    }

    #[test]
    fn bare_placeholder_gets_quoted_path() {
        let line = command_line("vim %s", Path::new("/d/it's here.txt"));
        assert_eq!(line, r"vim '/d/it'\''s here.txt'");
    }

    #[test]
    fn double_quoted_placeholder_is_backslash_escaped() {
        let line = command_line(r#"less "%s""#, Path::new(r#"/d/a "$b"'c.txt"#));
        assert_eq!(line, r#"less "/d/a \"\$b\"'c.txt""#);
    }

    #[test]
    fn quoting_is_tracked_across_placeholders() {
        let line = command_line("cp '%s' %s.bak", Path::new("/x/o'k"));
        assert_eq!(line, r"cp '/x/o'\''k' '/x/o'\''k'.bak");
    }

    #[test]
    fn program_name_skips_shell_constructs() {
        assert_eq!(program_name("xdg-open '%s'"), Some("xdg-open"));
        assert_eq!(program_name("/usr/bin/mpv --fs"), Some("/usr/bin/mpv"));
        assert_eq!(program_name("FOO=1 app"), None);
        assert_eq!(program_name("'%s'"), None);
        assert_eq!(program_name("   "), None);
    }

    #[test]
    fn print_path_mode_never_spawns() {
        let mut launcher = MockLauncher::new();
        launcher.expect_spawn().never();
        launcher
            .expect_print_path()
            .withf(|p| p == Path::new("/home/u/notes.txt"))
            .times(1)
            .returning(|_| Ok(()));

        let opener = Opener::new(DEFAULT_OPEN_TEMPLATE, true, Box::new(launcher));
        opener.open(Path::new("/home/u"), Path::new("/home/u/notes.txt"));
    }

    #[test]
    fn spawn_runs_in_current_directory() {
        let mut launcher = MockLauncher::new();
        launcher.expect_print_path().never();
        launcher
            .expect_spawn()
            .withf(|cwd, cmd| cwd == Path::new("/work") && cmd == "xdg-open '/work/a.pdf'")
            .times(1)
            .returning(|_, _| Ok(()));

        let opener = Opener::new(DEFAULT_OPEN_TEMPLATE, false, Box::new(launcher));
        opener.open(Path::new("/work"), Path::new("/work/a.pdf"));
    }

    #[test]
    fn spawn_failure_is_swallowed() {
        let mut launcher = MockLauncher::new();
        launcher
            .expect_spawn()
            .times(1)
            .returning(|_, _| Err(io::Error::other("no shell")));

        let opener = Opener::new("true", false, Box::new(launcher));
        opener.open(Path::new("/"), Path::new("/x"));
    }

    #[test]
    fn custom_template_replaces_default() {
        let mut launcher = MockLauncher::new();
        launcher
            .expect_spawn()
            .withf(|_, cmd| cmd == "gimp '/p/cat.png'")
            .times(1)
            .returning(|_, _| Ok(()));

        let mut opener = Opener::new(DEFAULT_OPEN_TEMPLATE, false, Box::new(launcher));
        opener.set_template("gimp");
        assert_eq!(opener.template(), "gimp");
        opener.open(Path::new("/p"), Path::new("/p/cat.png"));
    }

    #[test]
    fn queued_paths_are_written_on_flush() -> Result<(), Box<dyn std::error::Error>> {
        let queue = PrintQueue::new();
        let opener = Opener::new(DEFAULT_OPEN_TEMPLATE, true, Box::new(queue.clone()));

        opener.open(Path::new("/home/u"), Path::new("/home/u/notes.txt"));
        assert_eq!(queue.pending(), 1);

        let mut out = Vec::new();
        queue.flush(&mut out)?;
        assert_eq!(out, b"/home/u/notes.txt\n");
        assert_eq!(queue.pending(), 0);

        out.clear();
        queue.flush(&mut out)?;
        assert!(out.is_empty());
        Ok(())
    }

    #[test]
    fn shell_launcher_runs_detached() -> Result<(), Box<dyn std::error::Error>> {
        skip_if_no_sh!();

        let dir = tempdir()?;
        ShellLauncher.spawn(dir.path(), "touch marker")?;

        let marker = dir.path().join("marker");
        let deadline = Instant::now() + Duration::from_secs(5);
        while !marker.exists() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(20));
        }
        assert!(marker.exists(), "command did not run in the given directory");
        Ok(())
    }
}
