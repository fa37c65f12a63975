//! main.rs
//! Entry point for fbrowse

use fbrowse::app::{Collaborators, Session};
use fbrowse::config::Config;
use fbrowse::core::PrintQueue;
use fbrowse::ui::{self, Keymap};
use fbrowse::utils::cli::{CliAction, handle_args};

use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Log to the file named by FBROWSE_LOG, if set. The terminal is owned by the UI.
fn init_logging() {
    let Ok(path) = std::env::var("FBROWSE_LOG") else {
        return;
    };
    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("[fbrowse] Cannot open log file {}: {}", path, e);
            return;
        }
    };
    let filter = EnvFilter::try_from_env("FBROWSE_LOG_LEVEL")
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}

fn main() -> std::io::Result<()> {
    std::panic::set_hook(Box::new(|info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let mut stderr = std::io::stderr();
        let _ = crossterm::execute!(
            stderr,
            crossterm::terminal::LeaveAlternateScreen,
            crossterm::cursor::Show
        );

        eprintln!("\n[fbrowse] Error occurred: {}", info);

        #[cfg(debug_assertions)]
        {
            let bt = std::backtrace::Backtrace::force_capture();
            eprintln!("\nStack Backtrace:\n{}", bt);
        }
    }));

    let overrides = match handle_args() {
        CliAction::Run(overrides) => overrides,
        CliAction::Exit => return Ok(()),
    };

    init_logging();

    let mut config = Config::load();
    config.apply(overrides);

    // Printed paths wait until the alternate screen is gone
    let printed = PrintQueue::new();
    let parts = Collaborators {
        launcher: Box::new(printed.clone()),
        ..Collaborators::local()
    };

    let mut session = match Session::with_collaborators(&config, parts) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("\n[fbrowse] Error: {}", e);
            std::process::exit(1);
        }
    };

    let keymap = Keymap::from_keys(config.keys());
    let result = ui::run_terminal(&mut session, &keymap, config.display().icon_size());
    printed.flush(&mut std::io::stdout().lock())?;
    result
}
