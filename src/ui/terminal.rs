//! Terminal setup/teardown and the event loop of the fbrowse host.
//!
//! The UI is drawn on stderr so that stdout only ever carries the path printed
//! in print-path mode.

use crate::app::{Directive, Session};
use crate::ui::keymap::Keymap;
use crate::ui::prompt::Prompt;
use crate::ui::render;

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};
use std::io;

/// Puts the terminal in raw mode and the alternate screen and runs the event loop.
///
/// Blocks until the session asks to exit. The terminal is restored even when
/// the loop fails.
pub fn run_terminal(session: &mut Session, keymap: &Keymap, icon_size: u32) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stderr = io::stderr();
    execute!(stderr, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stderr))?;

    let result = event_loop(&mut terminal, session, keymap, icon_size);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

/// Draws, waits for a key, hands it to the prompt. Returns on [Directive::Exit].
fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    session: &mut Session,
    keymap: &Keymap,
    icon_size: u32,
) -> io::Result<()>
where
    io::Error: From<<B as Backend>::Error>,
{
    let mut prompt = Prompt::new(session);

    loop {
        terminal.draw(|f| render::render(f, session, &prompt, icon_size))?;

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if let Some(Directive::Exit) = prompt.handle_key(session, keymap, key) {
                    break;
                }
            }
            // Resizes are picked up by the next draw
            _ => {}
        }
    }
    Ok(())
}
