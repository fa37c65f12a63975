//! Host-side input state of the terminal UI.
//!
//! [Prompt] owns the typed input line, the filtered rows and the selection.
//! It turns key presses into session [Event]s and applies the returned
//! [Directive] to itself.

use crate::app::{Directive, Event, InteractionState, Session};
use crate::ui::keymap::{Action, Keymap};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Default)]
pub struct Prompt {
    input: String,
    selected: usize,
    visible: Vec<usize>,
}

impl Prompt {
    pub fn new(session: &Session) -> Self {
        let mut prompt = Self::default();
        prompt.refresh(session);
        prompt
    }

    // Accessors

    #[inline]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Position of the selection within [Prompt::visible].
    #[inline]
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Session row indices passing the current input, in listing order.
    #[inline]
    pub fn visible(&self) -> &[usize] {
        &self.visible
    }

    /// Session row under the selection, if any row is visible.
    pub fn selected_row(&self) -> Option<usize> {
        self.visible.get(self.selected).copied()
    }

    /// Recompute the visible rows and clamp the selection.
    pub fn refresh(&mut self, session: &Session) {
        self.visible = (0..session.num_entries())
            .filter(|&i| session.matches(i, &self.input))
            .collect();
        self.selected = self.selected.min(self.visible.len().saturating_sub(1));
    }

    /// Handle one key press. Returns the session's directive when the key
    /// produced an event; purely local edits return `None`.
    pub fn handle_key(
        &mut self,
        session: &mut Session,
        keymap: &Keymap,
        key: KeyEvent,
    ) -> Option<Directive> {
        let event = match keymap.lookup(key) {
            Some(action) => self.event_for(session, action)?,
            None => {
                self.edit(key);
                self.refresh(session);
                return None;
            }
        };

        let directive = session.handle_event(event);
        match directive {
            Directive::Reset => {
                self.input.clear();
                self.selected = 0;
            }
            Directive::Reload | Directive::Next | Directive::Previous | Directive::Exit => {}
        }
        self.refresh(session);
        Some(directive)
    }

    fn event_for(&mut self, session: &Session, action: Action) -> Option<Event> {
        let awaiting = matches!(
            session.state(),
            InteractionState::AwaitingCustomCommand(_)
        );
        let input = self.input.clone();

        match action {
            Action::Select | Action::CustomInput | Action::CustomCommand if awaiting => {
                Some(Event::Confirm(input))
            }
            Action::Select => Some(match self.selected_row() {
                Some(row) => Event::Select(row),
                None => Event::CustomInput(input),
            }),
            Action::CustomInput => Some(Event::CustomInput(input)),
            Action::CustomCommand => self.selected_row().map(Event::ShiftSelect),
            Action::Next => Some(Event::Next),
            Action::Previous => Some(Event::Previous),
            Action::Cancel => Some(Event::Cancel),
            Action::Up => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            Action::Down => {
                if self.selected + 1 < self.visible.len() {
                    self.selected += 1;
                }
                None
            }
        }
    }

    fn edit(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.input.push(c);
                self.selected = 0;
            }
            KeyCode::Backspace => {
                self.input.pop();
                self.selected = 0;
            }
            _ => {}
        }
    }
}
